//! Wire types for the GoCamping open-data response envelope.
//!
//! The upstream API wraps every payload in `response.header` /
//! `response.body`. Quirks handled here: `items` degrades to an empty
//! string when a page has no records, a single-record page may carry
//! `item` as a bare object instead of a one-element array, and numeric
//! fields occasionally arrive as JSON numbers instead of strings.

use dogcamp_domain::{CatalogEntry, RawCampingRecord};
use serde::{Deserialize, Deserializer};

/// Top-level envelope.
#[derive(Debug, Deserialize)]
pub struct CatalogEnvelope {
    pub response: CatalogResponse,
}

#[derive(Debug, Deserialize)]
pub struct CatalogResponse {
    pub header: CatalogHeader,
    #[serde(default)]
    pub body: Option<CatalogBody>,
}

/// Result code and message; `"0000"` is the success sentinel.
#[derive(Debug, Deserialize)]
pub struct CatalogHeader {
    #[serde(rename = "resultCode")]
    pub result_code: String,
    #[serde(rename = "resultMsg", default)]
    pub result_msg: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CatalogBody {
    #[serde(default)]
    pub items: CatalogItems,
    #[serde(rename = "totalCount", default)]
    pub total_count: i64,
    #[serde(rename = "numOfRows", default)]
    pub num_of_rows: i64,
    #[serde(rename = "pageNo", default)]
    pub page_no: i64,
}

/// The `items` container in all three upstream shapes.
#[derive(Debug, Default, Deserialize)]
#[serde(from = "RawItems")]
pub struct CatalogItems {
    pub item: Vec<CatalogItem>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawItems {
    Wrapped {
        #[serde(default)]
        item: OneOrMany,
    },
    Empty(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<CatalogItem>),
    One(Box<CatalogItem>),
}

impl Default for OneOrMany {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl From<RawItems> for CatalogItems {
    fn from(raw: RawItems) -> Self {
        match raw {
            RawItems::Wrapped { item: OneOrMany::Many(items) } => Self { item: items },
            RawItems::Wrapped { item: OneOrMany::One(item) } => Self { item: vec![*item] },
            RawItems::Empty(_) => Self::default(),
        }
    }
}

/// One raw page item, field names as the upstream API sends them.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogItem {
    #[serde(rename = "contentId", default, deserialize_with = "string_or_number")]
    pub content_id: Option<String>,
    #[serde(rename = "facltNm", default)]
    pub faclt_nm: Option<String>,
    #[serde(rename = "addr1", default)]
    pub addr1: Option<String>,
    #[serde(rename = "addr2", default)]
    pub addr2: Option<String>,
    #[serde(rename = "doNm", default)]
    pub do_nm: Option<String>,
    #[serde(rename = "sigunguNm", default)]
    pub sigungu_nm: Option<String>,
    #[serde(rename = "mapX", default, deserialize_with = "string_or_number")]
    pub map_x: Option<String>,
    #[serde(rename = "mapY", default, deserialize_with = "string_or_number")]
    pub map_y: Option<String>,
    #[serde(rename = "tel", default)]
    pub tel: Option<String>,
    #[serde(rename = "firstImageUrl", default)]
    pub first_image_url: Option<String>,
    #[serde(rename = "homepage", default)]
    pub homepage: Option<String>,
    #[serde(rename = "intro", default)]
    pub intro: Option<String>,
    #[serde(rename = "sbrsCl", default)]
    pub sbrs_cl: Option<String>,
    #[serde(rename = "sbrsEtc", default)]
    pub sbrs_etc: Option<String>,
    #[serde(rename = "animalCmgCl", default)]
    pub animal_cmg_cl: Option<String>,
}

impl CatalogItem {
    /// Validate this page item into a positional catalog entry.
    ///
    /// An item lacking a usable content id or facility name becomes a
    /// `Rejected` slot rather than disappearing: every upstream item keeps
    /// its position so logical corpus indices stay aligned with
    /// `totalCount`.
    pub fn into_entry(self) -> CatalogEntry {
        let content_id = non_empty(self.content_id);
        let name = non_empty(self.faclt_nm);

        let (content_id, name) = match (content_id, name) {
            (Some(content_id), Some(name)) => (content_id, name),
            (content_id, _) => return CatalogEntry::Rejected { content_id },
        };

        CatalogEntry::Valid(RawCampingRecord {
            content_id,
            name,
            address: non_empty(self.addr1),
            address_detail: non_empty(self.addr2),
            province: non_empty(self.do_nm),
            district: non_empty(self.sigungu_nm),
            map_x: non_empty(self.map_x),
            map_y: non_empty(self.map_y),
            phone: non_empty(self.tel),
            image_url: non_empty(self.first_image_url),
            homepage: non_empty(self.homepage),
            intro: non_empty(self.intro),
            facility_csv: non_empty(self.sbrs_cl),
            facility_etc_csv: non_empty(self.sbrs_etc),
            pet_policy_text: non_empty(self.animal_cmg_cl),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Value {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Value>::deserialize(deserializer)?.map(|value| match value {
        Value::Text(text) => text,
        Value::Number(number) => number.to_string(),
    }))
}
