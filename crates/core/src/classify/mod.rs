//! Free-text classification for remote catalog fields.
//!
//! The upstream feed describes pet policies and facilities as free-form
//! Korean text ("소형견 가능", "전기,온수,무선인터넷"). These parsers turn
//! that text into structured values. Both are pure and never fail:
//! unparseable input falls back to the most conservative reading.

use dogcamp_domain::PetSizeCategory;

/// A negative verdict wins over anything else in the same string
/// ("대형견 불가" must not read as allowed).
const NEGATIVE_KEYWORDS: &[&str] = &["불가", "금지"];
const POSITIVE_KEYWORDS: &[&str] = &["가능", "허용"];

/// Size keywords in priority order; first match wins. The bare forms also
/// match their 견-suffixed variants ("소형견" contains "소형").
const SIZE_KEYWORDS: &[(&str, PetSizeCategory)] = &[
    ("소형", PetSizeCategory::Small),
    ("중형", PetSizeCategory::Medium),
    ("대형", PetSizeCategory::Large),
];

/// Structured reading of a pet-policy string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetPolicyClassification {
    pub allowed: bool,
    pub size_category: Option<PetSizeCategory>,
    /// Verbatim (trimmed) source text, kept for human audit regardless of
    /// the parse outcome. `None` only when the input was empty.
    pub note: Option<String>,
}

impl PetPolicyClassification {
    fn not_allowed(note: Option<String>) -> Self {
        Self { allowed: false, size_category: None, note }
    }
}

/// Classify a pet-policy string.
///
/// Defaults to not-allowed. A negative keyword anywhere in the text forces
/// not-allowed even when positive tokens are also present ("불가능" contains
/// both). A positive keyword without a negative one reads as allowed, with
/// an optional size restriction scanned small → medium → large.
pub fn classify_pet_policy(text: &str) -> PetPolicyClassification {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return PetPolicyClassification::not_allowed(None);
    }

    let note = Some(trimmed.to_string());

    if NEGATIVE_KEYWORDS.iter().any(|kw| trimmed.contains(kw)) {
        return PetPolicyClassification::not_allowed(note);
    }

    if !POSITIVE_KEYWORDS.iter().any(|kw| trimmed.contains(kw)) {
        return PetPolicyClassification::not_allowed(note);
    }

    let size_category = SIZE_KEYWORDS
        .iter()
        .find(|(kw, _)| trimmed.contains(kw))
        .map(|&(_, category)| category);

    PetPolicyClassification { allowed: true, size_category, note }
}

/// Parse two comma-separated facility lists into a deduplicated set of tag
/// names, preserving first-seen order. Tokens are trimmed; empty tokens are
/// dropped; duplicates across both inputs collapse by exact string equality.
pub fn parse_facility_list(primary: Option<&str>, secondary: Option<&str>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for csv in [primary, secondary].into_iter().flatten() {
        for token in csv.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            if !names.iter().any(|existing| existing == token) {
                names.push(token.to_string());
            }
        }
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_defaults_to_not_allowed() {
        let result = classify_pet_policy("");
        assert!(!result.allowed);
        assert_eq!(result.size_category, None);
        assert_eq!(result.note, None);

        let result = classify_pet_policy("   ");
        assert!(!result.allowed);
        assert_eq!(result.note, None);
    }

    #[test]
    fn positive_keyword_allows() {
        let result = classify_pet_policy("가능");
        assert!(result.allowed);
        assert_eq!(result.size_category, None);
        assert_eq!(result.note.as_deref(), Some("가능"));

        assert!(classify_pet_policy("반려동물 허용").allowed);
    }

    #[test]
    fn negative_keyword_wins_over_positive() {
        // "불가능" contains both 불가 and 가능
        let result = classify_pet_policy("불가능");
        assert!(!result.allowed);

        let result = classify_pet_policy("대형견 불가, 소형견 가능 문의");
        assert!(!result.allowed);
        assert_eq!(result.size_category, None);

        assert!(!classify_pet_policy("출입 금지").allowed);
    }

    #[test]
    fn size_scan_priority_is_small_medium_large() {
        let result = classify_pet_policy("소형견 가능");
        assert_eq!(result.size_category, Some(PetSizeCategory::Small));

        let result = classify_pet_policy("중형견까지 가능");
        assert_eq!(result.size_category, Some(PetSizeCategory::Medium));

        let result = classify_pet_policy("대형견 허용");
        assert_eq!(result.size_category, Some(PetSizeCategory::Large));

        // first match wins when several sizes appear
        let result = classify_pet_policy("소형견, 중형견 가능");
        assert_eq!(result.size_category, Some(PetSizeCategory::Small));
    }

    #[test]
    fn text_without_verdict_keywords_stays_not_allowed() {
        let result = classify_pet_policy("문의 요망");
        assert!(!result.allowed);
        assert_eq!(result.size_category, None);
        assert_eq!(result.note.as_deref(), Some("문의 요망"));
    }

    #[test]
    fn note_keeps_verbatim_text_even_when_not_allowed() {
        let result = classify_pet_policy("애완동물 출입 금지입니다");
        assert!(!result.allowed);
        assert_eq!(result.note.as_deref(), Some("애완동물 출입 금지입니다"));
    }

    #[test]
    fn facility_lists_are_trimmed_deduped_and_merged() {
        let names = parse_facility_list(Some("전기,온수, 전기"), Some("무선인터넷"));
        assert_eq!(names.len(), 3);
        assert!(names.contains(&"전기".to_string()));
        assert!(names.contains(&"온수".to_string()));
        assert!(names.contains(&"무선인터넷".to_string()));
    }

    #[test]
    fn facility_parsing_handles_missing_and_empty_inputs() {
        assert!(parse_facility_list(None, None).is_empty());
        assert!(parse_facility_list(Some(""), Some(" , ,")).is_empty());

        let names = parse_facility_list(None, Some("놀이터"));
        assert_eq!(names, vec!["놀이터".to_string()]);
    }
}
