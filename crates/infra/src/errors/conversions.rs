//! Conversions from external infrastructure errors into domain errors.

use dogcamp_domain::DogCampError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub DogCampError);

impl From<InfraError> for DogCampError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<DogCampError> for InfraError {
    fn from(value: DogCampError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoDogCampError {
    fn into_dogcamp(self) -> DogCampError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → DogCampError */
/* -------------------------------------------------------------------------- */

impl IntoDogCampError for SqlError {
    fn into_dogcamp(self) -> DogCampError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        DogCampError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        DogCampError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067) => {
                        DogCampError::Database("unique constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, 787) => {
                        DogCampError::Database("foreign key constraint violation".into())
                    }
                    _ => DogCampError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => DogCampError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                DogCampError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                DogCampError::Database(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(_) => DogCampError::Database("invalid UTF-8 returned from sqlite".into()),
            RE::InvalidParameterName(parameter_name) => {
                DogCampError::Database(format!("invalid parameter name: {parameter_name}"))
            }
            RE::InvalidPath(path) => {
                DogCampError::Database(format!("invalid database path: {}", path.to_string_lossy()))
            }
            RE::InvalidQuery => DogCampError::Database("invalid SQL query".into()),
            other => DogCampError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_dogcamp())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → DogCampError */
/* -------------------------------------------------------------------------- */

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(DogCampError::Database(format!("connection pool error: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → DogCampError */
/* -------------------------------------------------------------------------- */

impl IntoDogCampError for HttpError {
    fn into_dogcamp(self) -> DogCampError {
        if self.is_timeout() {
            return DogCampError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return DogCampError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => DogCampError::RemoteApi(message),
                404 => DogCampError::NotFound(message),
                429 => DogCampError::Network(message),
                400..=499 => DogCampError::InvalidInput(message),
                _ => DogCampError::Network(message),
            };
        }

        if self.is_decode() {
            return DogCampError::RemoteApi(format!("malformed response body: {self}"));
        }

        DogCampError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_dogcamp())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
