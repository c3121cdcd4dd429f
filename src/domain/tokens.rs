use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Access/refresh credential bundle with expiry timestamps.
///
/// Issued wholesale by the authentication service and replaced wholesale on
/// every login or refresh; never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    #[serde(with = "time::serde::timestamp")]
    pub access_expires_at: OffsetDateTime,
    pub refresh: String,
    #[serde(with = "time::serde::timestamp")]
    pub refresh_expires_at: OffsetDateTime,
}
