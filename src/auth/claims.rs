use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Identity carried inside a signed token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(rename = "id")]
    pub user_id: i64,
    pub username: String,
    #[serde(with = "time::serde::rfc3339")]
    pub issued_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub expired_at: OffsetDateTime,
}

impl Payload {
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        now > self.expired_at
    }
}
