use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A row of the mailing list as the store returns it.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Subscriber {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub organization: Option<String>,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
}
