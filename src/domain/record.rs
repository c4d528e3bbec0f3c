use chrono::{DateTime, Utc};

/// A link that has been delivered, or deliberately marked seen on bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryRecord {
    pub link: String,
    pub seen_at: DateTime<Utc>,
}
