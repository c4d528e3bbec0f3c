pub mod sqlite;

use crate::app::Result;
use crate::domain::DeliveryRecord;

pub use sqlite::SqliteStore;

/// Durable set of links that were delivered or marked seen.
///
/// The engine is the only writer. `add` is an atomic insert-if-absent, so a
/// link can never be recorded twice even if callers skip the `exists` check.
pub trait DedupStore {
    fn exists(&self, link: &str) -> Result<bool>;

    /// Record `link` with the current time. Fails with
    /// [`RelayError::AlreadyRecorded`](crate::app::RelayError::AlreadyRecorded)
    /// when the link is already present.
    fn add(&self, link: &str) -> Result<()>;

    fn get(&self, link: &str) -> Result<Option<DeliveryRecord>>;
    fn count(&self) -> Result<i64>;

    /// Most recently written records first.
    fn recent(&self, limit: usize) -> Result<Vec<DeliveryRecord>>;
}
