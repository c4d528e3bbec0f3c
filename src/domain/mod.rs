pub mod item;
pub mod record;

pub use item::FeedItem;
pub use record::DeliveryRecord;
