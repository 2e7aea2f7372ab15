pub mod events;

pub use events::{Notification, NotificationLevel, StoreEvent};
