pub mod fetch_state;
pub mod notifications;
pub mod page_store;

pub use fetch_state::{FetchState, PageView, Payload};
pub use notifications::NotificationStore;
pub use page_store::{run_cycle, CycleMetrics, PageStore};
