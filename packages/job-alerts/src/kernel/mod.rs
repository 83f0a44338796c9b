//! Kernel module - infrastructure and dependencies.

pub mod db;
pub mod deps;
pub mod feed_fetcher;
pub mod test_dependencies;
pub mod traits;

pub use db::{FlowLock, MIGRATOR};
pub use deps::{JobAlertDeps, NtfyAdapter};
pub use feed_fetcher::HttpFeedFetcher;
pub use traits::{BaseFeedFetcher, BaseNotifier, Notification};
