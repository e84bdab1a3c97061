pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod notify;
pub mod persistence;
pub mod query;
pub mod store;
pub mod transfer;

pub use config::{apply_env_overrides, load_config, load_config_from_str, StoreConfig};
pub use db::Database;
pub use error::{ConfigError, JobDeskError, Result, StorageError, StoreError, TransferError};
pub use logging::init_logging;
pub use model::{
    Customer, CustomerPatch, Engineer, EngineerPatch, Job, JobPatch, JobStatus, NewCustomer,
    NewJob, Priority, StoredDate,
};
pub use notify::{
    Notification, NotificationBroadcaster, NotificationKind, NotificationPreferences,
    NotificationSink, NullNotifier,
};
pub use persistence::{KeyValueStore, Persistence, Snapshot};
pub use query::{JobFilter, JobView, Page, SortKey, SortOrder};
pub use store::{InitSource, JobStore};
pub use transfer::ImportSummary;
