//! Pure filtering, sorting, pagination and statistics over job collections.

mod filter;
mod paginate;
mod sort;
pub mod stats;
mod view;

pub use filter::{filter_jobs, JobFilter};
pub use paginate::{paginate, Page, PageInfo};
pub use sort::{sort_jobs, SortKey, SortOrder};
pub use stats::{ActivitySummary, CustomerStats, EngineerStats, JobStats, OverallStats};
pub use view::{JobView, DEFAULT_PAGE_SIZE};
