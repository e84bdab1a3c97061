//! Domain records: jobs, customers and engineers.

mod customer;
mod date;
mod engineer;
mod job;
mod patch;
pub mod seed;

pub use customer::{Customer, CustomerPatch, NewCustomer};
pub use date::StoredDate;
pub use engineer::{Engineer, EngineerPatch, EngineerStatus, EngineerWorkload, SyncStatus};
pub use job::{
    generate_id, generate_job_number, Job, JobDetails, JobStatus, NewJob, PartyContact, Priority,
    SlaTargets,
};
pub use patch::JobPatch;
