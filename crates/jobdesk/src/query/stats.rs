//! Aggregate statistics, computed on demand from a job collection.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::model::{Customer, Engineer, Job, JobStatus, Priority};

/// Counts over a set of jobs. `red + amber + green + completed == total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JobStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub critical: usize,
    pub red: usize,
    pub amber: usize,
    pub green: usize,
}

impl JobStats {
    pub fn from_jobs<'a>(jobs: impl IntoIterator<Item = &'a Job>) -> Self {
        let mut stats = JobStats::default();
        for job in jobs {
            stats.total += 1;
            match job.status {
                JobStatus::Red => stats.red += 1,
                JobStatus::Amber => stats.amber += 1,
                JobStatus::Green => stats.green += 1,
                JobStatus::Completed => stats.completed += 1,
            }
            if job.priority == Priority::Critical {
                stats.critical += 1;
            }
        }
        stats.pending = stats.total - stats.completed;
        stats
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivitySummary {
    pub total: usize,
    /// Registered entities referenced by at least one job.
    pub active: usize,
    /// Entity with the most jobs; ties go to the smallest name.
    pub most_active: Option<String>,
}

impl ActivitySummary {
    fn from_counts<'a>(
        names: impl Iterator<Item = &'a str>,
        counts: &BTreeMap<&str, usize>,
    ) -> Self {
        let mut total = 0;
        let mut active: BTreeMap<&str, usize> = BTreeMap::new();
        for name in names {
            total += 1;
            if let Some(&count) = counts.get(name) {
                active.insert(name, count);
            }
        }

        // BTreeMap iterates names ascending, so the first maximum wins ties.
        let mut most_active: Option<(&str, usize)> = None;
        for (&name, &count) in &active {
            if most_active.map_or(true, |(_, best)| count > best) {
                most_active = Some((name, count));
            }
        }

        Self {
            total,
            active: active.len(),
            most_active: most_active.map(|(name, _)| name.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OverallStats {
    pub jobs: JobStats,
    pub customers: ActivitySummary,
    pub engineers: ActivitySummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerStats {
    pub customer: String,
    #[serde(flatten)]
    pub jobs: JobStats,
    /// Distinct sites in first-seen order.
    pub sites: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineerStats {
    pub engineer: String,
    #[serde(flatten)]
    pub jobs: JobStats,
    pub active_jobs: usize,
    /// `None` when no job has both a valid creation and completion date.
    pub average_completion_minutes: Option<f64>,
}

pub fn job_stats(jobs: &[Job]) -> JobStats {
    JobStats::from_jobs(jobs)
}

pub fn overall_stats(jobs: &[Job], customers: &[Customer], engineers: &[Engineer]) -> OverallStats {
    let mut by_customer: BTreeMap<&str, usize> = BTreeMap::new();
    let mut by_engineer: BTreeMap<&str, usize> = BTreeMap::new();
    for job in jobs {
        *by_customer.entry(job.customer.as_str()).or_default() += 1;
        if job.is_assigned() {
            *by_engineer.entry(job.engineer.as_str()).or_default() += 1;
        }
    }

    OverallStats {
        jobs: JobStats::from_jobs(jobs),
        customers: ActivitySummary::from_counts(
            customers.iter().map(|c| c.name.as_str()),
            &by_customer,
        ),
        engineers: ActivitySummary::from_counts(
            engineers.iter().map(|e| e.name.as_str()),
            &by_engineer,
        ),
    }
}

pub fn customer_stats(jobs: &[Job], customer: &str) -> CustomerStats {
    let matching: Vec<&Job> = jobs.iter().filter(|j| j.customer == customer).collect();

    let mut seen = HashSet::new();
    let sites = matching
        .iter()
        .filter(|j| seen.insert(j.site.as_str()))
        .map(|j| j.site.clone())
        .collect();

    CustomerStats {
        customer: customer.to_string(),
        jobs: JobStats::from_jobs(matching.iter().copied()),
        sites,
    }
}

pub fn engineer_stats(jobs: &[Job], engineer: &str) -> EngineerStats {
    let matching: Vec<&Job> = jobs.iter().filter(|j| j.engineer == engineer).collect();
    let stats = JobStats::from_jobs(matching.iter().copied());

    let durations: Vec<f64> = matching.iter().filter_map(|j| j.completion_minutes()).collect();
    let average_completion_minutes = if durations.is_empty() {
        None
    } else {
        Some(durations.iter().sum::<f64>() / durations.len() as f64)
    };

    EngineerStats {
        engineer: engineer.to_string(),
        jobs: stats,
        active_jobs: stats.pending,
        average_completion_minutes,
    }
}
