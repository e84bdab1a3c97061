use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::Job;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// `createdAt`; invalid dates sort before valid ones.
    #[default]
    Date,
    Priority,
    Status,
    Customer,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

fn compare(a: &Job, b: &Job, key: SortKey) -> Ordering {
    match key {
        SortKey::Date => a.created_at.as_datetime().cmp(&b.created_at.as_datetime()),
        SortKey::Priority => a.priority.rank().cmp(&b.priority.rank()),
        SortKey::Status => a.status.rank().cmp(&b.status.rank()),
        SortKey::Customer => a.customer.as_bytes().cmp(b.customer.as_bytes()),
    }
}

/// Stable sort. Equal keys keep their input order in both directions.
pub fn sort_jobs(jobs: &mut [Job], key: SortKey, order: SortOrder) {
    match order {
        SortOrder::Asc => jobs.sort_by(|a, b| compare(a, b, key)),
        SortOrder::Desc => jobs.sort_by(|a, b| compare(b, a, key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::seed::seed_jobs;
    use crate::model::StoredDate;

    fn ids(jobs: &[Job]) -> Vec<&str> {
        jobs.iter().map(|j| j.id.as_str()).collect()
    }

    #[test]
    fn test_sort_by_date() {
        let mut jobs = seed_jobs();
        sort_jobs(&mut jobs, SortKey::Date, SortOrder::Asc);
        assert_eq!(ids(&jobs), vec!["5", "4", "1", "6", "2", "3"]);

        sort_jobs(&mut jobs, SortKey::Date, SortOrder::Desc);
        assert_eq!(ids(&jobs), vec!["3", "2", "6", "1", "4", "5"]);
    }

    #[test]
    fn test_priority_ties_keep_input_order_both_ways() {
        let mut jobs = seed_jobs();
        sort_jobs(&mut jobs, SortKey::Priority, SortOrder::Desc);
        assert_eq!(ids(&jobs), vec!["2", "1", "3", "4", "6", "5"]);

        let mut jobs = seed_jobs();
        sort_jobs(&mut jobs, SortKey::Priority, SortOrder::Asc);
        assert_eq!(ids(&jobs), vec!["5", "4", "6", "1", "3", "2"]);
    }

    #[test]
    fn test_sort_by_status() {
        let mut jobs = seed_jobs();
        sort_jobs(&mut jobs, SortKey::Status, SortOrder::Desc);
        assert_eq!(ids(&jobs), vec!["2", "3", "6", "1", "4", "5"]);
    }

    #[test]
    fn test_sort_by_customer_is_bytewise() {
        let mut jobs = seed_jobs();
        jobs[0].customer = "acme lowercase".to_string();
        sort_jobs(&mut jobs, SortKey::Customer, SortOrder::Asc);
        let customers: Vec<&str> = jobs.iter().map(|j| j.customer.as_str()).collect();
        assert_eq!(customers.last(), Some(&"acme lowercase"));
        assert_eq!(customers[0], "Acme Corporation");
    }

    #[test]
    fn test_invalid_dates_sort_first_ascending() {
        let mut jobs = seed_jobs();
        jobs[2].created_at = StoredDate::Invalid("n/a".to_string());
        sort_jobs(&mut jobs, SortKey::Date, SortOrder::Asc);
        assert_eq!(jobs[0].id, "3");
    }
}
