use std::num::NonZeroUsize;

use serde::Serialize;

use crate::model::Job;

/// Pagination metadata. Indices are 1-based and inclusive for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: usize,
    pub total_pages: usize,
    /// 0 when the result is empty.
    pub start_index: usize,
    pub end_index: usize,
    pub total_items: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub jobs: Vec<Job>,
    pub info: PageInfo,
}

/// Returns page `page` of `jobs`. The page number is clamped into range.
pub fn paginate(jobs: &[Job], page_size: NonZeroUsize, page: usize) -> Page {
    let size = page_size.get();
    let total = jobs.len();
    let total_pages = total.div_ceil(size);
    let current_page = page.clamp(1, total_pages.max(1));

    let start = ((current_page - 1) * size).min(total);
    let end = (start + size).min(total);

    let info = PageInfo {
        current_page,
        total_pages,
        start_index: if start < end { start + 1 } else { 0 },
        end_index: end,
        total_items: total,
    };

    Page {
        jobs: jobs[start..end].to_vec(),
        info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::seed::seed_jobs;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_first_and_last_page() {
        let jobs = seed_jobs();
        let page = paginate(&jobs, size(4), 1);
        assert_eq!(page.jobs.len(), 4);
        assert_eq!(
            page.info,
            PageInfo {
                current_page: 1,
                total_pages: 2,
                start_index: 1,
                end_index: 4,
                total_items: 6,
            }
        );

        let page = paginate(&jobs, size(4), 2);
        assert_eq!(page.jobs.len(), 2);
        assert_eq!(page.info.start_index, 5);
        assert_eq!(page.info.end_index, 6);
    }

    #[test]
    fn test_page_is_clamped() {
        let jobs = seed_jobs();
        assert_eq!(paginate(&jobs, size(4), 0).info.current_page, 1);
        let page = paginate(&jobs, size(4), 99);
        assert_eq!(page.info.current_page, 2);
        assert_eq!(page.jobs[0].id, "5");
    }

    #[test]
    fn test_empty_input() {
        let page = paginate(&[], size(10), 3);
        assert!(page.jobs.is_empty());
        assert_eq!(
            page.info,
            PageInfo {
                current_page: 1,
                total_pages: 0,
                start_index: 0,
                end_index: 0,
                total_items: 0,
            }
        );
    }

    #[test]
    fn test_pages_concatenate_to_input() {
        let jobs = seed_jobs();
        for n in 1..=7 {
            let first = paginate(&jobs, size(n), 1);
            let mut all = Vec::new();
            for p in 1..=first.info.total_pages {
                all.extend(paginate(&jobs, size(n), p).jobs);
            }
            assert_eq!(all, jobs, "page size {}", n);
        }
    }
}
