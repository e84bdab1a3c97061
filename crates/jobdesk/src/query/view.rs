use std::num::NonZeroUsize;

use super::{filter_jobs, paginate, sort_jobs, JobFilter, Page, SortKey, SortOrder};
use crate::model::Job;

pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(size) => size,
    None => unreachable!(),
};

/// Dashboard query state: filter, sort, page size and current page.
///
/// Changing the filter or page size sends the view back to page 1.
#[derive(Debug, Clone, PartialEq)]
pub struct JobView {
    filter: JobFilter,
    sort_key: SortKey,
    sort_order: SortOrder,
    page_size: NonZeroUsize,
    page: usize,
}

impl Default for JobView {
    fn default() -> Self {
        Self {
            filter: JobFilter::default(),
            sort_key: SortKey::Date,
            sort_order: SortOrder::Desc,
            page_size: DEFAULT_PAGE_SIZE,
            page: 1,
        }
    }
}

impl JobView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> &JobFilter {
        &self.filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    pub fn set_filter(&mut self, filter: JobFilter) {
        self.filter = filter;
        self.page = 1;
    }

    /// Edits the filter in place and resets to page 1.
    pub fn update_filter(&mut self, edit: impl FnOnce(&mut JobFilter)) {
        edit(&mut self.filter);
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.set_filter(JobFilter::default());
    }

    pub fn set_sort(&mut self, key: SortKey, order: SortOrder) {
        self.sort_key = key;
        self.sort_order = order;
    }

    pub fn set_page_size(&mut self, page_size: NonZeroUsize) {
        self.page_size = page_size;
        self.page = 1;
    }

    pub fn go_to_page(&mut self, page: usize, jobs: &[Job]) {
        let total_pages = self.total_pages(jobs);
        self.page = page.clamp(1, total_pages.max(1));
    }

    pub fn next_page(&mut self, jobs: &[Job]) {
        self.go_to_page(self.page.saturating_add(1), jobs);
    }

    pub fn previous_page(&mut self, jobs: &[Job]) {
        self.go_to_page(self.page.saturating_sub(1), jobs);
    }

    /// Filtered and sorted jobs, before pagination.
    pub fn results(&self, jobs: &[Job]) -> Vec<Job> {
        let mut matching = filter_jobs(jobs, &self.filter);
        sort_jobs(&mut matching, self.sort_key, self.sort_order);
        matching
    }

    pub fn current_page(&self, jobs: &[Job]) -> Page {
        paginate(&self.results(jobs), self.page_size, self.page)
    }

    fn total_pages(&self, jobs: &[Job]) -> usize {
        let matching = jobs.iter().filter(|job| self.filter.matches(job)).count();
        matching.div_ceil(self.page_size.get())
    }
}
