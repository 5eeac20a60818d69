//! Read-only directory listing use-case.

use crate::model::person::PersonRecord;
use crate::repo::person_repo::{PersonListQuery, PersonRepository, RepoResult};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// One page of the directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonPage {
    pub items: Vec<PersonRecord>,
    /// 1-based page number that was requested.
    pub page: u32,
    /// Effective page size after clamping.
    pub page_size: u32,
    pub total_items: u64,
    /// At least 1, so an empty directory still renders "page 1 of 1".
    pub total_pages: u32,
}

impl PersonPage {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Listing service over a person repository.
pub struct DirectoryService<R: PersonRepository> {
    repo: R,
}

impl<R: PersonRepository> DirectoryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists every stored person in insertion order.
    pub fn list_all(&self) -> RepoResult<Vec<PersonRecord>> {
        self.repo.list_all()
    }

    /// Lists one page; `page` 0 is treated as page 1.
    ///
    /// Pages past the end return no items but keep the totals.
    pub fn list_page(&self, page: u32, page_size: Option<u32>) -> RepoResult<PersonPage> {
        let page = page.max(1);
        let page_size = normalize_page_size(page_size);
        let total_items = self.repo.count_persons()?;
        let total_pages = u32::try_from(total_items.div_ceil(u64::from(page_size)))
            .unwrap_or(u32::MAX)
            .max(1);

        let items = match (page - 1).checked_mul(page_size) {
            Some(offset) => self.repo.list_persons(&PersonListQuery {
                limit: Some(page_size),
                offset,
            })?,
            None => Vec::new(),
        };

        Ok(PersonPage {
            items,
            page,
            page_size,
            total_items,
            total_pages,
        })
    }
}

/// Clamps a requested page size into `1..=MAX_PAGE_SIZE`.
pub fn normalize_page_size(page_size: Option<u32>) -> u32 {
    match page_size {
        None | Some(0) => DEFAULT_PAGE_SIZE,
        Some(value) => value.min(MAX_PAGE_SIZE),
    }
}
