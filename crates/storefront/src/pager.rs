//! Incremental "load more" paging.
//!
//! Every load is identified by a [`PageTicket`]. Resetting the pager (after a
//! filter change) bumps its generation, so responses to tickets issued before
//! the reset are discarded instead of being mixed into the new result list.

use catalog_products::Product;

pub const DEFAULT_PAGE_SIZE: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTicket {
    pub generation: u64,
    pub page: u64,
}

#[derive(Debug, Clone)]
pub struct Pager {
    items: Vec<Product>,
    page: u64,
    limit: u64,
    has_more: bool,
    loading: bool,
    generation: u64,
    error: Option<String>,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pager {
    pub fn new(limit: u64) -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            limit: limit.max(1),
            has_more: true,
            loading: false,
            generation: 0,
            error: None,
        }
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Back to page 1 under a new generation. Items stay visible until the
    /// first page of the new generation arrives.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.page = 1;
        self.has_more = true;
        self.loading = false;
        self.error = None;
    }

    /// Start loading the current page.
    pub fn begin_load(&mut self) -> PageTicket {
        self.loading = true;
        self.error = None;
        PageTicket {
            generation: self.generation,
            page: self.page,
        }
    }

    /// Advance to the next page, if there is one and nothing is in flight.
    pub fn next_page(&mut self) -> Option<PageTicket> {
        if !self.has_more || self.loading {
            return None;
        }
        self.page += 1;
        Some(self.begin_load())
    }

    /// Apply a loaded page. Returns `false` when the ticket is stale.
    pub fn apply(&mut self, ticket: PageTicket, items: Vec<Product>) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                stale = ticket.generation,
                current = self.generation,
                "discarding stale page"
            );
            return false;
        }

        self.has_more = items.len() as u64 == self.limit;
        if ticket.page == 1 {
            self.items = items;
        } else {
            self.items.extend(items);
        }
        self.loading = false;
        true
    }

    /// Record a failed load. Returns `false` when the ticket is stale.
    ///
    /// A failed "load more" steps back so the next [`Pager::next_page`]
    /// retries the same page.
    pub fn fail(&mut self, ticket: PageTicket, message: impl Into<String>) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        if ticket.page > 1 {
            self.page = ticket.page - 1;
        }
        self.loading = false;
        self.error = Some(message.into());
        true
    }
}
