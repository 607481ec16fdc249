//! Browsing session: filter state, paged results, cart and search box.

use crate::cart::Cart;
use crate::client::{ClientError, StorefrontClient};
use crate::debounce::Debouncer;
use crate::filters::FilterState;
use crate::pager::{PageTicket, Pager};

pub struct Storefront {
    client: StorefrontClient,
    filters: FilterState,
    pager: Pager,
    cart: Cart,
    search: Debouncer,
}

impl Storefront {
    pub fn new(client: StorefrontClient) -> Self {
        Self::with_parts(client, Pager::default(), Debouncer::default())
    }

    pub fn with_parts(client: StorefrontClient, pager: Pager, search: Debouncer) -> Self {
        Self {
            client,
            filters: FilterState::new(),
            pager,
            cart: Cart::new(),
            search,
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    /// Change filters and reload from page 1.
    pub async fn update_filters(
        &mut self,
        change: impl FnOnce(&mut FilterState),
    ) -> Result<(), ClientError> {
        change(&mut self.filters);
        self.refresh().await
    }

    /// Feed the search box; nothing is fetched until the input settles.
    pub fn search_input(&mut self, text: impl Into<String>) {
        self.search.input(text);
    }

    /// Wait for the search input to settle and reload if it changed the query.
    /// Returns whether a reload happened.
    pub async fn settle_search(&mut self) -> Result<bool, ClientError> {
        let Some(text) = self.search.settled().await else {
            return Ok(false);
        };
        if text == self.filters.query() {
            return Ok(false);
        }
        self.filters.set_query(text);
        self.refresh().await?;
        Ok(true)
    }

    /// Reset paging and load page 1 for the current filters.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.pager.reset();
        let ticket = self.pager.begin_load();
        self.load(ticket).await
    }

    /// Load the next page. Returns `false` when there is nothing more to load.
    pub async fn load_more(&mut self) -> Result<bool, ClientError> {
        let Some(ticket) = self.pager.next_page() else {
            return Ok(false);
        };
        self.load(ticket).await?;
        Ok(true)
    }

    async fn load(&mut self, ticket: PageTicket) -> Result<(), ClientError> {
        let request = self.filters.to_request(ticket.page, self.pager.limit());
        match self.client.fetch_products(&request).await {
            Ok(page) => {
                self.pager.apply(ticket, page.data);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, page = ticket.page, "failed to load products");
                self.pager.fail(ticket, "Failed to load products.");
                Err(e)
            }
        }
    }
}
