use serde::Serialize;

use catalog_infra::listing::ListingPage;

/// `{ success: true, count, total, page, pages, data }` listing envelope.
#[derive(Debug, Serialize)]
pub struct ListingResponse {
    pub success: bool,
    #[serde(flatten)]
    pub page: ListingPage,
}

impl From<ListingPage> for ListingResponse {
    fn from(page: ListingPage) -> Self {
        Self {
            success: true,
            page,
        }
    }
}
