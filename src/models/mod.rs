pub mod campaigns;
pub mod submissions;
pub mod users;

use serde::Deserialize;

/// Deepest page an offset listing serves.
pub const MAX_PAGE: u64 = 10_000;

/// Offset pagination for simple per-user listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PaginationQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }
}
