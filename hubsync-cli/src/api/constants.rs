//! Endpoint and paging constants for the HubSpot CRM v3 API

pub const BASE_URL: &str = "https://api.hubapi.com";

/// Portal-specific object type id of the custom jobs object.
pub const JOBS_OBJECT_TYPE_ID: &str = "2-41941336";
pub const DEALS_OBJECT_TYPE: &str = "deals";

/// Page size for list and search requests.
pub const PAGE_SIZE: u32 = 100;
/// Maximum ids per batch-read request.
pub const BATCH_SIZE: usize = 100;
/// Extra attempts after the first failed request.
pub const MAX_RETRIES: u32 = 5;
