//! Protocol constants
//!
//! Values shared by the token manager, the dispatcher and the config layer.

/// Base URL used when the configuration leaves it empty.
pub const DEFAULT_BASE_URL: &str = "https://api.parasut.com";

/// Token endpoint path, relative to the base URL.
pub const TOKEN_PATH: &str = "/oauth/token";

/// API version segment placed between the base URL and the firm id.
pub const API_VERSION_PREFIX: &str = "/v4/";

/// Seconds subtracted from `expires_in` when deciding token freshness.
pub const TOKEN_SAFETY_MARGIN_SECS: i64 = 200;

/// Retries allowed after the initial attempt when the service answers 401.
pub const MAX_RETRIES: u32 = 3;

/// Deadline for a single HTTP attempt.
pub const REQUEST_TIMEOUT_SECS: u64 = 5;

/// Largest page size accepted by list endpoints.
pub const MAX_PAGE_SIZE: u32 = 25;

// Locally synthesized error envelope titles
pub const TITLE_MAX_DEPTH: &str = "Max depth reached";
pub const TITLE_TOKEN_MISSING: &str = "Access token not found";
pub const TITLE_TIMEOUT: &str = "Request timed out";
pub const TITLE_REQUEST_FAILED: &str = "Request failed";
