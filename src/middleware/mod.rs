pub mod auth;
pub mod error_handler;
pub mod request_id;

pub use auth::{hash_api_key, verify_api_key, ApiKeyAuth, API_KEY_HEADER};
pub use error_handler::{json_error_handler, log_error, query_error_handler, ErrorLogger};
pub use request_id::{CorrelationId, RequestId};
