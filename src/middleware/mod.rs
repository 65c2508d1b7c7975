pub mod auth;
pub mod response;

pub use auth::{api_key_middleware, hash_api_key, AuthUser};
pub use response::{ApiResponse, ApiResult};
