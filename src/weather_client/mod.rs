pub mod client;
pub mod error;
pub(crate) mod normalize;
pub(crate) mod provider_response;
pub(crate) mod response_cache;
pub mod retry;
