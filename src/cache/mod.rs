pub mod manager;
pub mod token;
pub mod token_cache;

pub use manager::{CustomerTokenManager, FetchFailure};
