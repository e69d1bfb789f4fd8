pub mod error;
pub mod factory;
pub mod qqlykm;
pub mod traits;

pub use error::FeedError;
pub use factory::{create_feed, resolve_api_key};
pub use qqlykm::QqlykmClient;
pub use traits::FilmFeed;
