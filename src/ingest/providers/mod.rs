pub mod catalog_http;
pub mod fixture;

pub use catalog_http::CatalogHttpSource;
pub use fixture::FixtureSource;
