mod cache;
mod error;
mod loader;

pub use cache::CatalogCache;
pub use loader::{default_sources, CatalogSource, TleSet};
