use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog cache IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Download failed: {0}")]
    Download(#[from] reqwest::Error),
    #[error("No cached data for {source_name} and download failed: {message}")]
    Unavailable {
        source_name: String,
        message: String,
    },
}
