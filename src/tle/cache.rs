use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum_macros::Display;

use crate::config::CatalogConfig;
use crate::tle::error::CatalogError;
use crate::tle::loader::{parse_multi_tle, CatalogSource, TleSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum CacheState {
    Fresh,
    Stale,
    Missing,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheStatus {
    pub source: String,
    pub state: CacheState,
    pub age_hours: Option<f64>,
    pub size_kb: Option<f64>,
    pub satellites: Option<usize>,
}

/// On-disk copy of the element-set feeds with a freshness window
pub struct CatalogCache {
    dir: PathBuf,
    max_age: Duration,
    retries: u32,
    retry_delay: Duration,
    client: reqwest::Client,
}

impl CatalogCache {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            dir: config.cache_dir.clone(),
            max_age: config.max_age,
            retries: config.retries.max(1),
            retry_delay: config.retry_delay,
            client,
        })
    }

    fn data_path(&self, source: &CatalogSource) -> PathBuf {
        self.dir.join(format!("{}.txt", source.name))
    }

    fn timestamp_path(&self, source: &CatalogSource) -> PathBuf {
        self.dir.join(format!("{}_timestamp.txt", source.name))
    }

    /// Time since the cached copy was downloaded, if there is a readable one
    pub fn age(&self, source: &CatalogSource) -> Option<chrono::Duration> {
        if !self.data_path(source).is_file() {
            return None;
        }
        let stamp = fs::read_to_string(self.timestamp_path(source)).ok()?;
        let downloaded = DateTime::parse_from_rfc3339(stamp.trim()).ok()?;
        Some(Utc::now() - downloaded.with_timezone(&Utc))
    }

    pub fn is_fresh(&self, source: &CatalogSource) -> bool {
        let max_age = chrono::Duration::from_std(self.max_age).unwrap_or(chrono::Duration::MAX);
        self.age(source).is_some_and(|age| age < max_age)
    }

    /// Load every source in order; a source with neither network nor cache is skipped
    pub async fn load_all(&self, sources: &[CatalogSource]) -> Vec<TleSet> {
        let mut satellites = Vec::new();
        for source in sources {
            match self.load_source(source).await {
                Ok(sets) => {
                    log::info!("{}: {} satellites selected", source.name, sets.len());
                    satellites.extend(sets);
                }
                Err(e) => log::warn!("Skipping catalog {}: {}", source.name, e),
            }
        }
        satellites
    }

    pub async fn load_source(&self, source: &CatalogSource) -> Result<Vec<TleSet>, CatalogError> {
        if self.is_fresh(source) {
            log::info!("Using cached {} data", source.name);
        } else {
            match self.download(source).await {
                Ok(body) => self.store(source, &body)?,
                Err(e) if self.data_path(source).is_file() => {
                    log::warn!("Could not download {}: {}; using stale cache", source.name, e);
                }
                Err(e) => {
                    return Err(CatalogError::Unavailable {
                        source_name: source.name.clone(),
                        message: e.to_string(),
                    })
                }
            }
        }

        let content = fs::read_to_string(self.data_path(source))?;
        Ok(source.select(&content))
    }

    async fn download(&self, source: &CatalogSource) -> Result<String, CatalogError> {
        let mut attempt = 1;
        loop {
            log::info!(
                "Downloading {} catalog (attempt {}/{})",
                source.name,
                attempt,
                self.retries
            );
            match self.fetch(&source.url).await {
                Ok(body) => return Ok(body),
                Err(e) if attempt < self.retries => {
                    log::warn!("Download of {} failed: {}", source.name, e);
                    tokio::time::sleep(self.retry_delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch(&self, url: &str) -> Result<String, CatalogError> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }

    fn store(&self, source: &CatalogSource, body: &str) -> Result<(), CatalogError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.data_path(source), body)?;
        fs::write(self.timestamp_path(source), Utc::now().to_rfc3339())?;
        log::info!("Cached {} data", source.name);
        Ok(())
    }

    /// Cached copies older than half the freshness window are reported stale
    pub fn status(&self, sources: &[CatalogSource]) -> Vec<CacheStatus> {
        let stale_after = chrono::Duration::from_std(self.max_age / 2)
            .unwrap_or(chrono::Duration::MAX);

        sources
            .iter()
            .map(|source| {
                let path = self.data_path(source);
                let (Some(age), Ok(content)) = (self.age(source), fs::read_to_string(&path))
                else {
                    return CacheStatus {
                        source: source.name.clone(),
                        state: CacheState::Missing,
                        age_hours: None,
                        size_kb: None,
                        satellites: None,
                    };
                };

                CacheStatus {
                    source: source.name.clone(),
                    state: if age < stale_after {
                        CacheState::Fresh
                    } else {
                        CacheState::Stale
                    },
                    age_hours: Some(age.num_seconds() as f64 / 3600.0),
                    size_kb: Some(content.len() as f64 / 1024.0),
                    satellites: Some(parse_multi_tle(&content).len()),
                }
            })
            .collect()
    }

    /// Remove the cache directory; returns false if there was nothing to clear
    pub fn clear(&self) -> Result<bool, CatalogError> {
        if !self.dir.exists() {
            return Ok(false);
        }
        fs::remove_dir_all(&self.dir)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = "\
ISS (ZARYA)
1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927
2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537
STARLINK-1007
1 44713U 19074A   24001.50000000  .00000100  00000-0  10000-4 0  9991
2 44713  53.0000  10.0000 0001000 100.0000 260.0000 15.06000000    06
";

    fn source() -> CatalogSource {
        CatalogSource {
            name: "stations".into(),
            // nothing listens on the discard port, so downloads fail fast
            url: "http://127.0.0.1:9/stations.txt".into(),
            keywords: vec!["ISS".into()],
        }
    }

    fn cache(dir: &std::path::Path, max_age: Duration) -> CatalogCache {
        let config = CatalogConfig {
            cache_dir: dir.to_path_buf(),
            max_age,
            retries: 2,
            retry_delay: Duration::from_millis(1),
            timeout: Duration::from_secs(2),
            sources: vec![source()],
        };
        CatalogCache::new(&config).unwrap()
    }

    fn seed(dir: &std::path::Path, downloaded: DateTime<Utc>) {
        fs::write(dir.join("stations.txt"), FEED).unwrap();
        fs::write(dir.join("stations_timestamp.txt"), downloaded.to_rfc3339()).unwrap();
    }

    #[tokio::test]
    async fn fresh_cache_is_used_without_network() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path(), Utc::now() - chrono::Duration::hours(1));
        let cache = cache(dir.path(), Duration::from_secs(24 * 3600));

        assert!(cache.is_fresh(&source()));
        let sets = cache.load_source(&source()).await.unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].name, "ISS (ZARYA)");
    }

    #[tokio::test]
    async fn stale_cache_is_the_fallback_when_download_fails() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path(), Utc::now() - chrono::Duration::hours(48));
        let cache = cache(dir.path(), Duration::from_secs(24 * 3600));

        assert!(!cache.is_fresh(&source()));
        let sets = cache.load_source(&source()).await.unwrap();
        assert_eq!(sets.len(), 1);
    }

    #[tokio::test]
    async fn missing_cache_and_failed_download_skips_the_source() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache(dir.path(), Duration::from_secs(24 * 3600));

        let result = cache.load_source(&source()).await;
        assert!(matches!(result, Err(CatalogError::Unavailable { .. })));
        assert!(cache.load_all(&[source()]).await.is_empty());
    }

    #[test]
    fn unreadable_timestamp_is_not_fresh() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("stations.txt"), FEED).unwrap();
        fs::write(dir.path().join("stations_timestamp.txt"), "yesterday").unwrap();
        let cache = cache(dir.path(), Duration::from_secs(24 * 3600));
        assert!(cache.age(&source()).is_none());
        assert!(!cache.is_fresh(&source()));
    }

    #[test]
    fn status_reports_fresh_stale_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache(dir.path(), Duration::from_secs(24 * 3600));

        assert_eq!(cache.status(&[source()])[0].state, CacheState::Missing);

        seed(dir.path(), Utc::now() - chrono::Duration::hours(2));
        let status = &cache.status(&[source()])[0];
        assert_eq!(status.state, CacheState::Fresh);
        assert_eq!(status.satellites, Some(2));
        assert!(status.size_kb.unwrap() > 0.0);

        seed(dir.path(), Utc::now() - chrono::Duration::hours(13));
        assert_eq!(cache.status(&[source()])[0].state, CacheState::Stale);
        assert_eq!(CacheState::Stale.to_string(), "STALE");
    }

    #[test]
    fn clear_removes_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let cache_dir = dir.path().join("tle_cache");
        fs::create_dir_all(&cache_dir).unwrap();
        seed(&cache_dir, Utc::now());
        let cache = cache(&cache_dir, Duration::from_secs(3600));

        assert!(cache.clear().unwrap());
        assert!(!cache_dir.exists());
        assert!(!cache.clear().unwrap());
    }
}
