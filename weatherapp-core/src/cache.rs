//! Disk cache of raw pages, one file per URL named by the URL's SHA-256.
//!
//! Entries are never evicted individually. A stale entry stays on disk until
//! the next miss overwrites it or [`ResponseCache::clear`] removes everything.

use sha2::{Digest, Sha256};
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, SystemTime},
};
use tracing::debug;

use crate::{
    error::{Error, Result},
    fetch::PageFetcher,
};

#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
    ttl: Duration,
    fetcher: Arc<dyn PageFetcher>,
}

impl ResponseCache {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { dir: dir.into(), ttl, fetcher }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Cache key for `url`: lowercase hex SHA-256 of its bytes.
    pub fn key(url: &str) -> String {
        hex::encode(Sha256::digest(url.as_bytes()))
    }

    pub fn path_for(&self, url: &str) -> PathBuf {
        self.dir.join(Self::key(url))
    }

    /// Cached bytes for `url` if an entry exists and is younger than the TTL.
    pub fn get(&self, url: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(url);

        let modified = match fs::metadata(&path).and_then(|meta| meta.modified()) {
            Ok(modified) => modified,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(Error::io(&path, err)),
        };

        if !is_fresh(modified, SystemTime::now(), self.ttl) {
            debug!(url, "Cache entry expired");
            return Ok(None);
        }

        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Error::io(&path, err)),
        }
    }

    /// Store `bytes` for `url`, replacing any previous entry.
    pub fn put(&self, url: &str, bytes: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|err| Error::io(&self.dir, err))?;

        let path = self.path_for(url);
        fs::write(&path, bytes).map_err(|err| Error::io(&path, err))
    }

    /// Cached page if fresh and `force_refresh` is off, otherwise download,
    /// store and return it.
    pub async fn fetch(&self, url: &str, force_refresh: bool) -> Result<Vec<u8>> {
        if !force_refresh {
            if let Some(bytes) = self.get(url)? {
                debug!(url, "Cache hit");
                return Ok(bytes);
            }
        }

        debug!(url, force_refresh, "Cache miss");
        let bytes = self.fetcher.get(url).await.inspect_err(|err| {
            debug!(url, error = %err, "Download failed");
        })?;

        self.put(url, &bytes)?;
        Ok(bytes)
    }

    /// Remove every cached file and then the directory itself.
    /// Returns the number of files removed.
    pub fn clear(&self) -> Result<usize> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(Error::io(&self.dir, err)),
        };

        let mut removed = 0;
        for entry in entries {
            let path = entry.map_err(|err| Error::io(&self.dir, err))?.path();
            fs::remove_file(&path).map_err(|err| Error::io(&path, err))?;
            removed += 1;
        }

        fs::remove_dir(&self.dir).map_err(|err| Error::io(&self.dir, err))?;
        Ok(removed)
    }
}

/// An entry written at `modified` is valid while `now - modified < ttl`.
/// Timestamps from the future count as fresh.
pub fn is_fresh(modified: SystemTime, now: SystemTime, ttl: Duration) -> bool {
    match now.duration_since(modified) {
        Ok(age) => age < ttl,
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedFetcher;
    use tempfile::TempDir;

    const URL: &str = "https://www.accuweather.com/uk/ua/brody/324506/weather-forecast/324506";

    fn cache(ttl: Duration, fetcher: &Arc<ScriptedFetcher>) -> (TempDir, ResponseCache) {
        let dir = TempDir::new().unwrap();
        let cache = ResponseCache::new(dir.path().join("weather_cache"), ttl, fetcher.clone());
        (dir, cache)
    }

    #[test]
    fn key_is_stable_hex_digest() {
        let key = ResponseCache::key("http://rp5.ua/");

        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(key, ResponseCache::key("http://rp5.ua/"));
        assert_ne!(key, ResponseCache::key("http://rp5.ua"));
    }

    #[test]
    fn put_then_get_within_ttl() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        let (_dir, cache) = cache(Duration::from_secs(300), &fetcher);

        cache.put(URL, b"<html>page</html>").unwrap();

        assert_eq!(cache.get(URL).unwrap().as_deref(), Some(&b"<html>page</html>"[..]));
        assert_eq!(cache.get("https://other").unwrap(), None);
    }

    #[test]
    fn expired_entry_is_a_miss() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        let (_dir, cache) = cache(Duration::ZERO, &fetcher);

        cache.put(URL, b"stale").unwrap();

        assert_eq!(cache.get(URL).unwrap(), None);
        assert!(cache.path_for(URL).exists(), "stale entries stay on disk");
    }

    #[test]
    fn freshness_window() {
        let now = SystemTime::now();
        let ttl = Duration::from_secs(300);

        assert!(is_fresh(now - Duration::from_secs(299), now, ttl));
        assert!(!is_fresh(now - Duration::from_secs(300), now, ttl));
        assert!(!is_fresh(now - Duration::from_secs(3600), now, ttl));
        assert!(is_fresh(now + Duration::from_secs(10), now, ttl));
    }

    #[tokio::test]
    async fn fetch_creates_directory_and_caches() {
        let fetcher = Arc::new(ScriptedFetcher::default().with_page(URL, "<html>fresh</html>"));
        let (_dir, cache) = cache(Duration::from_secs(300), &fetcher);
        assert!(!cache.dir().exists());

        let first = cache.fetch(URL, false).await.unwrap();
        let second = cache.fetch(URL, false).await.unwrap();

        assert_eq!(first, b"<html>fresh</html>");
        assert_eq!(second, first);
        assert_eq!(fetcher.calls(URL), 1);
        assert_eq!(fs::read_dir(cache.dir()).unwrap().count(), 1);
        assert_eq!(cache.get(URL).unwrap(), Some(first));
    }

    #[tokio::test]
    async fn forced_refresh_always_downloads_and_overwrites() {
        let fetcher = Arc::new(ScriptedFetcher::default().with_page(URL, "new"));
        let (_dir, cache) = cache(Duration::from_secs(300), &fetcher);
        cache.put(URL, b"old").unwrap();

        let bytes = cache.fetch(URL, true).await.unwrap();

        assert_eq!(bytes, b"new");
        assert_eq!(fetcher.calls(URL), 1);
        assert_eq!(cache.get(URL).unwrap().as_deref(), Some(&b"new"[..]));
    }

    #[tokio::test]
    async fn network_failure_leaves_cache_untouched() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        let (_dir, cache) = cache(Duration::ZERO, &fetcher);
        cache.put(URL, b"old").unwrap();

        let err = cache.fetch(URL, false).await.unwrap_err();

        assert!(matches!(err, Error::Network(_)));
        assert_eq!(fs::read(cache.path_for(URL)).unwrap(), b"old");
    }

    #[test]
    fn clear_removes_files_and_directory() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        let (_dir, cache) = cache(Duration::from_secs(300), &fetcher);
        cache.put("https://a", b"a").unwrap();
        cache.put("https://b", b"b").unwrap();

        assert_eq!(cache.clear().unwrap(), 2);
        assert!(!cache.dir().exists());
        assert_eq!(cache.clear().unwrap(), 0);
    }
}
