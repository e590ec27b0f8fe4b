use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use reqwest::StatusCode;
use reqwest::header::{ETAG, HeaderName, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use serde::{Deserialize, Serialize};

use crate::http_client::http_client;

const CACHE_VERSION: u32 = 1;
const CACHE_DIR: &str = "goal_context";
const CACHE_FILE: &str = "http_cache.json";

static CACHE: Mutex<Option<SourceCacheFile>> = Mutex::new(None);

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct SourceCacheFile {
    version: u32,
    entries: HashMap<String, CachedSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedSource {
    body: String,
    etag: Option<String>,
    last_modified: Option<String>,
    fetched_at: u64,
}

pub fn is_remote(source: &str) -> bool {
    let lower = source.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// GETs `url`, revalidating a previously downloaded body with ETag / Last-Modified.
pub fn fetch_text_cached(url: &str) -> Result<String> {
    let client = http_client()?;
    let cached = with_cache(|cache| cache.entries.get(url).cloned());

    let mut req = client.get(url);
    if let Some(entry) = cached.as_ref() {
        if let Some(etag) = entry.etag.as_ref() {
            req = req.header(IF_NONE_MATCH, etag);
        }
        if let Some(last_modified) = entry.last_modified.as_ref() {
            req = req.header(IF_MODIFIED_SINCE, last_modified);
        }
    }

    info!("downloading {url}");
    let resp = req.send().with_context(|| format!("request {url}"))?;
    let status = resp.status();
    let headers = resp.headers().clone();
    if status == StatusCode::NOT_MODIFIED {
        let Some(entry) = cached else {
            return Err(anyhow!("received 304 without cached body for {url}"));
        };
        debug!("{url} not modified, using cached copy");
        return Ok(entry.body);
    }

    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow!("http {status} for {url}"));
    }

    let header_value = |name: HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string())
    };
    let entry = CachedSource {
        body: body.clone(),
        etag: header_value(ETAG),
        last_modified: header_value(LAST_MODIFIED),
        fetched_at: unix_secs(SystemTime::now()).unwrap_or_default(),
    };
    with_cache(|cache| {
        cache.version = CACHE_VERSION;
        cache.entries.insert(url.to_string(), entry);
        if let Err(err) = save_cache_file(cache) {
            debug!("source cache not saved: {err:#}");
        }
    });
    Ok(body)
}

fn with_cache<T>(f: impl FnOnce(&mut SourceCacheFile) -> T) -> T {
    let mut guard = CACHE.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let cache = guard.get_or_insert_with(load_cache_file);
    f(cache)
}

fn load_cache_file() -> SourceCacheFile {
    let Some(path) = cache_path() else {
        return SourceCacheFile::default();
    };
    let Ok(raw) = fs::read_to_string(path) else {
        return SourceCacheFile::default();
    };
    let cache = serde_json::from_str::<SourceCacheFile>(&raw).unwrap_or_default();
    if cache.version != CACHE_VERSION {
        return SourceCacheFile::default();
    }
    cache
}

fn save_cache_file(cache: &SourceCacheFile) -> Result<()> {
    let Some(path) = cache_path() else {
        return Ok(());
    };
    let json = serde_json::to_string(cache).context("serialize source cache")?;
    crate::persist::write_atomic(&path, json.as_bytes())
}

pub fn app_cache_dir() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}

fn cache_path() -> Option<PathBuf> {
    app_cache_dir().map(|dir| dir.join(CACHE_FILE))
}

fn unix_secs(time: SystemTime) -> Option<u64> {
    time.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
}
