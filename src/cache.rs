use std::collections::{HashMap, VecDeque};
use std::fs::{File, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::Digest as _;
use thiserror::Error;

use crate::error::ScrapeError;

/// Entries kept in the in-memory fast path before eviction kicks in.
pub const DEFAULT_MEMORY_LIMIT: usize = 256;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache io: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache entry: {0}")]
    Json(#[from] serde_json::Error),
}

/// Durable result store shared by every memoized scrape operation.
///
/// Keys are `sha256(function name + serialized argument tuple)`; values are
/// one JSON file per key under the store directory, so results survive
/// process restarts. A bounded in-memory map fronts the disk for repeated
/// lookups within a process (FIFO eviction, durability unaffected). Entries
/// are never invalidated: a stale result for a since-changed page is a
/// documented limitation of the store, not a correctness bug. Only
/// successful results are stored. Single-process use only.
pub struct Cache {
    dir: PathBuf,
    memory: HashMap<String, serde_json::Value>,
    arrival: VecDeque<String>,
    memory_limit: usize,
    ops_log: Option<File>,
}

impl Cache {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            memory: HashMap::new(),
            arrival: VecDeque::new(),
            memory_limit: DEFAULT_MEMORY_LIMIT,
            ops_log: None,
        })
    }

    /// Append one timestamped line per cache operation (hit/load/miss/store)
    /// to `path`. Off by default; the CLI points this at `cache.log`.
    pub fn with_ops_log(mut self, path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        self.ops_log = Some(file);
        Ok(self)
    }

    pub fn with_memory_limit(mut self, limit: usize) -> Self {
        self.memory_limit = limit.max(1);
        self
    }

    /// Run `compute` unless a result for `func` + `args` is already stored.
    pub fn memoize<A, T, F>(
        &mut self,
        func: &'static str,
        args: &A,
        compute: F,
    ) -> Result<T, ScrapeError>
    where
        A: Serialize,
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T, ScrapeError>,
    {
        let key = entry_key(func, args).map_err(CacheError::from)?;

        if let Some(value) = self.memory.get(&key) {
            let result = serde_json::from_value(value.clone()).map_err(CacheError::from)?;
            self.log_op("hit", func, &key);
            return Ok(result);
        }

        let path = self.dir.join(format!("{key}.json"));
        if path.exists() {
            let text = std::fs::read_to_string(&path).map_err(CacheError::from)?;
            let value: serde_json::Value =
                serde_json::from_str(&text).map_err(CacheError::from)?;
            let result = serde_json::from_value(value.clone()).map_err(CacheError::from)?;
            self.remember(key.clone(), value);
            self.log_op("load", func, &key);
            return Ok(result);
        }

        self.log_op("miss", func, &key);
        let result = compute()?;

        let value = serde_json::to_value(&result).map_err(CacheError::from)?;
        std::fs::write(&path, value.to_string()).map_err(CacheError::from)?;
        self.remember(key.clone(), value);
        self.log_op("store", func, &key);

        Ok(result)
    }

    fn remember(&mut self, key: String, value: serde_json::Value) {
        while self.memory.len() >= self.memory_limit {
            let Some(evicted) = self.arrival.pop_front() else {
                break;
            };
            self.memory.remove(&evicted);
        }
        if self.memory.insert(key.clone(), value).is_none() {
            self.arrival.push_back(key);
        }
    }

    fn log_op(&mut self, op: &str, func: &str, key: &str) {
        let Some(log) = self.ops_log.as_mut() else {
            return;
        };
        let line = format!("{} {op} {func} {key}\n", chrono::Utc::now().to_rfc3339());
        if let Err(err) = log.write_all(line.as_bytes()) {
            tracing::debug!(?err, "cache ops log write failed");
        }
    }
}

fn entry_key<A: Serialize>(func: &str, args: &A) -> Result<String, serde_json::Error> {
    let args_json = serde_json::to_string(args)?;
    let mut hasher = sha2::Sha256::new();
    hasher.update(func.as_bytes());
    hasher.update([0]);
    hasher.update(args_json.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}
