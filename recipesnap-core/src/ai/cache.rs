//! Disk-based AI response cache.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::types::{ChatMessage, ChatResponse, Usage};

/// Model answers stored on disk, one JSON file per request.
///
/// A missing or unreadable entry is a miss; the caller then asks the model
/// again and overwrites it.
#[derive(Debug, Clone)]
pub struct AiCache {
    cache_dir: PathBuf,
}

/// One stored answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedAiResponse {
    pub content: String,
    pub usage: Usage,
    pub cached_at: DateTime<Utc>,
    pub model: String,
    #[serde(default)]
    pub prompt_name: String,
    #[serde(default)]
    pub prompt_version: String,
}

impl From<CachedAiResponse> for ChatResponse {
    fn from(cached: CachedAiResponse) -> Self {
        Self {
            content: cached.content,
            usage: cached.usage,
            cached: true,
        }
    }
}

/// Identifies a request: which prompt template, which model, which messages.
///
/// Photos travel inside the messages, so two photos never share an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    pub prompt_name: String,
    pub prompt_version: String,
    pub model: String,
    pub input_hash: String,
}

impl CacheKey {
    pub fn new(
        prompt_name: &str,
        prompt_version: &str,
        model: &str,
        messages: &[ChatMessage],
    ) -> Self {
        let mut hasher = Sha256::new();
        for message in messages {
            // Writing into the hasher cannot fail.
            let _ = serde_json::to_writer(HashWriter(&mut hasher), message);
            hasher.update(b"\n");
        }

        Self {
            prompt_name: prompt_name.to_string(),
            prompt_version: prompt_version.to_string(),
            model: model.to_string(),
            input_hash: hex::encode(hasher.finalize()),
        }
    }

    /// Location under the cache directory:
    /// `{prompt_name}/{prompt_version}/{model}/{hash[0:2]}/{hash}.json`,
    /// with `/` in the model name written as `--`.
    pub fn to_path(&self) -> PathBuf {
        let model_dir = self.model.replace('/', "--");
        let file_name = format!("{}.json", self.input_hash);
        [
            self.prompt_name.as_str(),
            self.prompt_version.as_str(),
            model_dir.as_str(),
            &self.input_hash[..2],
            file_name.as_str(),
        ]
        .iter()
        .collect()
    }
}

/// Feeds serialized bytes straight into the hasher.
struct HashWriter<'a>(&'a mut Sha256);

impl std::io::Write for HashWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl AiCache {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn get(&self, key: &CacheKey) -> Option<CachedAiResponse> {
        let path = self.cache_dir.join(key.to_path());
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Unreadable cache entry");
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(cached) => Some(cached),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Corrupt cache entry");
                None
            }
        }
    }

    pub fn put(&self, key: &CacheKey, response: &ChatResponse, model: &str) -> io::Result<()> {
        let path = self.cache_dir.join(key.to_path());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let cached = CachedAiResponse {
            content: response.content.clone(),
            usage: response.usage.clone(),
            cached_at: Utc::now(),
            model: model.to_string(),
            prompt_name: key.prompt_name.clone(),
            prompt_version: key.prompt_version.clone(),
        };
        let json = serde_json::to_vec_pretty(&cached)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&path, json)
    }

    /// Number and total size of stored answers.
    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats::default();
        let mut pending = vec![self.cache_dir.clone()];

        while let Some(dir) = pending.pop() {
            let Ok(entries) = fs::read_dir(&dir) else {
                continue;
            };
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    pending.push(path);
                } else if path.extension().is_some_and(|ext| ext == "json") {
                    stats.cached_responses += 1;
                    stats.total_bytes += entry.metadata().map(|m| m.len()).unwrap_or(0);
                }
            }
        }
        stats
    }

    /// Remove stored answers for one prompt, or for all prompts.
    pub fn clear(&self, prompt_name: Option<&str>) -> io::Result<()> {
        let dir = match prompt_name {
            Some(name) => self.cache_dir.join(name),
            None => self.cache_dir.clone(),
        };
        match fs::remove_dir_all(&dir) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub cached_responses: usize,
    pub total_bytes: u64,
}
