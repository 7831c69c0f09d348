// ==========================================
// denda-sim - 工作簿缓存
// ==========================================
// 键: 文件路径（规范化）；有效性: 文件修改时间一致
// 失效: 修改时间变化 / 显式 invalidate / clear
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

/// 缓存查找结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CacheStatus {
    Hit,   // 命中
    Miss,  // 首次加载
    Stale, // 文件已修改，重新加载
}

struct CacheEntry<T> {
    modified: SystemTime,
    loaded_at: DateTime<Utc>,
    value: T,
}

// ==========================================
// WorkbookCache - 按文件缓存已加载的数据
// ==========================================
pub struct WorkbookCache<T> {
    entries: HashMap<PathBuf, CacheEntry<T>>,
}

impl<T> Default for WorkbookCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> WorkbookCache<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// 读取缓存，不存在或已过期时调用 load 重新加载
    ///
    /// load 失败时不写入缓存，旧条目保留
    pub fn get_or_load<F>(&mut self, path: &Path, load: F) -> ImportResult<(&T, CacheStatus)>
    where
        F: FnOnce(&Path) -> ImportResult<T>,
    {
        let modified = file_modified(path)?;
        let key = cache_key(path);

        let status = match self.entries.get(&key) {
            Some(entry) if entry.modified == modified => CacheStatus::Hit,
            Some(_) => CacheStatus::Stale,
            None => CacheStatus::Miss,
        };

        if status != CacheStatus::Hit {
            let value = load(path)?;
            self.entries.insert(
                key.clone(),
                CacheEntry {
                    modified,
                    loaded_at: Utc::now(),
                    value,
                },
            );
        }
        debug!(path = %key.display(), status = ?status, "工作簿缓存查找");

        let entry = self
            .entries
            .get(&key)
            .ok_or_else(|| ImportError::InternalError("缓存条目丢失".to_string()))?;
        Ok((&entry.value, status))
    }

    /// 读取缓存（不检查文件修改时间）
    pub fn peek(&self, path: &Path) -> Option<&T> {
        self.entries.get(&cache_key(path)).map(|e| &e.value)
    }

    pub fn loaded_at(&self, path: &Path) -> Option<DateTime<Utc>> {
        self.entries.get(&cache_key(path)).map(|e| e.loaded_at)
    }

    /// 移除指定文件的缓存，返回是否存在
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(&cache_key(path)).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn cache_key(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn file_modified(path: &Path) -> ImportResult<SystemTime> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(std::fs::metadata(path)?.modified()?)
}
