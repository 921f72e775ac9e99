//! Page sources for loading fonts
//!
//! [`PngPageSource`] reads and decodes every request. [`PageCache`] sits in
//! front of any source and hands out the same `Arc<Image>` for the same file,
//! so fonts sharing pages share memory too.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;
use parking_lot::Mutex;

use spritefont_core::error::{ExportError, Result};
use spritefont_core::traits::PageSource;
use spritefont_core::Image;

use crate::png::decode_page;

/// Decodes PNG pages straight from disk
#[derive(Debug, Default, Clone, Copy)]
pub struct PngPageSource;

impl PngPageSource {
    pub fn new() -> Self {
        Self
    }
}

impl PageSource for PngPageSource {
    fn acquire(&self, path: &Path) -> Result<Arc<Image>> {
        let bytes = std::fs::read(path).map_err(|e| {
            ExportError::DecodingFailed(format!("Cannot read page {}: {e}", path.display()))
        })?;
        Ok(Arc::new(decode_page(&bytes)?))
    }
}

/// Deduplicating cache of page images, keyed by canonical path
pub struct PageCache {
    source: Box<dyn PageSource>,
    pages: Mutex<HashMap<PathBuf, Arc<Image>>>,
}

impl PageCache {
    pub fn new(source: impl PageSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            pages: Mutex::new(HashMap::new()),
        }
    }

    /// Number of distinct pages held
    pub fn len(&self) -> usize {
        self.pages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.lock().is_empty()
    }

    /// Drops every cached page; fonts holding them keep their handles
    pub fn clear(&self) {
        self.pages.lock().clear();
    }

    /// Forgets one page so the next request reloads it
    pub fn evict(&self, path: &Path) -> Option<Arc<Image>> {
        self.pages.lock().remove(&cache_key(path))
    }
}

impl Default for PageCache {
    fn default() -> Self {
        Self::new(PngPageSource)
    }
}

impl PageSource for PageCache {
    fn acquire(&self, path: &Path) -> Result<Arc<Image>> {
        let key = cache_key(path);
        if let Some(page) = self.pages.lock().get(&key) {
            return Ok(Arc::clone(page));
        }

        // Decode outside the lock; a racing load of the same file keeps the first
        let page = self.source.acquire(path)?;
        debug!(
            "Cached page {} ({}x{}, {} channels)",
            key.display(),
            page.width(),
            page.height(),
            page.channels()
        );
        let mut pages = self.pages.lock();
        Ok(Arc::clone(pages.entry(key).or_insert(page)))
    }
}

impl std::fmt::Debug for PageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageCache")
            .field("pages", &self.len())
            .finish()
    }
}

fn cache_key(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
