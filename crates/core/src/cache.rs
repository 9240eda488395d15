//! Memo of formatter output per file or directory key.
//!
//! Entries are never evicted. Each entry records the generation of its
//! latest request so a result for a superseded request is dropped.

use std::collections::HashMap;
use std::sync::Arc;

use diffnav_common::{FileChange, RenderRequest, RenderResult};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: String,
    pub members: Vec<Arc<FileChange>>,
    pub added: u64,
    pub deleted: u64,
    text: Option<String>,
    generation: u64,
    in_flight: bool,
}

impl CacheEntry {
    fn new(key: String, members: Vec<Arc<FileChange>>) -> Self {
        let (added, deleted) = members.iter().fold((0, 0), |(a, d), f| {
            let (fa, fd) = f.stats();
            (a + fa, d + fd)
        });
        CacheEntry {
            key,
            members,
            added,
            deleted,
            text: None,
            generation: 0,
            in_flight: false,
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Concatenated member patches.
    pub fn patch(&self) -> String {
        self.members.iter().map(|f| f.patch.as_str()).collect()
    }

    /// Side by side is dropped when every member is a whole-file change.
    pub fn side_by_side(&self, preference: bool) -> bool {
        preference && !self.members.iter().all(|f| f.is_whole_file())
    }

    fn issue(&mut self, params: RenderParams) -> RenderRequest {
        self.generation += 1;
        self.in_flight = true;
        RenderRequest {
            key: self.key.clone(),
            generation: self.generation,
            patch: self.patch(),
            width: params.width,
            side_by_side: self.side_by_side(params.side_by_side),
        }
    }
}

/// Formatter settings at the time a request is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderParams {
    pub width: u16,
    pub side_by_side: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Lookup<'a> {
    Ready(&'a str),
    /// A new request the caller must dispatch.
    Requested(RenderRequest),
    /// Waiting on a request issued earlier.
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOutcome {
    Rendered,
    /// The formatter failed; the raw patch is stored instead.
    Fallback(String),
    /// No entry for the key, or a newer request superseded this one.
    Stale,
}

#[derive(Debug, Default)]
pub struct RenderCache {
    entries: HashMap<String, CacheEntry>,
}

impl RenderCache {
    pub fn new() -> Self {
        RenderCache::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Cached text for `key`, issuing at most one request for it. `members`
    /// is only called when the entry does not exist yet.
    pub fn get<F>(&mut self, key: &str, members: F, params: RenderParams) -> Lookup<'_>
    where
        F: FnOnce() -> Vec<Arc<FileChange>>,
    {
        let entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| CacheEntry::new(key.to_string(), members()));
        if entry.text.is_some() {
            return Lookup::Ready(entry.text.as_deref().unwrap_or_default());
        }
        if entry.in_flight {
            return Lookup::Pending;
        }
        let request = entry.issue(params);
        debug!(key = %request.key, generation = request.generation, "render requested");
        Lookup::Requested(request)
    }

    /// Re-renders an existing entry with new settings, keeping its current
    /// text on screen until the result arrives.
    pub fn refresh(&mut self, key: &str, params: RenderParams) -> Option<RenderRequest> {
        let entry = self.entries.get_mut(key)?;
        let request = entry.issue(params);
        debug!(key = %request.key, generation = request.generation, "render refreshed");
        Some(request)
    }

    pub fn store(&mut self, result: RenderResult) -> StoreOutcome {
        let Some(entry) = self.entries.get_mut(&result.key) else {
            return StoreOutcome::Stale;
        };
        if entry.generation != result.generation {
            debug!(
                key = %result.key,
                got = result.generation,
                want = entry.generation,
                "dropping superseded render"
            );
            return StoreOutcome::Stale;
        }
        entry.in_flight = false;
        match result.outcome {
            Ok(text) => {
                entry.text = Some(text);
                StoreOutcome::Rendered
            }
            Err(message) => {
                warn!(key = %result.key, error = %message, "formatter failed, showing raw patch");
                entry.text = Some(entry.patch());
                StoreOutcome::Fallback(message)
            }
        }
    }
}
