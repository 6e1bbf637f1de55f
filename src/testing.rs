//! Testing utilities for lora-browse
//!
//! Temporary sled storage plus in-memory fakes for every collaborator seam
//! (tag source, reloader, clipboard, notifier, navigator, render observers).
//!
//! Only available when compiled with `cfg(test)`.

use crate::clipboard::{ClipboardError, ClipboardWriter};
use crate::filters::{
    BaseModelCount, FilterError, ListingReloader, NavigateError, ReloadError, ReloadOutcome,
    ReloadRequest, RenderObserver, TagCount, TagSource,
};
use crate::navigate::PageNavigator;
use crate::notify::{Notifier, Severity};
use crate::storage::SledStorage;
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tempfile::TempDir;

/// Sled storage in a temporary directory, removed on drop
pub struct TestStorage {
    storage: SledStorage,
    _dir: TempDir,
}

impl TestStorage {
    /// # Panics
    /// Panics if the temporary directory or the store cannot be created.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let storage = SledStorage::open(dir.path()).expect("Failed to open test storage");
        Self { storage, _dir: dir }
    }

    #[must_use]
    pub const fn storage(&self) -> &SledStorage {
        &self.storage
    }
}

/// Notifier that records every message
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(String, Severity)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(String, Severity)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<(String, Severity)> {
        self.messages.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        self.messages
            .lock()
            .unwrap()
            .push((message.to_string(), severity));
    }
}

/// Clipboard that keeps written text in memory
#[derive(Default)]
pub struct FakeClipboard {
    writes: Mutex<Vec<String>>,
    fail: bool,
}

impl FakeClipboard {
    /// A clipboard whose writes always fail
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClipboardWriter for FakeClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.fail {
            return Err(ClipboardError::WriteFailed("clipboard locked".to_string()));
        }
        self.writes.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Tag source serving canned tags and a single base model
#[derive(Default)]
pub struct FakeTagSource {
    tags: Mutex<Vec<TagCount>>,
    fail_tags: AtomicBool,
    calls: AtomicUsize,
}

impl FakeTagSource {
    pub fn set_tags(&self, tags: Vec<TagCount>) {
        *self.tags.lock().unwrap() = tags;
    }

    /// Make every later `top_tags` call fail
    pub fn fail_tags(&self) {
        self.fail_tags.store(true, Ordering::SeqCst);
    }

    /// Number of `top_tags` calls
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TagSource for FakeTagSource {
    async fn top_tags(&self, _endpoint: &str, limit: usize) -> Result<Vec<TagCount>, FilterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_tags.load(Ordering::SeqCst) {
            return Err(FilterError::Fetch {
                what: "top tags".to_string(),
                reason: "connection refused".to_string(),
            });
        }
        Ok(self.tags.lock().unwrap().iter().take(limit).cloned().collect())
    }

    async fn base_models(&self, _endpoint: &str) -> Result<Vec<BaseModelCount>, FilterError> {
        Ok(vec![BaseModelCount {
            name: "SDXL 1.0".to_string(),
            count: 7,
        }])
    }
}

/// Reloader that records requests
#[derive(Default)]
pub struct FakeReloader {
    requests: Mutex<Vec<ReloadRequest>>,
    fail_next: AtomicBool,
    total_items: u64,
}

impl FakeReloader {
    /// A reloader reporting `total_items` results per reload
    pub fn with_total(total_items: u64) -> Self {
        Self {
            total_items,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<ReloadRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    /// Make the next reload fail
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ListingReloader for FakeReloader {
    async fn reload(&self, request: &ReloadRequest) -> Result<ReloadOutcome, ReloadError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ReloadError::Request("server unavailable".to_string()));
        }
        Ok(ReloadOutcome {
            total_items: self.total_items,
        })
    }
}

/// Navigator that records visited URLs
#[derive(Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }
}

impl PageNavigator for RecordingNavigator {
    fn navigate(&self, url: &str) -> Result<(), NavigateError> {
        self.visited.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

/// Counts render notifications
#[derive(Default)]
pub struct RenderCounter {
    count: AtomicUsize,
}

impl RenderCounter {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl RenderObserver for RenderCounter {
    fn on_listing_rendered(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DurableStorage;

    #[test]
    fn test_storage_basic() {
        let test_storage = TestStorage::new();
        let storage = test_storage.storage();

        storage.set("key", "value").unwrap();
        assert_eq!(storage.get("key").unwrap().as_deref(), Some("value"));
    }

    #[tokio::test]
    async fn test_fake_reloader_fails_once() {
        let reloader = FakeReloader::with_total(3);
        reloader.fail_next();

        let request = ReloadRequest {
            context: crate::filters::ListingContext::Loras,
            criteria: crate::filters::FilterCriteria::default(),
            reset_page: true,
            force_refetch: false,
            ticket: crate::filters::ReloadSequencer::new().issue(),
        };

        assert!(reloader.reload(&request).await.is_err());
        assert_eq!(reloader.reload(&request).await.unwrap().total_items, 3);
        assert_eq!(reloader.calls(), 2);
    }
}
