//! Integration tests for lora-browse
//!
//! These tests wire the filter and selection managers together over a real
//! sled store in a temporary directory, with in-memory stand-ins for the
//! server, clipboard and notifications.

use async_trait::async_trait;
use lora_browse::clipboard::{ClipboardError, ClipboardWriter};
use lora_browse::filters::{
    ApplyOutcome, BaseModelCount, FilterContext, FilterDeps, FilterError, FilterManager,
    ListingContext, ListingReloader, ReloadError, ReloadOutcome, ReloadRequest, TagCount,
    TagKind, TagSource, ToggleGroup,
};
use lora_browse::notify::{Notifier, Severity};
use lora_browse::selection::{
    CopyOutcome, GridView, HeadlessGrid, ItemSnapshot, MediaKind, RenderedItem, SelectionManager,
};
use lora_browse::state::SharedPageState;
use lora_browse::storage::{DurableStorage, SledStorage};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

struct StaticTags;

#[async_trait]
impl TagSource for StaticTags {
    async fn top_tags(&self, _endpoint: &str, limit: usize) -> Result<Vec<TagCount>, FilterError> {
        let tags = [("anime", 40), ("style", 25), ("character", 12)];
        Ok(tags
            .iter()
            .take(limit)
            .map(|(tag, count)| TagCount {
                tag: (*tag).to_string(),
                count: *count,
            })
            .collect())
    }

    async fn base_models(&self, _endpoint: &str) -> Result<Vec<BaseModelCount>, FilterError> {
        Ok(vec![BaseModelCount {
            name: "SDXL 1.0".to_string(),
            count: 30,
        }])
    }
}

/// Reports one result per active filter
struct EchoReloader;

#[async_trait]
impl ListingReloader for EchoReloader {
    async fn reload(&self, request: &ReloadRequest) -> Result<ReloadOutcome, ReloadError> {
        Ok(ReloadOutcome {
            total_items: request.criteria.active_count() as u64,
        })
    }
}

#[derive(Default)]
struct Messages(Mutex<Vec<(String, Severity)>>);

impl Notifier for Messages {
    fn notify(&self, message: &str, severity: Severity) {
        self.0.lock().unwrap().push((message.to_string(), severity));
    }
}

#[derive(Default)]
struct MemoryClipboard(Mutex<Option<String>>);

#[async_trait]
impl ClipboardWriter for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        *self.0.lock().unwrap() = Some(text.to_string());
        Ok(())
    }
}

fn manager_for(
    context: ListingContext,
    storage: Arc<SledStorage>,
    state: &SharedPageState,
) -> FilterManager {
    let deps = FilterDeps::new(
        Arc::new(StaticTags),
        storage,
        Arc::new(Messages::default()),
        state.clone(),
    );
    FilterManager::new(
        FilterContext::new(context.descriptor(), Arc::new(EchoReloader)),
        deps,
    )
}

fn open_store(dir: &Path) -> Arc<SledStorage> {
    Arc::new(SledStorage::open(dir).unwrap())
}

fn lora(key: &str, name: &str, hint: Option<&str>) -> RenderedItem {
    RenderedItem::new(
        key,
        ItemSnapshot {
            display_name: name.to_string(),
            preview_url: format!("/previews/{name}.png"),
            media_kind: MediaKind::Image,
            usage_hint: hint.map(str::to_string),
        },
    )
}

#[tokio::test]
async fn test_filters_restored_by_new_manager() {
    let dir = TempDir::new().unwrap();
    let store = open_store(dir.path());
    let state = SharedPageState::new();

    {
        let mut manager = manager_for(ListingContext::Loras, Arc::clone(&store), &state);
        manager.toggle_tag("anime", TagKind::Category).await;
        manager.toggle_tag("SDXL 1.0", TagKind::Attribute).await;
    }

    let raw = store.get("lora_manager_loras_filters").unwrap().unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored["tags"], serde_json::json!(["anime"]));
    assert_eq!(stored["baseModel"], serde_json::json!(["SDXL 1.0"]));

    let fresh_state = SharedPageState::new();
    let manager = manager_for(ListingContext::Loras, store, &fresh_state);
    assert_eq!(manager.criteria().category(), ["anime".to_string()]);
    assert_eq!(manager.criteria().attribute(), ["SDXL 1.0".to_string()]);

    let snapshot = fresh_state.snapshot(ListingContext::Loras);
    assert!(snapshot.filter_button_active);
    assert_eq!(&snapshot.filters, manager.criteria());
}

#[tokio::test]
async fn test_contexts_do_not_share_filters() {
    let dir = TempDir::new().unwrap();
    let store = open_store(dir.path());
    let state = SharedPageState::new();

    let mut loras = manager_for(ListingContext::Loras, Arc::clone(&store), &state);
    loras.toggle_tag("style", TagKind::Category).await;

    let recipes = manager_for(ListingContext::Recipes, Arc::clone(&store), &state);
    assert!(!recipes.criteria().has_active());
    assert!(!state.snapshot(ListingContext::Recipes).filter_button_active);
    assert!(state.snapshot(ListingContext::Loras).filter_button_active);
    assert!(store.get("lora_manager_recipes_filters").unwrap().is_none());
}

#[tokio::test]
async fn test_clear_forgets_stored_filters() {
    let dir = TempDir::new().unwrap();
    let store = open_store(dir.path());
    let state = SharedPageState::new();

    let mut manager = manager_for(ListingContext::Checkpoints, Arc::clone(&store), &state);
    manager.toggle_tag("SDXL 1.0", TagKind::Attribute).await;
    assert!(store.get("lora_manager_checkpoints_filters").unwrap().is_some());

    let outcome = manager.clear_filters().await;

    assert_eq!(outcome, ApplyOutcome::Applied { total_items: 0 });
    assert!(store.get("lora_manager_checkpoints_filters").unwrap().is_none());
    assert!(!state.snapshot(ListingContext::Checkpoints).filter_button_active);
}

#[tokio::test]
async fn test_panel_marks_restored_filters() {
    let dir = TempDir::new().unwrap();
    let store = open_store(dir.path());
    store
        .set("lora_manager_loras_filters", r#"{"tags":["style"],"baseModel":[]}"#)
        .unwrap();
    let state = SharedPageState::new();

    let mut manager = manager_for(ListingContext::Loras, store, &state);
    manager.load_available_tags().await;

    let ToggleGroup::Loaded(toggles) = manager.panel().group(TagKind::Category) else {
        panic!("tags should be loaded");
    };
    let active: Vec<&str> = toggles
        .iter()
        .filter(|t| t.active)
        .map(|t| t.value.as_str())
        .collect();
    assert_eq!(active, vec!["style"]);
}

#[tokio::test]
async fn test_only_latest_reload_touches_page() {
    let dir = TempDir::new().unwrap();
    let state = SharedPageState::new();
    let mut manager = manager_for(ListingContext::Loras, open_store(dir.path()), &state);

    let first = manager.begin_apply(false);
    let second = manager.begin_apply(false);

    assert!(matches!(second.run().await, ApplyOutcome::Applied { .. }));
    assert_eq!(first.run().await, ApplyOutcome::Superseded);
}

#[tokio::test]
async fn test_selection_survives_filter_reload() {
    let dir = TempDir::new().unwrap();
    let state = SharedPageState::new();
    let clipboard = Arc::new(MemoryClipboard::default());
    let messages = Arc::new(Messages::default());

    let page_one = vec![
        lora("/loras/a.safetensors", "alpha", Some(r#"{"strength": 0.6}"#)),
        lora("/loras/b.safetensors", "beta", None),
    ];
    let page_two = vec![lora("/loras/c.safetensors", "gamma", Some("strength: 0.9"))];

    let selection = Arc::new(Mutex::new(SelectionManager::new(
        HeadlessGrid::new(page_one.clone()),
        clipboard.clone(),
        messages.clone(),
    )));

    {
        let mut guard = selection.lock().unwrap();
        guard.enter_selection_mode();
        guard.toggle_item_selection(&page_one[0]);
        guard.view_mut().render(page_two.clone());
        guard.reapply_selection_on_render();
        guard.toggle_item_selection(&page_two[0]);
        guard.view_mut().render(page_one.clone());
    }

    let deps = FilterDeps::new(
        Arc::new(StaticTags),
        open_store(dir.path()),
        messages.clone(),
        state.clone(),
    )
    .with_observer(selection.clone());
    let mut filters = FilterManager::new(
        FilterContext::new(
            ListingContext::Loras.descriptor(),
            Arc::new(EchoReloader),
        ),
        deps,
    );
    filters.toggle_tag("anime", TagKind::Category).await;

    let guard = selection.lock().unwrap();
    assert!(guard.view().has_marker("/loras/a.safetensors"));
    assert!(!guard.view().actions_visible("/loras/a.safetensors"));
    assert_eq!(guard.view().selected_count(), 2);

    let keys: Vec<String> = guard.selected_keys().cloned().collect();
    assert_eq!(keys, vec!["/loras/a.safetensors", "/loras/c.safetensors"]);
    assert_eq!(
        guard.snapshot_for("/loras/c.safetensors").map(|s| s.display_name.as_str()),
        Some("gamma")
    );
}

#[tokio::test]
async fn test_copy_selected_writes_clipboard() {
    let clipboard = Arc::new(MemoryClipboard::default());
    let messages = Arc::new(Messages::default());
    let items = vec![
        lora("/loras/a.safetensors", "alpha", Some(r#"{"strength": 0.6}"#)),
        lora("/loras/b.safetensors", "beta", None),
    ];

    let mut selection =
        SelectionManager::new(HeadlessGrid::new(items.clone()), clipboard.clone(), messages.clone());
    selection.enter_selection_mode();
    for item in &items {
        selection.toggle_item_selection(item);
    }

    let report = selection.copy_selected_as_text().await;

    assert_eq!(report.outcome, CopyOutcome::Copied);
    assert_eq!(
        clipboard.0.lock().unwrap().as_deref(),
        Some("<lora:alpha:0.6>, <lora:beta:1>")
    );
    assert_eq!(
        messages.0.lock().unwrap().last().cloned(),
        Some(("Copied 2 LoRA syntax to clipboard".to_string(), Severity::Success))
    );
}
