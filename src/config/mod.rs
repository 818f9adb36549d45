//! Session configuration store: immutable defaults plus a partial override
//! tree per widget-kind.
//!
//! Reads return the deep merge of both layers. Writes replace the override
//! sub-tree for one kind and notify every subscriber of that kind. Nothing
//! here is persisted; the override tree lives and dies with the store.

pub mod merge;
pub mod schema;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;

use crate::error::{GalleryError, GalleryResult};

pub use schema::{
    Category, InteractiveTypewriterConfig, MenuItem, Resolved, ShadowKind, TypewriterMenuConfig,
    WindowChromeConfig,
};

/// Capacity of the change channel. Slow subscribers see a lag, which still
/// counts as "changed".
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Logical widget type; the configuration lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    WindowChrome,
    InteractiveTypewriter,
    TypewriterMenu,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 3] = [
        WidgetKind::WindowChrome,
        WidgetKind::InteractiveTypewriter,
        WidgetKind::TypewriterMenu,
    ];

    /// Key used in override files and log fields
    pub fn key(&self) -> &'static str {
        match self {
            Self::WindowChrome => "window_chrome",
            Self::InteractiveTypewriter => "interactive_typewriter",
            Self::TypewriterMenu => "typewriter_menu",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

/// Notification published on every patch/reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigChange {
    pub kind: WidgetKind,
    pub revision: u64,
}

/// Merged view of one widget-kind at a given revision.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    kind: WidgetKind,
    revision: u64,
    tree: Value,
}

impl ResolvedConfig {
    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn tree(&self) -> &Value {
        &self.tree
    }

    pub fn into_tree(self) -> Value {
        self.tree
    }

    pub fn window_chrome(&self) -> Resolved<WindowChromeConfig> {
        WindowChromeConfig::resolve(&self.tree)
    }

    pub fn interactive_typewriter(&self) -> Resolved<InteractiveTypewriterConfig> {
        InteractiveTypewriterConfig::resolve(&self.tree)
    }

    pub fn typewriter_menu(&self) -> Resolved<TypewriterMenuConfig> {
        TypewriterMenuConfig::resolve(&self.tree)
    }
}

/// Receives change notifications for one widget-kind.
#[derive(Debug)]
pub struct ConfigSubscription {
    kind: WidgetKind,
    rx: broadcast::Receiver<ConfigChange>,
}

impl ConfigSubscription {
    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    /// Drain pending notifications; true if any concerned this kind.
    pub fn poll_changed(&mut self) -> bool {
        use broadcast::error::TryRecvError;

        let mut changed = false;
        loop {
            match self.rx.try_recv() {
                Ok(change) => changed |= change.kind == self.kind,
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(kind = self.kind.key(), skipped, "config subscriber lagged");
                    changed = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        changed
    }
}

/// Process-wide configuration: defaults layered under session overrides.
pub struct ConfigStore {
    defaults: BTreeMap<WidgetKind, Value>,
    overrides: BTreeMap<WidgetKind, Value>,
    revisions: BTreeMap<WidgetKind, u64>,
    changes: broadcast::Sender<ConfigChange>,
}

impl ConfigStore {
    /// Build the default tree from the compiled-in defaults of every kind.
    pub fn new() -> Self {
        let defaults = WidgetKind::ALL
            .into_iter()
            .map(|kind| (kind, schema::default_tree(kind)))
            .collect();
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);

        Self {
            defaults,
            overrides: BTreeMap::new(),
            revisions: BTreeMap::new(),
            changes,
        }
    }

    /// Deep merge of default(kind) and override(kind). Never fails.
    pub fn get(&self, kind: WidgetKind) -> ResolvedConfig {
        let base = self.default_for(kind);
        let tree = match self.overrides.get(&kind) {
            Some(partial) => merge::merged(base, partial),
            None => base.clone(),
        };
        ResolvedConfig {
            kind,
            revision: self.revision(kind),
            tree,
        }
    }

    /// Replace the override sub-tree for `kind` wholesale. The partial is not
    /// validated; consumers fall back per field.
    pub fn patch(&mut self, kind: WidgetKind, partial: Value) {
        tracing::debug!(kind = kind.key(), "config patched: {}", partial);
        self.overrides.insert(kind, partial);
        self.publish(kind);
    }

    /// Drop the override sub-tree for `kind`, reverting reads to defaults.
    pub fn reset(&mut self, kind: WidgetKind) {
        tracing::debug!(kind = kind.key(), "config reset");
        self.overrides.remove(&kind);
        self.publish(kind);
    }

    pub fn reset_all(&mut self) {
        for kind in WidgetKind::ALL {
            self.reset(kind);
        }
    }

    pub fn subscribe(&self, kind: WidgetKind) -> ConfigSubscription {
        ConfigSubscription {
            kind,
            rx: self.changes.subscribe(),
        }
    }

    pub fn revision(&self, kind: WidgetKind) -> u64 {
        self.revisions.get(&kind).copied().unwrap_or(0)
    }

    pub fn default_for(&self, kind: WidgetKind) -> &Value {
        // Every kind is inserted in new()
        &self.defaults[&kind]
    }

    pub fn override_for(&self, kind: WidgetKind) -> Option<&Value> {
        self.overrides.get(&kind)
    }

    /// Whole default tree keyed by widget-kind
    pub fn default_tree(&self) -> Value {
        let map = self
            .defaults
            .iter()
            .map(|(kind, tree)| (kind.key().to_string(), tree.clone()))
            .collect();
        Value::Object(map)
    }

    /// Patch every kind named at the top level of `tree`.
    ///
    /// The root must be an object keyed by widget-kind. Unknown keys are
    /// rejected before anything is applied.
    pub fn apply_overrides(&mut self, tree: &Value) -> GalleryResult<Vec<WidgetKind>> {
        let Value::Object(map) = tree else {
            return Err(GalleryError::MalformedOverrideRoot(json_type_name(tree)));
        };

        let mut patches = Vec::with_capacity(map.len());
        for (key, partial) in map {
            let kind = WidgetKind::from_key(key)
                .ok_or_else(|| GalleryError::UnknownWidgetKind(key.clone()))?;
            patches.push((kind, partial.clone()));
        }

        let kinds: Vec<WidgetKind> = patches.iter().map(|(kind, _)| *kind).collect();
        for (kind, partial) in patches {
            self.patch(kind, partial);
        }
        Ok(kinds)
    }

    fn publish(&mut self, kind: WidgetKind) {
        let revision = self.revisions.entry(kind).or_insert(0);
        *revision += 1;
        let change = ConfigChange {
            kind,
            revision: *revision,
        };
        // No receivers is fine
        let _ = self.changes.send(change);
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_without_override_is_default() {
        let store = ConfigStore::new();
        for kind in WidgetKind::ALL {
            assert_eq!(store.get(kind).tree(), store.default_for(kind));
        }
    }

    #[test]
    fn test_patch_then_get_is_deep_merge() {
        let mut store = ConfigStore::new();
        let partial = json!({"style": {"shadow": "sm"}, "title": "Patched"});
        store.patch(WidgetKind::WindowChrome, partial.clone());

        let expected = merge::merged(store.default_for(WidgetKind::WindowChrome), &partial);
        assert_eq!(store.get(WidgetKind::WindowChrome).into_tree(), expected);
    }

    #[test]
    fn test_reset_restores_default() {
        let mut store = ConfigStore::new();
        store.patch(WidgetKind::InteractiveTypewriter, json!({"default_category": "pointing"}));
        store.reset(WidgetKind::InteractiveTypewriter);

        let kind = WidgetKind::InteractiveTypewriter;
        assert_eq!(store.get(kind).tree(), store.default_for(kind));
        assert!(store.override_for(kind).is_none());
    }

    #[test]
    fn test_successive_patches_do_not_accumulate() {
        let mut store = ConfigStore::new();
        store.patch(WidgetKind::WindowChrome, json!({"title": "First"}));
        store.patch(WidgetKind::WindowChrome, json!({"variant": "minimal"}));

        let chrome = store.get(WidgetKind::WindowChrome).window_chrome().value;
        assert_eq!(chrome.variant, "minimal");
        assert_eq!(chrome.title, WindowChromeConfig::default().title);
    }

    #[test]
    fn test_patch_leaves_other_kinds_alone() {
        let mut store = ConfigStore::new();
        store.patch(WidgetKind::WindowChrome, json!({"variant": "minimal"}));
        let kind = WidgetKind::TypewriterMenu;
        assert_eq!(store.get(kind).tree(), store.default_for(kind));
    }

    #[test]
    fn test_minimal_variant_keeps_default_radius() {
        let mut store = ConfigStore::new();
        store.patch(WidgetKind::WindowChrome, json!({"variant": "minimal"}));
        let chrome = store.get(WidgetKind::WindowChrome).window_chrome();
        assert!(chrome.is_clean());
        assert_eq!(chrome.value.variant, "minimal");
        assert_eq!(chrome.value.style.border_radius, 12);
    }

    #[test]
    fn test_malformed_partial_is_accepted() {
        let mut store = ConfigStore::new();
        store.patch(WidgetKind::WindowChrome, json!(["not", "an", "object"]));
        assert_eq!(store.get(WidgetKind::WindowChrome).into_tree(), json!(["not", "an", "object"]));

        // Consumer falls back for every field
        let chrome = store.get(WidgetKind::WindowChrome).window_chrome();
        assert_eq!(chrome.value, WindowChromeConfig::default());
        assert_eq!(chrome.fallbacks.len(), 7);
    }

    #[test]
    fn test_subscription_sees_own_kind_only() {
        let mut store = ConfigStore::new();
        let mut chrome = store.subscribe(WidgetKind::WindowChrome);
        let mut menu = store.subscribe(WidgetKind::TypewriterMenu);

        assert!(!chrome.poll_changed());
        store.patch(WidgetKind::WindowChrome, json!({"variant": "minimal"}));
        assert!(chrome.poll_changed());
        assert!(!chrome.poll_changed());
        assert!(!menu.poll_changed());

        store.reset(WidgetKind::TypewriterMenu);
        assert!(menu.poll_changed());
        assert!(!chrome.poll_changed());
    }

    #[test]
    fn test_revisions_count_writes() {
        let mut store = ConfigStore::new();
        assert_eq!(store.revision(WidgetKind::WindowChrome), 0);
        store.patch(WidgetKind::WindowChrome, json!({}));
        store.reset(WidgetKind::WindowChrome);
        assert_eq!(store.revision(WidgetKind::WindowChrome), 2);
        assert_eq!(store.get(WidgetKind::WindowChrome).revision(), 2);
    }

    #[test]
    fn test_apply_overrides_by_key() {
        let mut store = ConfigStore::new();
        let applied = store
            .apply_overrides(&json!({
                "window_chrome": {"variant": "glassmorphic"},
                "typewriter_menu": {"animations": {"auto_advance_ms": 900}}
            }))
            .unwrap();
        assert_eq!(applied.len(), 2);
        assert_eq!(store.get(WidgetKind::WindowChrome).window_chrome().value.variant, "glassmorphic");
        assert_eq!(
            store.get(WidgetKind::TypewriterMenu).typewriter_menu().value.animations.auto_advance_ms,
            900
        );
    }

    #[test]
    fn test_apply_overrides_rejects_unknown_kind_atomically() {
        let mut store = ConfigStore::new();
        let err = store
            .apply_overrides(&json!({
                "window_chrome": {"variant": "minimal"},
                "sidebar": {}
            }))
            .unwrap_err();
        assert_eq!(err, GalleryError::UnknownWidgetKind("sidebar".to_string()));
        assert!(store.override_for(WidgetKind::WindowChrome).is_none());
    }

    #[test]
    fn test_apply_overrides_rejects_non_object_root() {
        let mut store = ConfigStore::new();
        let err = store.apply_overrides(&json!(3)).unwrap_err();
        assert_eq!(err, GalleryError::MalformedOverrideRoot("a number"));
    }

    #[test]
    fn test_widget_kind_keys_round_trip() {
        for kind in WidgetKind::ALL {
            assert_eq!(WidgetKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(WidgetKind::from_key("terminal"), None);
    }
}
