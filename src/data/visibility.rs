//! Title → shown/hidden map for the demo windows
//!
//! Entries are flipped, never removed. Titles keep their registration order so
//! the control panel lists them stably.

use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct VisibilityRegistry {
    shown: HashMap<String, bool>,
    order: Vec<String>,
}

impl VisibilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `title` as shown if it is not known yet
    pub fn register(&mut self, title: impl Into<String>) {
        let title = title.into();
        if !self.shown.contains_key(&title) {
            self.order.push(title.clone());
            self.shown.insert(title, true);
        }
    }

    /// Flip a title's visibility and return the new value.
    ///
    /// Unknown titles start from hidden, so the first toggle shows them.
    pub fn toggle(&mut self, title: &str) -> bool {
        let entry = self.entry(title);
        *entry = !*entry;
        let now = *entry;
        tracing::debug!(title, visible = now, "visibility toggled");
        now
    }

    /// Hide `title`; returns whether anything changed
    pub fn set_hidden(&mut self, title: &str) -> bool {
        let entry = self.entry(title);
        let changed = *entry;
        *entry = false;
        if changed {
            tracing::debug!(title, "hidden");
        }
        changed
    }

    pub fn is_visible(&self, title: &str) -> bool {
        self.shown.get(title).copied().unwrap_or(false)
    }

    /// Titles in the order they were first seen
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn entry(&mut self, title: &str) -> &mut bool {
        if !self.shown.contains_key(title) {
            self.order.push(title.to_string());
        }
        self.shown.entry(title.to_string()).or_insert(false)
    }
}
