//! Strongly typed records for every widget-kind, plus their compiled-in defaults.
//!
//! The store hands out merged `serde_json::Value` trees and never validates
//! them. Each record here knows how to resolve itself from such a tree one
//! field at a time, falling back to its own default whenever a field is
//! missing or has the wrong shape.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::WidgetKind;

/// A resolved record plus the dotted paths that had to fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub fallbacks: Vec<String>,
}

impl<T> Resolved<T> {
    pub fn is_clean(&self) -> bool {
        self.fallbacks.is_empty()
    }
}

/// Walks a merged tree and pulls typed fields out of it.
struct FieldResolver<'a> {
    kind: WidgetKind,
    root: &'a Value,
    fallbacks: Vec<String>,
}

impl<'a> FieldResolver<'a> {
    fn new(kind: WidgetKind, root: &'a Value) -> Self {
        Self {
            kind,
            root,
            fallbacks: Vec::new(),
        }
    }

    /// Read `path` (dot separated) as `T`, or record a fallback and return `default`.
    fn field<T: DeserializeOwned>(&mut self, path: &str, default: T) -> T {
        let pointer = format!("/{}", path.replace('.', "/"));
        match self.root.pointer(&pointer) {
            Some(raw) => match serde_json::from_value::<T>(raw.clone()) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(
                        kind = self.kind.key(),
                        field = path,
                        "config field has the wrong shape, using default: {}",
                        e
                    );
                    self.fallback(path);
                    default
                }
            },
            None => {
                tracing::warn!(
                    kind = self.kind.key(),
                    field = path,
                    "config field missing, using default"
                );
                self.fallback(path);
                default
            }
        }
    }

    fn fallback(&mut self, path: &str) {
        self.fallbacks.push(path.to_string());
    }

    fn finish<T>(self, value: T) -> Resolved<T> {
        Resolved {
            value,
            fallbacks: self.fallbacks,
        }
    }
}

// ---------------------------------------------------------------------------
// Window chrome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadowKind {
    None,
    Sm,
    Lg,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChromeStyle {
    pub border_radius: u16,
    pub shadow: ShadowKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChromeAnimations {
    pub hover: bool,
    pub mount: bool,
}

/// Window chrome options shared by every demo window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowChromeConfig {
    /// Variant name, resolved by [`crate::theme::ChromePresets`]
    pub variant: String,
    pub title: String,
    pub show_title: bool,
    pub style: ChromeStyle,
    pub animations: ChromeAnimations,
}

impl Default for WindowChromeConfig {
    fn default() -> Self {
        Self {
            variant: "classic".to_string(),
            title: "Preview".to_string(),
            show_title: true,
            style: ChromeStyle {
                border_radius: 12,
                shadow: ShadowKind::Lg,
            },
            animations: ChromeAnimations {
                hover: true,
                mount: true,
            },
        }
    }
}

impl WindowChromeConfig {
    pub fn resolve(tree: &Value) -> Resolved<Self> {
        let d = Self::default();
        let mut r = FieldResolver::new(WidgetKind::WindowChrome, tree);
        let value = Self {
            variant: r.field("variant", d.variant),
            title: r.field("title", d.title),
            show_title: r.field("show_title", d.show_title),
            style: ChromeStyle {
                border_radius: r.field("style.border_radius", d.style.border_radius),
                shadow: r.field("style.shadow", d.style.shadow),
            },
            animations: ChromeAnimations {
                hover: r.field("animations.hover", d.animations.hover),
                mount: r.field("animations.mount", d.animations.mount),
            },
        };
        r.finish(value)
    }
}

// ---------------------------------------------------------------------------
// Category/item catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub text: String,
    pub href: String,
}

impl MenuItem {
    fn new(id: &str, text: &str, href: &str) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            href: href.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub items: Vec<MenuItem>,
}

fn default_catalog() -> Vec<Category> {
    vec![
        Category {
            id: "detection".to_string(),
            name: "Detection".to_string(),
            items: vec![
                MenuItem::new("detect-cat", "find the cat", "/docs/usage#detect"),
                MenuItem::new("detect-cars", "locate every car", "/docs/usage#detect"),
            ],
        },
        Category {
            id: "pointing".to_string(),
            name: "Pointing".to_string(),
            items: vec![
                MenuItem::new("point-door", "point at the door handle", "/docs/usage#point"),
                MenuItem::new("point-apple", "point at the red apple", "/docs/usage#point"),
            ],
        },
        Category {
            id: "captioning".to_string(),
            name: "Captioning".to_string(),
            items: vec![
                MenuItem::new("caption-short", "describe this image", "/docs/usage#caption"),
                MenuItem::new("caption-long", "what is happening here?", "/docs/usage#caption"),
            ],
        },
    ]
}

/// Drop categories without items; an empty result means the catalog is unusable.
fn usable_categories(kind: WidgetKind, categories: Vec<Category>) -> Vec<Category> {
    categories
        .into_iter()
        .filter(|c| {
            if c.items.is_empty() {
                tracing::warn!(
                    kind = kind.key(),
                    category = %c.id,
                    "category has no items, skipping it"
                );
                false
            } else {
                true
            }
        })
        .collect()
}

/// Tick intervals of zero would spin the scheduler; clamp to one millisecond.
fn positive_ms(kind: WidgetKind, field: &str, ms: u64) -> u64 {
    if ms == 0 {
        tracing::warn!(kind = kind.key(), field, "interval of 0ms clamped to 1ms");
        1
    } else {
        ms
    }
}

// ---------------------------------------------------------------------------
// Interactive typewriter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypewriterAnimations {
    pub typing_speed_ms: u64,
    pub cursor_blink_ms: u64,
    pub hint_delay_ms: u64,
    pub press_duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractiveTypewriterConfig {
    pub default_category: String,
    pub categories: Vec<Category>,
    pub animations: TypewriterAnimations,
}

impl Default for InteractiveTypewriterConfig {
    fn default() -> Self {
        Self {
            default_category: "detection".to_string(),
            categories: default_catalog(),
            animations: TypewriterAnimations {
                typing_speed_ms: 80,
                cursor_blink_ms: 500,
                hint_delay_ms: 1000,
                press_duration_ms: 150,
            },
        }
    }
}

impl InteractiveTypewriterConfig {
    pub fn resolve(tree: &Value) -> Resolved<Self> {
        let kind = WidgetKind::InteractiveTypewriter;
        let d = Self::default();
        let mut r = FieldResolver::new(kind, tree);

        let mut categories = usable_categories(kind, r.field("categories", d.categories.clone()));
        if categories.is_empty() {
            tracing::warn!(kind = kind.key(), "no usable categories, using the default catalog");
            r.fallback("categories");
            categories = d.categories;
        }

        let value = Self {
            default_category: r.field("default_category", d.default_category),
            categories,
            animations: TypewriterAnimations {
                typing_speed_ms: positive_ms(
                    kind,
                    "animations.typing_speed_ms",
                    r.field("animations.typing_speed_ms", d.animations.typing_speed_ms),
                ),
                cursor_blink_ms: positive_ms(
                    kind,
                    "animations.cursor_blink_ms",
                    r.field("animations.cursor_blink_ms", d.animations.cursor_blink_ms),
                ),
                hint_delay_ms: r.field("animations.hint_delay_ms", d.animations.hint_delay_ms),
                press_duration_ms: r.field(
                    "animations.press_duration_ms",
                    d.animations.press_duration_ms,
                ),
            },
        };
        r.finish(value)
    }
}

// ---------------------------------------------------------------------------
// Auto-cycling typewriter menu
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuAnimations {
    pub typing_speed_ms: u64,
    pub cursor_blink_ms: u64,
    pub auto_advance_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypewriterMenuConfig {
    pub items: Vec<MenuItem>,
    pub animations: MenuAnimations,
}

impl Default for TypewriterMenuConfig {
    fn default() -> Self {
        Self {
            items: vec![
                MenuItem::new("home", "Home", "/"),
                MenuItem::new("docs", "Documentation", "/docs/overview"),
                MenuItem::new("install", "Installation", "/docs/installation"),
                MenuItem::new("usage", "Usage", "/docs/usage"),
            ],
            animations: MenuAnimations {
                typing_speed_ms: 90,
                cursor_blink_ms: 500,
                auto_advance_ms: 1600,
            },
        }
    }
}

impl TypewriterMenuConfig {
    pub fn resolve(tree: &Value) -> Resolved<Self> {
        let kind = WidgetKind::TypewriterMenu;
        let d = Self::default();
        let mut r = FieldResolver::new(kind, tree);

        let mut items: Vec<MenuItem> = r.field("items", d.items.clone());
        if items.is_empty() {
            tracing::warn!(kind = kind.key(), "menu has no items, using the default items");
            r.fallback("items");
            items = d.items;
        }

        let value = Self {
            items,
            animations: MenuAnimations {
                typing_speed_ms: positive_ms(
                    kind,
                    "animations.typing_speed_ms",
                    r.field("animations.typing_speed_ms", d.animations.typing_speed_ms),
                ),
                cursor_blink_ms: positive_ms(
                    kind,
                    "animations.cursor_blink_ms",
                    r.field("animations.cursor_blink_ms", d.animations.cursor_blink_ms),
                ),
                auto_advance_ms: r.field("animations.auto_advance_ms", d.animations.auto_advance_ms),
            },
        };
        r.finish(value)
    }

    /// Present the flat item list as a single-category catalog.
    pub fn as_catalog(&self) -> Vec<Category> {
        vec![Category {
            id: "menu".to_string(),
            name: "Menu".to_string(),
            items: self.items.clone(),
        }]
    }
}

/// Compiled-in default sub-tree for `kind`.
///
/// A tree that fails to serialize comes back as `Null`, which resolves every
/// field to its `Default`.
pub fn default_tree(kind: WidgetKind) -> Value {
    let tree = match kind {
        WidgetKind::WindowChrome => serde_json::to_value(WindowChromeConfig::default()),
        WidgetKind::InteractiveTypewriter => {
            serde_json::to_value(InteractiveTypewriterConfig::default())
        }
        WidgetKind::TypewriterMenu => serde_json::to_value(TypewriterMenuConfig::default()),
    };
    tree.unwrap_or_else(|e| {
        tracing::warn!(kind = kind.key(), "default configuration did not serialize: {}", e);
        Value::Null
    })
}

/// Resolve every field of `kind` from `tree` and report the fallbacks only.
pub fn fallbacks_for(kind: WidgetKind, tree: &Value) -> Vec<String> {
    match kind {
        WidgetKind::WindowChrome => WindowChromeConfig::resolve(tree).fallbacks,
        WidgetKind::InteractiveTypewriter => InteractiveTypewriterConfig::resolve(tree).fallbacks,
        WidgetKind::TypewriterMenu => TypewriterMenuConfig::resolve(tree).fallbacks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::merge::merged;
    use serde_json::json;

    #[test]
    fn test_default_trees_resolve_cleanly() {
        for kind in WidgetKind::ALL {
            let tree = default_tree(kind);
            assert!(tree.is_object(), "{:?} defaults did not serialize", kind);
            assert!(fallbacks_for(kind, &tree).is_empty(), "{:?} has fallbacks", kind);
        }
    }

    #[test]
    fn test_default_catalog_shape() {
        let config = InteractiveTypewriterConfig::default();
        assert_eq!(config.categories.len(), 3);
        assert!(config.categories.iter().all(|c| c.items.len() == 2));
        assert_eq!(config.categories[0].id, "detection");
        assert_eq!(config.categories[0].items[0].text, "find the cat");
    }

    #[test]
    fn test_wrong_type_field_falls_back_alone() {
        let tree = merged(
            &default_tree(WidgetKind::WindowChrome),
            &json!({"style": {"border_radius": "round"}, "title": "Hello"}),
        );
        let resolved = WindowChromeConfig::resolve(&tree);
        assert_eq!(resolved.value.style.border_radius, 12);
        assert_eq!(resolved.value.title, "Hello");
        assert_eq!(resolved.fallbacks, vec!["style.border_radius".to_string()]);
    }

    #[test]
    fn test_replaced_parent_falls_back_per_leaf() {
        let tree = merged(&default_tree(WidgetKind::WindowChrome), &json!({"animations": false}));
        let resolved = WindowChromeConfig::resolve(&tree);
        assert!(resolved.value.animations.mount);
        assert!(resolved.value.animations.hover);
        assert_eq!(resolved.fallbacks.len(), 2);
    }

    #[test]
    fn test_unknown_shadow_falls_back() {
        let tree = merged(
            &default_tree(WidgetKind::WindowChrome),
            &json!({"style": {"shadow": "huge"}}),
        );
        let resolved = WindowChromeConfig::resolve(&tree);
        assert_eq!(resolved.value.style.shadow, ShadowKind::Lg);
        assert!(!resolved.is_clean());
    }

    #[test]
    fn test_empty_categories_fall_back_to_catalog() {
        let tree = merged(
            &default_tree(WidgetKind::InteractiveTypewriter),
            &json!({"categories": []}),
        );
        let resolved = InteractiveTypewriterConfig::resolve(&tree);
        assert_eq!(resolved.value.categories, default_catalog());
        assert_eq!(resolved.fallbacks, vec!["categories".to_string()]);
    }

    #[test]
    fn test_category_without_items_is_skipped() {
        let tree = merged(
            &default_tree(WidgetKind::InteractiveTypewriter),
            &json!({"categories": [
                {"id": "empty", "name": "Empty", "items": []},
                {"id": "one", "name": "One", "items": [{"id": "a", "text": "abc", "href": "/"}]}
            ]}),
        );
        let resolved = InteractiveTypewriterConfig::resolve(&tree);
        assert_eq!(resolved.value.categories.len(), 1);
        assert_eq!(resolved.value.categories[0].id, "one");
        assert!(resolved.is_clean());
    }

    #[test]
    fn test_zero_typing_speed_is_clamped() {
        let tree = merged(
            &default_tree(WidgetKind::InteractiveTypewriter),
            &json!({"animations": {"typing_speed_ms": 0}}),
        );
        let resolved = InteractiveTypewriterConfig::resolve(&tree);
        assert_eq!(resolved.value.animations.typing_speed_ms, 1);
        assert_eq!(resolved.value.animations.hint_delay_ms, 1000);
    }

    #[test]
    fn test_menu_items_replace_and_resolve() {
        let tree = merged(
            &default_tree(WidgetKind::TypewriterMenu),
            &json!({"items": [{"id": "x", "text": "only", "href": "/x"}]}),
        );
        let resolved = TypewriterMenuConfig::resolve(&tree);
        assert_eq!(resolved.value.items.len(), 1);
        assert_eq!(resolved.value.as_catalog()[0].items[0].text, "only");
    }
}
