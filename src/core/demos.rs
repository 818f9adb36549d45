//! Demo registration table
//!
//! Maps every demo title shown in the gallery to the widget-kind that
//! configures it. The table is validated once at startup: a duplicate title or
//! a title without a known kind is a construction error.

use std::collections::HashSet;

use crate::config::WidgetKind;
use crate::error::{GalleryError, GalleryResult};

/// Titles the gallery knows how to render, with their widget-kind
const KIND_BY_TITLE: &[(&str, WidgetKind)] = &[
    ("Interactive Typewriter", WidgetKind::InteractiveTypewriter),
    ("Typewriter Menu", WidgetKind::TypewriterMenu),
];

/// Default gallery page, in display order
pub const DEFAULT_TITLES: &[&str] = &["Interactive Typewriter", "Typewriter Menu"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Demo {
    pub title: String,
    pub kind: WidgetKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoTable {
    demos: Vec<Demo>,
}

impl DemoTable {
    /// Validate `titles` against the known kinds
    pub fn build<S: AsRef<str>>(titles: &[S]) -> GalleryResult<Self> {
        let mut seen = HashSet::new();
        let mut demos = Vec::with_capacity(titles.len());

        for title in titles {
            let title = title.as_ref();
            if !seen.insert(title) {
                return Err(GalleryError::DuplicateTitle(title.to_string()));
            }
            let kind = KIND_BY_TITLE
                .iter()
                .find(|(known, _)| *known == title)
                .map(|(_, kind)| *kind)
                .ok_or_else(|| GalleryError::UnmappedTitle(title.to_string()))?;
            demos.push(Demo {
                title: title.to_string(),
                kind,
            });
        }

        tracing::debug!(count = demos.len(), "demo table built");
        Ok(Self { demos })
    }

    pub fn standard() -> GalleryResult<Self> {
        Self::build(DEFAULT_TITLES)
    }

    pub fn demos(&self) -> &[Demo] {
        &self.demos
    }

    pub fn get(&self, index: usize) -> Option<&Demo> {
        self.demos.get(index)
    }

    pub fn position(&self, title: &str) -> Option<usize> {
        self.demos.iter().position(|d| d.title == title)
    }

    pub fn len(&self) -> usize {
        self.demos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.demos.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table() {
        let table = DemoTable::standard().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.demos()[0].kind, WidgetKind::InteractiveTypewriter);
        assert_eq!(table.demos()[1].kind, WidgetKind::TypewriterMenu);
        assert_eq!(table.position("Typewriter Menu"), Some(1));
    }

    #[test]
    fn test_duplicate_title_rejected() {
        let err = DemoTable::build(&["Typewriter Menu", "Typewriter Menu"]).unwrap_err();
        assert_eq!(err, GalleryError::DuplicateTitle("Typewriter Menu".into()));
    }

    #[test]
    fn test_unmapped_title_rejected() {
        let err = DemoTable::build(&["Interactive Typewriter", "Spinning Cube"]).unwrap_err();
        assert_eq!(err, GalleryError::UnmappedTitle("Spinning Cube".into()));
    }

    #[test]
    fn test_order_is_preserved() {
        let table = DemoTable::build(&["Typewriter Menu", "Interactive Typewriter"]).unwrap();
        let titles: Vec<&str> = table.demos().iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["Typewriter Menu", "Interactive Typewriter"]);
    }
}
