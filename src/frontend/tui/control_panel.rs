//! Control panel listing every demo with a visibility checkbox.
//!
//! Collapses to a single summary row on narrow terminals.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Widget},
};

use crate::config::WidgetKind;
use crate::core::Gallery;
use crate::frontend::tui::layout::COMPACT_SLOT_WIDTH;

const SHOWN: Color = Color::Rgb(40, 200, 65);
const HIDDEN: Color = Color::Rgb(113, 113, 122);
const WARNING: Color = Color::Rgb(254, 188, 46);

pub struct ControlPanel<'a> {
    gallery: &'a Gallery,
    compact: bool,
}

impl<'a> ControlPanel<'a> {
    pub fn new(gallery: &'a Gallery, compact: bool) -> Self {
        Self { gallery, compact }
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        if self.compact {
            self.render_compact(area, buf);
        } else {
            self.render_full(area, buf);
        }
    }

    fn render_compact(&self, area: Rect, buf: &mut Buffer) {
        let registry = self.gallery.registry();
        for (i, title) in registry.titles().enumerate() {
            let x = area.x + i as u16 * COMPACT_SLOT_WIDTH;
            if x >= area.x + area.width {
                break;
            }
            let visible = registry.is_visible(title);
            let label = format!("{}:{} {}", i + 1, if visible { "■" } else { "□" }, title);
            let room = (area.x + area.width - x).min(COMPACT_SLOT_WIDTH - 1);
            buf.set_stringn(
                x,
                area.y,
                label,
                room as usize,
                Style::default().fg(if visible { SHOWN } else { HIDDEN }),
            );
        }
    }

    fn render_full(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(HIDDEN))
            .title(" Demos ");
        let inner = block.inner(area);
        block.render(area, buf);

        let registry = self.gallery.registry();
        let width = inner.width as usize;
        let bottom = inner.y + inner.height;
        let mut y = inner.y;

        // Registration order matches the demo table, so `i` is the demo index
        for (i, title) in registry.titles().enumerate() {
            if y >= bottom {
                return;
            }
            let visible = registry.is_visible(title);
            let mut style = Style::default().fg(if visible { SHOWN } else { HIDDEN });
            if self.gallery.focus() == Some(i) {
                style = style.add_modifier(Modifier::BOLD);
            }
            let label = format!("[{}] {} {}", if visible { "x" } else { " " }, i + 1, title);
            buf.set_stringn(inner.x, y, label, width, style);
            y += 1;
        }

        let resolution = self.gallery.chrome_resolution();
        let mut lines: Vec<(String, Style)> = vec![(String::new(), Style::default())];
        lines.push((
            format!("variant: {}", resolution.params.variant.name()),
            Style::default(),
        ));
        if let Some(diagnostic) = &resolution.diagnostic {
            lines.push((
                format!("! {}", diagnostic),
                Style::default().fg(WARNING),
            ));
        }

        let overridden: Vec<&str> = WidgetKind::ALL
            .iter()
            .filter(|kind| self.gallery.store().override_for(**kind).is_some())
            .map(|kind| kind.key())
            .collect();
        if !overridden.is_empty() {
            lines.push(("overrides:".to_string(), Style::default().fg(HIDDEN)));
            for key in overridden {
                lines.push((format!("  {}", key), Style::default().fg(HIDDEN)));
            }
        }

        for (text, style) in lines {
            if y >= bottom {
                return;
            }
            buf.set_stringn(inner.x, y, text, width, style);
            y += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigStore;
    use crate::core::{DemoTable, GalleryAction};
    use serde_json::json;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area().width).map(|x| buf[(x, y)].symbol()).collect()
    }

    fn gallery() -> Gallery {
        Gallery::new(DemoTable::standard().unwrap(), ConfigStore::new())
    }

    #[test]
    fn test_full_panel_lists_checkboxes() {
        let mut g = gallery();
        g.apply(GalleryAction::Toggle(1));
        let area = Rect::new(0, 0, 30, 10);
        let mut buf = Buffer::empty(area);
        ControlPanel::new(&g, false).render(area, &mut buf);

        assert!(row(&buf, 0).contains("Demos"));
        assert!(row(&buf, 1).contains("[x] 1 Interactive Typewriter"));
        assert!(row(&buf, 2).contains("[ ] 2 Typewriter Menu"));
        assert!(row(&buf, 4).contains("variant: classic"));
    }

    #[test]
    fn test_diagnostic_and_overrides_listed() {
        let mut g = gallery();
        g.patch(WidgetKind::WindowChrome, json!({"variant": "neon"}));
        let area = Rect::new(0, 0, 60, 12);
        let mut buf = Buffer::empty(area);
        ControlPanel::new(&g, false).render(area, &mut buf);

        assert!(row(&buf, 5).contains("unknown window variant 'neon'"));
        assert!(row(&buf, 6).contains("overrides:"));
        assert!(row(&buf, 7).contains("window_chrome"));
    }

    #[test]
    fn test_compact_summary_row() {
        let mut g = gallery();
        g.apply(GalleryAction::Toggle(0));
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        ControlPanel::new(&g, true).render(area, &mut buf);

        let line = row(&buf, 0);
        assert!(line.starts_with("1:□ Interactive"), "{}", line);
        assert!(line.contains("2:■ Typewriter Menu"));
    }
}
