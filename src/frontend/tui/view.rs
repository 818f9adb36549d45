//! Whole-frame composition: panel, demo windows, key help

use ratatui::{buffer::Buffer, layout::Rect, style::{Color, Modifier, Style}};

use crate::core::Gallery;
use crate::frontend::tui::control_panel::ControlPanel;
use crate::frontend::tui::demo_window::DemoWindow;
use crate::frontend::tui::layout::GalleryLayout;

const KEY_HELP: &str = "Tab focus · Enter advance · ←/→ category · x close · v variant · r reset · q quit";
const COMPACT_KEY_HELP: &str = "Tab · Enter · ←/→ · x · v · r · q";

/// Draw one frame into `buf`; returns the layout used, for hit testing.
pub fn draw(area: Rect, buf: &mut Buffer, gallery: &Gallery) -> GalleryLayout {
    let mounted: Vec<usize> = gallery.instances().iter().map(|i| i.demo).collect();
    let layout = GalleryLayout::compute(area, gallery.demos().len(), &mounted);

    ControlPanel::new(gallery, layout.compact).render(layout.panel, buf);

    let params = &gallery.chrome_resolution().params;
    for (demo, rect) in &layout.windows {
        let (Some(instance), Some(entry)) = (gallery.instance(*demo), gallery.demos().get(*demo)) else {
            continue;
        };
        DemoWindow::new(instance, &entry.title, gallery.chrome_config(), params, gallery.now())
            .focused(gallery.focus() == Some(*demo))
            .hovered(gallery.hovered() == Some(*demo))
            .render(*rect, buf);
    }

    if layout.windows.is_empty() {
        let (x, y) = if layout.compact {
            (area.x + 1, layout.panel.y + layout.panel.height + 1)
        } else {
            (layout.panel.x + layout.panel.width + 2, area.y + 1)
        };
        if x < area.x + area.width && y < area.y + area.height {
            buf.set_stringn(
                x,
                y,
                "All demos are hidden. Press a number key to show one.",
                (area.x + area.width - x) as usize,
                Style::default().fg(Color::Gray),
            );
        }
    }

    if layout.footer.height > 0 {
        let help = if layout.compact { COMPACT_KEY_HELP } else { KEY_HELP };
        buf.set_stringn(
            layout.footer.x,
            layout.footer.y,
            help,
            layout.footer.width as usize,
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        );
    }

    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigStore;
    use crate::core::{DemoTable, GalleryAction};
    use std::time::Duration;

    fn screen(buf: &Buffer) -> Vec<String> {
        let area = *buf.area();
        (0..area.height)
            .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol()).collect())
            .collect()
    }

    fn gallery() -> Gallery {
        Gallery::new(DemoTable::standard().unwrap(), ConfigStore::new())
    }

    #[test]
    fn test_wide_frame() {
        let mut g = gallery();
        g.advance(Duration::from_millis(960));
        let area = Rect::new(0, 0, 100, 24);
        let mut buf = Buffer::empty(area);
        let layout = draw(area, &mut buf, &g);

        assert!(!layout.compact);
        let lines = screen(&buf);
        assert!(lines.iter().any(|l| l.contains("find the cat")));
        assert!(lines.iter().any(|l| l.contains("Typewriter Menu")));
        assert!(lines[23].starts_with("Tab focus"));
    }

    #[test]
    fn test_narrow_frame_collapses_panel() {
        let g = gallery();
        let area = Rect::new(0, 0, 60, 24);
        let mut buf = Buffer::empty(area);
        let layout = draw(area, &mut buf, &g);

        assert!(layout.compact);
        assert!(screen(&buf)[0].starts_with("1:■"));
    }

    #[test]
    fn test_all_hidden_message() {
        let mut g = gallery();
        g.apply(GalleryAction::Toggle(0));
        g.apply(GalleryAction::Toggle(1));
        let area = Rect::new(0, 0, 100, 24);
        let mut buf = Buffer::empty(area);
        let layout = draw(area, &mut buf, &g);

        assert!(layout.windows.is_empty());
        assert!(screen(&buf)[1].contains("All demos are hidden"));
    }
}
