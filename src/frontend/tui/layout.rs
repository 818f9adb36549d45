//! Screen layout for the gallery and mouse hit testing
//!
//! Wide terminals get a control panel on the left and the demo windows stacked
//! on the right. Below [`COMPACT_BREAKPOINT`] columns the panel collapses to a
//! one-line summary above the windows.

use ratatui::layout::Rect;

/// Narrower terminals use the collapsed panel
pub const COMPACT_BREAKPOINT: u16 = 80;

pub const PANEL_WIDTH: u16 = 30;

const MIN_WINDOW_HEIGHT: u16 = 5;
const MAX_WINDOW_HEIGHT: u16 = 9;

pub fn is_compact(width: u16) -> bool {
    width < COMPACT_BREAKPOINT
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryLayout {
    pub compact: bool,
    /// Control panel (a single row when compact)
    pub panel: Rect,
    /// Number of demos listed in the panel
    pub panel_entries: usize,
    /// Mounted demo windows as (demo index, area), top to bottom
    pub windows: Vec<(usize, Rect)>,
    /// Key help line at the bottom
    pub footer: Rect,
}

impl GalleryLayout {
    /// Lay out `mounted` demo windows (table indices, in order) inside `area`
    pub fn compute(area: Rect, demo_count: usize, mounted: &[usize]) -> Self {
        let compact = is_compact(area.width);
        let footer_height = area.height.min(1);
        let footer = Rect::new(
            area.x,
            area.y + area.height - footer_height,
            area.width,
            footer_height,
        );
        let body = Rect::new(area.x, area.y, area.width, area.height - footer_height);

        let (panel, content) = if compact {
            let panel_height = body.height.min(1);
            (
                Rect::new(body.x, body.y, body.width, panel_height),
                Rect::new(
                    body.x,
                    body.y + panel_height,
                    body.width,
                    body.height - panel_height,
                ),
            )
        } else {
            let panel_width = PANEL_WIDTH.min(body.width);
            (
                Rect::new(body.x, body.y, panel_width, body.height),
                Rect::new(
                    body.x + panel_width,
                    body.y,
                    body.width - panel_width,
                    body.height,
                ),
            )
        };

        let mut windows = Vec::with_capacity(mounted.len());
        if !mounted.is_empty() && content.height > 0 {
            let share = content.height / mounted.len() as u16;
            let height = share.clamp(MIN_WINDOW_HEIGHT, MAX_WINDOW_HEIGHT);
            let mut y = content.y;
            for &demo in mounted {
                let bottom = content.y + content.height;
                if y >= bottom {
                    break;
                }
                let h = height.min(bottom - y);
                windows.push((demo, Rect::new(content.x, y, content.width, h)));
                y += h;
            }
        }

        Self {
            compact,
            panel,
            panel_entries: demo_count,
            windows,
            footer,
        }
    }

    /// Demo whose window contains the cell
    pub fn window_at(&self, x: u16, y: u16) -> Option<usize> {
        self.windows
            .iter()
            .find(|(_, rect)| contains(*rect, x, y))
            .map(|(demo, _)| *demo)
    }

    /// Demo whose close button sits on the cell
    pub fn close_button_at(&self, x: u16, y: u16) -> Option<usize> {
        self.windows
            .iter()
            .find(|(_, rect)| close_button_cell(*rect) == Some((x, y)))
            .map(|(demo, _)| *demo)
    }

    /// Demo whose checkbox row in the panel contains the cell
    pub fn panel_entry_at(&self, x: u16, y: u16) -> Option<usize> {
        if !contains(self.panel, x, y) {
            return None;
        }
        if self.compact {
            // Entries are fixed-width slots in the summary row
            let slot = ((x - self.panel.x) / COMPACT_SLOT_WIDTH) as usize;
            return (slot < self.panel_entries).then_some(slot);
        }
        // Border row, then one row per entry
        let row = y.checked_sub(self.panel.y + 1)? as usize;
        (row < self.panel_entries).then_some(row)
    }
}

/// Width of one entry in the compact summary row
pub const COMPACT_SLOT_WIDTH: u16 = 26;

/// Cell of the close button in a window's title bar
pub fn close_button_cell(window: Rect) -> Option<(u16, u16)> {
    (window.width >= 4 && window.height >= 3).then(|| (window.x + 2, window.y + 1))
}

fn contains(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoint() {
        assert!(is_compact(79));
        assert!(!is_compact(80));
    }

    #[test]
    fn test_wide_layout_has_side_panel() {
        let layout = GalleryLayout::compute(Rect::new(0, 0, 120, 30), 2, &[0, 1]);
        assert!(!layout.compact);
        assert_eq!(layout.panel, Rect::new(0, 0, PANEL_WIDTH, 29));
        assert_eq!(layout.windows[0].1, Rect::new(30, 0, 90, 9));
        assert_eq!(layout.windows[1].1, Rect::new(30, 9, 90, 9));
        assert_eq!(layout.footer, Rect::new(0, 29, 120, 1));
    }

    #[test]
    fn test_narrow_layout_collapses_panel() {
        let layout = GalleryLayout::compute(Rect::new(0, 0, 60, 20), 2, &[1]);
        assert!(layout.compact);
        assert_eq!(layout.panel.height, 1);
        assert_eq!(layout.windows, vec![(1, Rect::new(0, 1, 60, 9))]);
    }

    #[test]
    fn test_hit_testing() {
        let layout = GalleryLayout::compute(Rect::new(0, 0, 120, 30), 2, &[0, 1]);
        assert_eq!(layout.window_at(40, 10), Some(1));
        assert_eq!(layout.window_at(10, 10), None);
        assert_eq!(layout.close_button_at(32, 1), Some(0));
        assert_eq!(layout.close_button_at(32, 10), Some(1));
        assert_eq!(layout.panel_entry_at(5, 1), Some(0));
        assert_eq!(layout.panel_entry_at(5, 2), Some(1));
        assert_eq!(layout.panel_entry_at(5, 3), None);
        assert_eq!(layout.panel_entry_at(5, 0), None);
    }

    #[test]
    fn test_compact_panel_slots() {
        let layout = GalleryLayout::compute(Rect::new(0, 0, 60, 20), 2, &[0, 1]);
        assert_eq!(layout.panel_entry_at(3, 0), Some(0));
        assert_eq!(layout.panel_entry_at(30, 0), Some(1));
        assert_eq!(layout.panel_entry_at(55, 0), None);
    }

    #[test]
    fn test_windows_stop_at_bottom() {
        let layout = GalleryLayout::compute(Rect::new(0, 0, 100, 8), 3, &[0, 1, 2]);
        assert_eq!(layout.windows.len(), 2);
        assert_eq!(layout.windows[1].1.height, 2);
    }
}
