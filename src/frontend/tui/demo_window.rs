//! A demo window: variant-styled chrome around a typewriter.
//!
//! Draws the mount rise-in, the close keyframes, the configured shadow, the
//! traffic-light buttons and the typed text with its blinking cursor.

use std::time::Duration;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Widget},
};

use crate::config::{ShadowKind, WindowChromeConfig};
use crate::core::DemoInstance;
use crate::theme::{scale_brightness, ChromeVariant, VisualParameters};

/// Rows a mounting window rises through
const MOUNT_RISE_ROWS: f32 = 2.0;
const HOVER_BRIGHTNESS: f32 = 1.3;
const SHADOW_COLOR: Color = Color::Rgb(10, 10, 12);
const TEXT_COLOR: Color = Color::Rgb(230, 230, 230);
const ACCENT_COLOR: Color = Color::Rgb(94, 129, 244);

pub struct DemoWindow<'a> {
    instance: &'a DemoInstance,
    title: &'a str,
    config: &'a WindowChromeConfig,
    params: &'a VisualParameters,
    now: Duration,
    focused: bool,
    hovered: bool,
}

impl<'a> DemoWindow<'a> {
    pub fn new(
        instance: &'a DemoInstance,
        title: &'a str,
        config: &'a WindowChromeConfig,
        params: &'a VisualParameters,
        now: Duration,
    ) -> Self {
        Self {
            instance,
            title,
            config,
            params,
            now,
            focused: false,
            hovered: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn hovered(mut self, hovered: bool) -> Self {
        self.hovered = hovered;
        self
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let chrome = &self.instance.chrome;
        let mut area = area;
        let mut brightness = 1.0_f32;
        let mut dim = false;

        let progress = chrome.mount_progress(self.now);
        if progress < 1.0 {
            let rise = ((1.0 - progress) * MOUNT_RISE_ROWS).round() as u16;
            let rise = rise.min(area.height);
            area.y += rise;
            area.height -= rise;
            brightness *= 0.4 + 0.6 * progress;
        }

        if let Some(frame) = chrome.close_keyframe() {
            if frame.opacity <= 0.0 {
                return;
            }
            let height = ((area.height as f32 * frame.scale_y).round() as u16).clamp(1, area.height.max(1));
            area.y += (area.height.saturating_sub(height)) / 2;
            area.height = height;
            area.x = (area.x as i32 + frame.jitter as i32).max(0) as u16;
            brightness *= frame.brightness;
            dim = frame.opacity < 0.5;
        }

        let area = area.intersection(*buf.area());
        if area.width < 4 || area.height == 0 {
            return;
        }

        let shadow = self.params.effective_shadow(self.config.style.shadow);
        let window = self.draw_shadow(area, shadow, buf);

        let mut border_brightness = brightness;
        if self.hovered && self.config.animations.hover {
            border_brightness *= HOVER_BRIGHTNESS;
        }

        let modifier = if dim { Modifier::DIM } else { Modifier::empty() };
        let bg = scale_brightness(self.params.background, brightness);
        let border = if self.params.variant == ChromeVariant::Borderless {
            bg
        } else {
            scale_brightness(self.params.effective_border(), border_brightness)
        };

        let border_type = if self.focused {
            BorderType::Thick
        } else if self.config.style.border_radius > 0 {
            BorderType::Rounded
        } else {
            BorderType::Plain
        };
        let title_style = Style::default()
            .fg(scale_brightness(self.params.title_text, brightness))
            .add_modifier(if self.focused { Modifier::BOLD } else { Modifier::empty() })
            .add_modifier(modifier);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(border_type)
            .border_style(Style::default().fg(border).add_modifier(modifier))
            .style(Style::default().bg(bg))
            .title(Line::from(Span::styled(format!(" {} ", self.title), title_style)));
        let inner = block.inner(window);
        block.render(window, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }
        self.draw_title_bar(inner, brightness, modifier, buf);
        self.draw_content(
            Rect::new(inner.x, inner.y + 1, inner.width, inner.height - 1),
            brightness,
            modifier,
            buf,
        );
    }

    /// Paint the drop shadow and return the area left for the window itself
    fn draw_shadow(&self, area: Rect, shadow: ShadowKind, buf: &mut Buffer) -> Rect {
        let (right, below) = match shadow {
            ShadowKind::None => (0, 0),
            ShadowKind::Sm => (1, 0),
            ShadowKind::Lg => (1, 1),
        };
        let window = Rect::new(
            area.x,
            area.y,
            area.width.saturating_sub(right),
            area.height.saturating_sub(below).max(1),
        );
        let style = Style::default().bg(SHADOW_COLOR);
        if right > 0 && window.height > 1 {
            buf.set_style(
                Rect::new(window.x + window.width, window.y + 1, 1, window.height - 1 + below),
                style,
            );
        }
        if below > 0 && area.height > window.height {
            buf.set_style(
                Rect::new(window.x + 1, window.y + window.height, window.width, 1),
                style,
            );
        }
        window
    }

    fn draw_title_bar(&self, inner: Rect, brightness: f32, modifier: Modifier, buf: &mut Buffer) {
        let bar = Rect::new(inner.x, inner.y, inner.width, 1);
        buf.set_style(
            bar,
            Style::default().bg(scale_brightness(self.params.title_bar, brightness)),
        );

        let mut x = inner.x + 1;
        if let Some(colors) = self.params.button_colors() {
            for color in colors {
                if x >= bar.x + bar.width {
                    break;
                }
                buf.set_string(
                    x,
                    bar.y,
                    "●",
                    Style::default()
                        .fg(scale_brightness(color, brightness))
                        .add_modifier(modifier),
                );
                x += 2;
            }
        }

        if self.config.show_title {
            let x = x + 1;
            let right = bar.x + bar.width;
            if x < right {
                buf.set_stringn(
                    x,
                    bar.y,
                    &self.config.title,
                    (right - x) as usize,
                    Style::default()
                        .fg(scale_brightness(self.params.title_text, brightness))
                        .add_modifier(modifier),
                );
            }
        }
    }

    fn draw_content(&self, area: Rect, brightness: f32, modifier: Modifier, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let typewriter = &self.instance.typewriter;
        let text_color = scale_brightness(TEXT_COLOR, brightness);
        let base = Style::default().fg(text_color).add_modifier(modifier);
        let mut y = area.y;
        let bottom = area.y + area.height;

        // Category tabs, only when there is a choice
        let categories = typewriter.categories();
        if categories.len() > 1 {
            let current = &typewriter.category().id;
            let mut spans = Vec::with_capacity(categories.len() * 2);
            for category in categories {
                let style = if &category.id == current {
                    base.add_modifier(Modifier::REVERSED | Modifier::BOLD)
                } else {
                    base.add_modifier(Modifier::DIM)
                };
                spans.push(Span::styled(format!(" {} ", category.name), style));
                spans.push(Span::raw(" "));
            }
            buf.set_line(area.x + 1, y, &Line::from(spans), area.width.saturating_sub(1));
            y += 1;
        }
        if y >= bottom {
            return;
        }

        let text_style = if typewriter.is_emphasized() {
            Style::default()
                .fg(Color::White)
                .bg(scale_brightness(ACCENT_COLOR, brightness))
                .add_modifier(Modifier::BOLD)
                .add_modifier(modifier)
        } else {
            base
        };
        let mut spans = vec![
            Span::styled("› ", base.fg(scale_brightness(ACCENT_COLOR, brightness))),
            Span::styled(typewriter.display_text().to_string(), text_style),
        ];
        if !typewriter.is_emphasized() && typewriter.cursor_visible(self.now) {
            spans.push(Span::styled("▌", base));
        }
        buf.set_line(area.x + 1, y, &Line::from(spans), area.width.saturating_sub(1));
        y += 1;

        if y < bottom && typewriter.hint_visible() {
            let hint = if self.focused {
                "press enter ↵ to continue"
            } else {
                "click to continue"
            };
            buf.set_stringn(
                area.x + 3,
                y,
                hint,
                area.width.saturating_sub(3) as usize,
                base.add_modifier(Modifier::DIM | Modifier::ITALIC),
            );
        }
    }
}
