//! Window chrome variants
//!
//! Maps a variant name from the configuration to the concrete colors, shadow
//! and traffic-light button treatment used when painting a demo window.
//! Unknown names never render undefined styles: they resolve to the canonical
//! `classic` preset and carry a diagnostic back to the caller.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ShadowKind;

/// Built-in chrome variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChromeVariant {
    Classic,
    Minimal,
    Glassmorphic,
    Borderless,
}

impl Default for ChromeVariant {
    fn default() -> Self {
        Self::Classic
    }
}

impl ChromeVariant {
    pub fn all() -> Vec<ChromeVariant> {
        vec![
            ChromeVariant::Classic,
            ChromeVariant::Minimal,
            ChromeVariant::Glassmorphic,
            ChromeVariant::Borderless,
        ]
    }

    /// Name as written in the configuration
    pub fn name(&self) -> &'static str {
        match self {
            ChromeVariant::Classic => "classic",
            ChromeVariant::Minimal => "minimal",
            ChromeVariant::Glassmorphic => "glassmorphic",
            ChromeVariant::Borderless => "borderless",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|v| v.name() == name)
    }

    /// Next variant in display order, wrapping around
    pub fn next(&self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|v| v == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }
}

/// How the window's traffic-light buttons are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    Standard,
    Minimal,
    Hidden,
}

/// Frosted overlay composed on top of translucent variants
#[derive(Debug, Clone, PartialEq)]
pub struct GlassOverlay {
    pub blur_px: u8,
    /// Soft shadow that replaces the configured one
    pub shadow: ShadowKind,
    /// Terminal approximation of the translucent white border
    pub tint: Color,
}

impl GlassOverlay {
    fn frosted() -> Self {
        Self {
            blur_px: 10,
            shadow: ShadowKind::Sm,
            tint: Color::Rgb(205, 208, 218),
        }
    }
}

/// Concrete style attributes for one variant
#[derive(Debug, Clone, PartialEq)]
pub struct VisualParameters {
    pub variant: ChromeVariant,
    pub background: Color,
    pub border: Color,
    pub title_bar: Color,
    pub title_text: Color,
    /// `ShadowKind::None` suppresses the configured shadow entirely
    pub shadow: ShadowKind,
    pub button_style: ButtonStyle,
    pub glass: Option<GlassOverlay>,
}

impl VisualParameters {
    /// Combine the variant's shadow with the shadow kind from the configuration.
    /// A glass overlay brings its own soft shadow.
    pub fn effective_shadow(&self, configured: ShadowKind) -> ShadowKind {
        match (self.shadow, &self.glass) {
            (ShadowKind::None, _) => ShadowKind::None,
            (_, Some(glass)) => glass.shadow,
            (_, None) => configured,
        }
    }

    /// Border color after the glass overlay, if any
    pub fn effective_border(&self) -> Color {
        self.glass.as_ref().map(|g| g.tint).unwrap_or(self.border)
    }

    /// Close, minimize and zoom button colors
    pub fn button_colors(&self) -> Option<[Color; 3]> {
        match self.button_style {
            ButtonStyle::Standard => Some([
                Color::Rgb(255, 95, 87),
                Color::Rgb(254, 188, 46),
                Color::Rgb(40, 200, 65),
            ]),
            ButtonStyle::Minimal => Some([Color::Rgb(80, 80, 80); 3]),
            ButtonStyle::Hidden => None,
        }
    }
}

/// Raised when a configuration names a variant that does not exist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDiagnostic {
    pub requested: String,
    pub substituted: ChromeVariant,
}

impl fmt::Display for VariantDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown window variant '{}', using '{}'",
            self.requested,
            self.substituted.name()
        )
    }
}

/// Outcome of a variant lookup
#[derive(Debug, Clone, PartialEq)]
pub struct VariantResolution {
    pub params: VisualParameters,
    pub diagnostic: Option<VariantDiagnostic>,
}

/// Built-in chrome presets
pub struct ChromePresets;

impl ChromePresets {
    /// Resolve a variant name, failing closed to `classic`
    pub fn resolve(name: &str) -> VariantResolution {
        match ChromeVariant::from_name(name) {
            Some(variant) => VariantResolution {
                params: Self::params(variant),
                diagnostic: None,
            },
            None => {
                let diagnostic = VariantDiagnostic {
                    requested: name.to_string(),
                    substituted: ChromeVariant::default(),
                };
                tracing::warn!("{}", diagnostic);
                VariantResolution {
                    params: Self::params(ChromeVariant::default()),
                    diagnostic: Some(diagnostic),
                }
            }
        }
    }

    pub fn params(variant: ChromeVariant) -> VisualParameters {
        match variant {
            ChromeVariant::Classic => Self::classic(),
            ChromeVariant::Minimal => Self::minimal(),
            ChromeVariant::Glassmorphic => Self::glassmorphic(),
            ChromeVariant::Borderless => Self::borderless(),
        }
    }

    /// Dark window with colored traffic lights
    pub fn classic() -> VisualParameters {
        VisualParameters {
            variant: ChromeVariant::Classic,
            background: Color::Rgb(30, 30, 30),
            border: Color::Rgb(58, 58, 58),
            title_bar: Color::Rgb(42, 42, 42),
            title_text: Color::Rgb(160, 160, 160),
            shadow: ShadowKind::Lg,
            button_style: ButtonStyle::Standard,
            glass: None,
        }
    }

    /// Flat window, muted buttons, no shadow
    pub fn minimal() -> VisualParameters {
        VisualParameters {
            variant: ChromeVariant::Minimal,
            background: Color::Rgb(17, 17, 17),
            border: Color::Rgb(34, 34, 34),
            title_bar: Color::Rgb(17, 17, 17),
            title_text: Color::Rgb(120, 120, 120),
            shadow: ShadowKind::None,
            button_style: ButtonStyle::Minimal,
            glass: None,
        }
    }

    /// Translucent window with the frosted overlay
    pub fn glassmorphic() -> VisualParameters {
        VisualParameters {
            variant: ChromeVariant::Glassmorphic,
            background: Color::Rgb(38, 42, 54),
            border: Color::Rgb(110, 118, 140),
            title_bar: Color::Rgb(48, 53, 68),
            title_text: Color::Rgb(200, 204, 214),
            shadow: ShadowKind::Lg,
            button_style: ButtonStyle::Standard,
            glass: Some(GlassOverlay::frosted()),
        }
    }

    /// No buttons, no shadow; the window cannot be closed from its chrome
    pub fn borderless() -> VisualParameters {
        VisualParameters {
            variant: ChromeVariant::Borderless,
            background: Color::Rgb(24, 24, 27),
            border: Color::Rgb(24, 24, 27),
            title_bar: Color::Rgb(24, 24, 27),
            title_text: Color::Rgb(113, 113, 122),
            shadow: ShadowKind::None,
            button_style: ButtonStyle::Hidden,
            glass: None,
        }
    }
}

/// Scale an RGB color's brightness; used by the close glitch and mount fade.
pub fn scale_brightness(color: Color, factor: f32) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let scale = |c: u8| (c as f32 * factor).round().clamp(0.0, 255.0) as u8;
            Color::Rgb(scale(r), scale(g), scale(b))
        }
        other => other,
    }
}
