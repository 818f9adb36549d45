//! Key and mouse bindings
//!
//! Tab focuses the next demo, Enter or a click advances it, ←/→ switch
//! category, `x` closes the focused window, `v` cycles the chrome variant,
//! `r` resets every override, number keys toggle demos, `q`/Esc quit.

use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEventKind};

use crate::core::GalleryAction;
use crate::frontend::tui::layout::GalleryLayout;
use crate::frontend::FrontendEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Action(GalleryAction),
    Quit,
    /// Nothing to do but repaint (resize)
    Redraw,
    Ignored,
}

pub fn translate(event: &FrontendEvent, layout: Option<&GalleryLayout>) -> InputOutcome {
    match event {
        FrontendEvent::Key { code, modifiers } => translate_key(*code, *modifiers),
        FrontendEvent::Mouse { kind, x, y, .. } => match layout {
            Some(layout) => translate_mouse(*kind, *x, *y, layout),
            None => InputOutcome::Ignored,
        },
        FrontendEvent::Resize { .. } => InputOutcome::Redraw,
    }
}

fn translate_key(code: KeyCode, modifiers: KeyModifiers) -> InputOutcome {
    use InputOutcome::{Action, Ignored, Quit};

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Quit,
            _ => Ignored,
        };
    }

    match code {
        KeyCode::Char('q') | KeyCode::Esc => Quit,
        KeyCode::Tab => Action(GalleryAction::FocusNext),
        KeyCode::Enter => Action(GalleryAction::Advance),
        KeyCode::Left => Action(GalleryAction::StepCategory { forward: false }),
        KeyCode::Right => Action(GalleryAction::StepCategory { forward: true }),
        KeyCode::Char('x') => Action(GalleryAction::CloseFocused),
        KeyCode::Char('v') => Action(GalleryAction::CycleVariant),
        KeyCode::Char('r') => Action(GalleryAction::ResetAll),
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            Action(GalleryAction::Toggle(index))
        }
        _ => Ignored,
    }
}

fn translate_mouse(kind: MouseEventKind, x: u16, y: u16, layout: &GalleryLayout) -> InputOutcome {
    match kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(demo) = layout.panel_entry_at(x, y) {
                InputOutcome::Action(GalleryAction::Toggle(demo))
            } else if let Some(demo) = layout.close_button_at(x, y) {
                InputOutcome::Action(GalleryAction::Close(demo))
            } else if let Some(demo) = layout.window_at(x, y) {
                InputOutcome::Action(GalleryAction::Click(demo))
            } else {
                InputOutcome::Ignored
            }
        }
        MouseEventKind::Moved => InputOutcome::Action(GalleryAction::Hover(layout.window_at(x, y))),
        _ => InputOutcome::Ignored,
    }
}
