use crate::core::Gallery;
use crate::frontend::input::{self, InputOutcome};
use crate::frontend::tui::layout::GalleryLayout;
use crate::frontend::tui::view;
use crate::frontend::{Frontend, FrontendEvent};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

/// TUI frontend using ratatui
///
/// Renders the gallery with ratatui and handles events via crossterm.
pub struct TuiFrontend {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    poll_timeout: Duration,
    /// Layout of the last frame, for mouse hit testing
    layout: Option<GalleryLayout>,
    restored: bool,
}

impl TuiFrontend {
    /// Enter raw mode and the alternate screen with mouse capture.
    pub fn new(poll_timeout: Duration) -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to setup terminal")?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor()?;

        Ok(Self {
            terminal,
            poll_timeout,
            layout: None,
            restored: false,
        })
    }

    /// Convert crossterm event to FrontendEvent
    fn convert_event(event: Event) -> Option<FrontendEvent> {
        match event {
            Event::Key(key_event) => {
                // Only key presses; repeats and releases are ignored
                if key_event.kind != KeyEventKind::Press {
                    return None;
                }
                Some(FrontendEvent::key(key_event.code, key_event.modifiers))
            }
            Event::Mouse(mouse_event) => Some(FrontendEvent::mouse(
                mouse_event.kind,
                mouse_event.column,
                mouse_event.row,
                mouse_event.modifiers,
            )),
            Event::Resize(w, h) => Some(FrontendEvent::resize(w, h)),
            _ => None,
        }
    }
}

impl Frontend for TuiFrontend {
    fn poll_events(&mut self) -> Result<Vec<FrontendEvent>> {
        let mut events = Vec::new();

        if event::poll(self.poll_timeout)? {
            // Drain whatever else is already queued without waiting again
            loop {
                if let Some(frontend_event) = Self::convert_event(event::read()?) {
                    events.push(frontend_event);
                }
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }

        Ok(events)
    }

    fn render(&mut self, gallery: &Gallery) -> Result<()> {
        let mut layout = None;
        self.terminal.draw(|f| {
            let area = f.area();
            layout = Some(view::draw(area, f.buffer_mut(), gallery));
        })?;
        self.layout = layout;
        Ok(())
    }

    fn translate(&self, event: &FrontendEvent) -> InputOutcome {
        input::translate(event, self.layout.as_ref())
    }

    fn cleanup(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for TuiFrontend {
    fn drop(&mut self) {
        // Restore the terminal even if cleanup() wasn't called
        let _ = self.cleanup();
    }
}
