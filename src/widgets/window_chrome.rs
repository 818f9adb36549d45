//! Window chrome lifecycle: mount animation and the multi-stage close
//!
//! The close sequence is irreversible. Its stage timers are all scheduled when
//! the close is requested; the final timer removes the window and hides its
//! title in the visibility registry exactly once.

use std::time::Duration;

use crate::core::scheduler::{InstanceId, Scheduler, TimerEvent, TimerId};
use crate::data::VisibilityRegistry;
use crate::theme::{ButtonStyle, VisualParameters};

pub const CLOSE_DURATION: Duration = Duration::from_millis(600);
pub const MOUNT_DURATION: Duration = Duration::from_millis(600);

/// Keyframe stages of the close sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseStage {
    Glitch,
    Flicker,
    Collapse,
    Compress,
    Fade,
    Gone,
}

/// How a closing window is drawn during one stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloseKeyframe {
    /// Fraction of the window height still drawn
    pub scale_y: f32,
    pub opacity: f32,
    pub brightness: f32,
    /// Horizontal shake in columns
    pub jitter: i16,
}

impl CloseStage {
    pub const ALL: [CloseStage; 6] = [
        CloseStage::Glitch,
        CloseStage::Flicker,
        CloseStage::Collapse,
        CloseStage::Compress,
        CloseStage::Fade,
        CloseStage::Gone,
    ];

    /// Percentage of the close duration at which the stage begins
    pub fn percent(&self) -> u32 {
        match self {
            CloseStage::Glitch => 0,
            CloseStage::Flicker => 15,
            CloseStage::Collapse => 30,
            CloseStage::Compress => 45,
            CloseStage::Fade => 60,
            CloseStage::Gone => 75,
        }
    }

    pub fn offset(&self) -> Duration {
        CLOSE_DURATION * self.percent() / 100
    }

    pub fn keyframe(&self) -> CloseKeyframe {
        let (scale_y, opacity, brightness, jitter) = match self {
            CloseStage::Glitch => (1.0, 1.0, 1.5, 1),
            CloseStage::Flicker => (1.0, 0.6, 0.6, -1),
            CloseStage::Collapse => (0.8, 0.9, 1.0, 0),
            CloseStage::Compress => (0.6, 0.7, 1.0, 0),
            CloseStage::Fade => (0.3, 0.4, 0.8, 0),
            CloseStage::Gone => (0.1, 0.0, 0.5, 0),
        };
        CloseKeyframe {
            scale_y,
            opacity,
            brightness,
            jitter,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromePhase {
    Mounting,
    Open,
    Closing(CloseStage),
    Closed,
}

#[derive(Debug)]
pub struct WindowChromeState {
    owner: InstanceId,
    title: String,
    phase: ChromePhase,
    mounted_at: Duration,
    mount_timer: Option<TimerId>,
    hidden_reported: bool,
}

impl WindowChromeState {
    /// Mount a window for `title`; with `animate` it rises in over
    /// [`MOUNT_DURATION`], otherwise it is open immediately.
    pub fn mount(
        owner: InstanceId,
        title: impl Into<String>,
        animate: bool,
        scheduler: &mut Scheduler,
    ) -> Self {
        let (phase, mount_timer) = if animate {
            let timer = scheduler.schedule(owner, MOUNT_DURATION, TimerEvent::MountComplete);
            (ChromePhase::Mounting, Some(timer))
        } else {
            (ChromePhase::Open, None)
        };
        Self {
            owner,
            title: title.into(),
            phase,
            mounted_at: scheduler.now(),
            mount_timer,
            hidden_reported: false,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn phase(&self) -> ChromePhase {
        self.phase
    }

    pub fn is_closing(&self) -> bool {
        matches!(self.phase, ChromePhase::Closing(_))
    }

    pub fn is_closed(&self) -> bool {
        self.phase == ChromePhase::Closed
    }

    /// Drawing parameters for the current close stage, if closing
    pub fn close_keyframe(&self) -> Option<CloseKeyframe> {
        match self.phase {
            ChromePhase::Closing(stage) => Some(stage.keyframe()),
            _ => None,
        }
    }

    /// Mount animation progress in `0.0..=1.0`
    pub fn mount_progress(&self, now: Duration) -> f32 {
        match self.phase {
            ChromePhase::Mounting => {
                let elapsed = now.saturating_sub(self.mounted_at);
                (elapsed.as_secs_f32() / MOUNT_DURATION.as_secs_f32()).clamp(0.0, 1.0)
            }
            _ => 1.0,
        }
    }

    /// Whether the chrome offers a close button under `params`
    pub fn close_button_available(&self, params: &VisualParameters) -> bool {
        params.button_style != ButtonStyle::Hidden
            && matches!(self.phase, ChromePhase::Mounting | ChromePhase::Open)
    }

    /// Start the close sequence. No-op once closing or closed.
    pub fn request_close(&mut self, scheduler: &mut Scheduler) -> bool {
        if !matches!(self.phase, ChromePhase::Mounting | ChromePhase::Open) {
            tracing::trace!(title = %self.title, phase = ?self.phase, "close ignored");
            return false;
        }

        if let Some(timer) = self.mount_timer.take() {
            scheduler.cancel(timer);
        }
        self.phase = ChromePhase::Closing(CloseStage::Glitch);
        for stage in CloseStage::ALL.iter().skip(1) {
            scheduler.schedule(self.owner, stage.offset(), TimerEvent::CloseStage(*stage));
        }
        scheduler.schedule(self.owner, CLOSE_DURATION, TimerEvent::CloseComplete);
        tracing::debug!(title = %self.title, "close sequence started");
        true
    }

    /// Handle a fired timer for this window
    pub fn on_timer(&mut self, timer: TimerId, event: TimerEvent, registry: &mut VisibilityRegistry) {
        match event {
            TimerEvent::MountComplete => {
                if self.mount_timer == Some(timer) && self.phase == ChromePhase::Mounting {
                    self.mount_timer = None;
                    self.phase = ChromePhase::Open;
                    tracing::debug!(title = %self.title, "mounted");
                }
            }
            TimerEvent::CloseStage(stage) => {
                if self.is_closing() {
                    tracing::trace!(title = %self.title, ?stage, "close stage");
                    self.phase = ChromePhase::Closing(stage);
                }
            }
            TimerEvent::CloseComplete => {
                self.complete(registry);
            }
            other => {
                tracing::trace!(title = %self.title, event = ?other, "not a chrome timer");
            }
        }
    }

    /// Finish the close: mark closed and hide the title once.
    ///
    /// Returns true only for the call that hid the title.
    pub fn complete(&mut self, registry: &mut VisibilityRegistry) -> bool {
        self.phase = ChromePhase::Closed;
        if self.hidden_reported {
            return false;
        }
        self.hidden_reported = true;
        registry.set_hidden(&self.title);
        tracing::info!(title = %self.title, "window closed");
        true
    }
}
