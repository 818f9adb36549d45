//! Cycling typewriter state machine (rendering-agnostic)
//!
//! Types the current menu item one character per tick, waits for an advance
//! event, plays a short emphasis, then moves to the next item and starts over.
//! Switching category restarts from the first item of the new category.

use std::time::Duration;

use crate::config::{Category, InteractiveTypewriterConfig, MenuItem, TypewriterMenuConfig};
use crate::core::scheduler::{InstanceId, Scheduler, TimerEvent, TimerId};

/// Press emphasis for menus that advance on their own
const AUTO_PRESS_DURATION: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypewriterPhase {
    Typing { revealed: usize },
    WaitingForAdvance { hint_visible: bool },
    Advancing,
}

/// Who issues the advance event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceMode {
    /// The user (Enter / click)
    Manual,
    /// The machine itself, after the given pause
    Auto(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypewriterTiming {
    pub typing_speed: Duration,
    pub cursor_blink: Duration,
    pub hint_delay: Duration,
    pub press_duration: Duration,
    pub mode: AdvanceMode,
}

impl From<&InteractiveTypewriterConfig> for TypewriterTiming {
    fn from(config: &InteractiveTypewriterConfig) -> Self {
        let a = &config.animations;
        Self {
            typing_speed: Duration::from_millis(a.typing_speed_ms),
            cursor_blink: Duration::from_millis(a.cursor_blink_ms),
            hint_delay: Duration::from_millis(a.hint_delay_ms),
            press_duration: Duration::from_millis(a.press_duration_ms),
            mode: AdvanceMode::Manual,
        }
    }
}

impl From<&TypewriterMenuConfig> for TypewriterTiming {
    fn from(config: &TypewriterMenuConfig) -> Self {
        let a = &config.animations;
        Self {
            typing_speed: Duration::from_millis(a.typing_speed_ms),
            cursor_blink: Duration::from_millis(a.cursor_blink_ms),
            hint_delay: Duration::ZERO,
            press_duration: AUTO_PRESS_DURATION,
            mode: AdvanceMode::Auto(Duration::from_millis(a.auto_advance_ms)),
        }
    }
}

/// Per-instance typewriter state
///
/// Holds its own timer handles so a category switch can cancel them without
/// touching timers that belong to the surrounding window chrome.
#[derive(Debug)]
pub struct TypewriterState {
    owner: InstanceId,
    catalog: Vec<Category>,
    category: usize,
    index: usize,
    phase: TypewriterPhase,
    timing: TypewriterTiming,
    step_timer: Option<TimerId>,
    hint_timer: Option<TimerId>,
}

impl TypewriterState {
    /// Mount in `Typing(0)` on `category_id` (first category if unknown).
    ///
    /// `catalog` must hold at least one category and every category at least
    /// one item; the config resolvers guarantee both.
    pub fn mount(
        owner: InstanceId,
        catalog: Vec<Category>,
        category_id: &str,
        timing: TypewriterTiming,
        scheduler: &mut Scheduler,
    ) -> Self {
        let mut state = Self {
            owner,
            catalog,
            category: 0,
            index: 0,
            phase: TypewriterPhase::Typing { revealed: 0 },
            timing,
            step_timer: None,
            hint_timer: None,
        };
        state.category = state.find_category(category_id);
        state.enter_typing(scheduler);
        state
    }

    pub fn phase(&self) -> TypewriterPhase {
        self.phase
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn timing(&self) -> TypewriterTiming {
        self.timing
    }

    pub fn categories(&self) -> &[Category] {
        &self.catalog
    }

    pub fn category(&self) -> &Category {
        &self.catalog[self.category]
    }

    pub fn current_item(&self) -> &MenuItem {
        let items = &self.category().items;
        &items[self.index % items.len()]
    }

    /// Characters revealed so far
    pub fn revealed(&self) -> usize {
        match self.phase {
            TypewriterPhase::Typing { revealed } => revealed,
            _ => self.item_len(),
        }
    }

    /// The visible prefix of the current item's text
    pub fn display_text(&self) -> &str {
        let text = self.current_item().text.as_str();
        match text.char_indices().nth(self.revealed()) {
            Some((byte_idx, _)) => &text[..byte_idx],
            None => text,
        }
    }

    pub fn is_waiting(&self) -> bool {
        matches!(self.phase, TypewriterPhase::WaitingForAdvance { .. })
    }

    pub fn hint_visible(&self) -> bool {
        matches!(
            self.phase,
            TypewriterPhase::WaitingForAdvance { hint_visible: true }
        )
    }

    /// True while the press emphasis plays
    pub fn is_emphasized(&self) -> bool {
        self.phase == TypewriterPhase::Advancing
    }

    /// Blinking cursor state at virtual time `now`
    pub fn cursor_visible(&self, now: Duration) -> bool {
        let period = self.timing.cursor_blink.as_millis().max(1);
        (now.as_millis() / period) % 2 == 0
    }

    /// Apply an advance event. Ignored unless waiting for one.
    pub fn advance(&mut self, scheduler: &mut Scheduler) -> bool {
        if !self.is_waiting() {
            tracing::trace!(owner = self.owner.raw(), phase = ?self.phase, "advance ignored");
            return false;
        }

        self.cancel_timers(scheduler);
        self.phase = TypewriterPhase::Advancing;
        self.step_timer = Some(scheduler.schedule(
            self.owner,
            self.timing.press_duration,
            TimerEvent::FinishAdvance,
        ));
        tracing::debug!(owner = self.owner.raw(), index = self.index, "advancing");
        true
    }

    /// Switch category; restarts typing from the first item regardless of phase.
    ///
    /// Returns false when `category_id` is unknown and the first category was
    /// used instead.
    pub fn select_category(&mut self, category_id: &str, scheduler: &mut Scheduler) -> bool {
        let known = self.catalog.iter().any(|c| c.id == category_id);
        self.cancel_timers(scheduler);
        self.category = self.find_category(category_id);
        self.index = 0;
        tracing::debug!(
            owner = self.owner.raw(),
            category = %self.category().id,
            "category selected"
        );
        self.enter_typing(scheduler);
        known
    }

    /// Cycle to the neighbouring category (`forward` = next)
    pub fn step_category(&mut self, forward: bool, scheduler: &mut Scheduler) {
        let count = self.catalog.len();
        let next = if forward {
            (self.category + 1) % count
        } else {
            (self.category + count - 1) % count
        };
        let id = self.catalog[next].id.clone();
        self.select_category(&id, scheduler);
    }

    /// Take a new catalog and timing after a configuration change.
    ///
    /// Keeps the current position when the same category still holds the same
    /// item text at the same index; otherwise restarts typing in that category
    /// (or the first one if it disappeared).
    pub fn reconfigure(
        &mut self,
        catalog: Vec<Category>,
        timing: TypewriterTiming,
        scheduler: &mut Scheduler,
    ) {
        let category_id = self.category().id.clone();
        let text = self.current_item().text.clone();
        let index = self.index;

        self.catalog = catalog;
        self.timing = timing;

        let unchanged = self
            .catalog
            .iter()
            .find(|c| c.id == category_id)
            .and_then(|c| c.items.get(index))
            .is_some_and(|item| item.text == text);

        if unchanged {
            self.category = self.find_category(&category_id);
            return;
        }
        self.select_category(&category_id, scheduler);
    }

    /// Handle a fired timer; stale timers are dropped.
    pub fn on_timer(&mut self, timer: TimerId, event: TimerEvent, scheduler: &mut Scheduler) {
        let expected = match event {
            TimerEvent::ShowHint => self.hint_timer,
            _ => self.step_timer,
        };
        if expected != Some(timer) {
            tracing::trace!(owner = self.owner.raw(), ?event, "stale typewriter timer dropped");
            return;
        }

        match (event, self.phase) {
            (TimerEvent::TypeTick, TypewriterPhase::Typing { revealed }) => {
                self.step_timer = None;
                let revealed = revealed + 1;
                tracing::trace!(owner = self.owner.raw(), revealed, "tick");
                if revealed >= self.item_len() {
                    self.enter_waiting(scheduler);
                } else {
                    self.phase = TypewriterPhase::Typing { revealed };
                    self.schedule_tick(scheduler);
                }
            }
            (TimerEvent::ShowHint, TypewriterPhase::WaitingForAdvance { .. }) => {
                self.hint_timer = None;
                self.phase = TypewriterPhase::WaitingForAdvance { hint_visible: true };
            }
            (TimerEvent::AutoAdvance, TypewriterPhase::WaitingForAdvance { .. }) => {
                self.step_timer = None;
                self.advance(scheduler);
            }
            (TimerEvent::FinishAdvance, TypewriterPhase::Advancing) => {
                self.step_timer = None;
                let count = self.category().items.len();
                self.index = (self.index + 1) % count;
                self.enter_typing(scheduler);
            }
            (event, phase) => {
                tracing::trace!(owner = self.owner.raw(), ?event, ?phase, "timer does not apply");
            }
        }
    }

    /// Cancel this machine's own timers
    pub fn cancel_timers(&mut self, scheduler: &mut Scheduler) {
        if let Some(t) = self.step_timer.take() {
            scheduler.cancel(t);
        }
        if let Some(t) = self.hint_timer.take() {
            scheduler.cancel(t);
        }
    }

    fn item_len(&self) -> usize {
        self.current_item().text.chars().count()
    }

    fn find_category(&self, category_id: &str) -> usize {
        match self.catalog.iter().position(|c| c.id == category_id) {
            Some(idx) => idx,
            None => {
                tracing::warn!(
                    "unknown category '{}', using '{}'",
                    category_id,
                    self.catalog[0].id
                );
                0
            }
        }
    }

    fn enter_typing(&mut self, scheduler: &mut Scheduler) {
        self.phase = TypewriterPhase::Typing { revealed: 0 };
        if self.item_len() == 0 {
            self.enter_waiting(scheduler);
        } else {
            self.schedule_tick(scheduler);
        }
    }

    fn enter_waiting(&mut self, scheduler: &mut Scheduler) {
        self.phase = TypewriterPhase::WaitingForAdvance {
            hint_visible: false,
        };
        match self.timing.mode {
            AdvanceMode::Manual => {
                self.hint_timer = Some(scheduler.schedule(
                    self.owner,
                    self.timing.hint_delay,
                    TimerEvent::ShowHint,
                ));
            }
            AdvanceMode::Auto(pause) => {
                self.step_timer =
                    Some(scheduler.schedule(self.owner, pause, TimerEvent::AutoAdvance));
            }
        }
        tracing::debug!(owner = self.owner.raw(), index = self.index, "waiting for advance");
    }

    fn schedule_tick(&mut self, scheduler: &mut Scheduler) {
        self.step_timer = Some(scheduler.schedule(
            self.owner,
            self.timing.typing_speed,
            TimerEvent::TypeTick,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(10);

    fn item(id: &str, text: &str) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            text: text.to_string(),
            href: format!("/{}", id),
        }
    }

    fn catalog() -> Vec<Category> {
        vec![
            Category {
                id: "detection".to_string(),
                name: "Detection".to_string(),
                items: vec![item("a", "find the cat"), item("b", "count dogs")],
            },
            Category {
                id: "pointing".to_string(),
                name: "Pointing".to_string(),
                items: vec![item("c", "point here"), item("d", "and there")],
            },
            Category {
                id: "captioning".to_string(),
                name: "Captioning".to_string(),
                items: vec![item("e", "describe"), item("f", "narrate")],
            },
        ]
    }

    fn timing() -> TypewriterTiming {
        TypewriterTiming {
            typing_speed: TICK,
            cursor_blink: Duration::from_millis(500),
            hint_delay: Duration::from_millis(1000),
            press_duration: Duration::from_millis(150),
            mode: AdvanceMode::Manual,
        }
    }

    /// Dispatch everything due up to `now + by`
    fn run(tw: &mut TypewriterState, s: &mut Scheduler, by: Duration) {
        let until = s.now() + by;
        while let Some(fired) = s.pop_due(until) {
            tw.on_timer(fired.timer, fired.event, s);
        }
        s.settle(until);
    }

    fn mounted(s: &mut Scheduler) -> TypewriterState {
        let id = s.allocate_instance();
        TypewriterState::mount(id, catalog(), "detection", timing(), s)
    }

    #[test]
    fn test_initial_state_is_typing_zero() {
        let mut s = Scheduler::new();
        let tw = mounted(&mut s);
        assert_eq!(tw.phase(), TypewriterPhase::Typing { revealed: 0 });
        assert_eq!(tw.display_text(), "");
        assert_eq!(tw.index(), 0);
    }

    #[test]
    fn test_one_character_per_tick() {
        let mut s = Scheduler::new();
        let mut tw = mounted(&mut s);
        for n in 1..=5 {
            run(&mut tw, &mut s, TICK);
            assert_eq!(tw.display_text(), &"find the cat"[..n]);
        }
    }

    #[test]
    fn test_full_reveal_after_len_ticks_then_advance() {
        let mut s = Scheduler::new();
        let mut tw = mounted(&mut s);

        run(&mut tw, &mut s, TICK * 12);
        assert_eq!(tw.display_text(), "find the cat");
        assert!(tw.is_waiting());

        // Waiting is terminal without an advance event
        run(&mut tw, &mut s, Duration::from_secs(5));
        assert_eq!(tw.display_text(), "find the cat");
        assert!(tw.hint_visible());

        assert!(tw.advance(&mut s));
        assert_eq!(tw.phase(), TypewriterPhase::Advancing);
        run(&mut tw, &mut s, Duration::from_millis(150));
        assert_eq!(tw.display_text(), "");
        assert_eq!(tw.phase(), TypewriterPhase::Typing { revealed: 0 });
        assert_eq!(tw.index(), 1);
    }

    #[test]
    fn test_hint_shows_after_delay_only() {
        let mut s = Scheduler::new();
        let mut tw = mounted(&mut s);
        run(&mut tw, &mut s, TICK * 12);
        assert!(!tw.hint_visible());
        run(&mut tw, &mut s, Duration::from_millis(999));
        assert!(!tw.hint_visible());
        run(&mut tw, &mut s, Duration::from_millis(1));
        assert!(tw.hint_visible());
    }

    #[test]
    fn test_advance_ignored_while_typing() {
        let mut s = Scheduler::new();
        let mut tw = mounted(&mut s);
        run(&mut tw, &mut s, TICK * 3);
        assert!(!tw.advance(&mut s));
        assert_eq!(tw.phase(), TypewriterPhase::Typing { revealed: 3 });
    }

    #[test]
    fn test_double_advance_moves_one_item() {
        let mut s = Scheduler::new();
        let mut tw = mounted(&mut s);
        run(&mut tw, &mut s, TICK * 12);
        assert!(tw.advance(&mut s));
        assert!(!tw.advance(&mut s));
        run(&mut tw, &mut s, Duration::from_millis(150));
        assert_eq!(tw.index(), 1);
    }

    #[test]
    fn test_last_index_wraps_to_zero() {
        let mut s = Scheduler::new();
        let mut tw = mounted(&mut s);
        for expected in [1, 0] {
            let len = tw.current_item().text.chars().count() as u32;
            run(&mut tw, &mut s, TICK * len);
            assert!(tw.advance(&mut s));
            run(&mut tw, &mut s, Duration::from_millis(150));
            assert_eq!(tw.index(), expected);
        }
        assert_eq!(tw.current_item().text, "find the cat");
    }

    #[test]
    fn test_category_switch_resets_from_any_phase() {
        let mut s = Scheduler::new();
        let mut tw = mounted(&mut s);

        // Mid-typing
        run(&mut tw, &mut s, TICK * 4);
        assert!(tw.select_category("pointing", &mut s));
        assert_eq!(tw.phase(), TypewriterPhase::Typing { revealed: 0 });
        assert_eq!(tw.index(), 0);
        assert_eq!(tw.category().id, "pointing");

        // While advancing on item 1
        run(&mut tw, &mut s, TICK * 10);
        tw.advance(&mut s);
        run(&mut tw, &mut s, Duration::from_millis(150));
        assert_eq!(tw.index(), 1);
        run(&mut tw, &mut s, TICK * 9);
        tw.advance(&mut s);
        assert!(tw.select_category("captioning", &mut s));
        assert_eq!(tw.index(), 0);
        assert_eq!(tw.display_text(), "");

        // The cancelled FinishAdvance must not move the index later
        run(&mut tw, &mut s, Duration::from_millis(150));
        assert_eq!(tw.index(), 0);
        assert_eq!(tw.display_text(), "describe");
        assert!(tw.is_waiting());
    }

    #[test]
    fn test_category_switch_leaves_one_tick_chain() {
        let mut s = Scheduler::new();
        let mut tw = mounted(&mut s);
        let owner = tw.owner;
        run(&mut tw, &mut s, TICK * 2);
        tw.select_category("pointing", &mut s);
        tw.select_category("detection", &mut s);
        assert_eq!(s.pending_for(owner), 1);
        run(&mut tw, &mut s, TICK);
        assert_eq!(tw.display_text(), "f");
    }

    #[test]
    fn test_unknown_category_fails_closed() {
        let mut s = Scheduler::new();
        let mut tw = mounted(&mut s);
        assert!(!tw.select_category("segmentation", &mut s));
        assert_eq!(tw.category().id, "detection");
        assert_eq!(tw.phase(), TypewriterPhase::Typing { revealed: 0 });

        let id = s.allocate_instance();
        let tw = TypewriterState::mount(id, catalog(), "nope", timing(), &mut s);
        assert_eq!(tw.category().id, "detection");
    }

    #[test]
    fn test_stale_timer_is_dropped() {
        let mut s = Scheduler::new();
        let mut tw = mounted(&mut s);
        run(&mut tw, &mut s, TICK * 3);
        let old_tick = tw.step_timer.unwrap();
        assert!(tw.select_category("pointing", &mut s));
        let pending = s.pending_for(tw.owner);

        // A tick from before the switch no longer drives typing
        tw.on_timer(old_tick, TimerEvent::TypeTick, &mut s);
        assert_eq!(tw.phase(), TypewriterPhase::Typing { revealed: 0 });
        assert_eq!(s.pending_for(tw.owner), pending);

        // Nor does a hint that was never armed
        tw.on_timer(old_tick, TimerEvent::ShowHint, &mut s);
        assert!(!tw.hint_visible());

        run(&mut tw, &mut s, TICK);
        assert_eq!(tw.display_text(), "p");
    }

    #[test]
    fn test_step_category_wraps_both_ways() {
        let mut s = Scheduler::new();
        let mut tw = mounted(&mut s);
        tw.step_category(false, &mut s);
        assert_eq!(tw.category().id, "captioning");
        tw.step_category(true, &mut s);
        assert_eq!(tw.category().id, "detection");
    }

    #[test]
    fn test_display_is_prefix_on_multibyte_text() {
        let mut s = Scheduler::new();
        let id = s.allocate_instance();
        let catalog = vec![Category {
            id: "emoji".to_string(),
            name: "Emoji".to_string(),
            items: vec![item("x", "héllo ✨")],
        }];
        let mut tw = TypewriterState::mount(id, catalog, "emoji", timing(), &mut s);
        run(&mut tw, &mut s, TICK * 2);
        assert_eq!(tw.display_text(), "hé");
        run(&mut tw, &mut s, TICK * 5);
        assert_eq!(tw.display_text(), "héllo ✨");
        assert!(tw.is_waiting());
    }

    #[test]
    fn test_empty_item_waits_immediately() {
        let mut s = Scheduler::new();
        let id = s.allocate_instance();
        let catalog = vec![Category {
            id: "blank".to_string(),
            name: "Blank".to_string(),
            items: vec![item("x", ""), item("y", "ok")],
        }];
        let tw = TypewriterState::mount(id, catalog, "blank", timing(), &mut s);
        assert!(tw.is_waiting());
        assert_eq!(tw.display_text(), "");
    }

    #[test]
    fn test_auto_mode_advances_by_itself() {
        let mut s = Scheduler::new();
        let id = s.allocate_instance();
        let auto = TypewriterTiming {
            mode: AdvanceMode::Auto(Duration::from_millis(400)),
            ..timing()
        };
        let mut tw = TypewriterState::mount(id, catalog(), "pointing", auto, &mut s);
        run(&mut tw, &mut s, TICK * 10);
        assert!(tw.is_waiting());
        assert!(!tw.hint_visible());
        run(&mut tw, &mut s, Duration::from_millis(400));
        assert!(tw.is_emphasized());
        run(&mut tw, &mut s, Duration::from_millis(150));
        assert_eq!(tw.index(), 1);
        assert_eq!(tw.phase(), TypewriterPhase::Typing { revealed: 0 });
    }

    #[test]
    fn test_reconfigure_keeps_position_when_item_unchanged() {
        let mut s = Scheduler::new();
        let mut tw = mounted(&mut s);
        run(&mut tw, &mut s, TICK * 5);
        let slower = TypewriterTiming {
            typing_speed: TICK * 2,
            ..timing()
        };
        tw.reconfigure(catalog(), slower, &mut s);
        assert_eq!(tw.phase(), TypewriterPhase::Typing { revealed: 5 });
        assert_eq!(tw.timing().typing_speed, TICK * 2);
    }

    #[test]
    fn test_reconfigure_restarts_when_item_changed() {
        let mut s = Scheduler::new();
        let mut tw = mounted(&mut s);
        run(&mut tw, &mut s, TICK * 5);
        let mut changed = catalog();
        changed[0].items[0].text = "find the dog".to_string();
        tw.reconfigure(changed, timing(), &mut s);
        assert_eq!(tw.phase(), TypewriterPhase::Typing { revealed: 0 });
        assert_eq!(tw.category().id, "detection");
    }

    #[test]
    fn test_cursor_blinks_with_period() {
        let mut s = Scheduler::new();
        let tw = mounted(&mut s);
        assert!(tw.cursor_visible(Duration::from_millis(0)));
        assert!(!tw.cursor_visible(Duration::from_millis(500)));
        assert!(tw.cursor_visible(Duration::from_millis(1000)));
    }
}
