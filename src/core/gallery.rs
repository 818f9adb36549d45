//! The gallery: mounted demo windows and everything that drives them
//!
//! Owns the configuration store, the visibility registry and the scheduler.
//! Frontends translate input into [`GalleryAction`]s and call
//! [`Gallery::advance`] once per frame with the wall-clock time that passed;
//! everything else (timer dispatch, config refresh, mount/unmount on
//! visibility changes) happens here.

use std::time::Duration;

use serde_json::{json, Value};

use crate::config::merge::merged;
use crate::config::{
    Category, ConfigStore, ConfigSubscription, WidgetKind, WindowChromeConfig,
};
use crate::core::demos::{Demo, DemoTable};
use crate::core::scheduler::{Fired, InstanceId, Scheduler, TimerEvent};
use crate::data::VisibilityRegistry;
use crate::theme::{ChromePresets, ChromeVariant, VariantResolution};
use crate::widgets::{TypewriterState, TypewriterTiming, WindowChromeState};

/// Input the gallery understands, already stripped of key codes and coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryAction {
    /// Move focus to the next mounted demo
    FocusNext,
    /// Advance the focused typewriter
    Advance,
    /// Focus a demo by its table index and advance it
    Click(usize),
    /// Switch the focused typewriter's category
    StepCategory { forward: bool },
    /// Start closing the focused window
    CloseFocused,
    /// Start closing a window by its table index (close button click)
    Close(usize),
    /// Patch the chrome variant to the next built-in one
    CycleVariant,
    /// Drop every session override
    ResetAll,
    /// Flip the visibility of a demo by its table index
    Toggle(usize),
    /// Pointer over a demo window (or none)
    Hover(Option<usize>),
}

/// One mounted demo: the chrome around it and the typewriter inside
#[derive(Debug)]
pub struct DemoInstance {
    pub id: InstanceId,
    /// Index into the demo table
    pub demo: usize,
    pub kind: WidgetKind,
    pub chrome: WindowChromeState,
    pub typewriter: TypewriterState,
    subscription: ConfigSubscription,
}

/// Resolved chrome settings shared by every demo window
struct ChromeSettings {
    config: WindowChromeConfig,
    resolution: VariantResolution,
    subscription: ConfigSubscription,
}

impl ChromeSettings {
    fn load(store: &ConfigStore) -> Self {
        let mut settings = Self {
            config: WindowChromeConfig::default(),
            resolution: ChromePresets::resolve(ChromeVariant::default().name()),
            subscription: store.subscribe(WidgetKind::WindowChrome),
        };
        settings.refresh(store);
        settings
    }

    fn refresh(&mut self, store: &ConfigStore) {
        self.config = store.get(WidgetKind::WindowChrome).window_chrome().value;
        self.resolution = ChromePresets::resolve(&self.config.variant);
    }
}

/// Catalog, starting category and timing for a typewriter demo of `kind`.
///
/// The demo table maps titles to typewriter kinds only; anything else gets
/// the interactive typewriter's configuration.
fn typewriter_setup(store: &ConfigStore, kind: WidgetKind) -> (Vec<Category>, String, TypewriterTiming) {
    let resolved = store.get(kind);
    match kind {
        WidgetKind::TypewriterMenu => {
            let config = resolved.typewriter_menu().value;
            (config.as_catalog(), "menu".to_string(), TypewriterTiming::from(&config))
        }
        _ => {
            let config = resolved.interactive_typewriter().value;
            let timing = TypewriterTiming::from(&config);
            (config.categories, config.default_category, timing)
        }
    }
}

pub struct Gallery {
    store: ConfigStore,
    registry: VisibilityRegistry,
    scheduler: Scheduler,
    demos: DemoTable,
    instances: Vec<DemoInstance>,
    chrome: ChromeSettings,
    focus: Option<usize>,
    hovered: Option<usize>,
}

impl Gallery {
    /// Register every demo as shown and mount them all
    pub fn new(demos: DemoTable, store: ConfigStore) -> Self {
        let mut registry = VisibilityRegistry::new();
        for demo in demos.demos() {
            registry.register(demo.title.clone());
        }
        let chrome = ChromeSettings::load(&store);

        let mut gallery = Self {
            store,
            registry,
            scheduler: Scheduler::new(),
            demos,
            instances: Vec::new(),
            chrome,
            focus: None,
            hovered: None,
        };
        gallery.sync_visibility();
        tracing::info!(demos = gallery.demos.len(), "gallery ready");
        gallery
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn registry(&self) -> &VisibilityRegistry {
        &self.registry
    }

    pub fn demos(&self) -> &[Demo] {
        self.demos.demos()
    }

    /// Mounted demos in table order
    pub fn instances(&self) -> &[DemoInstance] {
        &self.instances
    }

    pub fn instance(&self, demo: usize) -> Option<&DemoInstance> {
        self.instances.iter().find(|i| i.demo == demo)
    }

    pub fn chrome_config(&self) -> &WindowChromeConfig {
        &self.chrome.config
    }

    pub fn chrome_resolution(&self) -> &VariantResolution {
        &self.chrome.resolution
    }

    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Replace the override sub-tree for `kind` and refresh affected demos
    pub fn patch(&mut self, kind: WidgetKind, partial: Value) {
        self.store.patch(kind, partial);
        self.refresh_config();
    }

    /// Move the clock by `elapsed` and dispatch every timer that fell due.
    pub fn advance(&mut self, elapsed: Duration) {
        let until = self.scheduler.now() + elapsed;
        while let Some(fired) = self.scheduler.pop_due(until) {
            self.dispatch(fired);
        }
        self.scheduler.settle(until);
        self.refresh_config();
        self.sync_visibility();
    }

    /// Apply one input action; returns whether it changed anything
    pub fn apply(&mut self, action: GalleryAction) -> bool {
        tracing::debug!(?action, "action");
        let changed = match action {
            GalleryAction::FocusNext => self.focus_next(),
            GalleryAction::Advance => self.advance_focused(),
            GalleryAction::Click(demo) => {
                if self.instance(demo).is_some() {
                    self.focus = Some(demo);
                    self.advance_focused();
                    true
                } else {
                    false
                }
            }
            GalleryAction::StepCategory { forward } => {
                let focus = self.focus;
                match self.instances.iter_mut().find(|i| Some(i.demo) == focus) {
                    // Nothing to switch to; reselecting would restart typing
                    Some(instance) if instance.typewriter.categories().len() < 2 => false,
                    Some(instance) => {
                        instance.typewriter.step_category(forward, &mut self.scheduler);
                        true
                    }
                    None => false,
                }
            }
            GalleryAction::CloseFocused => match self.focus {
                Some(focus) => self.close(focus),
                None => false,
            },
            GalleryAction::Close(demo) => self.close(demo),
            GalleryAction::CycleVariant => {
                self.cycle_variant();
                true
            }
            GalleryAction::ResetAll => {
                tracing::info!("all overrides reset");
                self.store.reset_all();
                true
            }
            GalleryAction::Toggle(demo) => match self.demos.get(demo) {
                Some(d) => {
                    let title = d.title.clone();
                    self.registry.toggle(&title);
                    true
                }
                None => false,
            },
            GalleryAction::Hover(demo) => {
                let hovered = if self.chrome.config.animations.hover {
                    demo
                } else {
                    None
                };
                let changed = self.hovered != hovered;
                self.hovered = hovered;
                changed
            }
        };

        self.refresh_config();
        self.sync_visibility();
        changed
    }

    fn dispatch(&mut self, fired: Fired) {
        let Some(pos) = self.instances.iter().position(|i| i.id == fired.owner) else {
            tracing::trace!(owner = fired.owner.raw(), event = ?fired.event, "timer for unmounted instance dropped");
            return;
        };
        let instance = &mut self.instances[pos];

        match fired.event {
            TimerEvent::MountComplete | TimerEvent::CloseStage(_) | TimerEvent::CloseComplete => {
                instance
                    .chrome
                    .on_timer(fired.timer, fired.event, &mut self.registry);
            }
            _ => {
                instance
                    .typewriter
                    .on_timer(fired.timer, fired.event, &mut self.scheduler);
            }
        }

        if instance.chrome.is_closed() {
            self.unmount_at(pos);
        }
    }

    fn focus_next(&mut self) -> bool {
        if self.instances.is_empty() {
            return false;
        }
        let next = match self.focus.and_then(|f| self.instances.iter().position(|i| i.demo == f)) {
            Some(pos) => (pos + 1) % self.instances.len(),
            None => 0,
        };
        let demo = self.instances[next].demo;
        let changed = self.focus != Some(demo);
        self.focus = Some(demo);
        changed
    }

    fn advance_focused(&mut self) -> bool {
        match self.focus {
            Some(focus) => match self.instances.iter_mut().find(|i| i.demo == focus) {
                Some(instance) => instance.typewriter.advance(&mut self.scheduler),
                None => false,
            },
            None => false,
        }
    }

    fn close(&mut self, demo: usize) -> bool {
        let params = &self.chrome.resolution.params;
        let Some(instance) = self.instances.iter_mut().find(|i| i.demo == demo) else {
            return false;
        };
        if !instance.chrome.close_button_available(params) {
            tracing::debug!(title = instance.chrome.title(), "window has no close button");
            return false;
        }
        instance.chrome.request_close(&mut self.scheduler)
    }

    /// Patch `window_chrome.variant` to the next built-in variant, keeping any
    /// other session overrides for the chrome.
    fn cycle_variant(&mut self) {
        let current = ChromeVariant::from_name(&self.chrome.config.variant).unwrap_or_default();
        let next = current.next();
        let base = self
            .store
            .override_for(WidgetKind::WindowChrome)
            .cloned()
            .unwrap_or_else(|| json!({}));
        let partial = merged(&base, &json!({ "variant": next.name() }));
        tracing::info!(variant = next.name(), "chrome variant cycled");
        self.store.patch(WidgetKind::WindowChrome, partial);
    }

    /// Re-resolve configuration for everything whose kind changed
    fn refresh_config(&mut self) {
        if self.chrome.subscription.poll_changed() {
            self.chrome.refresh(&self.store);
        }

        for instance in &mut self.instances {
            if !instance.subscription.poll_changed() {
                continue;
            }
            let (catalog, _, timing) = typewriter_setup(&self.store, instance.kind);
            instance
                .typewriter
                .reconfigure(catalog, timing, &mut self.scheduler);
        }
    }

    /// Mount newly shown demos and unmount hidden ones
    fn sync_visibility(&mut self) {
        for demo in 0..self.demos.len() {
            let visible = self
                .demos
                .get(demo)
                .is_some_and(|d| self.registry.is_visible(&d.title));
            let mounted = self.instances.iter().position(|i| i.demo == demo);

            match (visible, mounted) {
                (true, None) => self.mount(demo),
                (false, Some(pos)) => self.unmount_at(pos),
                _ => {}
            }
        }

        if self.focus.map_or(true, |f| self.instance(f).is_none()) {
            self.focus = self.instances.first().map(|i| i.demo);
        }
    }

    fn mount(&mut self, demo: usize) {
        let Some(entry) = self.demos.get(demo) else {
            return;
        };
        let (title, kind) = (entry.title.clone(), entry.kind);

        let id = self.scheduler.allocate_instance();
        let chrome = WindowChromeState::mount(
            id,
            title.clone(),
            self.chrome.config.animations.mount,
            &mut self.scheduler,
        );
        let (catalog, category, timing) = typewriter_setup(&self.store, kind);
        let typewriter = TypewriterState::mount(id, catalog, &category, timing, &mut self.scheduler);

        let instance = DemoInstance {
            id,
            demo,
            kind,
            chrome,
            typewriter,
            subscription: self.store.subscribe(kind),
        };
        let pos = self
            .instances
            .iter()
            .position(|i| i.demo > demo)
            .unwrap_or(self.instances.len());
        self.instances.insert(pos, instance);
        tracing::info!(title = %title, instance = id.raw(), "demo mounted");
    }

    fn unmount_at(&mut self, pos: usize) {
        let instance = self.instances.remove(pos);
        let cancelled = self.scheduler.cancel_owner(instance.id);
        tracing::info!(
            title = instance.chrome.title(),
            instance = instance.id.raw(),
            cancelled,
            "demo unmounted"
        );
    }
}
