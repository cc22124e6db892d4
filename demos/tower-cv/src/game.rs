use keep_engine::*;
use serde::Serialize;

use crate::content::{PanelContent, TourContent, Tooltip, PANEL_COUNT};
use crate::modal::DetailModal;
use crate::panels::{ClickOutcome, PanelSet};
use crate::signals::{Signal, TooltipBoard};
use crate::tour::{TourController, TourState};

const FIXED_DT: f32 = 1.0 / 60.0;

// Game event kinds (Rust → page)
const EVENT_TOOLTIP: f32 = 1.0;
const EVENT_TOUR_COMPLETED: f32 = 2.0;
const EVENT_SCROLL_TO: f32 = 3.0;
const EVENT_MODAL: f32 = 4.0;
const EVENT_PANEL: f32 = 5.0;

// Custom event kinds (page → Rust)
const CUSTOM_VIEWPORT: u32 = 1;
const CUSTOM_SAFE_CLICK: u32 = 2;
const CUSTOM_MODAL_CLOSE: u32 = 3;
const CUSTOM_SKIP: u32 = 4;
const CUSTOM_SCROLL: u32 = 5;

/// The tower page: owns the tour, the safes, the modal and the signal channel
/// between them. Every signal is routed here within the tick it was published.
pub struct TowerCv {
    content: TourContent,
    tour: TourController,
    panels: PanelSet,
    modal: DetailModal,
    tooltips: TooltipBoard,
    bus: SignalQueue<Signal>,
    sprites: SpriteRegistry,
    viewport: Viewport,
    started: bool,
}

impl TowerCv {
    pub fn new() -> Self {
        Self::with_content(TourContent::builtin())
    }

    pub fn with_content(content: TourContent) -> Self {
        let viewport = Viewport::default();
        let mut game = Self {
            tour: TourController::new(content.clone(), viewport),
            panels: PanelSet::from_content(&content),
            content,
            modal: DetailModal::new(),
            tooltips: TooltipBoard::new(),
            bus: SignalQueue::new(),
            sprites: SpriteRegistry::new(),
            viewport,
            started: false,
        };
        game.apply_sprites();
        game
    }

    fn apply_sprites(&mut self) {
        let up = self.sprites.get_or("dragon_wings_up", SpriteComponent::cell(0.0, 0.0));
        let down = self.sprites.get_or("dragon_wings_down", SpriteComponent::cell(1.0, 0.0));
        self.tour.set_wing_sprites(up, down);
    }

    fn handle_input(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        // Presses in one frame count as a single skip.
        if input.has_press() {
            self.tour.skip(&mut ctx.scene, &mut self.bus);
        }
        for event in input.iter() {
            match *event {
                InputEvent::PointerDown { .. } | InputEvent::KeyDown { .. } => {}
                InputEvent::Custom { kind, a, b, c } => match kind {
                    CUSTOM_VIEWPORT => {
                        self.viewport = Viewport::new(a, b, c);
                        self.tour.set_viewport(self.viewport, &mut ctx.scene);
                    }
                    CUSTOM_SAFE_CLICK => self.click_safe(a as u8, ctx),
                    CUSTOM_MODAL_CLOSE => self.close_modal(ctx),
                    CUSTOM_SKIP => {
                        self.tour.skip(&mut ctx.scene, &mut self.bus);
                    }
                    CUSTOM_SCROLL => self.tour.set_scroll_offset(a),
                    other => log::debug!("ignoring custom event {}", other),
                },
            }
        }
    }

    fn click_safe(&mut self, panel: u8, ctx: &mut EngineContext) {
        match self.panels.click(panel, &mut self.bus) {
            ClickOutcome::Opened(n) => {
                if let Some(step) = self.content.panel(n) {
                    self.modal.open(n, step.content.clone());
                }
                ctx.emit_event(GameEvent::new(EVENT_PANEL, n as f32, 1.0, 0.0));
                ctx.emit_event(GameEvent::new(EVENT_MODAL, n as f32, 0.0, 0.0));
            }
            ClickOutcome::Closed(n) => {
                self.modal.close();
                Self::emit_closed(n, ctx);
            }
            ClickOutcome::Ignored => {}
        }
    }

    /// Backdrop or close button on the detail modal.
    fn close_modal(&mut self, ctx: &mut EngineContext) {
        if !self.modal.is_open() {
            log::debug!("tower-cv: modal close with nothing open");
            return;
        }
        self.modal.close();
        if let Some(n) = self.panels.close_active(&mut self.bus) {
            Self::emit_closed(n, ctx);
        }
    }

    fn emit_closed(panel: u8, ctx: &mut EngineContext) {
        ctx.emit_event(GameEvent::new(EVENT_PANEL, panel as f32, 0.0, 0.0));
        ctx.emit_event(GameEvent::new(EVENT_MODAL, 0.0, 0.0, 0.0));
    }

    /// Deliver pending signals. Handlers may publish more; those are
    /// delivered in later rounds of the same tick.
    fn route_signals(&mut self, ctx: &mut EngineContext) {
        for _ in 0..SignalQueue::<Signal>::MAX_ROUNDS {
            if self.bus.is_empty() {
                return;
            }
            for signal in self.bus.drain() {
                log::debug!("signal: {}", signal.name());
                match signal {
                    Signal::ShowTooltip(tooltip) => self.set_tooltip(tooltip, true, ctx),
                    Signal::HideTooltip(tooltip) => self.set_tooltip(tooltip, false, ctx),
                    Signal::DragonSay(request) => {
                        self.tour.say(request, &mut self.bus);
                        self.panels.set_step(self.tour.step());
                    }
                    Signal::TourCompleted => {
                        self.panels.unlock_all();
                        ctx.emit_event(GameEvent::new(EVENT_TOUR_COMPLETED, 0.0, 0.0, 0.0));
                    }
                }
            }
        }
        if !self.bus.is_empty() {
            log::warn!("{} signals left undelivered this tick", self.bus.len());
        }
    }

    fn set_tooltip(&mut self, tooltip: Tooltip, show: bool, ctx: &mut EngineContext) {
        let signal = if show {
            Signal::ShowTooltip(tooltip)
        } else {
            Signal::HideTooltip(tooltip)
        };
        if self.tooltips.apply(&signal) {
            let flag = if show { 1.0 } else { 0.0 };
            ctx.emit_event(GameEvent::new(EVENT_TOOLTIP, tooltip.code(), flag, 0.0));
        }
    }

    fn snapshot(&self) -> UiSnapshot<'_> {
        let presenter = self.tour.presenter();
        UiSnapshot {
            tour: TourSnapshot {
                state: self.tour.state(),
                step: self.tour.step(),
                complete: self.tour.is_complete(),
                scroll: self.tour.scroll_offset(),
            },
            dialogue: DialogueSnapshot {
                text: presenter.full_text(),
                revealed: presenter.revealed_text(),
                visible: presenter.is_visible(),
                typing: presenter.is_typing(),
                scale: presenter.scale,
            },
            tooltips: self
                .tooltips
                .iter()
                .map(|(tooltip, visible)| TooltipSnapshot {
                    name: tooltip.stem(),
                    visible,
                })
                .collect(),
            panels: (1..=PANEL_COUNT as u8)
                .map(|n| PanelSnapshot {
                    panel: n,
                    open: self.panels.is_open(n),
                    interactable: self.panels.interactable(n),
                })
                .collect(),
            modal: self.modal.panel().zip(self.modal.content()).map(|(panel, content)| {
                ModalSnapshot { panel, content }
            }),
        }
    }
}

impl Default for TowerCv {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for TowerCv {
    fn config(&self) -> GameConfig {
        GameConfig {
            fixed_dt: FIXED_DT,
            world_width: self.viewport.width,
            world_height: self.viewport.height,
            max_instances: 8,
            max_events: 64,
        }
    }

    fn init(&mut self, _ctx: &mut EngineContext) {
        log::info!(
            "tower-cv: {} intro lines, {} safes, tour {}",
            self.content.intro.len(),
            self.content.panels.len(),
            if self.content.config.enabled { "on" } else { "off" }
        );
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        // First step starts the flight so content loaded after init still applies.
        if !self.started {
            self.started = true;
            if self.content.config.enabled {
                self.tour.start(ctx);
            }
        }

        self.handle_input(ctx, input);
        self.tour.update(FIXED_DT, &mut ctx.scene, &mut self.bus);
        self.route_signals(ctx);

        if let Some(offset) = self.tour.take_scroll_offset() {
            ctx.emit_event(GameEvent::new(EVENT_SCROLL_TO, offset, 0.0, 0.0));
        }
    }

    fn load_manifest(&mut self, manifest: &AssetManifest) {
        self.sprites = SpriteRegistry::from_manifest(manifest);
        self.apply_sprites();
    }

    fn load_content(&mut self, json: &str) {
        if self.started {
            log::warn!("tower-cv: content arrived after the tour started, ignored");
            return;
        }
        match TourContent::from_json(json) {
            Ok(content) => {
                log::info!("tower-cv: loaded content with {} intro lines", content.intro.len());
                self.tour = TourController::new(content.clone(), self.viewport);
                self.panels = PanelSet::from_content(&content);
                self.content = content;
                self.apply_sprites();
            }
            Err(e) => log::warn!("tower-cv: keeping built-in content: {}", e),
        }
    }

    fn ui_state(&self) -> Option<String> {
        match serde_json::to_string(&self.snapshot()) {
            Ok(json) => Some(json),
            Err(e) => {
                log::warn!("tower-cv: snapshot failed: {}", e);
                None
            }
        }
    }
}

#[derive(Serialize)]
struct UiSnapshot<'a> {
    tour: TourSnapshot,
    dialogue: DialogueSnapshot<'a>,
    tooltips: Vec<TooltipSnapshot>,
    panels: Vec<PanelSnapshot>,
    modal: Option<ModalSnapshot<'a>>,
}

#[derive(Serialize)]
struct TourSnapshot {
    state: TourState,
    step: u8,
    complete: bool,
    scroll: f32,
}

#[derive(Serialize)]
struct DialogueSnapshot<'a> {
    text: &'a str,
    revealed: &'a str,
    visible: bool,
    typing: bool,
    scale: f32,
}

#[derive(Serialize)]
struct TooltipSnapshot {
    name: String,
    visible: bool,
}

#[derive(Serialize)]
struct PanelSnapshot {
    panel: u8,
    open: bool,
    interactable: bool,
}

#[derive(Serialize)]
struct ModalSnapshot<'a> {
    panel: u8,
    #[serde(flatten)]
    content: &'a PanelContent,
}
