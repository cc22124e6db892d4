//! The dragon tour state machine.
//!
//! One generic `advance` walks the `TourContent` table:
//!
//! 1. queued override lines are popped first,
//! 2. then a finishing override line runs its follow-up action,
//! 3. then the intro script moves forward,
//! 4. and otherwise the segment ends.
//!
//! Every shown line bumps `generation`. Advance timers carry the generation
//! they were scheduled under and are dropped on mismatch, so a skip followed
//! by a late timer never advances twice. Flights and tooltip hides carry the
//! same kind of token.

use std::collections::{BTreeMap, VecDeque};

use glam::Vec2;
use serde::Serialize;
use keep_engine::{
    EngineContext, Easing, Entity, EntityId, Scene, ScrollAnim, SignalQueue, SpriteComponent,
    TimerQueue, Tween, TweenId, TweenLoop, TweenState, Viewport,
};

use crate::content::{
    DialogueLine, FollowupAction, SayRequest, Stop, Tooltip, TourContent, Waypoint,
    FINALE_STEP,
};
use crate::dialogue::{DialoguePresenter, PresenterEvent};
use crate::signals::Signal;

/// Tween completion ids for flights are `ARRIVAL_BASE + waypoint`.
const ARRIVAL_BASE: u32 = 100;

// Off-screen pose the entry flight starts from.
const ENTRY_X: f32 = -200.0;
const ENTRY_Y: f32 = 100.0;
const ENTRY_SCALE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TourState {
    Idle,
    Entering,
    /// Resting at waypoint n: 0 home, 2..=7 beside a safe, 8 the farewell pose.
    AtWaypoint(u8),
    Moving(u8),
    AwaitingOverrideQueue,
    TourComplete,
}

/// Which script the line on screen belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment {
    Silent,
    Intro,
    Override,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TourTimer {
    Advance { generation: u64 },
    HideTooltip { tooltip: Tooltip, epoch: u32 },
    ShowTooltip { tooltip: Tooltip, step: u8 },
}

#[derive(Debug, Clone, Copy)]
struct Flight {
    waypoint: u8,
    /// Dialogue generation at take-off. A newer line means the arrival
    /// script was superseded.
    generation: u64,
}

pub struct TourController {
    content: TourContent,
    state: TourState,
    /// Gating step: the safe that may be opened next. 8 after the last safe.
    step: u8,
    /// Last waypoint reached.
    at: u8,
    segment: Segment,
    script_index: usize,
    queue: VecDeque<DialogueLine>,
    pending_action: Option<FollowupAction>,
    /// Follow-up that finished speaking mid-entry; runs once the dragon is home.
    entry_action: Option<FollowupAction>,
    presenter: DialoguePresenter,
    generation: u64,
    timers: TimerQueue<TourTimer>,
    tweens: TweenState,
    bob: Option<TweenId>,
    flight: Option<Flight>,
    dragon: Option<EntityId>,
    viewport: Viewport,
    scroll: Option<ScrollAnim>,
    scroll_offset: f32,
    scroll_out: Option<f32>,
    tooltip_epochs: BTreeMap<Tooltip, u32>,
    wings: [SpriteComponent; 2],
    wings_up: bool,
    wing_elapsed: f32,
    completed: bool,
}

impl TourController {
    pub fn new(content: TourContent, viewport: Viewport) -> Self {
        let mut presenter = DialoguePresenter::new(content.config.typing_interval_ms);
        presenter.scale = content.config.bubble_scale;
        Self {
            content,
            state: TourState::Idle,
            step: 1,
            at: 0,
            segment: Segment::Silent,
            script_index: 0,
            queue: VecDeque::new(),
            pending_action: None,
            entry_action: None,
            presenter,
            generation: 0,
            timers: TimerQueue::new(),
            tweens: TweenState::new(),
            bob: None,
            flight: None,
            dragon: None,
            viewport,
            scroll: None,
            scroll_offset: 0.0,
            scroll_out: None,
            tooltip_epochs: BTreeMap::new(),
            wings: [SpriteComponent::cell(0.0, 0.0), SpriteComponent::cell(1.0, 0.0)],
            wings_up: true,
            wing_elapsed: 0.0,
            completed: false,
        }
    }

    /// Sprites for the two wing poses.
    pub fn set_wing_sprites(&mut self, up: SpriteComponent, down: SpriteComponent) {
        self.wings = [up, down];
    }

    /// Spawn the dragon off-screen and fly it home. Only the first call counts.
    pub fn start(&mut self, ctx: &mut EngineContext) {
        if self.state != TourState::Idle {
            return;
        }
        let id = ctx.next_id();
        let width = self.content.config.dragon_width;
        ctx.scene.spawn(
            Entity::new(id)
                .with_tag("dragon")
                .with_pos(Vec2::new(ENTRY_X, ENTRY_Y))
                .with_size(Vec2::splat(width * ENTRY_SCALE))
                .with_sprite(self.wings[0].clone()),
        );
        self.dragon = Some(id);
        self.state = TourState::Entering;

        let home = self.content.home;
        let duration = self.content.config.entry_duration_ms as f32 / 1000.0;
        self.fly(0, home, duration, &mut ctx.scene);
        log::debug!("tour: entering");
    }

    /// User impatience: advance now if a line is on screen.
    pub fn skip(&mut self, scene: &mut Scene, bus: &mut SignalQueue<Signal>) -> bool {
        if self.state == TourState::TourComplete || !self.presenter.is_visible() {
            return false;
        }
        log::debug!("tour: skip at generation {}", self.generation);
        self.advance(scene, bus);
        true
    }

    /// Speak an override line, whatever the tour was doing. The entry flight
    /// keeps going underneath.
    pub fn say(&mut self, request: SayRequest, bus: &mut SignalQueue<Signal>) {
        if self.state == TourState::TourComplete {
            log::debug!("tour: say after completion ignored");
            return;
        }
        if let Some(action) = request.next_action {
            self.step = self.step.max(action.step());
        }
        self.pending_action = request.next_action;
        self.queue = request.then.iter().cloned().collect();
        self.segment = Segment::Override;
        if self.state != TourState::Entering {
            self.state = TourState::AwaitingOverrideQueue;
        }
        log::debug!(
            "tour: say with {} queued, action {:?}",
            self.queue.len(),
            request.next_action.map(|a| a.tag())
        );
        self.show_line(request.lead_line(), bus);
    }

    /// Advance timers, tweens, the bubble, page scroll and the wing flap.
    pub fn update(&mut self, dt: f32, scene: &mut Scene, bus: &mut SignalQueue<Signal>) {
        for event in self.presenter.tick(dt) {
            match event {
                PresenterEvent::Complete => {
                    let cfg = &self.content.config;
                    let delay = if self.is_last_line() {
                        cfg.last_line_delay_ms
                    } else {
                        cfg.advance_delay_ms
                    };
                    let generation = self.generation;
                    self.timers.schedule_ms(delay, TourTimer::Advance { generation });
                }
                PresenterEvent::TypingStarted | PresenterEvent::TypingComplete => {
                    log::trace!("dialogue: {:?}", event);
                }
            }
        }

        self.tweens.tick(dt, scene);
        let arrivals: Vec<u32> = self.tweens.drain_completed().collect();
        for id in arrivals {
            if let Some(waypoint) = id.checked_sub(ARRIVAL_BASE) {
                self.on_arrival(waypoint as u8, scene, bus);
            }
        }

        for timer in self.timers.tick(dt) {
            match timer {
                TourTimer::Advance { generation } if generation == self.generation => {
                    self.advance(scene, bus);
                }
                TourTimer::Advance { .. } => log::trace!("tour: stale advance dropped"),
                TourTimer::HideTooltip { tooltip, epoch } => {
                    if self.tooltip_epochs.get(&tooltip) == Some(&epoch) {
                        bus.publish(Signal::HideTooltip(tooltip));
                    }
                }
                TourTimer::ShowTooltip { tooltip, step } => {
                    if step == self.step && self.state != TourState::TourComplete {
                        self.show_tooltip(tooltip, bus);
                    }
                }
            }
        }

        if let Some(anim) = self.scroll.as_mut() {
            let offset = anim.tick(dt);
            self.scroll_offset = offset;
            self.scroll_out = Some(offset);
            if anim.is_finished() {
                self.scroll = None;
            }
        }

        self.flap(dt, scene);
    }

    /// New window metrics. A resting dragon is re-posed; a flying one snaps on arrival.
    pub fn set_viewport(&mut self, viewport: Viewport, scene: &mut Scene) {
        self.viewport = viewport;
        self.scroll_offset = self.scroll_offset.min(viewport.max_scroll());
        if self.flight.is_none() && self.state != TourState::Idle {
            self.snap_to(self.at, scene);
            self.start_bob(scene);
        }
    }

    /// Scroll position reported by the page. Ignored while a tour scroll runs.
    pub fn set_scroll_offset(&mut self, offset: f32) {
        if self.scroll.is_none() {
            self.scroll_offset = offset.clamp(0.0, self.viewport.max_scroll());
        }
    }

    /// Scroll offset produced since the last call, if any.
    pub fn take_scroll_offset(&mut self) -> Option<f32> {
        self.scroll_out.take()
    }

    pub fn state(&self) -> TourState {
        self.state
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn presenter(&self) -> &DialoguePresenter {
        &self.presenter
    }

    #[cfg(test)]
    pub fn dragon(&self) -> Option<EntityId> {
        self.dragon
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    #[cfg(test)]
    pub fn script_index(&self) -> usize {
        self.script_index
    }

    #[cfg(test)]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    fn advance(&mut self, scene: &mut Scene, bus: &mut SignalQueue<Signal>) {
        if self.state == TourState::TourComplete {
            return;
        }

        if let Some(line) = self.queue.pop_front() {
            if line.followup.is_some() {
                self.pending_action = line.followup;
            }
            if self.state != TourState::Entering {
                self.state = TourState::AwaitingOverrideQueue;
            }
            self.show_line(line, bus);
            return;
        }

        match self.segment {
            Segment::Override => {
                self.segment = Segment::Silent;
                let action = self.pending_action.take();
                if self.state == TourState::Entering {
                    self.hide_dialogue();
                    self.entry_action = action.or(self.entry_action);
                    log::debug!("tour: {:?} held until the dragon is home", self.entry_action.map(|a| a.tag()));
                    return;
                }
                match action {
                    Some(action) => self.execute(action, scene, bus),
                    None => self.finish_segment(bus),
                }
            }
            Segment::Intro if self.script_index + 1 < self.content.intro.len() => {
                self.script_index += 1;
                let line = self.content.intro[self.script_index].clone();
                self.show_line(line, bus);
            }
            _ => self.finish_segment(bus),
        }
    }

    fn finish_segment(&mut self, bus: &mut SignalQueue<Signal>) {
        self.hide_dialogue();
        self.segment = Segment::Silent;

        if self.at != FINALE_STEP {
            self.state = TourState::AtWaypoint(self.at);
            log::debug!("tour: waiting at waypoint {} for safe {}", self.at, self.step);
            return;
        }

        self.state = TourState::TourComplete;
        self.timers.clear();
        if !self.completed {
            self.completed = true;
            bus.publish_all(Tooltip::all().map(Signal::HideTooltip));
            bus.publish(Signal::TourCompleted);
            log::info!("tour: completed");
        }
    }

    fn execute(&mut self, action: FollowupAction, scene: &mut Scene, bus: &mut SignalQueue<Signal>) {
        self.hide_dialogue();
        let Some(stop) = self.content.stop_for(action).cloned() else {
            log::warn!("tour: no stop for {}", action.tag());
            self.finish_segment(bus);
            return;
        };
        let waypoint = action.step();
        self.state = TourState::Moving(waypoint);

        let target = self.viewport.scroll_to_fraction(stop.scroll_fraction);
        let duration = self.content.config.scroll_duration_ms as f32 / 1000.0;
        self.scroll = Some(ScrollAnim::new(self.scroll_offset, target, duration));

        let flight = stop.waypoint.duration_ms as f32 / 1000.0;
        self.fly(waypoint, stop.waypoint, flight, scene);
        log::debug!("tour: {} (scroll to {:.0}px)", action.tag(), target);
    }

    fn on_arrival(&mut self, waypoint: u8, scene: &mut Scene, bus: &mut SignalQueue<Signal>) {
        let flight = match self.flight {
            Some(f) if f.waypoint == waypoint => f,
            _ => return,
        };
        self.flight = None;
        self.at = waypoint;
        self.snap_to(waypoint, scene);
        self.start_bob(scene);

        if self.state == TourState::Entering {
            self.land_home(scene, bus);
            return;
        }

        if flight.generation != self.generation {
            log::debug!("tour: arrived at {} with dialogue already running", waypoint);
            return;
        }

        let Some(stop) = self.stop(waypoint).cloned() else {
            self.finish_segment(bus);
            return;
        };
        self.state = TourState::AtWaypoint(waypoint);
        let mut lines = stop.arrival.into_iter();
        match lines.next() {
            Some(first) => {
                self.pending_action = first.followup;
                self.queue = lines.collect();
                self.segment = Segment::Override;
                self.state = TourState::AwaitingOverrideQueue;
                self.show_line(first, bus);
            }
            None => self.finish_segment(bus),
        }
        if let Some(tooltip) = stop.tooltip {
            self.timers.schedule_ms(
                self.content.config.tooltip_delay_ms,
                TourTimer::ShowTooltip { tooltip, step: self.step },
            );
        }
    }

    /// End of the entry flight. Whatever was said on the way in takes
    /// precedence over the intro.
    fn land_home(&mut self, scene: &mut Scene, bus: &mut SignalQueue<Signal>) {
        if let Some(action) = self.entry_action.take() {
            self.state = TourState::AtWaypoint(0);
            self.execute(action, scene, bus);
        } else if self.segment == Segment::Override {
            self.state = TourState::AwaitingOverrideQueue;
        } else {
            self.state = TourState::AtWaypoint(0);
            self.segment = Segment::Intro;
            self.script_index = 0;
            if let Some(line) = self.content.intro.first().cloned() {
                self.show_line(line, bus);
            }
        }
    }

    fn show_line(&mut self, line: DialogueLine, bus: &mut SignalQueue<Signal>) {
        self.generation += 1;
        self.presenter.show(&line.text);
        if let Some(tooltip) = line.tooltip {
            self.show_tooltip(tooltip, bus);
        }
    }

    fn hide_dialogue(&mut self) {
        self.generation += 1;
        self.presenter.hide();
    }

    /// Show a tooltip and schedule its auto-hide. A later show of the same
    /// tooltip supersedes the earlier hide.
    fn show_tooltip(&mut self, tooltip: Tooltip, bus: &mut SignalQueue<Signal>) {
        bus.publish(Signal::ShowTooltip(tooltip));
        let epoch = self.tooltip_epochs.entry(tooltip).or_insert(0);
        *epoch += 1;
        let epoch = *epoch;
        self.timers.schedule_ms(
            self.content.config.tooltip_hide_ms,
            TourTimer::HideTooltip { tooltip, epoch },
        );
    }

    /// The line on screen is the last of its segment.
    fn is_last_line(&self) -> bool {
        if !self.queue.is_empty() {
            return false;
        }
        match self.segment {
            Segment::Intro => self.script_index + 1 >= self.content.intro.len(),
            Segment::Override => self.pending_action.is_none(),
            Segment::Silent => true,
        }
    }

    fn stop(&self, waypoint: u8) -> Option<&Stop> {
        if waypoint == FINALE_STEP {
            Some(&self.content.finale)
        } else {
            self.content.panel(waypoint)?.approach.as_ref()
        }
    }

    fn waypoint(&self, index: u8) -> Waypoint {
        if index == 0 {
            return self.content.home;
        }
        self.stop(index)
            .map(|s| s.waypoint)
            .unwrap_or(self.content.home)
    }

    fn fly(&mut self, index: u8, to: Waypoint, duration: f32, scene: &mut Scene) {
        let Some(id) = self.dragon else { return };
        let Some(entity) = scene.get(id) else { return };
        let (from_pos, from_width) = (entity.pos, entity.size.x);

        self.tweens.remove_entity(id);
        self.bob = None;

        let to_pos = to.pos.resolve(&self.viewport);
        let to_width = self.content.config.dragon_width * to.scale;
        self.tweens.add(
            id,
            Tween::position(from_pos, to_pos, duration, to.easing)
                .with_on_complete(ARRIVAL_BASE + index as u32),
        );
        self.tweens
            .add(id, Tween::size(from_width, to_width, duration, to.easing));
        self.flight = Some(Flight {
            waypoint: index,
            generation: self.generation,
        });
    }

    fn snap_to(&mut self, index: u8, scene: &mut Scene) {
        let waypoint = self.waypoint(index);
        let Some(entity) = self.dragon.and_then(|id| scene.get_mut(id)) else {
            return;
        };
        entity.pos = waypoint.pos.resolve(&self.viewport);
        entity.size = Vec2::splat(self.content.config.dragon_width * waypoint.scale);
    }

    /// Idle hover: y ping-pongs by the configured amplitude, one full cycle per period.
    fn start_bob(&mut self, scene: &mut Scene) {
        let Some(id) = self.dragon else { return };
        if let Some(bob) = self.bob.take() {
            self.tweens.remove(bob);
        }
        let Some(entity) = scene.get(id) else { return };
        let y = entity.pos.y;
        let cfg = &self.content.config;
        let amplitude = self.viewport.vh(cfg.bob_amplitude_vh);
        let half_period = cfg.bob_period_ms as f32 / 2000.0;
        self.bob = Some(self.tweens.add(
            id,
            Tween::position_y(y, y + amplitude, half_period, Easing::SineInOut)
                .with_loop(TweenLoop::PingPong),
        ));
    }

    fn flap(&mut self, dt: f32, scene: &mut Scene) {
        let interval = self.content.config.wing_flap_ms as f32 / 1000.0;
        if interval <= 0.0 {
            return;
        }
        self.wing_elapsed += dt;
        let before = self.wings_up;
        while self.wing_elapsed >= interval {
            self.wing_elapsed -= interval;
            self.wings_up = !self.wings_up;
        }
        if before == self.wings_up {
            return;
        }
        let sprite = self.wings[if self.wings_up { 0 } else { 1 }].clone();
        if let Some(entity) = self.dragon.and_then(|id| scene.get_mut(id)) {
            entity.sprite = Some(sprite);
        }
    }
}
