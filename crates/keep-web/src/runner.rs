use keep_engine::{
    build_render_buffer, AssetManifest, EngineContext, FixedTimestep, Game, GameConfig,
    InputEvent, InputQueue, ProtocolLayout, RenderBuffer,
};
use keep_engine::bridge::protocol::HEADER_FLOATS;

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]` (see `export_game!`), because wasm-bindgen
/// cannot export generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    render_buffer: RenderBuffer,
    timestep: FixedTimestep,
    config: GameConfig,
    layout: ProtocolLayout,
    initialized: bool,
    frame: u32,
    header: [f32; HEADER_FLOATS],
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let timestep = FixedTimestep::new(config.fixed_dt);
        let layout = ProtocolLayout::from_config(&config);
        let render_buffer = RenderBuffer::with_capacity(config.max_instances);

        Self {
            game,
            ctx: EngineContext::new(),
            input: InputQueue::new(),
            render_buffer,
            timestep,
            layout,
            config,
            initialized: false,
            frame: 0,
            header: [0.0; HEADER_FLOATS],
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.config = self.game.config();
        self.layout = ProtocolLayout::from_config(&self.config);
        self.timestep = FixedTimestep::new(self.config.fixed_dt);
        self.game.init(&mut self.ctx);
        self.initialized = true;
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Parse and hand an asset manifest to the game. Bad JSON is logged and ignored.
    pub fn load_manifest(&mut self, json: &str) {
        match AssetManifest::from_json(json) {
            Ok(manifest) => self.game.load_manifest(&manifest),
            Err(e) => log::warn!("asset manifest rejected: {}", e),
        }
    }

    /// Hand game-specific JSON content to the game.
    pub fn load_content(&mut self, json: &str) {
        self.game.load_content(json);
    }

    /// Run one frame tick: update game, build render buffer, pack header.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        self.ctx.clear_frame_data();

        // Input is delivered to the first fixed step only, so a click is
        // never seen twice when a slow frame runs several steps. With zero
        // steps the input stays queued for the next frame.
        let steps = self.timestep.accumulate(dt);
        let empty = InputQueue::new();
        for step in 0..steps {
            let input = if step == 0 { &self.input } else { &empty };
            self.game.update(&mut self.ctx, input);
        }
        if steps > 0 {
            self.input.drain();
        }

        build_render_buffer(self.ctx.scene.iter(), &mut self.render_buffer);

        // Buffer capacities are fixed at init; only the world size follows the window.
        let config = self.game.config();
        self.config.world_width = config.world_width;
        self.config.world_height = config.world_height;

        if self.ctx.events.len() > self.layout.max_events {
            log::warn!(
                "{} game events this frame, host reads only {}",
                self.ctx.events.len(),
                self.layout.max_events
            );
        }

        self.frame = self.frame.wrapping_add(1);
        self.header = self.layout.header(
            self.frame,
            self.render_buffer.instances.len(),
            self.ctx.events.len(),
            &self.config,
        );
    }

    /// JSON snapshot of DOM-rendered state, if the game exposes one.
    pub fn ui_state(&self) -> Option<String> {
        self.game.ui_state()
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    // ---- Pointer accessors for direct WASM memory reads ----

    pub fn header_ptr(&self) -> *const f32 {
        self.header.as_ptr()
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.render_buffer.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count()
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len().min(self.layout.max_events) as u32
    }

    pub fn world_width(&self) -> f32 {
        self.config.world_width
    }

    pub fn world_height(&self) -> f32 {
        self.config.world_height
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_instances(&self) -> u32 {
        self.layout.max_instances as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keep_engine::{Entity, GameEvent, SpriteComponent};

    /// Counts presses seen by `update` and echoes each as a game event.
    struct PressCounter {
        presses: u32,
        updates: u32,
    }

    impl Game for PressCounter {
        fn init(&mut self, ctx: &mut EngineContext) {
            let id = ctx.next_id();
            ctx.scene.spawn(Entity::new(id).with_sprite(SpriteComponent::default()));
        }

        fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
            self.updates += 1;
            for ev in input.iter() {
                if ev.is_press() {
                    self.presses += 1;
                    ctx.emit_event(GameEvent::new(1.0, self.presses as f32, 0.0, 0.0));
                }
            }
        }
    }

    fn runner() -> GameRunner<PressCounter> {
        let mut r = GameRunner::new(PressCounter { presses: 0, updates: 0 });
        r.init();
        r
    }

    #[test]
    fn slow_frame_sees_input_once() {
        let mut r = runner();
        r.push_input(InputEvent::KeyDown { key_code: 32 });
        r.tick(0.1);
        assert!(r.game().updates > 1);
        assert_eq!(r.game().presses, 1);
        assert_eq!(r.game_events_len(), 1);
    }

    #[test]
    fn input_waits_for_a_step() {
        let mut r = runner();
        r.push_input(InputEvent::PointerDown { x: 1.0, y: 1.0 });
        r.tick(0.001);
        assert_eq!(r.game().presses, 0);
        r.tick(1.0 / 60.0);
        assert_eq!(r.game().presses, 1);
    }

    #[test]
    fn renders_scene_sprites() {
        let mut r = runner();
        r.tick(1.0 / 60.0);
        assert_eq!(r.instance_count(), 1);
        assert!(r.ui_state().is_none());
    }

    #[test]
    fn bad_manifest_is_ignored() {
        let mut r = runner();
        r.load_manifest("not json");
        r.tick(1.0 / 60.0);
        assert_eq!(r.game().updates, 1);
    }
}
