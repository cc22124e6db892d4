use crate::api::types::{EntityId, GameEvent};
use crate::assets::manifest::AssetManifest;
use crate::core::scene::Scene;
use crate::input::queue::InputQueue;

/// Engine settings a game asks for. Read before `init` and again every frame,
/// so the world can follow the browser viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Seconds per update step.
    pub fixed_dt: f32,
    /// Viewport width in CSS px.
    pub world_width: f32,
    pub world_height: f32,
    pub max_instances: usize,
    /// Events beyond this per frame are not seen by the host.
    pub max_events: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            world_width: 1280.0,
            world_height: 800.0,
            max_instances: 64,
            max_events: 32,
        }
    }
}

/// What a page overlay implements to run under the web runner.
pub trait Game {
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    fn init(&mut self, ctx: &mut EngineContext);

    /// One fixed step. `input` is non-empty only on the first step of a frame.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    fn load_manifest(&mut self, _manifest: &AssetManifest) {}

    /// Game-defined JSON, typically dialogue and layout content.
    fn load_content(&mut self, _json: &str) {}

    /// JSON for the parts of the page the host renders as DOM.
    fn ui_state(&self) -> Option<String> {
        None
    }
}

/// Scene plus this frame's outbound events.
#[derive(Debug)]
pub struct EngineContext {
    pub scene: Scene,
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl EngineContext {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn clear_frame_data(&mut self) {
        self.events.clear();
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_start_at_one() {
        let mut ctx = EngineContext::new();
        assert_eq!(ctx.next_id(), EntityId(1));
        assert_eq!(ctx.next_id(), EntityId(2));
    }

    #[test]
    fn events_last_one_frame() {
        let mut ctx = EngineContext::new();
        ctx.emit_event(GameEvent::new(3.0, 1040.0, 1.2, 0.0));
        assert_eq!(ctx.events[0], GameEvent::new(3.0, 1040.0, 1.2, 0.0));
        ctx.clear_frame_data();
        assert!(ctx.events.is_empty());
    }
}
