pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod assets;
pub mod extensions;

pub use api::game::{Game, GameConfig, EngineContext};
pub use api::types::{EntityId, GameEvent};
pub use components::entity::Entity;
pub use components::sprite::{SpriteComponent, AtlasId};
pub use core::scene::Scene;
pub use core::time::FixedTimestep;
pub use core::timer::TimerQueue;
pub use core::signal::SignalQueue;
pub use renderer::instance::{RenderInstance, RenderBuffer};
pub use input::queue::{InputEvent, InputQueue};
pub use assets::manifest::AssetManifest;
pub use assets::registry::SpriteRegistry;
pub use bridge::protocol::ProtocolLayout;
pub use systems::render::build_render_buffer;

pub use extensions::{
    Easing, CubicBezier, Interpolate,
    TweenState, Tween, TweenId, TweenTarget, TweenLoop,
    Viewport, ViewportPos,
    ScrollAnim,
};
