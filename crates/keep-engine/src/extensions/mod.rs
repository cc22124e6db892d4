pub mod easing;
pub mod scroll;
pub mod tween;
pub mod viewport;

pub use easing::{CubicBezier, Easing, Interpolate};
pub use scroll::ScrollAnim;
pub use tween::{Tween, TweenId, TweenLoop, TweenState, TweenTarget};
pub use viewport::{Viewport, ViewportPos};
