pub mod scene;
pub mod signal;
pub mod time;
pub mod timer;
