// crates/sprig-runtime/src/lib.rs

pub mod app;
pub mod backends;
pub mod config;
pub mod scheduler;

pub use app::*;
pub use backends::*;
pub use config::*;
pub use scheduler::*;

pub use sprig_core;
pub use sprig_layout;
pub use sprig_render;
