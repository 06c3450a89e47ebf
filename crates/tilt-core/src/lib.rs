pub mod audio;
pub mod bus;
pub mod config;
pub mod constants;
pub mod effects;
pub mod frame;
pub mod ingest;
pub mod orientation;
pub mod protocol;
pub mod scene;
pub mod shake;
pub mod state;
pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");

pub use audio::*;
pub use bus::*;
pub use config::*;
pub use constants::*;
pub use effects::*;
pub use frame::*;
pub use ingest::*;
pub use orientation::*;
pub use protocol::*;
pub use scene::*;
pub use shake::*;
pub use state::*;
