pub mod app;
pub mod camera;
pub mod cli;
pub mod compositor;
pub mod config;
pub mod core;
pub mod geometry;
pub mod gpu_context;
pub mod headless;
pub mod material;
pub mod math;
pub mod renderer;
pub mod scene;
pub mod shell;
pub mod types;
pub mod window;

pub use config::AppConfig;
pub use core::{LifecycleController, Phase};
pub use scene::{assemble_scene, Scene, SceneCounts};
