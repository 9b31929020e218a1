pub mod config;
pub mod presets;
pub mod render;
pub mod run;
