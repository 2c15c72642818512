// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod audio;
pub mod clock;
pub mod config;
pub mod console;
pub mod logging;
pub mod roster;
pub mod runtime;
pub mod script;
pub mod timer;
pub mod topics;
pub mod ui;
