// Library surface for headless/integration tests and reuse.
// The binary in main.rs only owns the terminal and the CLI.
pub mod app;
pub mod app_dirs;
pub mod audio;
pub mod format;
pub mod logging;
pub mod palette;
pub mod prefs;
pub mod runtime;
pub mod session;
pub mod timer;
pub mod ui;
pub mod waves;
