// Library surface for headless/integration tests and reuse.
// The binary in main.rs only adds the CLI and terminal setup.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod export;
pub mod prompt;
pub mod runtime;
pub mod session;
pub mod surface;
pub mod ui;

pub use app::App;
pub use error::{PonchieError, Result};
