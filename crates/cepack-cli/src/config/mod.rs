//! Option loading for CLI commands.

mod loading;

pub use loading::{ENV_PREFIX, OPTIONS_FILE, load_options};
