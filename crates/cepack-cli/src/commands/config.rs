//! `cepack config`: print the assembled configuration.

use std::fs;

use cepack_config::{AmbientEnv, ManifestMetadataProvider};
use tracing::info;

use crate::cli::ConfigArgs;
use crate::config::load_options;
use crate::error::Result;
use crate::ui;

/// Assemble the configuration for the given options and print it as JSON.
///
/// # Errors
///
/// Anything the assembler reports (missing options, unknown type, missing
/// manifest or shim), plus failures writing `--output`.
pub fn execute(args: ConfigArgs) -> Result<()> {
    let ambient = AmbientEnv::capture()?;
    let options = load_options(&args.options, &ambient)?;
    let provider = ManifestMetadataProvider::from_ambient(&ambient)?;

    let config = cepack::create_config(options, &ambient, &provider)?;
    let json = config.to_json_pretty()?;

    match args.output {
        Some(path) => {
            fs::write(&path, format!("{json}\n"))?;
            info!(path = %path.display(), "configuration written");
            ui::success(&format!("Wrote {}", path.display()));
        }
        None => println!("{json}"),
    }

    Ok(())
}
