//! cepack CLI.
//!
//! A thin front end over the `cepack` library for inspecting the bundler
//! configuration a project would get. It does not run a bundler or a dev
//! server.
//!
//! - [`cli`] - argument definitions
//! - [`config`] - option loading (`cepack.json`, `CEPACK_*`, flags)
//! - [`commands`] - `config` and `check`
//! - [`error`] - CLI errors and their `miette` rendering
//! - [`logger`] - `tracing` subscriber setup
//! - [`ui`] - status messages

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result};
