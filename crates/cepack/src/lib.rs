#![cfg_attr(docsrs, feature(doc_cfg))]

//! # cepack
//!
//! Bundler configuration synthesis for Adobe CEP extensions.
//!
//! A CEP extension ships two kinds of code: the HTML/JS **panel** that runs in
//! the host's Chromium + Node.js shell, and **script-engine** (ExtendScript)
//! code that runs inside the host application. cepack turns a small options
//! object into a complete webpack-style configuration for either one.
//!
//! ## Quick Start
//!
//! ```no_run
//! use cepack::{BuildOptions, ConfigAssembler, TargetType};
//! use cepack_config::{AmbientEnv, ManifestMetadataProvider};
//!
//! # fn main() -> cepack::Result<()> {
//! let ambient = AmbientEnv::capture()?;
//! let provider = ManifestMetadataProvider::from_ambient(&ambient)?;
//! let assembler = ConfigAssembler::new(&ambient, &provider);
//!
//! let panel = assembler.create_config(
//!     BuildOptions::new("src/panel/index.ts", "dist/panel", TargetType::Panel).with_is_dev(true),
//! )?;
//! let host = assembler.create_config(
//!     BuildOptions::new("src/host/index.ts", "dist/host", TargetType::ScriptEngine),
//! )?;
//!
//! println!("{}", panel.to_json_pretty()?);
//! assert_eq!(host.output.filename, "extendscript.js");
//! # Ok(()) }
//! ```
//!
//! ## Compiling on build
//!
//! Panel configurations carry a [`CompileOnBuildHook`]. Bind it to a
//! [`NativeCompiler`] and hand it the bundler's lifecycle events:
//!
//! ```no_run
//! use std::sync::Arc;
//! use cepack::{BuildContext, CompileRequest, HookEvent, NativeCompiler};
//!
//! struct Cep;
//!
//! #[async_trait::async_trait]
//! impl NativeCompiler for Cep {
//!     async fn compile(&self, request: CompileRequest) -> anyhow::Result<()> {
//!         println!("writing manifest to {}", request.out.display());
//!         Ok(())
//!     }
//! }
//!
//! # async fn run(config: cepack::FinalConfig) -> cepack::Result<()> {
//! if let Some(hook) = config.compile_hook() {
//!     let bound = hook.clone().bind(Arc::new(Cep));
//!     let ctx = BuildContext { output_path: config.output.path.clone(), watch_mode: true };
//!     bound.fire(HookEvent::Compile, &ctx).await?;
//! }
//! # Ok(()) }
//! ```

pub mod assembler;
pub mod config;
pub mod error;
pub mod hook;
pub mod rules;
pub mod shim;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;

pub use assembler::{ConfigAssembler, create_config, has_script_engine_shim};
pub use config::{
    BuildTarget, CompressOptions, CopyPattern, Externals, FinalConfig, HtmlPage, Minimizer, Mode,
    Optimization, OutputConfig, PANEL_DEV_DEVTOOL, Plugin, SCRIPT_ENGINE_OUT_NAME,
};
pub use error::{Error, Result};
pub use hook::{
    BoundCompileHook, BuildContext, CompileOnBuildHook, CompileRequest, HookEvent, HookOutcome,
    HookState, NativeCompiler,
};
pub use rules::{ModuleConfig, ModuleRule, RESOLVE_EXTENSIONS, ResolveConfig};
pub use shim::{PANEL_SHIM, RuntimeShimInjector, ShimSource};

// Option types callers need to build a request
pub use cepack_config::{BuildOptions, TargetType};
