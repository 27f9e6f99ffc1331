//! The assembled bundler configuration.
//!
//! `FinalConfig` is plain data: it serializes to the JSON shape a
//! webpack-style bundler expects and compares structurally, so two
//! assemblies of the same inputs can be checked for equality.

use std::path::PathBuf;

use cepack_config::DevServerConfig;
use serde::{Deserialize, Serialize};

use crate::hook::CompileOnBuildHook;
use crate::rules::{ModuleConfig, ResolveConfig};

/// Output file name of every script-engine build.
pub const SCRIPT_ENGINE_OUT_NAME: &str = "extendscript.js";

/// Devtool used for panel development builds.
pub const PANEL_DEV_DEVTOOL: &str = "eval-source-map";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Development,
    Production,
}

impl Mode {
    /// Production only when `is_dev` is explicitly `false`.
    pub fn from_is_dev(is_dev: Option<bool>) -> Self {
        match is_dev {
            Some(false) => Mode::Production,
            _ => Mode::Development,
        }
    }
}

/// Bundler target identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildTarget {
    /// Script-engine output; the interpreter is closest to a plain web target
    Web,
    /// CEP panels run in a Chromium + Node.js hybrid
    NodeWebkit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub filename: String,
    pub path: PathBuf,
}

/// Terser `compress` switches cepack cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressOptions {
    pub collapse_vars: bool,
    pub conditionals: bool,
    pub comparisons: bool,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            collapse_vars: true,
            conditionals: true,
            comparisons: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Minimizer {
    pub compress: CompressOptions,
    pub comments: bool,
}

impl Minimizer {
    /// Default compression, comments stripped.
    pub fn standard() -> Self {
        Self {
            compress: CompressOptions::default(),
            comments: false,
        }
    }

    /// The ExtendScript interpreter mis-evaluates the output of these passes.
    pub fn script_engine() -> Self {
        Self {
            compress: CompressOptions {
                collapse_vars: false,
                conditionals: false,
                comparisons: false,
            },
            comments: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Optimization {
    pub minimize: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimizer: Option<Minimizer>,
}

impl Optimization {
    /// Minification is skipped only for an explicit development build.
    pub fn for_is_dev(is_dev: Option<bool>, minimizer: Minimizer) -> Self {
        if is_dev == Some(true) {
            Self {
                minimize: false,
                minimizer: None,
            }
        } else {
            Self {
                minimize: true,
                minimizer: Some(minimizer),
            }
        }
    }
}

/// Packages left as runtime `require`s instead of being bundled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Externals {
    pub modules: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyPattern {
    pub from: String,
    pub to: String,
}

/// Landing page generated for the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtmlPage {
    pub filename: String,
    pub title: String,
    /// Bundle injected into the page
    pub script: String,
}

/// Bundler plugins, in the order they are applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Plugin {
    /// Empty the output directory before building
    CleanOutput,
    /// Copy static files into the output directory
    Copy { patterns: Vec<CopyPattern> },
    /// Run the native-script compiler when the bundler compiles
    CompileOnBuild(CompileOnBuildHook),
    /// Emit the landing HTML page
    Html(HtmlPage),
    /// Expose these environment variables to bundled code
    Environment { keys: Vec<String> },
    HotModuleReplacement,
    /// Prepend `header` to every emitted chunk
    Wrapper { header: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalConfig {
    pub entry: PathBuf,
    pub module: ModuleConfig,
    pub resolve: ResolveConfig,
    pub mode: Mode,
    pub output: OutputConfig,
    /// Source-map style; `None` disables source maps
    pub devtool: Option<String>,
    pub target: BuildTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_server: Option<DevServerConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub externals: Option<Externals>,
    pub optimization: Optimization,
    pub plugins: Vec<Plugin>,
}

impl FinalConfig {
    /// The compile hook attached to this configuration, if any.
    pub fn compile_hook(&self) -> Option<&CompileOnBuildHook> {
        self.plugins.iter().find_map(|plugin| match plugin {
            Plugin::CompileOnBuild(hook) => Some(hook),
            _ => None,
        })
    }

    /// Header prepended to the bundle.
    pub fn wrapper_header(&self) -> Option<&str> {
        self.plugins.iter().find_map(|plugin| match plugin {
            Plugin::Wrapper { header } => Some(header.as_str()),
            _ => None,
        })
    }

    pub fn html_page(&self) -> Option<&HtmlPage> {
        self.plugins.iter().find_map(|plugin| match plugin {
            Plugin::Html(page) => Some(page),
            _ => None,
        })
    }

    pub fn hot_reload(&self) -> bool {
        self.plugins
            .iter()
            .any(|plugin| matches!(plugin, Plugin::HotModuleReplacement))
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
