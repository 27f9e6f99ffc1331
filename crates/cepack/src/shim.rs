//! Source prefixes that adapt bundled output to its host runtime.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cepack_config::TargetType;
use parking_lot::Mutex;
use tracing::debug;

use crate::{Error, Result};

/// Prefix for panel bundles.
///
/// Inside the CEP shell, Node's globals live on `window.cep_node`; outside it
/// (plain browser, local testing) the marker is absent and nothing changes.
pub const PANEL_SHIM: &str = "\
if (typeof window !== 'undefined' && window.hasOwnProperty('cep_node')) {
  require = window.cep_node.require
  Buffer = window.cep_node.Buffer
  process = window.cep_node.process
  __dirname = window.cep_node.__dirname
}";

/// Location of the ES5 compatibility shim, relative to the project root.
pub const SCRIPT_ENGINE_SHIM: &[&str] = &["node_modules", "extendscript-es5-shim-ts", "index.js"];

pub fn script_engine_shim_path(root: &Path) -> PathBuf {
    SCRIPT_ENGINE_SHIM
        .iter()
        .fold(root.to_path_buf(), |path, part| path.join(part))
}

/// Reads shim files once and keeps them for the lifetime of the source.
#[derive(Debug, Default)]
pub struct ShimSource {
    cache: Mutex<HashMap<PathBuf, Arc<str>>>,
}

impl ShimSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of the script-engine shim under `root`.
    ///
    /// # Errors
    ///
    /// `Error::ShimNotFound` if the shim package is not installed.
    pub fn script_engine_shim(&self, root: &Path) -> Result<Arc<str>> {
        let path = script_engine_shim_path(root);

        if let Some(cached) = self.cache.lock().get(&path) {
            return Ok(Arc::clone(cached));
        }

        let text: Arc<str> = match fs::read_to_string(&path) {
            Ok(text) => Arc::from(text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(Error::ShimNotFound { path });
            }
            Err(err) => return Err(err.into()),
        };
        debug!(path = %path.display(), bytes = text.len(), "loaded script-engine shim");

        let mut cache = self.cache.lock();
        Ok(Arc::clone(cache.entry(path).or_insert(text)))
    }

    /// Number of distinct shim files read so far.
    pub fn cached(&self) -> usize {
        self.cache.lock().len()
    }
}

/// Picks the prefix for a target.
pub struct RuntimeShimInjector<'a> {
    source: &'a ShimSource,
}

impl<'a> RuntimeShimInjector<'a> {
    pub fn new(source: &'a ShimSource) -> Self {
        Self { source }
    }

    pub fn shim_for(&self, target: TargetType, root: &Path) -> Result<Arc<str>> {
        match target {
            TargetType::Panel => Ok(Arc::from(PANEL_SHIM)),
            TargetType::ScriptEngine => self.source.script_engine_shim(root),
        }
    }
}
