//! Development server profile for panel builds.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::naming::ResolvedNaming;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevServerConfig {
    pub host: String,

    pub port: u16,

    /// Directory served as the content root (the build output directory)
    pub content_base: PathBuf,

    /// File served for `/`
    #[serde(default = "default_index")]
    pub index: String,

    #[serde(default = "default_hot")]
    pub hot: bool,
}

impl DevServerConfig {
    /// Dev server serving `out`, using the resolved host, port and HTML file.
    pub fn from_naming(naming: &ResolvedNaming, out: impl Into<PathBuf>) -> Self {
        Self {
            host: naming.dev_host.clone(),
            port: naming.dev_port,
            content_base: out.into(),
            index: naming.html_filename.clone(),
            hot: default_hot(),
        }
    }

    /// URL the panel is reachable at while the dev server runs.
    pub fn url(&self) -> String {
        format!("http://{}:{}/{}", self.host, self.port, self.index)
    }
}

fn default_index() -> String {
    "index.html".into()
}

fn default_hot() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_naming_serves_output_directory() {
        let naming = ResolvedNaming {
            dev_port: 9000,
            dev_host: "localhost".into(),
            html_filename: "panel.html".into(),
            bundle_name: "Demo".into(),
            out_name: "panel.js".into(),
        };

        let dev = DevServerConfig::from_naming(&naming, "/build");
        assert_eq!(dev.content_base, PathBuf::from("/build"));
        assert!(dev.hot);
        assert_eq!(dev.url(), "http://localhost:9000/panel.html");
    }
}
