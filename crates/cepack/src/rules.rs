//! Fixed module rules and resolution settings shared by both targets.

use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Extensions the bundler tries, in order, for extension-less imports.
pub const RESOLVE_EXTENSIONS: &[&str] = &[".tsx", ".ts", ".js", ".json"];

/// One asset rule: files whose path matches `test` go through `use` in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRule {
    /// Regex source matched against the module path
    pub test: String,

    /// Loader chain
    #[serde(rename = "use")]
    pub loaders: Vec<String>,

    /// Regex source for paths excluded from this rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,
}

impl ModuleRule {
    fn new(test: &str, loaders: &[&str]) -> Self {
        Self {
            test: test.to_string(),
            loaders: loaders.iter().map(|l| l.to_string()).collect(),
            exclude: None,
        }
    }

    fn excluding(mut self, exclude: &str) -> Self {
        self.exclude = Some(exclude.to_string());
        self
    }

    /// Whether this rule applies to `path`.
    ///
    /// A rule whose pattern does not compile matches nothing.
    pub fn matches(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        let included = Regex::new(&self.test).is_ok_and(|re| re.is_match(&path));
        let excluded = self
            .exclude
            .as_deref()
            .is_some_and(|ex| Regex::new(ex).is_ok_and(|re| re.is_match(&path)));
        included && !excluded
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleConfig {
    pub rules: Vec<ModuleRule>,
}

impl ModuleConfig {
    /// First rule that applies to `path`.
    pub fn rule_for(&self, path: &Path) -> Option<&ModuleRule> {
        self.rules.iter().find(|rule| rule.matches(path))
    }
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            rules: vec![
                ModuleRule::new(r"\.tsx?$", &["ts-loader"]).excluding("node_modules"),
                ModuleRule::new(r"\.css$", &["style-loader", "css-loader"]),
                ModuleRule::new(r"\.(png|svg|jpg|gif)$", &["file-loader"]),
                ModuleRule::new(r"\.(woff|woff2|eot|ttf|otf)$", &["file-loader"]),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveConfig {
    pub extensions: Vec<String>,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            extensions: RESOLVE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}
