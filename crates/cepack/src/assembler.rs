//! Turns validated options into a [`FinalConfig`].

use std::path::Path;

use cepack_config::{
    AmbientEnv, BuildOptions, DevServerConfig, ExtensionOverrideResolver, Manifest,
    MetadataProvider, OptionsValidator, ProjectMetadataResolver, RequiredOptionsValidator,
    TargetType, ValidatedOptions,
};
use tracing::{debug, info};

use crate::config::{
    BuildTarget, CopyPattern, Externals, FinalConfig, HtmlPage, Minimizer, Mode, Optimization,
    OutputConfig, PANEL_DEV_DEVTOOL, Plugin, SCRIPT_ENGINE_OUT_NAME,
};
use crate::hook::CompileOnBuildHook;
use crate::rules::{ModuleConfig, ResolveConfig};
use crate::shim::{RuntimeShimInjector, ShimSource};
use crate::Result;

/// Static files copied verbatim into a panel's output directory.
const PUBLIC_DIR: &str = "public/";

/// Assembles bundler configurations for one ambient environment.
///
/// The assembler reads the environment snapshot and asks the metadata
/// provider for project metadata; it never consults process state directly.
/// Script-engine shims read through it are cached, so keep one assembler
/// around when producing several configurations.
pub struct ConfigAssembler<'a> {
    ambient: &'a AmbientEnv,
    provider: &'a dyn MetadataProvider,
    shims: ShimSource,
}

impl<'a> ConfigAssembler<'a> {
    pub fn new(ambient: &'a AmbientEnv, provider: &'a dyn MetadataProvider) -> Self {
        Self {
            ambient,
            provider,
            shims: ShimSource::new(),
        }
    }

    /// Validate `options`, then assemble.
    ///
    /// Validation runs before any file is read, so a request missing a
    /// required field fails the same way whether or not the project exists.
    pub fn create_config(&self, options: BuildOptions) -> Result<FinalConfig> {
        let validated = RequiredOptionsValidator.validate(options, self.ambient)?;
        self.assemble(&validated)
    }

    /// Assemble the configuration for already-validated options.
    ///
    /// # Errors
    ///
    /// - `ConfigError::ManifestNotFound` for a panel with no `pkg` and no
    ///   manifest under `root`
    /// - `Error::ShimNotFound` for a script-engine build without the shim
    ///   package installed
    pub fn assemble(&self, options: &ValidatedOptions) -> Result<FinalConfig> {
        info!(
            kind = %options.target,
            entry = %options.entry.display(),
            out = %options.out.display(),
            "assembling configuration"
        );

        let config = match options.target {
            TargetType::ScriptEngine => self.script_engine(options)?,
            TargetType::Panel => self.panel(options)?,
        };

        debug!(
            plugins = config.plugins.len(),
            mode = ?config.mode,
            "configuration assembled"
        );
        Ok(config)
    }

    fn script_engine(&self, options: &ValidatedOptions) -> Result<FinalConfig> {
        let shim = RuntimeShimInjector::new(&self.shims).shim_for(options.target, &options.root)?;

        Ok(FinalConfig {
            entry: options.entry.clone(),
            module: ModuleConfig::default(),
            resolve: ResolveConfig::default(),
            mode: Mode::from_is_dev(options.is_dev),
            output: OutputConfig {
                filename: SCRIPT_ENGINE_OUT_NAME.to_string(),
                path: options.out.clone(),
            },
            devtool: None,
            target: BuildTarget::Web,
            dev_server: None,
            externals: None,
            optimization: Optimization::for_is_dev(options.is_dev, Minimizer::script_engine()),
            plugins: vec![
                Plugin::CleanOutput,
                self.environment_plugin(),
                Plugin::Wrapper {
                    header: shim.to_string(),
                },
            ],
        })
    }

    fn panel(&self, options: &ValidatedOptions) -> Result<FinalConfig> {
        let loaded;
        let manifest = match &options.pkg {
            Some(manifest) => manifest,
            None => {
                loaded = Manifest::load(&options.root)?;
                &loaded
            }
        };

        let metadata = ProjectMetadataResolver::new(self.provider, self.ambient).resolve(
            Some(manifest),
            options.env.as_deref(),
            &options.root,
        )?;
        let naming = ExtensionOverrideResolver::new(&metadata).resolve(options);
        debug!(
            port = naming.dev_port,
            host = %naming.dev_host,
            out_name = %naming.out_name,
            "resolved panel naming"
        );

        let shim = RuntimeShimInjector::new(&self.shims).shim_for(options.target, &options.root)?;
        let hook = CompileOnBuildHook::new(options.original().to_map()?);

        let mut plugins = vec![
            Plugin::Copy {
                patterns: vec![CopyPattern {
                    from: PUBLIC_DIR.to_string(),
                    to: ".".to_string(),
                }],
            },
            Plugin::CompileOnBuild(hook),
            Plugin::Html(HtmlPage {
                filename: naming.html_filename.clone(),
                title: naming.bundle_name.clone(),
                script: naming.out_name.clone(),
            }),
            self.environment_plugin(),
        ];
        if options.is_dev != Some(false) {
            plugins.push(Plugin::HotModuleReplacement);
        }
        plugins.push(Plugin::Wrapper {
            header: shim.to_string(),
        });

        let devtool = (options.is_dev == Some(true)).then(|| PANEL_DEV_DEVTOOL.to_string());

        Ok(FinalConfig {
            entry: options.entry.clone(),
            module: ModuleConfig::default(),
            resolve: ResolveConfig::default(),
            mode: Mode::from_is_dev(options.is_dev),
            output: OutputConfig {
                filename: naming.out_name.clone(),
                path: options.out.clone(),
            },
            devtool,
            target: BuildTarget::NodeWebkit,
            dev_server: Some(DevServerConfig::from_naming(&naming, &options.out)),
            externals: Some(Externals {
                modules: manifest.runtime_dependencies(),
            }),
            optimization: Optimization::for_is_dev(options.is_dev, Minimizer::standard()),
            plugins,
        })
    }

    fn environment_plugin(&self) -> Plugin {
        Plugin::Environment {
            keys: self.ambient.keys(),
        }
    }
}

/// Validate and assemble in one call.
///
/// Each call builds a fresh [`ConfigAssembler`], so the script-engine shim is
/// read from disk every time. Callers producing several configurations (a
/// watch loop, one config per target) should create one `ConfigAssembler`
/// and call [`ConfigAssembler::create_config`] on it instead.
///
/// ```no_run
/// use cepack::{create_config, BuildOptions, TargetType};
/// use cepack_config::{AmbientEnv, ManifestMetadataProvider};
///
/// let ambient = AmbientEnv::capture()?;
/// let provider = ManifestMetadataProvider::from_ambient(&ambient)?;
/// let options = BuildOptions::new("src/panel/index.ts", "dist", TargetType::Panel);
/// let config = create_config(options, &ambient, &provider)?;
/// println!("{}", config.to_json_pretty()?);
/// # Ok::<(), cepack::Error>(())
/// ```
pub fn create_config(
    options: BuildOptions,
    ambient: &AmbientEnv,
    provider: &dyn MetadataProvider,
) -> Result<FinalConfig> {
    ConfigAssembler::new(ambient, provider).create_config(options)
}

/// Whether `root` has the script-engine shim installed.
pub fn has_script_engine_shim(root: &Path) -> bool {
    crate::shim::script_engine_shim_path(root).is_file()
}
