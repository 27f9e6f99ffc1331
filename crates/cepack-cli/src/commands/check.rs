//! `cepack check`: validate options and report what they resolve to.

use cepack::{ModuleConfig, SCRIPT_ENGINE_OUT_NAME, TargetType, has_script_engine_shim};
use cepack_config::{
    AmbientEnv, DevServerConfig, ExtensionOverrideResolver, ManifestMetadataProvider,
    ProjectMetadata, ProjectMetadataResolver, ValidatedOptions, validate,
};
use serde_json::json;

use crate::cli::CheckArgs;
use crate::config::load_options;
use crate::error::Result;
use crate::ui;

/// Execute the check command.
///
/// Validation failures are errors. A missing ExtendScript shim or an
/// extension id that does not select exactly one profile are only warnings:
/// the configuration can still be assembled once they are fixed.
pub fn execute(args: CheckArgs) -> Result<()> {
    let ambient = AmbientEnv::capture()?;
    let options = load_options(&args.options, &ambient)?;
    let validated = validate(options, &ambient)?;
    ui::success("Options are valid");

    let entry_loaders = entry_loaders(&validated);

    match validated.target {
        TargetType::ScriptEngine => check_script_engine(&validated, &entry_loaders, args.json),
        TargetType::Panel => check_panel(&validated, &ambient, &entry_loaders, args.json),
    }
}

/// Loader chain the default module rules apply to the entry file.
fn entry_loaders(options: &ValidatedOptions) -> Vec<String> {
    match ModuleConfig::default().rule_for(&options.entry) {
        Some(rule) => rule.loaders.clone(),
        None => {
            ui::warning(&format!(
                "No module rule handles `{}`; the bundler will load it as plain JavaScript",
                options.entry.display()
            ));
            Vec::new()
        }
    }
}

fn print_loaders(loaders: &[String]) {
    if loaders.is_empty() {
        println!("entry loaders: (none)");
    } else {
        println!("entry loaders: {}", loaders.join(" -> "));
    }
}

fn check_script_engine(options: &ValidatedOptions, loaders: &[String], json: bool) -> Result<()> {
    let shim_installed = has_script_engine_shim(&options.root);
    if !shim_installed {
        ui::warning("extendscript-es5-shim-ts is not installed; `cepack config` will fail");
    }

    if json {
        let report = json!({
            "type": options.target.as_str(),
            "outName": SCRIPT_ENGINE_OUT_NAME,
            "shimInstalled": shim_installed,
            "entryLoaders": loaders,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("type: {}", options.target);
        println!("output: {}", options.out.join(SCRIPT_ENGINE_OUT_NAME).display());
        print_loaders(loaders);
    }
    Ok(())
}

fn check_panel(
    options: &ValidatedOptions,
    ambient: &AmbientEnv,
    loaders: &[String],
    json: bool,
) -> Result<()> {
    let provider = ManifestMetadataProvider::from_ambient(ambient)?;
    let metadata = ProjectMetadataResolver::new(&provider, ambient).resolve_for(options)?;
    warn_on_unselected_profile(&metadata, options.id.as_deref());

    let naming = ExtensionOverrideResolver::new(&metadata).resolve(options);

    if json {
        println!("{}", serde_json::to_string_pretty(&naming)?);
    } else {
        let dev = DevServerConfig::from_naming(&naming, &options.out);
        println!("type: {}", options.target);
        println!("name: {}", naming.bundle_name);
        println!("output: {}", options.out.join(&naming.out_name).display());
        println!("html: {}", naming.html_filename);
        println!("dev server: {}", dev.url());
        print_loaders(loaders);
    }
    Ok(())
}

fn warn_on_unselected_profile(metadata: &ProjectMetadata, id: Option<&str>) {
    let Some(id) = id else { return };
    if metadata.extensions.is_empty() {
        return;
    }

    match metadata.extensions.iter().filter(|ext| ext.is_for(id)).count() {
        1 => {}
        0 => ui::warning(&format!(
            "No extension profile with id `{id}`; using project defaults"
        )),
        n => ui::warning(&format!(
            "{n} extension profiles share id `{id}`; using project defaults"
        )),
    }
}
