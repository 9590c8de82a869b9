use anyhow::Context;
use stringsheet::{Config, ImportOptions, export, import};
use tracing::{info, warn};

use crate::ProjectArgs;

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub config: Option<String>,
    pub project: ProjectArgs,
    pub output: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ImportCommandOptions {
    pub config: Option<String>,
    pub project: ProjectArgs,
    pub input: Option<String>,
    pub indent: Option<usize>,
    pub dry_run: bool,
}

fn load_config(path: &Option<String>, project: &ProjectArgs) -> anyhow::Result<Config> {
    let mut config = match path {
        Some(path) => Config::load(path).with_context(|| format!("loading config {}", path))?,
        None => Config::default(),
    };
    if let Some(root) = &project.root {
        config = config.with_project_root(root);
    }
    if let Some(res_path) = &project.res_path {
        config = config.with_res_path(res_path);
    }
    if let Some(strings_file) = &project.strings_file {
        config = config.with_strings_file(strings_file.as_str());
    }
    if let Some(base_locale) = &project.base_locale {
        config = config.with_base_locale(base_locale.as_str());
    }
    config.validate()?;
    Ok(config)
}

fn write_report(
    path: &Option<String>,
    text: impl FnOnce() -> Result<String, stringsheet::Error>,
) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let text = text().context("serializing run report")?;
    if path == "-" {
        println!("{}", text);
    } else {
        std::fs::write(path, text).with_context(|| format!("writing run report {}", path))?;
        info!("run report written to {}", path);
    }
    Ok(())
}

pub fn run_export(opts: ExportOptions) -> anyhow::Result<()> {
    let mut config = load_config(&opts.config, &opts.project)?;
    if let Some(output) = &opts.output {
        config = config.with_output_sheet(output);
    }
    if let Some(label) = &opts.label {
        config = config.with_header_label(label.as_str());
    }

    let report = export(&config, &config.module_filter())
        .with_context(|| format!("exporting to {}", config.output_sheet.display()))?;
    let failed = report.failures().count();
    if failed > 0 {
        warn!("{} of {} modules failed to export", failed, report.modules.len());
    }
    write_report(&opts.project.report, || report.to_json())
}

pub fn run_import(opts: ImportCommandOptions) -> anyhow::Result<()> {
    let mut config = load_config(&opts.config, &opts.project)?;
    if let Some(input) = &opts.input {
        config = config.with_input_sheet(input);
    }
    if let Some(indent) = opts.indent {
        config = config.with_indent(indent);
    }

    let options = ImportOptions::new().with_dry_run(opts.dry_run);
    let report = import(&config, &config.module_filter(), options)
        .with_context(|| format!("importing {}", config.input_sheet.display()))?;
    let failed = report.failures().count();
    if failed > 0 {
        warn!("{} of {} modules failed to import", failed, report.modules.len());
    }
    write_report(&opts.project.report, || report.to_json())
}
