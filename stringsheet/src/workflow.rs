//! The two run modes: export every module to a spreadsheet, and import a
//! spreadsheet back into every module.
//!
//! Modules are processed one after another. A module that fails is logged,
//! recorded in the report and skipped; the run carries on with the next one.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{error, info, warn};

use crate::{
    config::Config,
    discovery::{ModuleFilter, find_modules, module_name},
    error::Error,
    formats::{Sheet, read_first_sheet, write_sheets},
    merge::merge_locales,
    resources::{read_locales, write_locales},
    table::Table,
    types::Locale,
};

/// What happened to one module during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModuleOutcome {
    pub module: String,
    /// Number of locales read (export) or written (import).
    pub locales: usize,
    /// Number of strings across those locales.
    pub strings: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ModuleOutcome {
    fn done(module: &str, locales: &[Locale]) -> Self {
        Self {
            module: module.to_string(),
            locales: locales.len(),
            strings: locales.iter().map(|l| l.items.len()).sum(),
            error: None,
        }
    }

    fn failed(module: &str, error: &Error) -> Self {
        Self {
            module: module.to_string(),
            error: Some(error.to_string()),
            ..Self::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    pub modules: Vec<ModuleOutcome>,
    /// Spreadsheet files written.
    pub files: Vec<PathBuf>,
}

impl ExportReport {
    pub fn failures(&self) -> impl Iterator<Item = &ModuleOutcome> {
        self.modules.iter().filter(|m| !m.is_ok())
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Locale codes found in the spreadsheet header.
    pub sheet_locales: Vec<String>,
    pub modules: Vec<ModuleOutcome>,
    /// Documents written (empty on a dry run).
    pub files: Vec<PathBuf>,
    pub dry_run: bool,
}

impl ImportReport {
    pub fn failures(&self) -> impl Iterator<Item = &ModuleOutcome> {
        self.modules.iter().filter(|m| !m.is_ok())
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Options for [`import`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// Read and merge, but write nothing.
    pub dry_run: bool,
}

impl ImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Reads one module's locales and flattens them into a table.
/// Returns `None` when the module has no locale documents.
pub fn export_module(config: &Config, module: &Path) -> Result<Option<Table>, Error> {
    let locales = read_locales(
        &config.res_dir(module),
        &config.strings_file,
        &config.base_locale,
    )?;
    if locales.is_empty() {
        return Ok(None);
    }
    Ok(Some(Table::from_locales(&locales, config.header_label.as_str())))
}

/// Exports every qualifying module under the project root into one
/// spreadsheet, one sheet per module.
///
/// Finding no module is not an error: the report is empty and no file is
/// written. Failing to write the spreadsheet is.
pub fn export(config: &Config, filter: &dyn ModuleFilter) -> Result<ExportReport, Error> {
    let mut report = ExportReport::default();
    let modules = find_modules(&config.project_root, filter)?;
    if modules.is_empty() {
        warn!(
            "no translatable module found under {}",
            config.project_root.display()
        );
        return Ok(report);
    }
    let names: Vec<String> = modules.iter().map(|m| module_name(m)).collect();
    info!(modules = ?names, "exporting");

    let mut sheets = Vec::with_capacity(modules.len());
    for module in &modules {
        let name = module_name(module);
        match export_module(config, module) {
            Ok(Some(table)) => {
                info!(module = %name, locales = table.columns.len(), strings = table.rows.len(), "collected");
                report.modules.push(ModuleOutcome {
                    module: name.clone(),
                    locales: table.columns.len(),
                    strings: table.rows.len(),
                    error: None,
                });
                sheets.push(Sheet::new(name, table));
            }
            Ok(None) => {
                warn!(module = %name, "no string resources, skipped");
                report.modules.push(ModuleOutcome::done(&name, &[]));
            }
            Err(e) => {
                error!(module = %name, "failed to read string resources: {e}");
                report.modules.push(ModuleOutcome::failed(&name, &e));
            }
        }
    }

    if sheets.is_empty() {
        warn!("nothing to export");
        return Ok(report);
    }

    report.files = write_sheets(&config.output_sheet, &sheets).inspect_err(|e| {
        error!("failed to write {}: {e}", config.output_sheet.display());
    })?;
    info!(
        sheets = sheets.len(),
        "exported to {}",
        config.output_sheet.display()
    );
    Ok(report)
}

/// Reads the import spreadsheet into locales, one per column.
pub fn read_sheet_locales(path: &Path) -> Result<Vec<Locale>, Error> {
    let grid = read_first_sheet(path)?;
    let table = Table::from_grid(&grid)?;
    Ok(table.to_locales())
}

/// Merges `incoming` into one module's locale documents.
/// Returns the merged locales and the documents written.
pub fn import_module(
    config: &Config,
    module: &Path,
    incoming: &[Locale],
    options: ImportOptions,
) -> Result<(Vec<Locale>, Vec<PathBuf>), Error> {
    let res_dir = config.res_dir(module);
    let existing = read_locales(&res_dir, &config.strings_file, &config.base_locale)?;
    let merged = merge_locales(incoming, &existing);
    if options.dry_run {
        return Ok((merged, Vec::new()));
    }
    let written = write_locales(
        &merged,
        &res_dir,
        &config.strings_file,
        &config.base_locale,
        config.indent,
    )?;
    Ok((merged, written))
}

/// Imports the first sheet of the input spreadsheet into every qualifying
/// module under the project root.
///
/// An unreadable or malformed spreadsheet fails the run before any module
/// is touched.
pub fn import(
    config: &Config,
    filter: &dyn ModuleFilter,
    options: ImportOptions,
) -> Result<ImportReport, Error> {
    let incoming = read_sheet_locales(&config.input_sheet).inspect_err(|e| {
        error!("failed to read {}: {e}", config.input_sheet.display());
    })?;
    let mut report = ImportReport {
        sheet_locales: incoming.iter().map(|l| l.code.clone()).collect(),
        dry_run: options.dry_run,
        ..ImportReport::default()
    };
    if incoming.is_empty() {
        warn!("{} holds no locale columns", config.input_sheet.display());
        return Ok(report);
    }
    info!(locales = ?report.sheet_locales, "read {}", config.input_sheet.display());

    let modules = find_modules(&config.project_root, filter)?;
    if modules.is_empty() {
        warn!(
            "no translatable module found under {}",
            config.project_root.display()
        );
        return Ok(report);
    }

    for module in &modules {
        let name = module_name(module);
        match import_module(config, module, &incoming, options) {
            Ok((merged, written)) => {
                if options.dry_run {
                    info!(module = %name, locales = merged.len(), "dry run, nothing written");
                } else {
                    info!(module = %name, documents = written.len(), "imported");
                }
                report.modules.push(ModuleOutcome::done(&name, &merged));
                report.files.extend(written);
            }
            Err(e) => {
                error!(module = %name, "import failed: {e}");
                report.modules.push(ModuleOutcome::failed(&name, &e));
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{discovery::StringsFileFilter, types::StringItem};
    use std::fs;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn config_for(root: &Path) -> Config {
        Config::new()
            .with_project_root(root)
            .with_output_sheet(root.join("localize/output.csv"))
            .with_input_sheet(root.join("localize/input.csv"))
    }

    #[test]
    fn test_export_without_modules_touches_nothing() {
        let dir = TempDir::new().unwrap();
        let config = config_for(dir.path());
        let report = export(&config, &config.module_filter()).unwrap();
        assert!(report.modules.is_empty());
        assert!(report.files.is_empty());
        assert!(!dir.path().join("localize").exists());
    }

    #[test]
    fn test_export_isolates_broken_module() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(
            &root.join("app/src/main/res/values/strings.xml"),
            r#"<resources><string name="a">A</string></resources>"#,
        );
        write(&root.join("broken/src/main/res/values/strings.xml"), "<oops/>");
        let config = config_for(root);

        let report = export(&config, &config.module_filter()).unwrap();
        assert_eq!(report.modules.len(), 2);
        assert!(report.modules[0].is_ok());
        assert_eq!(report.failures().count(), 1);
        assert_eq!(report.files, vec![root.join("localize/output.app.csv")]);
    }

    #[test]
    fn test_import_missing_sheet_is_fatal() {
        let dir = TempDir::new().unwrap();
        let config = config_for(dir.path());
        let filter = StringsFileFilter::new("src/main/res", "strings.xml");
        assert!(import(&config, &filter, ImportOptions::new()).is_err());
    }

    #[test]
    fn test_import_dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let strings = root.join("app/src/main/res/values/strings.xml");
        let original = r#"<resources><string name="a">A</string></resources>"#;
        write(&strings, original);
        write(&root.join("localize/input.csv"), "strings-name,default,fr\na,AA,Un\n");
        let config = config_for(root);

        let report = import(
            &config,
            &config.module_filter(),
            ImportOptions::new().with_dry_run(true),
        )
        .unwrap();
        assert!(report.dry_run);
        assert!(report.to_json().unwrap().contains("\"dry_run\": true"));
        assert_eq!(report.sheet_locales, vec!["default", "fr"]);
        assert_eq!(report.modules[0].locales, 2);
        assert!(report.files.is_empty());
        assert_eq!(fs::read_to_string(&strings).unwrap(), original);
        assert!(!root.join("app/src/main/res/values-fr").exists());
    }

    #[test]
    fn test_import_module_merges_into_disk_state() {
        let dir = TempDir::new().unwrap();
        let module = dir.path().join("app");
        write(
            &module.join("src/main/res/values/strings.xml"),
            r#"<resources><string name="k1">a</string><string name="k2">b</string></resources>"#,
        );
        let incoming = vec![Locale::new(
            "default",
            vec![StringItem::new("k1", "A"), StringItem::new("k3", "C")],
        )];
        let (merged, written) =
            import_module(&Config::new(), &module, &incoming, ImportOptions::new()).unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(
            merged[0].items,
            vec![
                StringItem::new("k1", "A"),
                StringItem::new("k2", "b"),
                StringItem::new("k3", "C"),
            ]
        );
    }
}
