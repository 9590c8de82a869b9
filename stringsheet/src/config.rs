//! Run configuration: where the project lives, where its strings are, and
//! which spreadsheets to read and write.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    discovery::StringsFileFilter, error::Error, formats::android_strings::DEFAULT_INDENT,
    table::DEFAULT_HEADER_LABEL,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory whose subdirectories are candidate modules.
    pub project_root: PathBuf,
    /// Resource directory inside a module.
    pub res_path: PathBuf,
    /// Name of the per-locale document.
    pub strings_file: String,
    /// Spreadsheet written by export.
    pub output_sheet: PathBuf,
    /// Spreadsheet read by import.
    pub input_sheet: PathBuf,
    /// Text of the header's first cell on export.
    pub header_label: String,
    /// Locale code given to the base `values` directory.
    pub base_locale: String,
    /// Indent width of written documents.
    pub indent: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("./"),
            res_path: PathBuf::from("src/main/res"),
            strings_file: "strings.xml".to_string(),
            output_sheet: PathBuf::from("./localize/output.xlsx"),
            input_sheet: PathBuf::from("./localize/input.xlsx"),
            header_label: DEFAULT_HEADER_LABEL.to_string(),
            base_locale: "default".to_string(),
            indent: DEFAULT_INDENT,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a TOML config file. Missing keys keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        let config = Self::from_toml(&content)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.strings_file.trim().is_empty() {
            return Err(Error::Config("strings_file must not be empty".to_string()));
        }
        if self.base_locale.trim().is_empty() {
            return Err(Error::Config("base_locale must not be empty".to_string()));
        }
        Ok(())
    }

    /// The resource directory of `module`.
    pub fn res_dir(&self, module: &Path) -> PathBuf {
        module.join(&self.res_path)
    }

    /// The module filter these paths imply.
    pub fn module_filter(&self) -> StringsFileFilter {
        StringsFileFilter::new(&self.res_path, &self.strings_file)
    }

    pub fn with_project_root(mut self, project_root: impl Into<PathBuf>) -> Self {
        self.project_root = project_root.into();
        self
    }

    pub fn with_res_path(mut self, res_path: impl Into<PathBuf>) -> Self {
        self.res_path = res_path.into();
        self
    }

    pub fn with_strings_file(mut self, strings_file: impl Into<String>) -> Self {
        self.strings_file = strings_file.into();
        self
    }

    pub fn with_output_sheet(mut self, output_sheet: impl Into<PathBuf>) -> Self {
        self.output_sheet = output_sheet.into();
        self
    }

    pub fn with_input_sheet(mut self, input_sheet: impl Into<PathBuf>) -> Self {
        self.input_sheet = input_sheet.into();
        self
    }

    pub fn with_header_label(mut self, header_label: impl Into<String>) -> Self {
        self.header_label = header_label.into();
        self
    }

    pub fn with_base_locale(mut self, base_locale: impl Into<String>) -> Self {
        self.base_locale = base_locale.into();
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.res_path, PathBuf::from("src/main/res"));
        assert_eq!(config.strings_file, "strings.xml");
        assert_eq!(config.output_sheet, PathBuf::from("./localize/output.xlsx"));
        assert_eq!(config.input_sheet, PathBuf::from("./localize/input.xlsx"));
        assert_eq!(config.header_label, "strings-name");
        assert_eq!(config.indent, 4);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            project_root = "android"
            base_locale = "en"
            indent = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.project_root, PathBuf::from("android"));
        assert_eq!(config.base_locale, "en");
        assert_eq!(config.indent, 2);
        assert_eq!(config.strings_file, "strings.xml");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = Config::from_toml("output = \"x.xlsx\"").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_empty_strings_file_is_rejected() {
        let err = Config::from_toml("strings_file = \"\"").unwrap_err();
        assert!(err.to_string().contains("strings_file"));
    }

    #[test]
    fn test_builder() {
        let config = Config::new()
            .with_project_root("/tmp/project")
            .with_input_sheet("in.csv")
            .with_base_locale("en");
        assert_eq!(config.project_root, PathBuf::from("/tmp/project"));
        assert_eq!(config.input_sheet, PathBuf::from("in.csv"));
        assert_eq!(
            config.res_dir(Path::new("app")),
            PathBuf::from("app/src/main/res")
        );
    }
}
