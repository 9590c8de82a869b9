//! Finding the modules of a project that carry translatable strings.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::error::Error;

/// Decides whether a directory is a module to export from / import into.
///
/// Any `Fn(&Path) -> bool` is a filter.
pub trait ModuleFilter {
    fn is_translatable_module(&self, path: &Path) -> bool;
}

impl<F> ModuleFilter for F
where
    F: Fn(&Path) -> bool,
{
    fn is_translatable_module(&self, path: &Path) -> bool {
        self(path)
    }
}

/// Accepts a module when `<module>/<res_path>/values/<strings_file>` exists.
#[derive(Debug, Clone)]
pub struct StringsFileFilter {
    relative: PathBuf,
}

impl StringsFileFilter {
    pub fn new(res_path: impl AsRef<Path>, strings_file: &str) -> Self {
        Self {
            relative: res_path.as_ref().join("values").join(strings_file),
        }
    }
}

impl ModuleFilter for StringsFileFilter {
    fn is_translatable_module(&self, path: &Path) -> bool {
        path.join(&self.relative).is_file()
    }
}

/// Lists the direct subdirectories of `root` accepted by `filter`, sorted
/// by name. Hidden entries and plain files are skipped.
pub fn find_modules(root: &Path, filter: &dyn ModuleFilter) -> Result<Vec<PathBuf>, Error> {
    let mut modules = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_name().to_string_lossy().starts_with('.') {
            debug!(path = %path.display(), "skipping hidden entry");
            continue;
        }
        if !path.is_dir() {
            continue;
        }
        if filter.is_translatable_module(&path) {
            modules.push(path);
        } else {
            debug!(path = %path.display(), "not a translatable module");
        }
    }
    modules.sort();
    Ok(modules)
}

/// The directory name of a module, used as its sheet name.
pub fn module_name(module: &Path) -> String {
    module
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| module.display().to_string())
}
