//! Reading and writing the per-locale documents of one resource directory.
//!
//! A resource directory (e.g. `app/src/main/res`) holds one `values*`
//! subdirectory per locale. `values` is the base locale and is given the
//! configured base code; `values-<code>` is the locale `<code>`, verbatim.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    error::Error,
    formats::android_strings::{self, Format},
    traits::TextFormat,
    types::Locale,
};

const VALUES_DIR: &str = "values";

/// Directory name of the locale `code` (`values` for the base code).
pub fn locale_dir_name(code: &str, base_code: &str) -> String {
    if code == base_code {
        VALUES_DIR.to_string()
    } else {
        format!("{VALUES_DIR}-{code}")
    }
}

/// Locale code of a resource subdirectory, or `None` if it is not a
/// `values` directory.
pub fn locale_code_from_dir(dir_name: &str, base_code: &str) -> Option<String> {
    if dir_name == VALUES_DIR {
        return Some(base_code.to_string());
    }
    dir_name
        .strip_prefix("values-")
        .filter(|code| !code.is_empty())
        .map(str::to_string)
}

/// Reads every locale document under `res_dir`, in directory name order.
///
/// Subdirectories that are not `values*` or have no `file_name` document
/// are skipped. Any unreadable document fails the whole directory.
pub fn read_locales(res_dir: &Path, file_name: &str, base_code: &str) -> Result<Vec<Locale>, Error> {
    let mut dirs: Vec<(String, PathBuf)> = Vec::new();
    for entry in fs::read_dir(res_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(dir_name) = entry.file_name().to_str().map(str::to_string) else {
            debug!(path = %path.display(), "skipping non UTF-8 directory name");
            continue;
        };
        let document = path.join(file_name);
        if !document.is_file() {
            continue;
        }
        dirs.push((dir_name, document));
    }
    dirs.sort_by(|a, b| a.0.cmp(&b.0));

    let mut locales = Vec::with_capacity(dirs.len());
    for (dir_name, document) in dirs {
        let Some(code) = locale_code_from_dir(&dir_name, base_code) else {
            debug!(dir = %dir_name, "not a values directory, skipped");
            continue;
        };
        let format = Format::read_file(&document)?;
        debug!(locale = %code, strings = format.items.len(), "read {}", document.display());
        locales.push(format.into_locale(code));
    }
    Ok(locales)
}

/// Writes every locale into its document under `res_dir`.
///
/// An existing document is patched (see [`android_strings::patch`]); a
/// missing one is created together with its directory.
pub fn write_locales(
    locales: &[Locale],
    res_dir: &Path,
    file_name: &str,
    base_code: &str,
    indent: usize,
) -> Result<Vec<PathBuf>, Error> {
    let mut written = Vec::with_capacity(locales.len());
    for locale in locales {
        let dir = res_dir.join(locale_dir_name(&locale.code, base_code));
        let document = dir.join(file_name);
        if document.is_file() {
            android_strings::patch_file(&document, &locale.items, indent)?;
            debug!(locale = %locale.code, "updated {}", document.display());
        } else {
            fs::create_dir_all(&dir)?;
            let mut file = fs::File::create(&document)?;
            Format::from(locale).write_with_indent(&mut file, indent)?;
            info!(locale = %locale.code, "created {}", document.display());
        }
        written.push(document);
    }
    Ok(written)
}
