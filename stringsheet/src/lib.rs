#![forbid(unsafe_code)]
//! Sync Android string resources with a translation spreadsheet.
//!
//! **Export** reads every `values*/strings.xml` of every module in a project
//! and writes one sheet per module: a header of locale codes, one row per
//! string name. **Import** reads a sheet back, merges it into each module's
//! documents (existing names are overwritten in place, new names appended),
//! and writes the documents.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use stringsheet::{Config, ImportOptions, export, import};
//!
//! let config = Config::new()
//!     .with_project_root("./android")
//!     .with_output_sheet("./localize/output.xlsx")
//!     .with_input_sheet("./localize/input.xlsx");
//! let filter = config.module_filter();
//!
//! let report = export(&config, &filter)?;
//! println!("exported {} modules", report.modules.len());
//!
//! import(&config, &filter, ImportOptions::new())?;
//! # Ok::<(), stringsheet::Error>(())
//! ```
//!
//! The building blocks are usable on their own:
//!
//! ```rust
//! use stringsheet::{Locale, StringItem, Table, merge_locales};
//!
//! let on_disk = vec![Locale::new("fr", vec![StringItem::new("hello", "Salut")])];
//! let table = Table::from_locales(&on_disk, "strings-name");
//! let merged = merge_locales(&table.to_locales(), &on_disk);
//! assert_eq!(merged, on_disk);
//! ```
//!
//! Progress and problems are reported as `tracing` events; install a
//! subscriber to see them.

pub mod config;
pub mod discovery;
pub mod error;
pub mod escape;
pub mod formats;
pub mod merge;
pub mod resources;
pub mod table;
pub mod traits;
pub mod types;
pub mod workflow;

// Re-export most used types for easy consumption
pub use crate::{
    config::Config,
    discovery::{ModuleFilter, StringsFileFilter, find_modules},
    error::Error,
    escape::escape_text,
    formats::{Sheet, SheetFormat},
    merge::merge_locales,
    table::{Cell, Table},
    types::{Locale, StringItem},
    workflow::{ExportReport, ImportOptions, ImportReport, export, import},
};
