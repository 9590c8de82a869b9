//! Excel workbooks: read with `calamine`, written with `rust_xlsxwriter`.

use std::{collections::HashSet, path::Path};

use calamine::{Data, Range, Reader, open_workbook_auto};
use rust_xlsxwriter::{Format as CellFormat, Workbook};
use tracing::debug;

use crate::{error::Error, formats::Sheet, table::Cell};

/// Longest sheet name Excel accepts.
pub const MAX_SHEET_NAME_LEN: usize = 31;

const ILLEGAL_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Reads the first sheet of a workbook into a cell grid addressed from
/// row 0 / column 0, whatever the used range of the sheet is.
/// A cell that holds a formula yields the formula text.
pub fn read_first_sheet(path: &Path) -> Result<(String, Vec<Vec<Cell>>), Error> {
    let mut workbook = open_workbook_auto(path)?;
    let name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| Error::structural(path, "workbook has no sheets"))?;
    let values = workbook.worksheet_range(&name)?;
    let formulas = match workbook.worksheet_formula(&name) {
        Ok(formulas) => Some(formulas),
        Err(e) => {
            debug!(sheet = %name, "no formulas read: {e}");
            None
        }
    };
    debug!(sheet = %name, path = %path.display(), "read first sheet");
    Ok((name, to_grid(&values, formulas.as_ref())))
}

/// Writes every sheet into one new workbook at `path`, replacing any file there.
pub fn write_sheets(path: &Path, sheets: &[Sheet]) -> Result<(), Error> {
    let mut workbook = Workbook::new();
    let header_format = CellFormat::new().set_bold();
    let mut used_names = HashSet::new();

    for sheet in sheets {
        let name = unique_sheet_name(&sanitize_sheet_name(&sheet.name), &mut used_names);
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&name)?;
        for (row, line) in sheet.table.to_grid().iter().enumerate() {
            let row = u32::try_from(row)
                .map_err(|_| Error::InvalidResource(format!("sheet `{name}` has too many rows")))?;
            for (column, value) in line.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                let column = u16::try_from(column).map_err(|_| {
                    Error::InvalidResource(format!("sheet `{name}` has too many columns"))
                })?;
                if row == 0 {
                    worksheet.write_string_with_format(row, column, value, &header_format)?;
                } else {
                    worksheet.write_string(row, column, value)?;
                }
            }
        }
        worksheet.set_freeze_panes(1, 1)?;
        debug!(sheet = %name, rows = sheet.table.rows.len(), "added sheet");
    }

    workbook.save(path)?;
    Ok(())
}

/// Makes a module name usable as a sheet name: illegal characters become
/// `_`, surrounding apostrophes are dropped, and the result is cut to
/// [`MAX_SHEET_NAME_LEN`] characters.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if ILLEGAL_SHEET_CHARS.contains(&c) { '_' } else { c })
        .collect();
    let cleaned: String = cleaned
        .trim_matches('\'')
        .chars()
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    if cleaned.is_empty() {
        "Sheet".to_string()
    } else {
        cleaned
    }
}

// Excel compares sheet names case-insensitively.
fn unique_sheet_name(name: &str, used: &mut HashSet<String>) -> String {
    let mut candidate = name.to_string();
    let mut counter = 2;
    while !used.insert(candidate.to_lowercase()) {
        let suffix = format!("~{counter}");
        let keep = MAX_SHEET_NAME_LEN - suffix.chars().count();
        candidate = format!("{}{}", name.chars().take(keep).collect::<String>(), suffix);
        counter += 1;
    }
    candidate
}

fn to_grid(values: &Range<Data>, formulas: Option<&Range<String>>) -> Vec<Vec<Cell>> {
    let end = [values.end(), formulas.and_then(Range::end)]
        .into_iter()
        .flatten()
        .reduce(|a, b| (a.0.max(b.0), a.1.max(b.1)));
    let Some((end_row, end_column)) = end else {
        return Vec::new();
    };

    (0..=end_row)
        .map(|row| {
            (0..=end_column)
                .map(|column| cell_at(values, formulas, (row, column)))
                .collect()
        })
        .collect()
}

fn cell_at(values: &Range<Data>, formulas: Option<&Range<String>>, position: (u32, u32)) -> Cell {
    if let Some(formula) = formulas
        .and_then(|f| f.get_value(position))
        .filter(|f| !f.is_empty())
    {
        return Cell::Formula(formula.clone());
    }
    match values.get_value(position) {
        None | Some(Data::Empty) => Cell::Empty,
        Some(Data::String(text)) => Cell::Text(text.clone()),
        Some(Data::Int(_)) => Cell::Unsupported("int".to_string()),
        Some(Data::Float(_)) => Cell::Unsupported("float".to_string()),
        Some(Data::Bool(_)) => Cell::Unsupported("bool".to_string()),
        Some(Data::Error(_)) => Cell::Unsupported("error".to_string()),
        Some(_) => Cell::Unsupported("datetime".to_string()),
    }
}
