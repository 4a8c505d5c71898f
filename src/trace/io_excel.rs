// Primitives for reading Excel files.

use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::trace::{io_common::make_default_id, *};

pub fn read_excel_identifiers(
    path: &str,
    cfs: &FileSource,
) -> TraceResult<Vec<ParsedIdentifier>> {
    let default_id = make_default_id(path);
    let id_idx = cfs.id_column()?;
    let first_row = cfs.first_row()?;

    let wrange = get_range(path, cfs)?;
    let mut res: Vec<ParsedIdentifier> = Vec::new();
    // Rows are numbered from 1, as displayed by spreadsheet programs.
    for (idx, row) in wrange.rows().enumerate().skip(first_row - 1) {
        let lineno = idx + 1;
        debug!("read_excel_identifiers: lineno: {:?} row: {:?}", lineno, row);
        let raw = match row.get(id_idx) {
            Some(cell) => read_cell(cell, lineno)?,
            None => None,
        };
        if let Some(raw) = raw {
            res.push(ParsedIdentifier {
                id: default_id(lineno),
                raw,
            });
        }
    }
    Ok(res)
}

// 2^64, the first float that does not fit in a serial.
const SERIAL_FLOAT_LIMIT: f64 = 18_446_744_073_709_551_616.0;

// Barcodes without a letter are sometimes stored as numbers. The leading
// zeros are lost but the serial is the same.
fn read_cell(cell: &DataType, lineno: usize) -> TraceResult<Option<String>> {
    match cell {
        DataType::String(s) if s.trim().is_empty() => Ok(None),
        DataType::String(s) => Ok(Some(s.clone())),
        DataType::Empty => Ok(None),
        DataType::Int(i) => Ok(Some(i.to_string())),
        DataType::Float(f) if f.fract() == 0.0 && *f >= 0.0 && *f < SERIAL_FLOAT_LIMIT => {
            Ok(Some(format!("{}", *f as u64)))
        }
        DataType::Float(f) => whatever!("Line {}: {} is not a ballot serial", lineno, f),
        _ => ExcelWrongCellTypeSnafu {
            lineno,
            content: format!("{:?}", cell),
        }
        .fail(),
    }
}

fn get_range(path: &str, cfs: &FileSource) -> TraceResult<calamine::Range<DataType>> {
    debug!(
        "read_excel_identifiers: path: {:?} worksheet: {:?}",
        path, &cfs.excel_worksheet_name
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = &cfs.excel_worksheet_name {
        let wrange = workbook
            .worksheet_range(worksheet_name)
            .context(MissingWorksheetSnafu {
                name: worksheet_name.clone(),
            })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let wrange = workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu {})?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    }
}
