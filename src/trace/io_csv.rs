// Primitives for reading CSV files.

use std::fs::File;

use crate::trace::{io_common::make_default_id, *};

pub fn read_csv_identifiers(path: &str, cfs: &FileSource) -> TraceResult<Vec<ParsedIdentifier>> {
    let default_id = make_default_id(path);
    let id_idx = cfs.id_column()?;

    let mut res: Vec<ParsedIdentifier> = Vec::new();
    let (records, row_offset) = get_records(path, cfs)?;

    for (idx, line_r) in records.enumerate() {
        let lineno = idx + row_offset;
        let line = line_r.context(CsvLineParseSnafu {})?;
        debug!("read_csv_identifiers: lineno: {:?} row: {:?}", lineno, line);
        let raw = line
            .get(id_idx)
            .context(CsvLineTooShortSnafu { lineno })?
            .to_string();
        if raw.trim().is_empty() {
            continue;
        }
        res.push(ParsedIdentifier {
            id: default_id(lineno),
            raw,
        });
    }
    Ok(res)
}

fn get_records(
    path: &str,
    cfs: &FileSource,
) -> TraceResult<(csv::StringRecordsIntoIter<File>, usize)> {
    let first_row = cfs.first_row()?;
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let mut records = rdr.into_records();
    // The index starts at 1 to respect most conventions in the excel world
    for _ in 1..first_row {
        _ = records.next();
    }
    Ok((records, first_row))
}
