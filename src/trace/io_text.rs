// Plain text files: one identifier per line.

use std::fs;

use crate::trace::{io_common::make_default_id, *};

pub fn read_text_identifiers(path: &str) -> TraceResult<Vec<ParsedIdentifier>> {
    let default_id = make_default_id(path);
    let contents = fs::read_to_string(path).context(OpeningTextSnafu { path })?;
    let mut res: Vec<ParsedIdentifier> = Vec::new();
    for (idx, line) in contents.lines().enumerate() {
        let lineno = idx + 1;
        let l = line.trim();
        if l.is_empty() || l.starts_with('#') {
            continue;
        }
        debug!("read_text_identifiers: lineno: {:?} line: {:?}", lineno, l);
        res.push(ParsedIdentifier {
            id: default_id(lineno),
            raw: l.to_string(),
        });
    }
    Ok(res)
}
