use log::{debug, info, warn};

use ballot_codec::*;
use snafu::{prelude::*, Snafu};

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::trace::config_reader::*;

mod io_common;
mod io_csv;
mod io_excel;
mod io_text;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TraceError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The spreadsheet has no worksheet"))]
    EmptyExcel {},
    #[snafu(display("Worksheet {name} not found"))]
    MissingWorksheet { name: String },
    #[snafu(display("Unexpected cell at line {lineno}: {content}"))]
    ExcelWrongCellType { lineno: usize, content: String },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading a CSV line"))]
    CsvLineParse { source: csv::Error },
    #[snafu(display("Line {lineno} is too short"))]
    CsvLineTooShort { lineno: usize },
    #[snafu(display("Error opening file {path}"))]
    OpeningText {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Could not read {name} as a positive integer"))]
    ParsingJsonNumber { name: String },
    #[snafu(display("Error writing file {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Provider not implemented: {provider}"))]
    UnknownProvider { provider: String },
    #[snafu(display("Unknown ballot family: {family} (expected sequential, qr or auto)"))]
    UnknownFamily { family: String },
    #[snafu(display("No ballot source was given"))]
    MissingSource {},
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("Difference detected between calculated summary and reference summary"))]
    ReferenceMismatch {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type TraceResult<T> = Result<T, TraceError>;

/// Which decoder to apply to the identifiers of a source.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum FamilySelector {
    Sequential,
    Qr,
    Auto,
}

impl FamilySelector {
    pub fn parse(s: &str) -> TraceResult<FamilySelector> {
        match s {
            "sequential" | "barcode" => Ok(FamilySelector::Sequential),
            "qr" => Ok(FamilySelector::Qr),
            "auto" => Ok(FamilySelector::Auto),
            x => UnknownFamilySnafu { family: x }.fail(),
        }
    }

    pub fn decode(&self, raw: &str) -> Result<AnyBallot, CodecError> {
        match self {
            FamilySelector::Sequential => sequential::decode(raw).map(AnyBallot::Sequential),
            FamilySelector::Qr => obfuscated::decode(raw).map(AnyBallot::Obfuscated),
            FamilySelector::Auto => decode_any(raw),
        }
    }
}

pub mod config_reader {
    use crate::trace::*;

    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct OutputSettings {
        #[serde(rename = "contestName")]
        pub contest_name: String,
        #[serde(rename = "outputDirectory")]
        pub output_directory: Option<String>,
        #[serde(rename = "contestDate")]
        pub contest_date: Option<String>,
        #[serde(rename = "contestJurisdiction")]
        pub contest_jurisdiction: Option<String>,
    }

    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct OutputConfig {
        pub contest: String,
        pub date: Option<String>,
        pub jurisdiction: Option<String>,
    }

    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct FileSource {
        pub provider: String,
        #[serde(rename = "filePath")]
        pub file_path: String,
        pub family: Option<String>,
        #[serde(rename = "idColumnIndex")]
        pub id_column_index: Option<JSValue>,
        #[serde(rename = "firstRowIndex")]
        pub first_row_index: Option<JSValue>,
        #[serde(rename = "excelWorksheetName")]
        pub excel_worksheet_name: Option<String>,
    }

    impl FileSource {
        /// The column holding the identifiers, starting at 0. The first column by default.
        pub fn id_column(&self) -> TraceResult<usize> {
            let x = read_js_int(&self.id_column_index, "idColumnIndex")?.unwrap_or(1);
            Ok(x - 1)
        }

        /// The first row holding an identifier, starting at 1.
        pub fn first_row(&self) -> TraceResult<usize> {
            Ok(read_js_int(&self.first_row_index, "firstRowIndex")?.unwrap_or(1))
        }

        pub fn family_selector(&self) -> TraceResult<FamilySelector> {
            match self.family.as_deref() {
                None => Ok(FamilySelector::Auto),
                Some(s) => FamilySelector::parse(s),
            }
        }
    }

    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct TraceConfig {
        #[serde(rename = "outputSettings")]
        pub output_settings: OutputSettings,
        #[serde(rename = "ballotFileSources")]
        pub ballot_file_sources: Vec<FileSource>,
    }

    pub fn read_config(path: &str) -> TraceResult<TraceConfig> {
        let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
        let config: TraceConfig =
            serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
        Ok(config)
    }

    pub fn read_summary(path: &str) -> TraceResult<JSValue> {
        let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
        debug!("read content: {:?}", contents);
        let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
        Ok(js)
    }

    // Indexes may be written as numbers or as strings. They start at 1.
    fn read_js_int(x: &Option<JSValue>, name: &str) -> TraceResult<Option<usize>> {
        let v = match x {
            None | Some(JSValue::Null) => return Ok(None),
            Some(JSValue::Number(n)) => n.as_u64().map(|x| x as usize),
            Some(JSValue::String(s)) => s.trim().parse::<usize>().ok(),
            Some(_) => None,
        };
        match v {
            Some(x) if x >= 1 => Ok(Some(x)),
            _ => ParsingJsonNumberSnafu { name }.fail(),
        }
    }
}

/// An identifier, as read from a source. It has not been decoded yet.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedIdentifier {
    pub id: String,
    pub raw: String,
}

/// One decoded (or rejected) identifier.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TraceRow {
    pub id: String,
    pub input: String,
    pub result: Result<AnyBallot, CodecError>,
}

fn read_identifiers(root: Option<&Path>, cfs: &FileSource) -> TraceResult<Vec<ParsedIdentifier>> {
    let p: PathBuf = match root {
        Some(r) => r.join(&cfs.file_path),
        None => PathBuf::from(&cfs.file_path),
    };
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read identifier file {:?}", p2);
    match cfs.provider.as_str() {
        "text" => io_text::read_text_identifiers(&p2),
        "csv" => io_csv::read_csv_identifiers(&p2, cfs),
        "xlsx" => io_excel::read_excel_identifiers(&p2, cfs),
        x => UnknownProviderSnafu { provider: x }.fail(),
    }
}

/// Reads and decodes all the sources, in order.
pub fn decode_sources(sources: &[FileSource], root: Option<&Path>) -> TraceResult<Vec<TraceRow>> {
    ensure!(!sources.is_empty(), MissingSourceSnafu {});
    let mut res: Vec<TraceRow> = Vec::new();
    for cfs in sources.iter() {
        let family = cfs.family_selector()?;
        for pi in read_identifiers(root, cfs)? {
            let input = pi.raw.trim().to_string();
            let result = family.decode(&input);
            if let Err(e) = &result {
                warn!("{}: no result for {:?}: {}", pi.id, input, e);
            }
            res.push(TraceRow {
                id: pi.id,
                input,
                result,
            });
        }
    }
    Ok(res)
}

/// The JSON description of a decoded ballot.
pub fn ballot_to_json(ab: &AnyBallot) -> JSValue {
    let b = ab.ballot();
    let mut js = json!({
        "family": b.family.label(),
        "serial": b.serial,
        "serialText": b.serial_text,
        "bookId": b.book_id,
        "bookNumber": b.book_number,
        "positionInBook": b.position_in_book,
        "formula": b.formula(),
    });
    if let AnyBallot::Obfuscated(ob) = ab {
        js["payload"] = json!(ob.payload.as_str());
        js["witness"] = json!({
            "n": ob.witness.n,
            "i": ob.witness.i,
            "k": ob.witness.k,
        });
    }
    js
}

fn row_to_json(row: &TraceRow) -> JSValue {
    let mut js = match &row.result {
        Ok(ab) => ballot_to_json(ab),
        Err(e) => json!({ "error": e.to_string() }),
    };
    js["id"] = json!(row.id);
    js["input"] = json!(row.input);
    js
}

// The ballots grouped by book, books in the order they are first seen. A QR
// book and a barcode book may render to the same book id, they are still
// different books.
fn books_to_json(rows: &[TraceRow]) -> Vec<JSValue> {
    let mut order: Vec<(BallotFamily, String)> = Vec::new();
    let mut books: HashMap<(BallotFamily, String), Vec<JSValue>> = HashMap::new();
    for row in rows.iter() {
        if let Ok(ab) = &row.result {
            let b = ab.ballot();
            let key = (b.family, b.book_id.clone());
            if !books.contains_key(&key) {
                order.push(key.clone());
            }
            books.entry(key).or_default().push(json!({
                "id": row.id,
                "input": row.input,
                "serialText": b.serial_text,
                "positionInBook": b.position_in_book,
            }));
        }
    }
    order
        .iter()
        .map(|key| {
            let ballots = books.remove(key).unwrap_or_default();
            let (family, book_id) = key;
            json!({
                "family": family.label(),
                "bookId": book_id,
                "count": ballots.len(),
                "ballots": ballots,
            })
        })
        .collect()
}

pub fn build_summary_js(settings: &OutputSettings, rows: &[TraceRow]) -> JSValue {
    let c = OutputConfig {
        contest: settings.contest_name.clone(),
        date: settings.contest_date.clone(),
        jurisdiction: settings.contest_jurisdiction.clone(),
    };
    let books = books_to_json(rows);
    let num_books = books.len();
    let decoded = rows.iter().filter(|r| r.result.is_ok()).count();
    json!({
        "config": c,
        "results": rows.iter().map(row_to_json).collect::<Vec<JSValue>>(),
        "books": books,
        "stats": {
            "total": rows.len(),
            "decoded": decoded,
            "invalid": rows.len() - decoded,
            "books": num_books,
        },
    })
}

// Where the summary goes. None is the standard output.
fn summary_target(
    settings: &OutputSettings,
    root: Option<&Path>,
    out: &Option<String>,
) -> Option<PathBuf> {
    match out.as_deref() {
        Some("stdout") => None,
        Some(p) => Some(PathBuf::from(p)),
        None => settings.output_directory.as_ref().map(|d| {
            let dir = match root {
                Some(r) => r.join(d),
                None => PathBuf::from(d),
            };
            dir.join(format!("{}_summary.json", settings.contest_name))
        }),
    }
}

fn write_summary(
    settings: &OutputSettings,
    root: Option<&Path>,
    out: &Option<String>,
    pretty_js: &str,
) -> TraceResult<()> {
    match summary_target(settings, root, out) {
        None => println!("{}", pretty_js),
        Some(p) => {
            let path = p.display().to_string();
            info!("Writing summary to {:?}", path);
            fs::write(&p, pretty_js).context(WritingOutputSnafu { path })?;
        }
    }
    Ok(())
}

/// Decodes all the sources of a configuration and writes the summary.
///
/// Arguments:
/// * `root` the directory against which relative paths are resolved
/// * `out` overrides the output directory of the configuration (`stdout` is accepted)
/// * `check_summary_path` a reference summary. The run fails if the summary differs.
pub fn run_trace(
    config: &TraceConfig,
    root: Option<&Path>,
    out: &Option<String>,
    check_summary_path: Option<String>,
) -> TraceResult<()> {
    info!("config: {:?}", config);
    let rows = decode_sources(&config.ballot_file_sources, root)?;
    info!(
        "Decoded {} identifiers ({} without result)",
        rows.len(),
        rows.iter().filter(|r| r.result.is_err()).count()
    );

    let result_js = build_summary_js(&config.output_settings, &rows);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    write_summary(&config.output_settings, root, out, &pretty_js_stats)?;

    // The reference summary, if provided for comparison
    if let Some(summary_p) = check_summary_path {
        let summary_ref = read_summary(&summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            return ReferenceMismatchSnafu {}.fail();
        }
        info!("Summary matches the reference {:?}", summary_p);
    }
    Ok(())
}

/// Runs the configuration file at `config_path`, resolving the sources
/// against its directory.
pub fn run_trace_file(
    config_path: &str,
    out: &Option<String>,
    check_summary_path: Option<String>,
) -> TraceResult<()> {
    let config = read_config(config_path)?;
    let root_p = Path::new(config_path)
        .parent()
        .context(MissingParentDirSnafu {})?;
    run_trace(&config, Some(root_p), out, check_summary_path)
}

// The configuration of a run whose source comes from the command line. The
// output settings come from the configuration file when one is given, and its
// directory becomes the root of the output directory. The source is relative
// to the current directory.
fn source_config(
    config_path: Option<&str>,
    mut source: FileSource,
    contest_name: Option<String>,
) -> TraceResult<(TraceConfig, Option<PathBuf>)> {
    let (mut output_settings, root) = match config_path {
        Some(p) => {
            let root_p = Path::new(p).parent().context(MissingParentDirSnafu {})?;
            (read_config(p)?.output_settings, Some(root_p.to_path_buf()))
        }
        None => (
            OutputSettings {
                contest_name: "ballots".to_string(),
                output_directory: None,
                contest_date: None,
                contest_jurisdiction: None,
            },
            None,
        ),
    };
    if let Some(name) = contest_name {
        output_settings.contest_name = name;
    }
    if root.is_some() && Path::new(&source.file_path).is_relative() {
        let cwd = std::env::current_dir()
            .whatever_context::<_, TraceError>("Could not read the current directory")?;
        source.file_path = cwd.join(&source.file_path).display().to_string();
    }
    let config = TraceConfig {
        output_settings,
        ballot_file_sources: vec![source],
    };
    Ok((config, root))
}

/// Runs the `trace` command.
///
/// A source given on the command line replaces the sources of the
/// configuration file. At least one of them is required.
pub fn run_trace_command(
    config_path: Option<&str>,
    source: Option<FileSource>,
    contest_name: Option<String>,
    out: &Option<String>,
    check_summary_path: Option<String>,
) -> TraceResult<()> {
    match (config_path, source) {
        (Some(p), None) if contest_name.is_none() => run_trace_file(p, out, check_summary_path),
        (Some(p), None) => {
            let mut config = read_config(p)?;
            let root_p = Path::new(p).parent().context(MissingParentDirSnafu {})?;
            if let Some(name) = contest_name {
                config.output_settings.contest_name = name;
            }
            run_trace(&config, Some(root_p), out, check_summary_path)
        }
        (config_path, Some(source)) => {
            let (config, root) = source_config(config_path, source, contest_name)?;
            run_trace(&config, root.as_deref(), out, check_summary_path)
        }
        (None, None) => MissingSourceSnafu {}.fail(),
    }
}

#[cfg(test)]
fn test_dir() -> String {
    option_env!("BALLOT_TEST_DIR")
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("{}/testdata", env!("CARGO_MANIFEST_DIR")))
}

#[cfg(test)]
fn run_trace_test(test_name: &str) -> TraceResult<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let test_dir = test_dir();
    info!("Running test {}", test_name);
    run_trace_file(
        &format!("{}/{}/config.json", test_dir, test_name),
        &Some("stdout".to_string()),
        Some(format!("{}/{}/expected_summary.json", test_dir, test_name)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> OutputSettings {
        OutputSettings {
            contest_name: "test".to_string(),
            output_directory: None,
            contest_date: None,
            contest_jurisdiction: None,
        }
    }

    fn rows(inputs: &[&str], family: FamilySelector) -> Vec<TraceRow> {
        inputs
            .iter()
            .enumerate()
            .map(|(idx, s)| TraceRow {
                id: format!("row-{}", idx),
                input: s.to_string(),
                result: family.decode(s),
            })
            .collect()
    }

    #[test]
    fn pptv_evidence() {
        assert!(run_trace_test("pptv_evidence").is_ok());
    }

    #[test]
    fn mixed_station() {
        assert!(run_trace_test("mixed_station").is_ok());
    }

    #[test]
    fn reference_mismatch() {
        let test_dir = test_dir();
        let res = run_trace_file(
            &format!("{}/pptv_evidence/config.json", test_dir),
            &Some("stdout".to_string()),
            Some(format!("{}/mixed_station/expected_summary.json", test_dir)),
        );
        assert!(matches!(res, Err(TraceError::ReferenceMismatch {})));
    }

    #[test]
    fn unknown_provider() {
        let cfs = FileSource {
            provider: "pdf".to_string(),
            file_path: "ballots.pdf".to_string(),
            family: None,
            id_column_index: None,
            first_row_index: None,
            excel_worksheet_name: None,
        };
        let res = decode_sources(&[cfs], None);
        assert!(matches!(res, Err(TraceError::UnknownProvider { .. })));
        assert!(matches!(
            decode_sources(&[], None),
            Err(TraceError::MissingSource {})
        ));
    }

    #[test]
    fn missing_file() {
        let cfs = FileSource {
            provider: "text".to_string(),
            file_path: "does/not/exist.txt".to_string(),
            family: Some("sequential".to_string()),
            id_column_index: None,
            first_row_index: None,
            excel_worksheet_name: None,
        };
        let res = decode_sources(&[cfs], None);
        assert!(matches!(res, Err(TraceError::OpeningText { .. })));
    }

    fn cli_source(file_path: &str) -> FileSource {
        FileSource {
            provider: "text".to_string(),
            file_path: file_path.to_string(),
            family: None,
            id_column_index: None,
            first_row_index: None,
            excel_worksheet_name: None,
        }
    }

    #[test]
    fn trace_command_needs_a_source() {
        let res = run_trace_command(None, None, None, &None, None);
        assert!(matches!(res, Err(TraceError::MissingSource {})));
    }

    #[test]
    fn trace_command_with_config_and_input() {
        let config_path = format!("{}/pptv_evidence/config.json", test_dir());
        let (config, root) = source_config(
            Some(&config_path),
            cli_source("night_shift.txt"),
            Some("night shift".to_string()),
        )
        .unwrap();
        let settings = &config.output_settings;
        assert_eq!(settings.contest_name, "night shift");
        assert_eq!(settings.contest_date, Some("2026-02-08".to_string()));
        let root = root.unwrap();
        assert_eq!(root, Path::new(&config_path).parent().unwrap());

        // The input is not resolved against the configuration directory.
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(
            PathBuf::from(&config.ballot_file_sources[0].file_path),
            cwd.join("night_shift.txt")
        );

        // The output directory is.
        let mut settings = settings.clone();
        settings.output_directory = Some("out".to_string());
        assert_eq!(
            summary_target(&settings, Some(root.as_path()), &None),
            Some(root.join("out").join("night shift_summary.json"))
        );
        assert_eq!(
            summary_target(&settings, Some(root.as_path()), &Some("stdout".to_string())),
            None
        );
    }

    #[test]
    fn trace_command_without_config() {
        let (config, root) = source_config(None, cli_source("ballots.txt"), None).unwrap();
        assert_eq!(root, None);
        assert_eq!(config.output_settings.contest_name, "ballots");
        assert_eq!(config.ballot_file_sources[0].file_path, "ballots.txt");
    }

    #[test]
    fn trace_command_runs_input() {
        let test_dir = test_dir();
        let res = run_trace_command(
            None,
            Some(cli_source(&format!("{}/pptv_evidence/ballots.txt", test_dir))),
            None,
            &Some("stdout".to_string()),
            None,
        );
        assert!(res.is_ok());
    }

    #[test]
    fn config_indexes() {
        let js = r#"{
            "outputSettings": {"contestName": "station 12"},
            "ballotFileSources": [
                {"provider": "csv", "filePath": "a.csv", "idColumnIndex": 2, "firstRowIndex": "3", "family": "qr"},
                {"provider": "text", "filePath": "b.txt"},
                {"provider": "csv", "filePath": "c.csv", "idColumnIndex": 0}
            ]
        }"#;
        let config: TraceConfig = serde_json::from_str(js).unwrap();
        let s = &config.ballot_file_sources;
        assert_eq!(s[0].id_column().unwrap(), 1);
        assert_eq!(s[0].first_row().unwrap(), 3);
        assert_eq!(s[0].family_selector().unwrap(), FamilySelector::Qr);
        assert_eq!(s[1].id_column().unwrap(), 0);
        assert_eq!(s[1].first_row().unwrap(), 1);
        assert_eq!(s[1].family_selector().unwrap(), FamilySelector::Auto);
        assert!(matches!(
            s[2].id_column(),
            Err(TraceError::ParsingJsonNumber { .. })
        ));
        assert_eq!(config.output_settings.output_directory, None);
    }

    #[test]
    fn unknown_family() {
        assert!(matches!(
            FamilySelector::parse("green"),
            Err(TraceError::UnknownFamily { .. })
        ));
        assert_eq!(
            FamilySelector::parse("barcode").unwrap(),
            FamilySelector::Sequential
        );
    }

    #[test]
    fn family_is_enforced() {
        let r = rows(&["K7W9D", "A03398985"], FamilySelector::Sequential);
        assert_eq!(r[0].result, Err(CodecError::InvalidFormat));
        assert!(r[1].result.is_ok());
        let r = rows(&["K7W9D", "A03398985"], FamilySelector::Qr);
        assert!(r[0].result.is_ok());
        assert_eq!(r[1].result, Err(CodecError::InvalidFormat));
    }

    #[test]
    fn summary_groups_books() {
        let r = rows(
            &["A37805049", "A37805050", "bad", "A37805055", "A37804930"],
            FamilySelector::Auto,
        );
        let js = build_summary_js(&settings(), &r);
        assert_eq!(js["stats"]["total"], json!(5));
        assert_eq!(js["stats"]["decoded"], json!(4));
        assert_eq!(js["stats"]["invalid"], json!(1));
        assert_eq!(js["stats"]["books"], json!(2));
        assert_eq!(js["books"][0]["bookId"], json!("A1890253"));
        assert_eq!(js["books"][0]["count"], json!(3));
        assert_eq!(js["books"][1]["bookId"], json!("A1890247"));
        assert_eq!(js["books"][0]["family"], json!("sequential"));
        assert_eq!(
            js["books"][1]["ballots"][0],
            json!({
                "id": "row-4",
                "input": "A37804930",
                "serialText": "A37804930",
                "positionInBook": 10,
            })
        );
        assert_eq!(js["results"][2]["error"], json!("invalid format"));
        assert_eq!(js["results"][2]["id"], json!("row-2"));
        assert_eq!(js["config"]["date"], JSValue::Null);
    }

    #[test]
    fn families_do_not_share_books() {
        // Both render to book B0094375.
        let r = rows(&["K7W9D", "B01887493", "k7w9d"], FamilySelector::Auto);
        assert_eq!(r[1].result.as_ref().unwrap().ballot().book_id, "B0094375");
        let js = build_summary_js(&settings(), &r);
        assert_eq!(js["stats"]["books"], json!(2));
        assert_eq!(js["books"][0]["family"], json!("qr"));
        assert_eq!(js["books"][0]["bookId"], json!("B0094375"));
        assert_eq!(js["books"][0]["count"], json!(2));
        assert_eq!(js["books"][0]["ballots"][1]["id"], json!("row-2"));
        assert_eq!(js["books"][0]["ballots"][1]["input"], json!("k7w9d"));
        assert_eq!(js["books"][1]["family"], json!("sequential"));
        assert_eq!(js["books"][1]["bookId"], json!("B0094375"));
        assert_eq!(js["books"][1]["count"], json!(1));
        assert_eq!(js["books"][1]["ballots"][0]["input"], json!("B01887493"));
    }

    #[test]
    fn qr_ballot_json() {
        let b = decode_any("K7W9D").unwrap();
        let js = ballot_to_json(&b);
        assert_eq!(
            js,
            json!({
                "family": "qr",
                "serial": 1887493,
                "serialText": "B01887493",
                "bookId": "B0094375",
                "bookNumber": 94375,
                "positionInBook": 13,
                "formula": "⌊1887493 / 20⌋ + 1 = ⌊94374.6⌋ + 1 = 94374 + 1 = 94375",
                "payload": "K7W9D",
                "witness": {"n": 33960721, "i": 7, "k": 67926772},
            })
        );
    }

    #[test]
    fn summary_is_deterministic() {
        let r = rows(&["K7W9D", "A03398985", "E5TX8", "CXSK0"], FamilySelector::Auto);
        let a = serde_json::to_string_pretty(&build_summary_js(&settings(), &r)).unwrap();
        let b = serde_json::to_string_pretty(&build_summary_js(&settings(), &r)).unwrap();
        assert_eq!(a, b);
    }
}
