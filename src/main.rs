mod args;
mod trace;

use log::{debug, info, LevelFilter};

use ballot_codec::locator::locate;
use ballot_codec::*;
use clap::Parser;
use serde_json::json;
use serde_json::Value as JSValue;

use crate::args::{Args, Command, TraceArgs};
use crate::trace::config_reader::FileSource;
use crate::trace::{ballot_to_json, run_trace_command, TraceResult};

// Exit code when the input has no decoding. I/O and configuration problems use 1.
const NO_RESULT_EXIT_CODE: i32 = 2;

fn print_js(js: &JSValue) {
    match serde_json::to_string_pretty(js) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Could not render the result: {}", e),
    }
}

fn no_result(input: &str, e: CodecError) -> i32 {
    eprintln!("No result for {:?}: {}", input, e);
    NO_RESULT_EXIT_CODE
}

fn run_decode(input: &str, res: Result<AnyBallot, CodecError>) -> i32 {
    match res {
        Ok(b) => {
            let mut js = ballot_to_json(&b);
            js["input"] = json!(input.trim());
            print_js(&js);
            0
        }
        Err(e) => no_result(input, e),
    }
}

fn run_encode(input: &str, all: bool) -> i32 {
    let serial = match obfuscated::parse_serial(input) {
        Ok(x) => x,
        Err(e) => return no_result(input, e),
    };
    let payload = match obfuscated::encode(serial) {
        Ok(p) => p,
        Err(e) => return no_result(input, e),
    };
    debug!("run_encode: {} -> {}", serial, payload);
    let mut js = ballot_to_json(&AnyBallot::Obfuscated(obfuscated::decode_payload(
        &payload,
    )));
    if all {
        let payloads: Vec<String> = obfuscated::encode_all(serial)
            .iter()
            .map(|p| p.to_string())
            .collect();
        js["payloads"] = json!(payloads);
    }
    print_js(&js);
    0
}

fn run_locate(serial: u64, book_size: u64) -> i32 {
    let loc = locate(serial, book_size);
    print_js(&json!({
        "serial": serial,
        "bookSize": book_size,
        "bookNumber": loc.book_number,
        "positionInBook": loc.position_in_book,
    }));
    0
}

// A single source described on the command line.
fn source_from_args(args: &TraceArgs, input: &str) -> FileSource {
    FileSource {
        provider: args
            .input_type
            .clone()
            .unwrap_or_else(|| "text".to_string()),
        file_path: input.to_string(),
        family: args.family.clone(),
        id_column_index: args.id_column.map(|x| json!(x)),
        first_row_index: args.first_row.map(|x| json!(x)),
        excel_worksheet_name: args.excel_worksheet_name.clone(),
    }
}

fn run_trace_args(args: &TraceArgs) -> TraceResult<()> {
    run_trace_command(
        args.config.as_deref(),
        args.input.as_deref().map(|input| source_from_args(args, input)),
        args.contest_name.clone(),
        &args.out,
        args.reference.clone(),
    )
}

fn main() {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::new()
            .filter_level(LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }
    info!("args: {:?}", args);

    let code = match &args.command {
        Command::Sequential { id } => {
            run_decode(id, sequential::decode(id).map(AnyBallot::Sequential))
        }
        Command::Qr { payload } => {
            run_decode(payload, obfuscated::decode(payload).map(AnyBallot::Obfuscated))
        }
        Command::Encode { serial, all } => run_encode(serial, *all),
        Command::Locate { serial, book_size } => run_locate(*serial, *book_size),
        Command::Trace(trace_args) => match run_trace_args(trace_args) {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("An error occurred: {}", e);
                1
            }
        },
    };
    std::process::exit(code);
}
