use clap::{Parser, Subcommand};

/// Traces the markings printed on ballots back to their serial number, counterfoil
/// book and position in the book.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Command,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, global = true, takes_value = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Decodes the barcode of a ballot (optional letter followed by at least 5 digits,
    /// for example A03398985).
    Sequential {
        #[clap(value_parser)]
        id: String,
    },
    /// Decodes the 5-character QR payload of a ballot (for example K7W9D).
    Qr {
        #[clap(value_parser)]
        payload: String,
    },
    /// Finds the QR payload that decodes to a serial (for example B01887493 or 1887493).
    Encode {
        #[clap(value_parser)]
        serial: String,
        /// Lists every payload that decodes to this serial, not only the first one.
        #[clap(long, takes_value = false)]
        all: bool,
    },
    /// Finds the book and the position in the book of a serial.
    Locate {
        #[clap(value_parser)]
        serial: u64,
        /// The number of ballots in a book.
        #[clap(long, value_parser = clap::value_parser!(u64).range(1..), default_value_t = 20)]
        book_size: u64,
    },
    /// Decodes all the identifiers of one or more files and groups them by book.
    Trace(TraceArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct TraceArgs {
    /// (file path, optional) A JSON file describing the sources to decode.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference file containing the expected summary in JSON format. If provided,
    /// ballottrace will check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary will be written in JSON format to the given
    /// location. Setting this option overrides the output directory of the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) The file containing the identifiers. Setting this option replaces the sources of
    /// the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default text) The type of the input: text, csv or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default auto) The family of the identifiers: sequential, qr or auto.
    #[clap(long, value_parser)]
    pub family: Option<String>,

    /// (default 1) For csv and xlsx inputs, the column holding the identifiers, starting at 1.
    #[clap(long, value_parser)]
    pub id_column: Option<u64>,

    /// (default 1) For csv and xlsx inputs, the first row holding an identifier, starting at 1.
    #[clap(long, value_parser)]
    pub first_row: Option<u64>,

    /// When using an Excel file, indicates the name of the worksheet to use. The first
    /// worksheet is used by default.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (default "ballots") The name of the run, used in the summary and for the output file name.
    #[clap(long, value_parser)]
    pub contest_name: Option<String>,
}
