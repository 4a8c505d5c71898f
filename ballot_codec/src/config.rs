// ********* Protocol constants ***********

// The printing scheme of the ballots. These values were recovered from
// published ballots and must be reproduced exactly: a revision of the scheme
// only needs to touch this table.

/// Number of ballots bound in one physical book.
pub const BOOK_SIZE: u64 = 20;

/// Digits of the QR family, in value order.
pub const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Radix of the QR family.
pub const RADIX: u64 = 36;

/// Number of characters in a QR payload.
pub const PAYLOAD_LENGTH: usize = 5;

/// Exclusive upper bound of the raw payload value: 36^5.
pub const MAX_RAW_VALUE: u64 = 60_466_176;

/// Serials of the QR family are taken modulo this value (8 decimal digits).
pub const SERIAL_MODULUS: u64 = 100_000_000;

pub const KEY_MULTIPLIER: u64 = 32_216_237;

pub const KEY_OFFSET: u64 = 42_413_113;

/// Position of the payload character that selects the key.
pub const KEY_CHAR_POSITION: usize = 1;

/// Letter printed in front of the serials and books of the QR family.
pub const OBFUSCATED_TAG: char = 'B';

/// Width of a rendered QR family serial.
pub const SERIAL_WIDTH: usize = 8;

/// Width of the numeric part of a rendered book identifier.
pub const BOOK_ID_WIDTH: usize = 7;

/// Minimum number of digits for a barcode serial. Shorter numbers are not
/// treated as ballots.
pub const MIN_SEQUENTIAL_DIGITS: usize = 5;

/// Number of times the serial modulus can be added back when inverting the
/// keyed offset. Three are enough because 36^5 < 3 * 10^8.
pub const WRAP_COUNT: u64 = 3;

// ********* Output data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The ballot families that are supported.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum BallotFamily {
    /// The barcode family: the serial is printed in clear.
    Sequential,
    /// The QR family: the serial is hidden behind a keyed offset.
    Obfuscated,
}

impl BallotFamily {
    pub fn label(&self) -> &'static str {
        match self {
            BallotFamily::Sequential => "sequential",
            BallotFamily::Obfuscated => "qr",
        }
    }
}

/// The physical location of a ballot.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct BookLocation {
    /// Starts at 1.
    pub book_number: u64,
    /// Between 1 and the book size, both included.
    pub position_in_book: u64,
}

/// The result shared by both families.
///
/// The book number and the position are always derived from the serial, they
/// are never read from the input.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct DecodedBallot {
    pub family: BallotFamily,
    pub serial: u64,
    /// The serial as it is printed on the ballot.
    pub serial_text: String,
    pub book_number: u64,
    pub position_in_book: u64,
    /// The identifier of the counterfoil book.
    pub book_id: String,
}

impl DecodedBallot {
    /// The derivation of the book number, as shown next to a result.
    ///
    /// ```
    /// let b = ballot_codec::sequential::decode("A03398985").unwrap().ballot;
    /// assert_eq!(
    ///     b.formula(),
    ///     "⌊3398985 / 20⌋ + 1 = ⌊169949.2⌋ + 1 = 169949 + 1 = 169950"
    /// );
    /// ```
    ///
    /// The quotient is shown with one decimal, truncated, so that it never
    /// reads above its floor.
    pub fn formula(&self) -> String {
        let quotient = self.serial / BOOK_SIZE;
        let tenths = (self.serial % BOOK_SIZE) * 10 / BOOK_SIZE;
        format!(
            "⌊{} / {}⌋ + 1 = ⌊{}.{}⌋ + 1 = {} + 1 = {}",
            self.serial, BOOK_SIZE, quotient, tenths, quotient, self.book_number
        )
    }
}

/// Errors returned by the codecs.
///
/// None of them is fatal: they mean that there is nothing to show for this
/// input.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum CodecError {
    /// The input does not have the structure of an identifier of this family.
    InvalidFormat,
    /// No QR payload decodes to the requested serial.
    NotEncodable,
}

impl Error for CodecError {}

impl Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::InvalidFormat => write!(f, "invalid format"),
            CodecError::NotEncodable => write!(f, "no QR payload exists for this serial"),
        }
    }
}

/// Renders a book identifier: optional prefix, then the zero-padded book number.
pub(crate) fn render_book_id(prefix: Option<char>, book_number: u64) -> String {
    match prefix {
        Some(c) => format!("{}{:0width$}", c, book_number, width = BOOK_ID_WIDTH),
        None => format!("{:0width$}", book_number, width = BOOK_ID_WIDTH),
    }
}
