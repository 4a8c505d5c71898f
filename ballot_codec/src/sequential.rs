//! The barcode family.
//!
//! The barcode prints the serial in clear, optionally after a single letter:
//! `A03398985` is serial 3398985 of series `A`.

use log::debug;
use regex::Regex;
use std::sync::OnceLock;

use crate::config::*;
use crate::locator::locate_default;

/// A validated barcode identifier.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct SequentialBallotId {
    /// An uppercase ASCII letter, if the barcode starts with one.
    pub prefix: Option<char>,
    pub serial: u64,
}

/// A decoded barcode.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct SequentialBallot {
    pub id: SequentialBallotId,
    pub ballot: DecodedBallot,
}

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // Only ASCII classes: the crate is built without the unicode tables.
        let p = format!("^([A-Z]?)([0-9]{{{},}})$", MIN_SEQUENTIAL_DIGITS);
        Regex::new(&p).expect("the barcode pattern is valid")
    })
}

/// Parses and validates a barcode without locating it.
pub fn parse(raw: &str) -> Result<SequentialBallotId, CodecError> {
    let cleaned = raw.trim().to_uppercase();
    let caps = pattern()
        .captures(&cleaned)
        .ok_or(CodecError::InvalidFormat)?;
    let prefix = caps.get(1).and_then(|m| m.as_str().chars().next());
    let digits = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
    // More than 19 digits does not fit: it is not a ballot either.
    let serial = digits
        .parse::<u64>()
        .map_err(|_| CodecError::InvalidFormat)?;
    Ok(SequentialBallotId { prefix, serial })
}

/// Decodes a barcode into its serial, book and position.
///
/// ```
/// let b = ballot_codec::sequential::decode(" a03398985 ").unwrap();
/// assert_eq!(b.ballot.serial, 3398985);
/// assert_eq!(b.ballot.book_id, "A0169950");
/// assert_eq!(b.ballot.position_in_book, 5);
/// ```
pub fn decode(raw: &str) -> Result<SequentialBallot, CodecError> {
    let id = parse(raw)?;
    let loc = locate_default(id.serial);
    let serial_text = raw.trim().to_uppercase();
    let ballot = DecodedBallot {
        family: BallotFamily::Sequential,
        serial: id.serial,
        serial_text,
        book_number: loc.book_number,
        position_in_book: loc.position_in_book,
        book_id: render_book_id(id.prefix, loc.book_number),
    };
    debug!("sequential::decode: {:?} -> {:?}", raw, ballot);
    Ok(SequentialBallot { id, ballot })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_fixture() {
        let b = decode("A03398985").unwrap();
        assert_eq!(
            b.id,
            SequentialBallotId {
                prefix: Some('A'),
                serial: 3398985
            }
        );
        assert_eq!(b.ballot.serial, 3398985);
        assert_eq!(b.ballot.serial_text, "A03398985");
        assert_eq!(b.ballot.book_number, 169950);
        assert_eq!(b.ballot.position_in_book, 5);
        assert_eq!(b.ballot.book_id, "A0169950");
        assert_eq!(b.ballot.family, BallotFamily::Sequential);
    }

    // Four ballots photographed at the same polling station.
    #[test]
    fn same_station_books() {
        let books: Vec<String> = ["A37805049", "A37805050", "A37805055", "A37804930"]
            .iter()
            .map(|s| decode(s).unwrap().ballot.book_id)
            .collect();
        assert_eq!(books, vec!["A1890253", "A1890253", "A1890253", "A1890247"]);
        assert_eq!(decode("A37805049").unwrap().ballot.position_in_book, 9);
        assert_eq!(decode("A37804930").unwrap().ballot.position_in_book, 10);
    }

    #[test]
    fn no_prefix() {
        let b = decode("03398985").unwrap();
        assert_eq!(b.id.prefix, None);
        assert_eq!(b.ballot.book_id, "0169950");
        let b = decode("12345").unwrap();
        assert_eq!(b.ballot.serial, 12345);
        assert_eq!(b.ballot.book_number, 618);
        assert_eq!(b.ballot.position_in_book, 5);
    }

    #[test]
    fn normalization() {
        let b = decode("  a37805049\n").unwrap();
        assert_eq!(b.ballot.serial_text, "A37805049");
        assert_eq!(b.ballot.book_id, "A1890253");
    }

    #[test]
    fn tens_of_millions() {
        let b = decode("99999999").unwrap();
        assert_eq!(b.ballot.serial, 99_999_999);
        assert_eq!(b.ballot.book_number, 5_000_000);
        assert_eq!(b.ballot.position_in_book, 19);
        let b = decode("Z18446744073709551615").unwrap();
        assert_eq!(b.ballot.serial, u64::MAX);
    }

    // The position and the book number disagree on multiples of 20.
    #[test]
    fn book_boundary_is_pinned() {
        let b = decode("A00020").unwrap();
        assert_eq!(b.ballot.book_number, 2);
        assert_eq!(b.ballot.position_in_book, 20);
        assert_eq!(b.ballot.book_id, "A0000002");
        let b = decode("A00040").unwrap();
        assert_eq!(b.ballot.book_number, 3);
        assert_eq!(b.ballot.position_in_book, 20);
        let b = decode("A00021").unwrap();
        assert_eq!(b.ballot.book_number, 2);
        assert_eq!(b.ballot.position_in_book, 1);
    }

    #[test]
    fn interior_round_trip() {
        for n in 1..1000u64 {
            let b = decode(&format!("A{:08}", n)).unwrap().ballot;
            if n % 20 != 0 {
                assert_eq!((b.book_number - 1) * 20 + b.position_in_book, n);
            } else {
                assert_eq!(b.position_in_book, 20);
                assert_eq!((b.book_number - 2) * 20 + 20, n);
            }
        }
    }

    #[test]
    fn invalid_inputs() {
        for s in [
            "",
            "   ",
            "A1234",
            "1234",
            "AB12345",
            "A12345B",
            "A-12345",
            "12 345",
            "é12345",
            "A１２３４５",
            "K7W9D",
            // Does not fit in 64 bits.
            "A99999999999999999999",
        ] {
            assert_eq!(decode(s), Err(CodecError::InvalidFormat), "{:?}", s);
        }
    }

    #[test]
    fn deterministic() {
        assert_eq!(decode("A03398985"), decode("A03398985"));
    }
}
