use crate::config::{BookLocation, BOOK_SIZE};

/// Finds the book and the position in the book of a serial.
///
/// Both families go through this function.
///
/// The two derivations do not agree on exact multiples of the book size:
/// serial 20 is placed in book 2 but at position 20, which would be the last
/// slot of book 1. This is how the published formula behaves and it is kept
/// as is.
///
/// Panics if `book_size` is zero.
pub fn locate(serial: u64, book_size: u64) -> BookLocation {
    assert!(book_size > 0, "The book size must be positive");
    let book_number = serial / book_size + 1;
    let position_in_book = match serial % book_size {
        0 => book_size,
        r => r,
    };
    BookLocation {
        book_number,
        position_in_book,
    }
}

/// Same as [locate] with books of 20 ballots.
pub fn locate_default(serial: u64) -> BookLocation {
    locate(serial, BOOK_SIZE)
}
