//! The QR family.
//!
//! The QR code printed on these ballots holds 5 base-36 characters. Their
//! value `n` is shifted by a key `k` that depends only on the second
//! character:
//!
//! ```text
//! i      = index of the second character
//! k      = (32216237 * i + 42413113) mod 10^8
//! serial = (n + k) mod 10^8
//! ```
//!
//! Decoding is direct. Encoding is not: the key is read from the payload that
//! is being searched for. [encode] tries every key index for every way the
//! modulus could have wrapped and keeps the payloads whose second character
//! is the key index that was assumed.

use log::debug;

use crate::config::*;
use crate::locator::locate_default;

/// A validated QR payload: 5 uppercase base-36 characters.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct ObfuscatedPayload([u8; PAYLOAD_LENGTH]);

impl ObfuscatedPayload {
    /// Normalizes (trim, uppercase) and validates a payload.
    pub fn parse(raw: &str) -> Result<ObfuscatedPayload, CodecError> {
        let cleaned = raw.trim().to_uppercase();
        let bytes = cleaned.as_bytes();
        if bytes.len() != PAYLOAD_LENGTH {
            return Err(CodecError::InvalidFormat);
        }
        let mut text = [0u8; PAYLOAD_LENGTH];
        for (dst, &c) in text.iter_mut().zip(bytes) {
            if digit_value(c).is_none() {
                return Err(CodecError::InvalidFormat);
            }
            *dst = c;
        }
        Ok(ObfuscatedPayload(text))
    }

    /// Renders a raw value as a payload, left-padded with zeros.
    fn from_raw(n: u64) -> Option<ObfuscatedPayload> {
        if n >= MAX_RAW_VALUE {
            return None;
        }
        let mut text = [ALPHABET[0]; PAYLOAD_LENGTH];
        let mut rest = n;
        for dst in text.iter_mut().rev() {
            *dst = ALPHABET[(rest % RADIX) as usize];
            rest /= RADIX;
        }
        Some(ObfuscatedPayload(text))
    }

    pub fn as_str(&self) -> &str {
        // Only bytes of the alphabet are ever stored.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// The base-36 value of the payload, in [0, 36^5).
    pub fn raw_value(&self) -> u64 {
        self.0.iter().fold(0, |acc, &c| {
            acc * RADIX + digit_value(c).unwrap_or_default() as u64
        })
    }

    /// The index of the character that selects the key.
    pub fn key_index(&self) -> u8 {
        digit_value(self.0[KEY_CHAR_POSITION]).unwrap_or_default()
    }
}

impl std::fmt::Display for ObfuscatedPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The intermediate values of a decoding, kept for display.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct KeyedTransformWitness {
    /// Raw base-36 value of the payload.
    pub n: u64,
    /// Alphabet index of the second character.
    pub i: u8,
    /// The key derived from `i`.
    pub k: u64,
}

/// A decoded QR payload.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct ObfuscatedBallot {
    pub payload: ObfuscatedPayload,
    pub witness: KeyedTransformWitness,
    pub ballot: DecodedBallot,
}

fn digit_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'A'..=b'Z' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// The key selected by a key index.
pub fn key(i: u8) -> u64 {
    (KEY_MULTIPLIER * i as u64 + KEY_OFFSET) % SERIAL_MODULUS
}

/// Renders a serial of this family: `B` and 8 digits.
pub fn render_serial(serial: u64) -> String {
    format!("{}{:0width$}", OBFUSCATED_TAG, serial, width = SERIAL_WIDTH)
}

/// Decodes a QR payload into its serial, book and position.
///
/// ```
/// let b = ballot_codec::obfuscated::decode("K7W9D").unwrap();
/// assert_eq!(b.ballot.serial_text, "B01887493");
/// assert_eq!(b.ballot.book_id, "B0094375");
/// assert_eq!(b.ballot.position_in_book, 13);
/// ```
pub fn decode(raw: &str) -> Result<ObfuscatedBallot, CodecError> {
    let payload = ObfuscatedPayload::parse(raw)?;
    Ok(decode_payload(&payload))
}

/// Decodes a payload that was already validated.
pub fn decode_payload(payload: &ObfuscatedPayload) -> ObfuscatedBallot {
    let n = payload.raw_value();
    let i = payload.key_index();
    let k = key(i);
    let serial = (n + k) % SERIAL_MODULUS;
    let loc = locate_default(serial);
    let ballot = DecodedBallot {
        family: BallotFamily::Obfuscated,
        serial,
        serial_text: render_serial(serial),
        book_number: loc.book_number,
        position_in_book: loc.position_in_book,
        book_id: render_book_id(Some(OBFUSCATED_TAG), loc.book_number),
    };
    debug!(
        "obfuscated::decode: {} n={} i={} k={} -> {:?}",
        payload, n, i, k, ballot
    );
    ObfuscatedBallot {
        payload: *payload,
        witness: KeyedTransformWitness { n, i, k },
        ballot,
    }
}

/// Every (wrap, key index) pair whose payload is self-consistent, in search
/// order: by number of wraps first, then by key index.
///
/// The search is bounded by `WRAP_COUNT * 36` candidates.
fn search(serial: u64) -> impl Iterator<Item = ObfuscatedPayload> {
    // Out of range serials get an empty search.
    let wraps = if serial < SERIAL_MODULUS { WRAP_COUNT } else { 0 };
    (0..wraps)
        .flat_map(|wrap| (0..RADIX as u8).map(move |i| (wrap, i)))
        .filter_map(move |(wrap, i)| {
            let n = (serial + wrap * SERIAL_MODULUS).checked_sub(key(i))?;
            let candidate = ObfuscatedPayload::from_raw(n)?;
            // The key index that was assumed must be the one printed.
            if candidate.key_index() != i {
                return None;
            }
            debug!(
                "obfuscated::search: serial={} wrap={} i={} -> {}",
                serial, wrap, i, candidate
            );
            Some(candidate)
        })
}

/// All the payloads that decode to a serial, in the order [encode] tries them.
pub fn encode_all(serial: u64) -> Vec<ObfuscatedPayload> {
    search(serial).collect()
}

/// Finds the QR payload of a serial.
///
/// When several payloads decode to the same serial, the first one in the
/// order of [encode_all] is returned.
///
/// ```
/// use ballot_codec::obfuscated::encode;
/// assert_eq!(encode(1887493).unwrap().as_str(), "K7W9D");
/// assert!(encode(0).is_err());
/// ```
pub fn encode(serial: u64) -> Result<ObfuscatedPayload, CodecError> {
    search(serial).next().ok_or_else(|| {
        debug!("obfuscated::encode: no payload for serial {}", serial);
        CodecError::NotEncodable
    })
}

/// Accepts a serial either as a bare number or in its printed form (`B01887493`).
pub fn parse_serial(raw: &str) -> Result<u64, CodecError> {
    let cleaned = raw.trim().to_uppercase();
    let digits = cleaned.strip_prefix(OBFUSCATED_TAG).unwrap_or(cleaned.as_str());
    if digits.is_empty() || !digits.bytes().all(|c| c.is_ascii_digit()) {
        return Err(CodecError::InvalidFormat);
    }
    digits.parse::<u64>().map_err(|_| CodecError::InvalidFormat)
}
