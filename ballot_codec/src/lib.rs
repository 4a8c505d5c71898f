/*!
Decoders for the serial markings printed on pre-numbered paper ballots.

Two families of ballots are supported:
- the barcode family ([sequential]): the serial is printed in clear, for
  example `A03398985`;
- the QR family ([obfuscated]): a 5-character base-36 payload such as
  `K7W9D`, shifted by a key read from its second character.

In both cases the serial gives the counterfoil book (20 ballots per book)
and the position of the ballot inside it, see [locator].

```
let b = ballot_codec::decode_any("K7W9D").unwrap();
assert_eq!(b.ballot().book_id, "B0094375");
assert_eq!(b.ballot().position_in_book, 13);
```

See the [manual] for the details of each format.
*/

mod config;
pub mod locator;
pub mod manual;
pub mod obfuscated;
pub mod sequential;

pub use crate::config::*;

use crate::obfuscated::ObfuscatedBallot;
use crate::sequential::SequentialBallot;

/// A ballot of either family.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum AnyBallot {
    Sequential(SequentialBallot),
    Obfuscated(ObfuscatedBallot),
}

impl AnyBallot {
    pub fn ballot(&self) -> &DecodedBallot {
        match self {
            AnyBallot::Sequential(b) => &b.ballot,
            AnyBallot::Obfuscated(b) => &b.ballot,
        }
    }

    pub fn family(&self) -> BallotFamily {
        self.ballot().family
    }
}

/// Decodes an identifier of any family.
///
/// The barcode family is tried first: an input of five digits is valid in
/// both families and is read as a barcode.
pub fn decode_any(raw: &str) -> Result<AnyBallot, CodecError> {
    if let Ok(b) = sequential::decode(raw) {
        return Ok(AnyBallot::Sequential(b));
    }
    obfuscated::decode(raw).map(AnyBallot::Obfuscated)
}
