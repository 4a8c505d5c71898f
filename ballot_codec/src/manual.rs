/*!

This is the long-form manual for `ballot_codec` and `ballottrace`.

## Books

Ballots are printed in books of 20. Each book has a counterfoil that the
polling station staff fills in when a ballot is handed out, in order. Knowing
the book and the position of a ballot inside the book is therefore enough to
find the matching counterfoil entry.

For a serial `N`:

```text
book     = ⌊N / 20⌋ + 1
position = N mod 20, or 20 when N is a multiple of 20
```

On multiples of 20 the two formulas disagree: serial 20 falls in book 2 but
at position 20. The formulas are applied as published.

## Barcode family

Accepted inputs: an optional letter followed by at least 5 digits, for
example `A03398985` or `03398985`. Lowercase letters and surrounding
whitespace are accepted. The book identifier repeats the letter followed by
the book number on 7 digits: `A03398985` is in book `A0169950`, position 5.

## QR family

Accepted inputs: exactly 5 characters among `0-9` and `A-Z`.

```text
n      = value of the 5 characters in base 36
i      = value of the second character
k      = (32216237 * i + 42413113) mod 100000000
serial = (n + k) mod 100000000
```

The serial is printed as `B` followed by 8 digits and the book as `B`
followed by 7 digits: `K7W9D` is serial `B01887493`, book `B0094375`,
position 13.

Going from a serial back to a payload requires a search (see
[crate::obfuscated::encode]). Most serials have no payload at all. A few have
more than one: `CXSK0` and `E5TX8` both decode to `B27280982`, and the search
returns `E5TX8`.

## `ballottrace`

```bash
ballottrace sequential A03398985
ballottrace qr K7W9D
ballottrace encode B01887493 --all
ballottrace locate 3398985
ballottrace trace -i ballots.txt --family auto
ballottrace trace -c station_12/config.json --reference station_12/expected_summary.json
```

### Input types for `trace`

* `text`: one identifier per line. Blank lines and lines starting with `#`
  are skipped.
* `csv`: identifiers in the column given by `idColumnIndex` (starting at 1),
  from the row given by `firstRowIndex` (starting at 1).
* `xlsx`: same as `csv`, in the worksheet `excelWorksheetName` or in the
  first worksheet.

*/
