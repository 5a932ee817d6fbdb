//! `card;amount` line format.

use std::str::from_utf8;

use nom::{
    bytes::complete::take_until,
    character::complete::char,
    combinator::all_consuming,
    number::complete::double,
    sequence::separated_pair,
    IResult,
};

use crate::{charge::Charge, error::ChargeFileError};

fn charge_line(input: &[u8]) -> IResult<&[u8], (&[u8], f64)> {
    all_consuming(separated_pair(take_until(";"), char(';'), double))(input)
}

fn parse_line(line: &[u8]) -> Result<Charge, ChargeFileError> {
    let malformed = || ChargeFileError::Malformed(String::from_utf8_lossy(line).into_owned());
    let (_, (card, amount)) = charge_line(line).map_err(|_| malformed())?;
    let card = from_utf8(card).map_err(|_| malformed())?;
    if card.is_empty() || !(amount.is_finite() && amount >= 0.0) {
        return Err(malformed());
    }
    Ok(Charge::new(card, amount))
}

/// Parses `card;amount` lines. Blank lines and a trailing `\r` are ignored,
/// and the final line does not need a newline.
pub fn parser(chunk: &[u8]) -> Result<Vec<Charge>, ChargeFileError> {
    let mut charges = Vec::new();
    let mut start = 0;
    for end in memchr::memchr_iter(b'\n', chunk).chain(std::iter::once(chunk.len())) {
        let line = &chunk[start..end];
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if !line.is_empty() {
            charges.push(parse_line(line)?);
        }
        start = end + 1;
    }
    Ok(charges)
}

/// Inverse of [`parser`] for one charge.
pub fn format_line(charge: &Charge) -> String {
    format!("{};{:.2}\n", charge.card, charge.amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single() {
        let charges = parser(b"4000000000000001;12.34\n").unwrap();
        assert_eq!(charges, vec![Charge::new("4000000000000001", 12.34)]);
    }

    #[test]
    fn last_line_without_newline() {
        let charges = parser(b"A;10\nB;5.5").unwrap();
        assert_eq!(charges, vec![Charge::new("A", 10.0), Charge::new("B", 5.5)]);
    }

    #[test]
    fn skips_blank_and_crlf() {
        let charges = parser(b"A;1.00\r\n\nB;2.00\r\n").unwrap();
        assert_eq!(charges, vec![Charge::new("A", 1.0), Charge::new("B", 2.0)]);
    }

    #[test]
    fn bad_amount_fails_the_whole_chunk() {
        assert!(matches!(
            parser(b"A;nan\nB;-5\nC;inf\nD;10.00\n"),
            Err(ChargeFileError::Malformed(line)) if line == "A;nan"
        ));
        assert_eq!(parser(b"Z;0\n").unwrap(), vec![Charge::new("Z", 0.0)]);
    }

    #[test]
    fn rejects_malformed_lines() {
        for input in [&b"A10\n"[..], b"A;ten\n", b";10\n", b"A;10x\n"] {
            assert!(matches!(parser(input), Err(ChargeFileError::Malformed(_))));
        }
    }

    #[test]
    fn rejects_amounts_that_are_not_non_negative_reals() {
        for input in [&b"A;nan\n"[..], b"A;inf\n", b"A;infinity\n", b"A;-5\n", b"A;-0.01\n"] {
            assert!(matches!(parser(input), Err(ChargeFileError::Malformed(_))));
        }
    }

    #[test]
    fn format_round_trips() {
        let charge = Charge::new("4123456789012345", 999.5);
        assert_eq!(format_line(&charge), "4123456789012345;999.50\n");
        assert_eq!(parser(format_line(&charge).as_bytes()).unwrap(), vec![charge]);
    }
}
