/* SPDX-License-Identifier: MPL-2.0 */

//! Sega Genesis / Mega Drive ROM header checksum tooling.
//!
//! The checksum is the wrapping sum of the big-endian 16-bit words found from [`PAYLOAD_START`]
//! to the end of the image, and is stored little-endian at [`CHECKSUM_OFFSET`].

use std::num::IntErrorKind;

use parse_display::Display;

pub mod checksum;
pub mod rom;
pub mod stream;

#[cfg(feature = "gen-crc")]
pub mod common;

/// Offset of the stored checksum's low byte; the high byte follows it.
pub const CHECKSUM_OFFSET: usize = 0x18E;
/// Images shorter than this cannot hold a checksum.
pub const MIN_STAMPABLE_LEN: usize = CHECKSUM_OFFSET + 2;
/// First byte covered by the checksum.
///
/// This must stay even, as the streaming accumulator derives word parity from absolute offsets.
pub const PAYLOAD_START: usize = 0x200;

const _: () = assert!(PAYLOAD_START % 2 == 0);
const _: () = assert!(MIN_STAMPABLE_LEN <= PAYLOAD_START);

pub const WHITESPACE_CHARS: &[char] = &[' ', '\t'];

// ---

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseNumError<T> {
    #[display("cannot parse an integer from an empty string")]
    Empty,
    #[display("an invalid digit was found")]
    InvalidDigit,
    #[display("the number cannot be lower than {0}")]
    TooSmall(T),
    #[display("the number cannot be higher than {0}")]
    TooLarge(T),
}

impl<T: std::fmt::Debug + std::fmt::Display> std::error::Error for ParseNumError<T> {}

/// Parses a number the way the command line accepts them.
///
/// Besides plain decimal, `$`/`0x` introduce hexadecimal and `%`/`0b` introduce binary.
/// A leading minus sign is accepted so that negative values are rejected as too small rather
/// than as garbage.
pub fn parse_generic_u16(string: &str, min: u16, max: u16) -> Result<u16, ParseNumError<u16>> {
    let (negative, digits) = match string.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, string),
    };
    let (radix, digits) = if let Some(hex) = digits
        .strip_prefix('$')
        .or_else(|| digits.strip_prefix("0x"))
        .or_else(|| digits.strip_prefix("0X"))
    {
        (16, hex)
    } else if let Some(binary) = digits
        .strip_prefix('%')
        .or_else(|| digits.strip_prefix("0b"))
        .or_else(|| digits.strip_prefix("0B"))
    {
        (2, binary)
    } else {
        (10, digits)
    };

    match u16::from_str_radix(digits, radix) {
        // `-0` is still zero.
        Ok(num) if negative && num != 0 => Err(ParseNumError::TooSmall(min)),
        Ok(num) => {
            if num < min {
                Err(ParseNumError::TooSmall(min))
            } else if num > max {
                Err(ParseNumError::TooLarge(max))
            } else {
                Ok(num)
            }
        }

        Err(err) => Err(match err.kind() {
            IntErrorKind::Empty => ParseNumError::Empty,
            IntErrorKind::PosOverflow if negative => ParseNumError::TooSmall(min),
            IntErrorKind::PosOverflow => ParseNumError::TooLarge(max),
            IntErrorKind::NegOverflow => ParseNumError::TooSmall(min),
            _ => ParseNumError::InvalidDigit,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_prefixes() {
        assert_eq!(parse_generic_u16("51966", 0, u16::MAX), Ok(0xCAFE));
        assert_eq!(parse_generic_u16("$CAFE", 0, u16::MAX), Ok(0xCAFE));
        assert_eq!(parse_generic_u16("0xcafe", 0, u16::MAX), Ok(0xCAFE));
        assert_eq!(parse_generic_u16("%101", 0, u16::MAX), Ok(5));
        assert_eq!(parse_generic_u16("0b11", 0, u16::MAX), Ok(3));
    }

    #[test]
    fn out_of_range_numbers() {
        assert_eq!(
            parse_generic_u16("65536", 0, u16::MAX),
            Err(ParseNumError::TooLarge(u16::MAX))
        );
        assert_eq!(
            parse_generic_u16("-1", 0, u16::MAX),
            Err(ParseNumError::TooSmall(0))
        );
        assert_eq!(
            parse_generic_u16("-99999", 0, u16::MAX),
            Err(ParseNumError::TooSmall(0))
        );
        assert_eq!(parse_generic_u16("2", 0, 1), Err(ParseNumError::TooLarge(1)));
        assert_eq!(parse_generic_u16("-0", 0, 1), Ok(0));
    }

    #[test]
    fn malformed_numbers() {
        assert_eq!(parse_generic_u16("", 0, 1), Err(ParseNumError::Empty));
        assert_eq!(parse_generic_u16("$", 0, 1), Err(ParseNumError::Empty));
        assert_eq!(
            parse_generic_u16("12ab", 0, u16::MAX),
            Err(ParseNumError::InvalidDigit)
        );
    }
}
