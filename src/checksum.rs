/* SPDX-License-Identifier: MPL-2.0 */

//! The header checksum: a wrapping sum of big-endian words over the payload.

use crate::PAYLOAD_START;

/// Sums `payload` as consecutive big-endian 16-bit words, wrapping on overflow.
///
/// If the payload has an odd length, its last byte is added as the high byte of a final word.
pub fn compute(payload: &[u8]) -> u16 {
    payload.chunks(2).fold(0, |sum: u16, word| {
        let high = u16::from(word[0]) << 8;
        let low = word.get(1).copied().map_or(0, u16::from);
        sum.wrapping_add(high | low)
    })
}

/// Computes the checksum of a whole image, i.e. of everything past the header.
///
/// Images that end before [`PAYLOAD_START`] have an empty payload, and thus a checksum of 0.
pub fn of_rom(rom: &[u8]) -> u16 {
    rom.get(PAYLOAD_START..).map_or(0, compute)
}

/// Incremental version of [`of_rom`], for images that are only available as a stream.
///
/// Bytes must be fed in order, starting from the very beginning of the image (header included).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Checksum {
    sum: u16,
    /// Absolute offset of the next byte.
    pos: u64,
}

impl Checksum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if self.pos >= PAYLOAD_START as u64 {
                // Word parity is taken from the absolute offset; this matches `compute` because
                // the payload starts on an even offset.
                let word = if self.pos % 2 == 0 {
                    u16::from(byte) << 8
                } else {
                    u16::from(byte)
                };
                self.sum = self.sum.wrapping_add(word);
            }
            self.pos += 1;
        }
    }

    pub fn value(&self) -> u16 {
        self.sum
    }

    /// How many bytes have been fed so far.
    pub fn len(&self) -> u64 {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(payload: &[u8]) -> Vec<u8> {
        let mut rom = vec![0; PAYLOAD_START];
        rom.extend_from_slice(payload);
        rom
    }

    #[test]
    fn empty_payload() {
        assert_eq!(of_rom(&image(&[])), 0);
        assert_eq!(of_rom(&[0xFF; 0x1FF]), 0);
        assert_eq!(of_rom(&[]), 0);
    }

    #[test]
    fn header_is_ignored() {
        let mut rom = image(&[0x12, 0x34]);
        rom[..PAYLOAD_START].fill(0xA5);
        assert_eq!(of_rom(&rom), 0x1234);
    }

    #[test]
    fn single_word() {
        assert_eq!(of_rom(&image(&[0x12, 0x34])), 0x1234);
    }

    #[test]
    fn several_words() {
        assert_eq!(compute(&[0x12, 0x34, 0x56, 0x78]), 0x68AC);
    }

    #[test]
    fn odd_trailing_byte() {
        // 0x0102 + 0xFF00 = 0x10002
        assert_eq!(of_rom(&image(&[0x01, 0x02, 0xFF])), 0x0002);
    }

    #[test]
    fn wraparound() {
        assert_eq!(of_rom(&image(&[0xFF, 0xFF, 0x00, 0x01])), 0x0000);
    }

    #[test]
    fn incremental_matches_buffered() {
        let payload: Vec<u8> = (0..=u8::MAX).cycle().skip(7).take(0x1235).collect();
        let rom = image(&payload);

        let mut checksum = Checksum::new();
        // Uneven chunk sizes, so that words straddle chunk boundaries.
        for chunk in rom.chunks(333) {
            checksum.update(chunk);
        }
        assert_eq!(checksum.value(), of_rom(&rom));
        assert_eq!(checksum.len(), rom.len() as u64);
    }

    #[test]
    fn incremental_short_image() {
        let mut checksum = Checksum::new();
        assert!(checksum.is_empty());
        checksum.update(&[0xFF; 0x180]);
        assert_eq!(checksum.value(), 0);
        assert!(!checksum.is_empty());
    }
}
