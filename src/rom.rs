/* SPDX-License-Identifier: MPL-2.0 */

use parse_display::Display;

use crate::{checksum, CHECKSUM_OFFSET, MIN_STAMPABLE_LEN};

/// The image ends before the checksum field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display("expected at least 400 ($190) bytes, got only {len}")]
pub struct TooShort {
    pub len: u64,
}

impl std::error::Error for TooShort {}

/// Writes `checksum` into the header, low byte first. No other byte is modified.
pub fn stamp(rom: &mut [u8], checksum: u16) -> Result<(), TooShort> {
    let len = rom.len() as u64;
    let field = rom
        .get_mut(CHECKSUM_OFFSET..MIN_STAMPABLE_LEN)
        .ok_or(TooShort { len })?;
    field.copy_from_slice(&checksum.to_le_bytes());
    Ok(())
}

/// Reads back the checksum currently stored in the header.
pub fn stored_checksum(rom: &[u8]) -> Option<u16> {
    let field = rom.get(CHECKSUM_OFFSET..MIN_STAMPABLE_LEN)?;
    Some(u16::from_le_bytes([field[0], field[1]]))
}

/// Stamps either the image's own checksum, or `forced` if provided; returns the stamped value.
pub fn patch(rom: &mut [u8], forced: Option<u16>) -> Result<u16, TooShort> {
    let checksum = forced.unwrap_or_else(|| checksum::of_rom(rom));
    stamp(rom, checksum)?;
    Ok(checksum)
}
