/* SPDX-License-Identifier: MPL-2.0 */

//! Patching images that can only be read once, front to back.
//!
//! The checksum field sits before the payload, so the image is spooled into a seekable scratch
//! buffer while being summed, then the field is overwritten before the buffer is played back.

use std::io::{self, ErrorKind, Read, Seek, SeekFrom, Write};

use parse_display::Display;

use crate::{checksum::Checksum, rom::TooShort, CHECKSUM_OFFSET, MIN_STAMPABLE_LEN};

#[derive(Debug, Display)]
pub enum StreamError {
    #[display("failed to read the image: {0}")]
    Read(io::Error),
    #[display("failed to access the scratch buffer: {0}")]
    Scratch(io::Error),
    #[display("failed to write the image: {0}")]
    Write(io::Error),
    #[display("{0}")]
    TooShort(TooShort),
}

impl std::error::Error for StreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read(err) | Self::Scratch(err) | Self::Write(err) => Some(err),
            Self::TooShort(err) => Some(err),
        }
    }
}

impl From<TooShort> for StreamError {
    fn from(value: TooShort) -> Self {
        Self::TooShort(value)
    }
}

const CHUNK_SIZE: usize = 0x4000;

#[derive(Debug)]
pub struct StreamPatcher<S> {
    scratch: S,
    checksum: Checksum,
}

impl<S: Read + Write + Seek> StreamPatcher<S> {
    /// `scratch` is expected to be empty; it is owned (and thus released) by the patcher.
    pub fn new(scratch: S) -> Self {
        Self {
            scratch,
            checksum: Checksum::new(),
        }
    }

    /// Spools the whole of `input` into the scratch buffer, summing it on the way.
    ///
    /// Returns how many bytes were copied by this call.
    pub fn copy_from<R: Read>(&mut self, mut input: R) -> Result<u64, StreamError> {
        let mut buf = vec![0; CHUNK_SIZE];
        let mut nb_copied = 0;
        loop {
            let len = match input.read(&mut buf) {
                Ok(0) => break, // EOF.
                Ok(len) => len,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(StreamError::Read(err)),
            };
            let chunk = &buf[..len];
            self.checksum.update(chunk);
            self.scratch
                .write_all(chunk)
                .map_err(StreamError::Scratch)?;
            nb_copied += len as u64;
        }
        Ok(nb_copied)
    }

    /// The checksum of everything copied so far.
    pub fn checksum(&self) -> u16 {
        self.checksum.value()
    }

    /// Total length of the spooled image.
    pub fn len(&self) -> u64 {
        self.checksum.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checksum.is_empty()
    }

    /// Overwrites the spooled image's checksum field, low byte first.
    pub fn stamp(&mut self, checksum: u16) -> Result<(), StreamError> {
        if self.len() < MIN_STAMPABLE_LEN as u64 {
            return Err(TooShort { len: self.len() }.into());
        }
        self.scratch
            .seek(SeekFrom::Start(CHECKSUM_OFFSET as u64))
            .and_then(|_| self.scratch.write_all(&checksum.to_le_bytes()))
            .map_err(StreamError::Scratch)
    }

    /// Plays the spooled image back into `output`. This can be done any number of times.
    pub fn drain_into<W: Write>(&mut self, mut output: W) -> Result<(), StreamError> {
        self.scratch
            .seek(SeekFrom::Start(0))
            .map_err(StreamError::Scratch)?;

        let mut buf = vec![0; CHUNK_SIZE];
        let mut remaining = self.len();
        while remaining != 0 {
            let want = remaining.min(CHUNK_SIZE as u64) as usize;
            let chunk = &mut buf[..want];
            self.scratch
                .read_exact(chunk)
                .map_err(StreamError::Scratch)?;
            output.write_all(chunk).map_err(StreamError::Write)?;
            remaining -= want as u64;
        }
        output.flush().map_err(StreamError::Write)
    }

    pub fn into_inner(self) -> S {
        self.scratch
    }
}
