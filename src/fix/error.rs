/* SPDX-License-Identifier: MPL-2.0 */

use std::{io, path::PathBuf};

use gencrc::{
    common::diagnostics::{build_error, input_error, output_error, Report},
    rom::TooShort,
    stream::StreamError,
};

/// Why a ROM could not be processed.
#[derive(Debug)]
pub enum FileError {
    Stat(PathBuf, io::Error),
    Open(PathBuf, io::Error),
    Read(PathBuf, io::Error),
    ShortRead {
        path: PathBuf,
        expected: u64,
        got: u64,
    },
    OutOfMemory {
        path: PathBuf,
        size: u64,
    },
    TooShort(PathBuf, TooShort),
    Scratch(io::Error),
    Create(PathBuf, io::Error),
    Write(PathBuf, io::Error),
}

impl FileError {
    /// Fatal errors stop the whole program, even outside of fragile mode.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::OutOfMemory { .. })
    }

    /// Translates an error from processing standard input, whose result was going to `output`.
    pub fn from_stream(err: StreamError, output: PathBuf) -> Self {
        let stdin = PathBuf::from("-");
        match err {
            StreamError::Read(err) => Self::Read(stdin, err),
            StreamError::Scratch(err) => Self::Scratch(err),
            StreamError::Write(err) => Self::Write(output, err),
            StreamError::TooShort(err) => Self::TooShort(stdin, err),
        }
    }

    pub fn report(&self) -> Report {
        match self {
            Self::Stat(path, err) => {
                input_error(format!("Failed to query the ROM's size: {err}"), path)
            }
            Self::Open(path, err) => {
                input_error(format!("Failed to open the ROM for reading: {err}"), path)
            }
            Self::Read(path, err) => input_error(format!("Failed to read the ROM: {err}"), path),
            Self::ShortRead {
                path,
                expected,
                got,
            } => input_error(
                format!("Expected to read {expected} bytes from the ROM, but only got {got}"),
                path,
            ),
            Self::OutOfMemory { path, size } => input_error(
                format!("Failed to allocate {size} bytes to hold the ROM"),
                path,
            ),
            Self::TooShort(path, err) => {
                input_error(format!("The ROM is too short to hold a checksum: {err}"), path)
            }
            Self::Scratch(err) => build_error()
                .with_message(format!(
                    "Failed to buffer standard input in a temporary file: {err}"
                ))
                .finish(),
            Self::Create(path, err) => {
                output_error(format!("Failed to open the output for writing: {err}"), path)
            }
            Self::Write(path, err) => {
                output_error(format!("Failed to write the patched ROM: {err}"), path)
            }
        }
    }
}
