/* SPDX-License-Identifier: MPL-2.0 */

use std::io::{Read, Seek, Write};

use gencrc::{common::dash_stdio::Output, stream::StreamPatcher};

use super::{FileError, Options};

/// Processes a ROM read from standard input, spooling it through an anonymous temporary file.
pub(super) fn process(options: &Options) -> Result<(), FileError> {
    let scratch = tempfile::tempfile().map_err(FileError::Scratch)?;
    patch_stream(std::io::stdin().lock(), scratch, options)
}

fn patch_stream<R: Read, S: Read + Write + Seek>(
    input: R,
    scratch: S,
    options: &Options,
) -> Result<(), FileError> {
    let mut patcher = StreamPatcher::new(scratch);
    options.inform("calculating checksum...");
    patcher
        .copy_from(input)
        .map_err(|err| FileError::from_stream(err, "-".into()))?;
    options.inform(format_args!("ROM size: {} bytes", patcher.len()));

    let checksum = options
        .checksum_override
        .unwrap_or_else(|| patcher.checksum());
    if options.calc_only {
        options.report_checksum(checksum);
        return Ok(());
    }

    patcher
        .stamp(checksum)
        .map_err(|err| FileError::from_stream(err, "-".into()))?;
    options.announce_checksum(checksum);

    // Standard output is the default destination, unless another one was requested.
    if options.to_stdout || options.output_path.is_none() {
        patcher
            .drain_into(Output::stdout())
            .map_err(|err| FileError::from_stream(err, "-".into()))?;
    }
    if let Some(output_path) = &options.output_path {
        let output = Output::create(output_path)
            .map_err(|err| FileError::Create(output_path.clone(), err))?;
        patcher
            .drain_into(output)
            .map_err(|err| FileError::from_stream(err, output_path.clone()))?;
    }
    Ok(())
}
