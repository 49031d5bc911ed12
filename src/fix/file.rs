/* SPDX-License-Identifier: MPL-2.0 */

use std::{
    fs::{self, File},
    io::{Read, Write},
    path::Path,
};

use gencrc::{
    checksum,
    common::{
        dash_stdio::Output,
        diagnostics::{build_warning, ContentlessReport},
    },
    rom, MIN_STAMPABLE_LEN, PAYLOAD_START,
};
use tempfile::NamedTempFile;
use yansi::Paint;

use super::{FileError, Options};

/// Processes a ROM on disk: it is read whole, patched in memory, then written to every sink.
pub(super) fn process(path: &Path, options: &Options) -> Result<(), FileError> {
    let size = fs::metadata(path)
        .map_err(|err| FileError::Stat(path.into(), err))?
        .len();
    let mut file = File::open(path).map_err(|err| FileError::Open(path.into(), err))?;
    options.inform(path.display().bold());
    options.inform(format_args!("ROM size: {size} bytes"));

    let out_of_memory = || FileError::OutOfMemory {
        path: path.into(),
        size,
    };
    let mut rom = Vec::new();
    rom.try_reserve_exact(usize::try_from(size).map_err(|_| out_of_memory())?)
        .map_err(|_| out_of_memory())?;
    let got = (&mut file)
        .take(size)
        .read_to_end(&mut rom)
        .map_err(|err| FileError::Read(path.into(), err))? as u64;
    if got != size {
        return Err(FileError::ShortRead {
            path: path.into(),
            expected: size,
            got,
        });
    }
    drop(file);

    let checksum = match options.checksum_override {
        Some(checksum) => checksum,
        None => {
            options.inform("calculating checksum...");
            checksum::of_rom(&rom)
        }
    };
    if options.calc_only {
        options.report_checksum(checksum);
        return Ok(());
    }

    if (MIN_STAMPABLE_LEN..PAYLOAD_START).contains(&rom.len()) && !options.silent {
        build_warning()
            .with_message("The ROM ends before any data is covered by the checksum")
            .with_note(format!("File path: {}", path.display()))
            .finish()
            .eprint_();
    }
    rom::stamp(&mut rom, checksum).map_err(|err| FileError::TooShort(path.into(), err))?;
    options.announce_checksum(checksum);

    if options.in_place {
        replace(path, &rom).map_err(|err| FileError::Write(path.into(), err))?;
    }
    if options.to_stdout {
        emit(Output::stdout(), Path::new("-"), &rom)?;
    }
    if let Some(output_path) = &options.output_path {
        let output = Output::create(output_path)
            .map_err(|err| FileError::Create(output_path.clone(), err))?;
        emit(output, output_path, &rom)?;
    }
    Ok(())
}

fn emit(mut output: Output, path: &Path, rom: &[u8]) -> Result<(), FileError> {
    output
        .write_all(rom)
        .and_then(|()| output.flush())
        .map_err(|err| FileError::Write(path.into(), err))
}

/// Overwrites the file at `path` with `contents`.
///
/// The new contents are written to a sibling file which is then renamed over the original,
/// so that the original is never left half-written.
fn replace(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;
    let permissions = fs::metadata(path)?.permissions();
    temp.as_file().set_permissions(permissions)?;
    temp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet() -> Options {
        Options {
            silent: true,
            in_place: true,
            ..Default::default()
        }
    }

    fn image(payload: &[u8]) -> Vec<u8> {
        let mut rom = vec![0xA5; PAYLOAD_START];
        rom.extend_from_slice(payload);
        rom
    }

    #[test]
    fn patches_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rom.bin");
        fs::write(&path, image(&[0x12, 0x34])).unwrap();

        process(&path, &quiet()).unwrap();
        let patched = fs::read(&path).unwrap();
        assert_eq!(rom::stored_checksum(&patched), Some(0x1234));
        assert_eq!(patched.len(), PAYLOAD_START + 2);
        // Only the patched file should remain, no leftover temporary files.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn writes_named_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.bin");
        let output = dir.path().join("out.bin");
        let original = image(&[0x01, 0x02, 0xFF]);
        fs::write(&input, &original).unwrap();

        let options = Options {
            in_place: false,
            output_path: Some(output.clone()),
            ..quiet()
        };
        process(&input, &options).unwrap();
        assert_eq!(fs::read(&input).unwrap(), original);
        let patched = fs::read(&output).unwrap();
        assert_eq!(&patched[0x18E..0x190], &[0x02, 0x00]);
    }

    #[test]
    fn calc_only_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rom.bin");
        let original = image(&[0xDE, 0xAD]);
        fs::write(&path, &original).unwrap();

        let options = Options {
            calc_only: true,
            ..quiet()
        };
        process(&path, &options).unwrap();
        assert_eq!(fs::read(&path).unwrap(), original);
    }

    #[test]
    fn too_short() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.bin");
        fs::write(&path, [0u8; 0x100]).unwrap();

        assert!(matches!(
            process(&path, &quiet()),
            Err(FileError::TooShort(_, rom::TooShort { len: 0x100 }))
        ));
        assert_eq!(fs::read(&path).unwrap(), vec![0; 0x100]);
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = process(&dir.path().join("nope.bin"), &quiet()).unwrap_err();
        assert!(matches!(err, FileError::Stat(..)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn unwritable_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.bin");
        fs::write(&input, image(&[])).unwrap();

        let options = Options {
            in_place: false,
            output_path: Some(dir.path().join("missing-dir").join("out.bin")),
            ..quiet()
        };
        assert!(matches!(
            process(&input, &options),
            Err(FileError::Create(..))
        ));
    }
}
