/* SPDX-License-Identifier: MPL-2.0 */

//! `@path` arguments are replaced by the arguments listed in the file at `path`.
//!
//! Each line holds whitespace-separated arguments; lines starting with `#` are comments.
//! Argument files may themselves reference other argument files.

use cfg_if::cfg_if;

use std::{
    ffi::{OsStr, OsString},
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::WHITESPACE_CHARS;

use super::diagnostics::{build_error, Report};

/// Guards against argument files that include themselves.
const MAX_DEPTH: usize = 64;

pub fn collect_expanded_args() -> Result<Vec<OsString>, Report> {
    expand_args(std::env::args_os())
}

pub fn expand_args<I: IntoIterator<Item = OsString>>(args: I) -> Result<Vec<OsString>, Report> {
    let mut expanded = Vec::new();
    for arg in args {
        process_arg(arg, &mut expanded, 0)?;
    }
    Ok(expanded)
}

fn process_arg(arg: OsString, expanded: &mut Vec<OsString>, depth: usize) -> Result<(), Report> {
    let Some(path) = try_extract_argfile_path(&arg) else {
        expanded.push(arg);
        return Ok(());
    };
    if depth == MAX_DEPTH {
        return Err(build_error()
            .with_message(format!(
                "Arg-file \"{}\" is nested too deeply",
                path.display()
            ))
            .with_note(format!("At most {MAX_DEPTH} levels of arg-files are allowed"))
            .finish());
    }

    let mut file = BufReader::new(File::open(path).map_err(|err| {
        build_error()
            .with_message(format!(
                "Failed to open arg-file \"{}\": {err}",
                path.display()
            ))
            .finish()
    })?);

    let mut line_buf = String::new();
    loop {
        line_buf.clear();
        let line_len = file.read_line(&mut line_buf).map_err(|err| {
            build_error()
                .with_message(format!(
                    "Failed to read arg-file \"{}\": {err}",
                    path.display()
                ))
                .finish()
        })?;
        if line_len == 0 {
            break; // EOF.
        }

        let line = line_buf
            .trim_end_matches(&['\n', '\r'][..])
            .trim_start_matches(WHITESPACE_CHARS);
        if line.starts_with('#') {
            continue;
        }

        for arg in line
            .split(WHITESPACE_CHARS)
            .filter(|arg| !arg.is_empty())
        {
            process_arg(arg.to_owned().into(), expanded, depth + 1)?;
        }
    }
    Ok(())
}

fn try_extract_argfile_path(arg: &OsStr) -> Option<&Path> {
    cfg_if! {
        if #[cfg(unix)] {
            use std::os::unix::ffi::OsStrExt;
            arg.as_bytes()
                .strip_prefix(b"@")
                .map(|path| OsStr::from_bytes(path).as_ref())
        } else {
            arg.as_encoded_bytes().strip_prefix(b"@").map(|path| {
                // SAFETY: we merely stripped an ASCII byte off the beginning of a (superset of) UTF-8.
                unsafe { OsStr::from_encoded_bytes_unchecked(path) }.as_ref()
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn os(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    #[test]
    fn plain_args_pass_through() {
        let args = os(&["gen-crc", "-s", "rom.bin"]);
        assert_eq!(expand_args(args.clone()).ok(), Some(args));
    }

    #[test]
    fn argfile_expansion() {
        let mut argfile = tempfile::NamedTempFile::new().unwrap();
        writeln!(argfile, "# Options for the release build").unwrap();
        writeln!(argfile, "  -s\t-f").unwrap();
        writeln!(argfile, "a.bin  b.bin").unwrap();
        let arg = format!("@{}", argfile.path().display());

        assert_eq!(
            expand_args(os(&["gen-crc", &arg, "c.bin"])).ok(),
            Some(os(&["gen-crc", "-s", "-f", "a.bin", "b.bin", "c.bin"]))
        );
    }

    #[test]
    fn missing_argfile() {
        assert!(expand_args(os(&["gen-crc", "@/nonexistent/gen-crc.args"])).is_err());
    }
}
