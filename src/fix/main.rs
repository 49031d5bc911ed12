/* SPDX-License-Identifier: MPL-2.0 */

use std::{fmt::Display, path::PathBuf, process::ExitCode};

use clap::{error::ErrorKind, Parser};
use gencrc::common::{
    argfile, color,
    dash_stdio::is_dash,
    diagnostics::{build_error, ContentlessReport},
};
use shadow_rs::shadow;
use yansi::Paint;

shadow!(build);

fn main() -> ExitCode {
    color::detect();
    let args = match argfile::collect_expanded_args() {
        Ok(args) => args,
        Err(report) => {
            report.eprint_();
            return ExitCode::from(2);
        }
    };
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            // Usage errors exit like any other failure, not with clap's own status.
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };
    if cli.license {
        print!("{LICENSE}");
        return ExitCode::SUCCESS;
    }
    let (options, inputs) = cli.finish();

    run(&options, &inputs)
}

mod cli;
use cli::Cli;
mod error;
use error::FileError;
mod file;
mod stdin;

const LICENSE: &str = concat!(
    env!("CARGO_PKG_NAME"),
    " ",
    env!("CARGO_PKG_VERSION"),
    "
This program is free software, distributed under the terms of the Mozilla Public License, v. 2.0.
You may redistribute copies of it under those terms; you can obtain a copy of the license
at https://mozilla.org/MPL/2.0/.
Please report bugs to ",
    env!("CARGO_PKG_AUTHORS"),
    ".\n"
);

#[derive(Debug, Clone, Default)]
struct Options {
    silent: bool,
    fragile: bool,
    in_place: bool,
    calc_only: bool,
    to_stdout: bool,
    output_path: Option<PathBuf>,
    checksum_override: Option<u16>,
}

impl Options {
    /// Progress messages, which `--silent` suppresses.
    fn inform<T: Display>(&self, msg: T) {
        if !self.silent {
            eprintln!("{msg}");
        }
    }

    /// Prints the checksum in `--calculate-only` mode, where it is the expected output.
    fn report_checksum(&self, checksum: u16) {
        eprintln!("{checksum}");
    }

    /// Reports the checksum that is about to be stamped.
    fn announce_checksum(&self, checksum: u16) {
        self.inform(format_args!(
            "checksum: {} (${checksum:04X})",
            checksum.bold()
        ));
    }
}

fn run(options: &Options, inputs: &[PathBuf]) -> ExitCode {
    if inputs.is_empty() {
        options.inform(format_args!(
            "{}: no input files, trying stdin",
            env!("CARGO_BIN_NAME")
        ));
        return match stdin::process(options) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                err.report().eprint_();
                ExitCode::FAILURE
            }
        };
    }

    let mut nb_failed = 0usize;
    for path in inputs {
        let res = if is_dash(path) {
            stdin::process(options)
        } else {
            file::process(path, options)
        };

        if let Err(err) = res {
            err.report().eprint_();
            if err.is_fatal() {
                return ExitCode::FAILURE;
            }
            nb_failed += 1;
            if options.fragile {
                break;
            }
        }
    }

    if nb_failed == 0 {
        ExitCode::SUCCESS
    } else {
        build_error()
            .with_message(format!(
                "Failed to process {nb_failed} of {} ROM{}",
                inputs.len(),
                if inputs.len() == 1 { "" } else { "s" }
            ))
            .finish()
            .eprint_();
        ExitCode::FAILURE
    }
}
