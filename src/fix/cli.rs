#![deny(missing_docs)]

use std::path::PathBuf;

use clap::{ColorChoice, Parser};
use gencrc::{
    common::{
        color,
        dash_stdio::is_dash,
        diagnostics::{build_warning, ContentlessReport},
    },
    parse_generic_u16, ParseNumError,
};

use super::Options;

/// The command-line interface.
#[derive(Debug, Parser)]
#[clap(color = color::for_clap())]
#[command(
    name = "gen-crc",
    version,
    long_version = crate::build::CLAP_LONG_VERSION,
    about = "Sega Genesis / Mega Drive ROM checksum fixer",
    long_about = "Computes the header checksum of Sega Genesis / Mega Drive ROMs, and writes it into their header.

If no ROMs are given, one is read from standard input, and the patched ROM is written to standard output.",
    after_help = "Arguments of the form `@path` are replaced with the arguments listed in the file at `path`.",
    help_expected = true
)]
pub(super) struct Cli {
    /// Controls when to use color
    #[arg(long, default_value_t = ColorChoice::Auto)]
    pub(super) color: ColorChoice,
    /// Write the patched ROMs to standard output
    #[arg(short = 'c', long = "stdout", value_name = "n", num_args = 0..=1, require_equals = true, default_missing_value = "1", value_parser = parse_toggle)]
    pub(super) stdout: Option<bool>,
    /// Only compute and print the checksums, without patching anything
    #[arg(short = 'C', long, value_name = "n", num_args = 0..=1, require_equals = true, default_missing_value = "1", value_parser = parse_toggle)]
    pub(super) calculate_only: Option<bool>,
    /// Fragile mode: stop at the first ROM that cannot be processed
    #[arg(short, long, value_name = "n", num_args = 0..=1, require_equals = true, default_missing_value = "1", value_parser = parse_toggle)]
    pub(super) fragile: Option<bool>,
    /// Overwrite the input ROMs with the patched ones [default: 1]
    ///
    /// This has no effect when reading from standard input.
    #[arg(short, long, value_name = "n", num_args = 0..=1, require_equals = true, default_missing_value = "1", value_parser = parse_toggle)]
    pub(super) in_place: Option<bool>,
    /// Display license information and exit
    #[arg(short = 'L', long)]
    pub(super) license: bool,
    /// Write the patched ROMs to <path>
    ///
    /// If several ROMs are processed, each overwrites the previous one's output.
    #[arg(short, long, value_name = "path")]
    pub(super) output: Option<PathBuf>,
    /// Silent mode: only display error messages
    #[arg(short, long, value_name = "n", num_args = 0..=1, require_equals = true, default_missing_value = "1", value_parser = parse_toggle)]
    pub(super) silent: Option<bool>,
    /// Write <checksum> into the header instead of computing it
    #[arg(short = 'S', long, value_name = "checksum", value_parser = parse_checksum)]
    pub(super) set_checksum: Option<u16>,

    /// ROMs to process (`-` reads from standard input)
    #[arg(value_name = "ROMs")]
    pub(super) inputs: Vec<PathBuf>,
}

/// Flags may be explicitly turned on or off, e.g. `--fragile=0`.
fn parse_toggle(arg: &str) -> Result<bool, ParseNumError<u16>> {
    parse_generic_u16(arg, 0, u16::MAX).map(|value| value != 0)
}

fn parse_checksum(arg: &str) -> Result<u16, ParseNumError<u16>> {
    parse_generic_u16(arg, 0, u16::MAX)
}

impl Cli {
    pub(super) fn finish(self) -> (Options, Vec<PathBuf>) {
        color::apply(self.color);

        let to_stdout = self.stdout.unwrap_or(false);
        let options = Options {
            silent: self.silent.unwrap_or(false),
            fragile: self.fragile.unwrap_or(false),
            in_place: self.in_place.unwrap_or(true),
            calc_only: self.calculate_only.unwrap_or(false),
            to_stdout,
            // `-c -o -` names standard output twice, but it must only receive one copy.
            output_path: self.output.filter(|path| !(to_stdout && is_dash(path))),
            checksum_override: self.set_checksum,
        };

        if !options.silent {
            if options.calc_only && options.checksum_override.is_some() {
                build_warning()
                    .with_message("`--set-checksum` overrides the computation of checksums")
                    .with_note("Only the value passed to `--set-checksum` will be printed")
                    .finish()
                    .eprint_();
            }
            if !self.inputs.is_empty()
                && !options.calc_only
                && !options.in_place
                && !options.to_stdout
                && options.output_path.is_none()
            {
                build_warning()
                    .with_message("The patched ROMs will not be written anywhere")
                    .with_help("Pass `-i`, `-c`, or `-o` to pick where to write them")
                    .finish()
                    .eprint_();
            }
        }

        (options, self.inputs)
    }
}
