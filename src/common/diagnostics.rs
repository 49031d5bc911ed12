/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * SPDX-License-Identifier: MPL-2.0
 */

use std::path::Path;

use ariadne::{ReportKind, Source, Span};
use yansi::Color;

use super::dash_stdio::is_dash;

pub struct FilelessReports;
pub type Report = ariadne::Report<'static, FilelessReports>;
pub type ReportBuilder = ariadne::ReportBuilder<'static, FilelessReports>;

pub fn new_report(kind: ReportKind) -> ariadne::ReportBuilder<'_, FilelessReports> {
    Report::build(kind, (), 0)
}

pub const ERROR_KIND: ReportKind = ReportKind::Custom("error", Color::Red);

pub fn build_error() -> ReportBuilder {
    new_report(ERROR_KIND)
}

pub const WARNING_KIND: ReportKind = ReportKind::Custom("warning", Color::Yellow);

pub fn build_warning() -> ReportBuilder {
    new_report(WARNING_KIND)
}

/// An error about reading from `path`.
pub fn input_error<M: ToString, P: AsRef<Path>>(message: M, path: P) -> Report {
    let path = path.as_ref();
    build_error()
        .with_message(message)
        .with_note(if is_dash(path) {
            "Reading from standard input".to_string()
        } else {
            format!("File path: {}", path.display())
        })
        .finish()
}

/// An error about writing to `path`.
pub fn output_error<M: ToString, P: AsRef<Path>>(message: M, path: P) -> Report {
    let path = path.as_ref();
    build_error()
        .with_message(message)
        .with_note(if is_dash(path) {
            "Writing to standard output".to_string()
        } else {
            format!("File path: {}", path.display())
        })
        .finish()
}

pub trait ContentlessReport {
    fn eprint_(&self);
}

impl ContentlessReport for Report {
    fn eprint_(&self) {
        if let Err(err) = self.eprint(Source::from("")) {
            eprintln!("Internal error when writing diagnostic: {err}");
        }
    }
}

impl Span for FilelessReports {
    type SourceId = ();

    fn source(&self) -> &Self::SourceId {
        &()
    }

    fn start(&self) -> usize {
        0
    }

    fn end(&self) -> usize {
        0
    }
}
