/* SPDX-License-Identifier: MPL-2.0 */

//! Whether diagnostics get coloured.
//!
//! Everything is decided through `yansi`; `clap` is then told to follow whatever `yansi` settled on.

use clap::ColorChoice;
use yansi::Condition;

/// Colour only if stderr is a terminal, and `NO_COLOR` / `CLICOLOR` don't object.
///
/// This must run before the command line is parsed, so that usage errors get the same treatment.
pub fn detect() {
    yansi::whenever(Condition::cached(
        Condition::os_support()
            && Condition::stderr_is_tty_live()
            && Condition::clicolor_live()
            && Condition::no_color_live(),
    ));
}

pub fn for_clap() -> ColorChoice {
    if yansi::is_enabled() {
        ColorChoice::Always
    } else {
        ColorChoice::Never
    }
}

/// Applies the user's `--color` choice on top of the detected default.
pub fn apply(user_choice: ColorChoice) {
    match user_choice {
        ColorChoice::Auto => {}
        ColorChoice::Always => yansi::enable(),
        ColorChoice::Never => yansi::disable(),
    }
}
