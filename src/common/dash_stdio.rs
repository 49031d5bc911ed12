/* SPDX-License-Identifier: MPL-2.0 */

//! By convention, a path of `-` designates the standard input or output.

use std::{fs::File, io::Write, path::Path};

pub fn is_dash<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref() == Path::new("-")
}

pub enum Output {
    File(File),
    Stdout(std::io::StdoutLock<'static>),
}

impl Output {
    /// Opens `path` for writing, truncating it; `-` yields the standard output.
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        Ok(if is_dash(&path) {
            Self::stdout()
        } else {
            Self::File(File::create(path)?)
        })
    }

    pub fn stdout() -> Self {
        Self::Stdout(std::io::stdout().lock())
    }
}

macro_rules! forward {
    ($(fn $name:ident(&mut self $(, $param_name:ident: $param_ty:ty)*) -> $ret:ty;)*) => {$(
        fn $name(&mut self $(, $param_name: $param_ty)*) -> $ret {
            match self {
                Self::Stdout(stdout) => stdout.$name($($param_name),*),
                Self::File(file) => file.$name($($param_name),*),
            }
        }
    )*};
}

impl Write for Output {
    forward! {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize>;

        fn write_vectored(&mut self, bufs: &[std::io::IoSlice<'_>]) -> std::io::Result<usize>;

        fn flush(&mut self) -> std::io::Result<()>;

        fn write_all(&mut self, buf: &[u8]) -> std::io::Result<()>;

        fn write_fmt(&mut self, fmt: std::fmt::Arguments<'_>) -> std::io::Result<()>;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dash_detection() {
        assert!(is_dash("-"));
        assert!(!is_dash("./-"));
        assert!(!is_dash("--"));
        assert!(!is_dash("rom.bin"));
    }
}
