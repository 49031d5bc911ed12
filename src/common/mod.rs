//! Functionality shared by the executables, rather than part of the library proper.
//!
//! This is not intended for downstream consumers, so none of this is covered by SemVer.

pub mod argfile;
pub mod color;
pub mod dash_stdio;
pub mod diagnostics;
