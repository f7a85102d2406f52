//! Convert PowerPoint presentations (.ppt/.pptx) to PDF by driving
//! LibreOffice's `soffice` in headless mode.

pub mod convert;
pub mod error;
mod exec;
pub mod locate;
pub mod paths;
pub mod types;

pub use convert::{convert, Converter};
pub use error::{Error, ErrorKind, Result};
pub use locate::locate;
pub use types::{ConversionOutcome, ConversionRequest, ResolvedExecutable};
