#![deny(missing_docs)]

//! Driver of the truth tuple extraction: input list handling, run
//! configuration and the file/entry loop feeding the output table.

mod config;
mod driver;
mod inputs;

pub use config::RunConfig;
pub use driver::{run_files, Driver, DriverState, RunReport, SkippedEntry};
pub use inputs::parse_file_list;
