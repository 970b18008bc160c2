//! Command handlers - extracted from main.rs for testability
//!
//! Each handler renders its result to a string so tests can check the
//! output without a terminal.

pub mod accept;
pub mod run;

pub use accept::{check_files, execute_accept, parse_file_arg};
pub use run::execute_run;
