//! odpdump subcommands

pub mod by_col;
pub mod by_datetime;
pub mod sample_rows;
