//! Command-line front end of the open data split-and-persist pipeline.

pub mod args;
pub mod cmd;
pub mod ui;
