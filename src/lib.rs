#![forbid(unsafe_code)]

pub mod cli;
pub mod error;
pub mod graph;
pub mod manifest;
pub mod util;
