//! Aggregate validation of processed rooms

pub mod report;

pub use report::*;
