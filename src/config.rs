//! Configuration module.
//!
//! This module defines the command-line interface (CLI) for the builder using `clap`.
//! The tool takes exactly one positional argument: the output image path.

use clap::Parser;
use std::path::PathBuf;

/// Bundle prebuilt firmware blobs into a flashable recovery image.
///
/// The output is a fixed-layout container: a 236-byte header describing up
/// to 14 sections, followed by the raw section bytes.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Path of the recovery image to write
    pub output: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub log_level: String,
}
