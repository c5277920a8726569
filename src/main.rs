//! Entry point for the recimg recovery image builder.
//!
//! This file handles high-level application flow:
//! 1. Parse command-line arguments using `clap`.
//! 2. Initialize logging from the configured level.
//! 3. Map the prebuilt kernel and MCP blobs into memory.
//! 4. Append both blobs as sections of a `RecoveryImage`.
//! 5. Serialize the image and write it to the requested path.
//!
//! Error handling is done via `anyhow`.

use anyhow::{Context, Result};
use clap::Parser;
use memmap2::Mmap;
use std::fs::File;
use tracing_subscriber::EnvFilter;

use recimg::config::Config;
use recimg::image::RecoveryImage;
use recimg::writer;

/// Address the loader jumps to once every section is placed.
const ENTRY_POINT: u32 = 0x08136000;

const KERNEL_BIN: &str = "ios_kernel/ios_kernel.bin";
const KERNEL_VADDR: u32 = 0x08136000;
const KERNEL_PADDR: u32 = 0x08136000;

const MCP_BIN: &str = "ios_mcp/ios_mcp.bin";
const MCP_VADDR: u32 = 0x05116000;
/// Base of the MCP region in virtual memory.
const MCP_REGION_BASE: u32 = 0x05100000;
/// Physical address the MCP region is remapped to on the target.
const MCP_REGION_REMAP: u32 = 0x13d80000;

fn main() -> Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_level))
        .init();

    // Map input files into memory
    let kernel = map_blob(KERNEL_BIN)?;
    let mcp = map_blob(MCP_BIN)?;

    let mut image = RecoveryImage::new(ENTRY_POINT);
    image.append_section(KERNEL_VADDR, KERNEL_PADDR, &kernel)?;
    image.append_section(MCP_VADDR, MCP_VADDR - MCP_REGION_BASE + MCP_REGION_REMAP, &mcp)?;

    writer::write_image(&config.output, &image)?;

    println!("Wrote recovery image to {}", config.output.display());
    Ok(())
}

fn map_blob(path: &str) -> Result<Mmap> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path))?;
    let mmap = unsafe { Mmap::map(&file) }.with_context(|| format!("failed to map {}", path))?;
    Ok(mmap)
}
