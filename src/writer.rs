//! Recovery image file writer.
//!
//! This module handles writing the final image file.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::image::RecoveryImage;

/// Serialize an image and publish it at `output_path`.
///
/// The bytes are staged in a sibling temp file and renamed into place;
/// the destination never holds a partially written image.
pub fn write_image(output_path: &Path, image: &RecoveryImage) -> Result<()> {
    let bytes = image.serialize();

    let mut tmp = output_path.as_os_str().to_os_string();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    if let Err(err) = std::fs::write(&tmp, &bytes) {
        let _ = std::fs::remove_file(&tmp);
        return Err(err).with_context(|| format!("failed to write {}", tmp.display()));
    }
    std::fs::rename(&tmp, output_path)
        .with_context(|| format!("failed to move image into place at {}", output_path.display()))?;

    tracing::info!("wrote {} bytes to {}", bytes.len(), output_path.display());
    Ok(())
}
