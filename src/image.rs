//! Core image assembly logic.
//!
//! This module contains the `RecoveryImage` builder which accumulates
//! sections and serializes the final container:
//! 1. Construction: start an empty image with a fixed entry point.
//! 2. Append: stage each blob, assigning its file offset from a running cursor.
//! 3. Serialize: emit the 236-byte header followed by the concatenated payloads.

use anyhow::Result;
use byteorder::{BigEndian, ByteOrder};

use crate::section::{Section, SectionHeader};

/// Number of slots in the fixed-size section table.
pub const MAX_SECTIONS: usize = 14;

/// Magic bytes at the start of every recovery image.
pub const MAGIC: &[u8; 4] = b"REC\0";

/// Fixed byte length of the image header: magic, entry point, section
/// count, then the full section table. Payload bytes start here.
pub const HEADER_SIZE: u32 = (4 + 4 + 4 + MAX_SECTIONS * SectionHeader::SIZE) as u32;

fn put_u32(buf: &mut Vec<u8>, value: u32) {
    let mut word = [0u8; 4];
    BigEndian::write_u32(&mut word, value);
    buf.extend_from_slice(&word);
}

/// Builder for a recovery image.
///
/// Sections are appended one at a time; append order determines both the
/// table slot and the payload order in the file. Section contents are
/// borrowed, so the backing buffers must outlive the builder.
pub struct RecoveryImage<'a> {
    entry_point: u32,
    sections: Vec<Section<'a>>,
    /// File offset for the next appended section's content.
    cursor: u32,
}

impl<'a> RecoveryImage<'a> {
    /// Creates an empty image that will jump to `entry_point` once loaded.
    pub fn new(entry_point: u32) -> Self {
        Self {
            entry_point,
            sections: Vec::new(),
            cursor: HEADER_SIZE,
        }
    }

    pub fn entry_point(&self) -> u32 {
        self.entry_point
    }

    pub fn sections(&self) -> &[Section<'a>] {
        &self.sections
    }

    /// Stage a blob as the next section.
    ///
    /// The section's file offset is taken from the running cursor, so the
    /// first section's content starts right after the header and each
    /// later section follows the previous one with no padding. Fails if
    /// the section table is already full; addresses and content are
    /// otherwise accepted as given.
    pub fn append_section(&mut self, vaddr: u32, paddr: u32, content: &'a [u8]) -> Result<()> {
        if self.sections.len() >= MAX_SECTIONS {
            anyhow::bail!(
                "too many sections: the header table holds at most {}",
                MAX_SECTIONS
            );
        }

        let header = SectionHeader {
            vaddr,
            paddr,
            size: content.len() as u32,
            offset: self.cursor,
        };
        self.cursor += header.size;

        tracing::debug!(
            "section {}: vaddr={:#010x} paddr={:#010x} size={:#x} offset={:#x}",
            self.sections.len(),
            header.vaddr,
            header.paddr,
            header.size,
            header.offset
        );

        self.sections.push(Section { header, content });
        Ok(())
    }

    /// Serialize the image into its final byte form.
    ///
    /// Pure with respect to builder state: serializing twice without an
    /// intervening append yields identical bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let payload_len: usize = self.sections.iter().map(|s| s.content.len()).sum();
        let mut buf = Vec::with_capacity(HEADER_SIZE as usize + payload_len);

        buf.extend_from_slice(MAGIC);
        put_u32(&mut buf, self.entry_point);
        put_u32(&mut buf, self.sections.len() as u32);

        // Full-width table: real sections fill a prefix, the rest stay zero.
        let mut table = [SectionHeader::default(); MAX_SECTIONS];
        for (slot, section) in table.iter_mut().zip(&self.sections) {
            *slot = section.header;
        }
        for slot in &table {
            slot.encode_into(&mut buf);
        }

        for section in &self.sections {
            buf.extend_from_slice(section.content);
        }

        buf
    }
}
