//! Section table types.
//!
//! This module defines the structures describing where each blob loads in
//! target memory and where its bytes live in the output file.

use byteorder::{BigEndian, ByteOrder};

/// One entry in the image's fixed-size section table.
///
/// On the wire an entry is 16 bytes: four big-endian 32-bit words. Unused
/// table slots are all-zero entries.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SectionHeader {
    /// Target virtual load address.
    pub vaddr: u32,
    /// Target physical load address.
    pub paddr: u32,
    /// Byte length of the section's content.
    pub size: u32,
    /// Byte offset of the content within the output file.
    pub offset: u32,
}

impl SectionHeader {
    /// Encoded size of one table entry.
    pub const SIZE: usize = 16;

    /// Append the big-endian encoding of this entry to `buf`.
    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        let mut entry = [0u8; Self::SIZE];
        BigEndian::write_u32(&mut entry[0..4], self.vaddr);
        BigEndian::write_u32(&mut entry[4..8], self.paddr);
        BigEndian::write_u32(&mut entry[8..12], self.size);
        BigEndian::write_u32(&mut entry[12..16], self.offset);
        buf.extend_from_slice(&entry);
    }

    /// Decode an entry from the first 16 bytes of `bytes`.
    pub fn decode(bytes: &[u8]) -> SectionHeader {
        SectionHeader {
            vaddr: BigEndian::read_u32(&bytes[0..]),
            paddr: BigEndian::read_u32(&bytes[4..]),
            size: BigEndian::read_u32(&bytes[8..]),
            offset: BigEndian::read_u32(&bytes[12..]),
        }
    }
}

/// A loadable blob staged for inclusion in a recovery image.
pub struct Section<'a> {
    /// Table entry describing the blob's load addresses and file position.
    pub header: SectionHeader,
    /// Raw content bytes, borrowed for the builder's lifetime.
    pub content: &'a [u8],
}
