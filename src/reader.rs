//! Read-side view of a serialized recovery image.
//!
//! The fixed-size section table lets a consumer index any slot by position
//! without scanning, which is what `Reader::section` does.

use anyhow::{bail, Result};
use byteorder::{BigEndian, ByteOrder};
use std::iter::{ExactSizeIterator, FusedIterator};

use crate::image::{HEADER_SIZE, MAGIC, MAX_SECTIONS};
use crate::section::SectionHeader;

const ENTRY_POINT_OFFSET: usize = 0x04;
const SECTION_COUNT_OFFSET: usize = 0x08;
const SECTION_TABLE_OFFSET: usize = 0x0c;

#[derive(Clone, Copy, Debug)]
pub struct Reader<'data> {
    data: &'data [u8],
}

impl<'data> Reader<'data> {
    pub fn new(data: &'data [u8]) -> Result<Reader<'data>> {
        if data.len() < HEADER_SIZE as usize {
            bail!(
                "image truncated: {} bytes, but the header alone is {}",
                data.len(),
                HEADER_SIZE
            );
        }
        if &data[..MAGIC.len()] != MAGIC {
            bail!("bad magic: {:02x?}", &data[..MAGIC.len()]);
        }
        let reader = Reader { data };
        if reader.section_count() as usize > MAX_SECTIONS {
            bail!(
                "section count {} exceeds the table capacity of {}",
                reader.section_count(),
                MAX_SECTIONS
            );
        }
        Ok(reader)
    }

    pub fn entry_point(self) -> u32 {
        BigEndian::read_u32(&self.data[ENTRY_POINT_OFFSET..])
    }

    pub fn section_count(self) -> u32 {
        BigEndian::read_u32(&self.data[SECTION_COUNT_OFFSET..])
    }

    /// Table entry at `index`, unused slots included.
    pub fn section(self, index: usize) -> SectionHeader {
        if index >= MAX_SECTIONS {
            panic!("index out of range: {}", index);
        }
        SectionHeader::decode(&self.data[SECTION_TABLE_OFFSET + SectionHeader::SIZE * index..])
    }

    /// Payload bytes for a table entry.
    pub fn section_content(self, header: SectionHeader) -> Result<&'data [u8]> {
        let start = header.offset as usize;
        let end = start + header.size as usize;
        if end > self.data.len() {
            bail!(
                "section content out of range: {:#x}..{:#x} in a {}-byte image",
                start,
                end,
                self.data.len()
            );
        }
        Ok(&self.data[start..end])
    }

    /// Iterate over the populated table entries.
    pub fn iter_sections(self) -> SectionsIter<'data> {
        SectionsIter {
            reader: self,
            index: 0,
        }
    }
}

pub struct SectionsIter<'data> {
    reader: Reader<'data>,
    index: usize,
}

impl<'data> Iterator for SectionsIter<'data> {
    type Item = SectionHeader;

    fn next(&mut self) -> Option<SectionHeader> {
        if self.index < self.reader.section_count() as usize {
            let result = Some(self.reader.section(self.index));
            self.index += 1;
            result
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.reader.section_count() as usize - self.index;
        (len, Some(len))
    }
}

impl<'data> ExactSizeIterator for SectionsIter<'data> {}

impl<'data> FusedIterator for SectionsIter<'data> {}
