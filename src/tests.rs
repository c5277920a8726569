use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;
use crate::image::{RecoveryImage, HEADER_SIZE, MAGIC, MAX_SECTIONS};
use crate::reader::Reader;
use crate::section::SectionHeader;
use crate::writer;

#[test]
fn header_size_matches_layout() {
    assert_eq!(HEADER_SIZE, 0xec);
}

#[test]
fn offsets_accumulate_in_append_order() {
    let mut image = RecoveryImage::new(0x100);
    image.append_section(0, 0, b"abcd").unwrap();
    image.append_section(0, 0, b"").unwrap();
    image.append_section(0, 0, b"xyz").unwrap();

    let sections = image.sections();
    assert_eq!(sections[0].header.offset, 236);
    assert_eq!(sections[1].header.offset, 240);
    assert_eq!(sections[2].header.offset, 240);
    assert_eq!(sections[1].header.size, 0);
}

#[test]
fn empty_image_is_a_bare_header() {
    let image = RecoveryImage::new(0xdeadbeef);
    let bytes = image.serialize();

    assert_eq!(bytes.len(), 236);
    assert_eq!(&bytes[..4], MAGIC);
    assert_eq!(&bytes[4..8], &0xdeadbeefu32.to_be_bytes());
    assert!(bytes[8..].iter().all(|&b| b == 0));
}

#[test]
fn serialize_is_repeatable() {
    let mut image = RecoveryImage::new(0x42);
    image.append_section(0x1000, 0x2000, b"blob").unwrap();
    assert_eq!(image.serialize(), image.serialize());
}

#[test]
fn known_image_bytes() {
    let mut image = RecoveryImage::new(0x08136000);
    image
        .append_section(0x08136000, 0x08136000, b"KERNEL")
        .unwrap();
    image
        .append_section(0x05116000, 0x05116000 - 0x05100000 + 0x13d80000, b"MCPIMG")
        .unwrap();
    let bytes = image.serialize();

    assert_eq!(bytes.len(), 248);
    assert_eq!(&bytes[0x00..0x04], b"REC\0");
    assert_eq!(&bytes[0x04..0x08], &0x08136000u32.to_be_bytes());
    assert_eq!(&bytes[0x08..0x0c], &2u32.to_be_bytes());
    assert_eq!(
        &bytes[0x0c..0x1c],
        &[
            0x08, 0x13, 0x60, 0x00, // vaddr
            0x08, 0x13, 0x60, 0x00, // paddr
            0x00, 0x00, 0x00, 0x06, // size
            0x00, 0x00, 0x00, 0xec, // offset
        ]
    );
    assert_eq!(
        &bytes[0x1c..0x2c],
        &[
            0x05, 0x11, 0x60, 0x00, // vaddr
            0x13, 0xd9, 0x60, 0x00, // paddr
            0x00, 0x00, 0x00, 0x06, // size
            0x00, 0x00, 0x00, 0xf2, // offset
        ]
    );
    assert!(bytes[0x2c..0xec].iter().all(|&b| b == 0));
    assert_eq!(&bytes[0xec..0xf2], b"KERNEL");
    assert_eq!(&bytes[0xf2..0xf8], b"MCPIMG");
}

#[test]
fn round_trip_through_reader() {
    let mut image = RecoveryImage::new(0x08136000);
    image.append_section(0x08136000, 0x08136000, b"KERNEL").unwrap();
    image.append_section(0x05116000, 0x13d96000, b"MCPIMG").unwrap();
    let bytes = image.serialize();

    let reader = Reader::new(&bytes).unwrap();
    assert_eq!(reader.entry_point(), 0x08136000);
    assert_eq!(reader.section_count(), 2);

    for (read, built) in reader.iter_sections().zip(image.sections()) {
        assert_eq!(read, built.header);
        assert_eq!(reader.section_content(read).unwrap(), built.content);
    }
    for index in 2..MAX_SECTIONS {
        assert_eq!(reader.section(index), SectionHeader::default());
    }
}

#[test]
fn fifteenth_section_is_rejected() {
    let mut image = RecoveryImage::new(0);
    for _ in 0..MAX_SECTIONS {
        image.append_section(0x1000, 0x1000, b"a").unwrap();
    }
    let before = image.serialize();

    assert!(image.append_section(0x1000, 0x1000, b"b").is_err());
    assert_eq!(image.serialize(), before);
}

#[test]
fn reader_rejects_bad_magic() {
    let mut bytes = RecoveryImage::new(0).serialize();
    bytes[0] = b'X';
    assert!(Reader::new(&bytes).is_err());
}

#[test]
fn reader_rejects_truncated_header() {
    let bytes = RecoveryImage::new(0).serialize();
    assert!(Reader::new(&bytes[..100]).is_err());
}

#[test]
fn reader_rejects_overlong_section_count() {
    let mut bytes = RecoveryImage::new(0).serialize();
    bytes[0x0b] = MAX_SECTIONS as u8 + 1;
    assert!(Reader::new(&bytes).is_err());
}

#[test]
fn reader_rejects_out_of_range_content() {
    let mut image = RecoveryImage::new(0);
    image.append_section(0, 0, b"payload").unwrap();
    let bytes = image.serialize();

    let truncated = &bytes[..bytes.len() - 1];
    let reader = Reader::new(truncated).unwrap();
    let header = reader.section(0);
    assert!(reader.section_content(header).is_err());
}

#[test]
fn cli_requires_exactly_one_output_path() {
    assert!(Config::try_parse_from(["recimg"]).is_err());
    assert!(Config::try_parse_from(["recimg", "a.img", "b.img"]).is_err());

    let config = Config::try_parse_from(["recimg", "out.img"]).unwrap();
    assert_eq!(config.output, PathBuf::from("out.img"));
    assert_eq!(config.log_level, "info");
}

#[test]
fn writer_publishes_serialized_bytes() {
    let mut image = RecoveryImage::new(1);
    image.append_section(2, 3, b"payload").unwrap();

    let path = std::env::temp_dir().join(format!("recimg-writer-test-{}.img", std::process::id()));
    writer::write_image(&path, &image).unwrap();

    let on_disk = std::fs::read(&path).unwrap();
    assert_eq!(on_disk, image.serialize());

    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    assert!(!PathBuf::from(tmp).exists());

    std::fs::remove_file(&path).unwrap();
}
