use std::io::{Cursor, Seek};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use zkbin::{ContainerReader, ContainerWriter, Error, Family, Limits, WriteBytesLe};

fn payload(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut bytes = vec![0u8; len];

    rng.fill(bytes.as_mut_slice());

    bytes
}

fn build(family: Family, version: u32, sections: &[(u32, &[u8])]) -> Cursor<Vec<u8>> {
    let cursor = Cursor::new(Vec::new());
    let mut writer = ContainerWriter::create(cursor, family, version, sections.len() as u32)
        .expect("failed to create container");

    for (id, bytes) in sections {
        writer
            .write_section(*id, bytes)
            .expect("failed to write section");
    }

    writer.close().expect("failed to close container")
}

#[test]
fn directory_round_trip() {
    let first = payload(1, 48);
    let second = payload(2, 7);
    let third = payload(3, 0);

    let cursor = build(Family::R1CS, 1, &[(1, &first), (5, &second), (9, &third)]);

    let mut container =
        ContainerReader::open(cursor, Family::R1CS).expect("failed to open container");

    assert_eq!(container.version(), 1);
    assert_eq!(container.section_count(1), 1);
    assert_eq!(container.section_count(5), 1);
    assert_eq!(container.section_count(9), 1);
    assert_eq!(container.section_count(2), 0);

    let mut section = container
        .start_unique_section(5)
        .expect("failed to start section");

    assert_eq!(section.size(), 7);
    assert_eq!(section.read_to_end().expect("failed to read"), second);

    section.end().expect("failed to release");
    drop(section);

    let mut section = container
        .start_unique_section(1)
        .expect("failed to start section");

    section.skip(16).expect("failed to skip");

    assert_eq!(section.remaining(), 32);
    assert_eq!(section.read_to_end().expect("failed to read"), first[16..]);

    section.end().expect("failed to release");
    drop(section);

    let mut section = container
        .start_unique_section(9)
        .expect("failed to start empty section");

    assert_eq!(section.remaining(), 0);

    section.end().expect("failed to release");
}

#[test]
fn file_backed_containers_share_the_framing() {
    let dir = tempfile::tempdir().expect("failed to create tempdir");
    let path = dir.path().join("framing.r1cs");
    let body = payload(12, 24);

    let mut writer = ContainerWriter::create_file(&path, Family::R1CS, 1, 1)
        .expect("failed to create container file");

    writer.write_section(1, &body).expect("failed to write section");
    writer.close().expect("failed to close container");

    let mut container =
        ContainerReader::open_file(&path, Family::R1CS).expect("failed to open container file");

    assert_eq!(container.version(), 1);

    let mut section = container
        .start_unique_section(1)
        .expect("failed to start section");

    assert_eq!(section.read_to_end().expect("failed to read"), body);

    section.end().expect("failed to release");
}

#[test]
fn bad_magic_is_not_a_generic_error() {
    let cursor = build(Family::WTNS, 2, &[(1, &[0u8; 4])]);

    assert!(matches!(
        ContainerReader::open(cursor, Family::R1CS),
        Err(Error::BadMagic(m)) if &m == b"wtns"
    ));
}

#[test]
fn newer_version_is_rejected() {
    let cursor = build(Family::R1CS, 7, &[(1, &[0u8; 4])]);

    assert!(matches!(
        ContainerReader::open(cursor, Family::R1CS),
        Err(Error::UnsupportedVersion { found: 7, max: 1 })
    ));
}

#[test]
fn truncation_mid_directory() {
    // declares two sections, carries one
    let mut bytes = Vec::new();

    bytes.extend_from_slice(b"r1cs");
    bytes.write_u32_le(1).expect("write to vec");
    bytes.write_u32_le(2).expect("write to vec");
    bytes.write_u32_le(1).expect("write to vec");
    bytes.write_u64_le(3).expect("write to vec");
    bytes.extend_from_slice(&[0xaa, 0xbb, 0xcc]);

    assert!(matches!(
        ContainerReader::open(Cursor::new(bytes), Family::R1CS),
        Err(Error::TruncatedInput)
    ));
}

#[test]
fn truncation_mid_payload() {
    // declares eight payload bytes, carries three
    let mut bytes = Vec::new();

    bytes.extend_from_slice(b"r1cs");
    bytes.write_u32_le(1).expect("write to vec");
    bytes.write_u32_le(1).expect("write to vec");
    bytes.write_u32_le(1).expect("write to vec");
    bytes.write_u64_le(8).expect("write to vec");
    bytes.extend_from_slice(&[0xaa, 0xbb, 0xcc]);

    assert!(matches!(
        ContainerReader::open(Cursor::new(bytes), Family::R1CS),
        Err(Error::TruncatedInput)
    ));
}

#[test]
fn trailing_bytes_are_corruption() {
    let mut cursor = build(Family::R1CS, 1, &[(1, &[1, 2, 3])]);

    cursor.seek(std::io::SeekFrom::End(0)).expect("seek to end");
    cursor.get_mut().push(0);

    assert!(matches!(
        ContainerReader::open(cursor, Family::R1CS),
        Err(Error::SizeMismatch { .. })
    ));
}

#[test]
fn unique_access_rejects_duplicates_and_absences() {
    let cursor = build(Family::R1CS, 1, &[(1, &[1]), (1, &[2])]);

    let mut container =
        ContainerReader::open(cursor, Family::R1CS).expect("failed to open container");

    assert!(matches!(
        container.start_unique_section(1),
        Err(Error::DuplicateSection(1))
    ));
    assert!(matches!(
        container.start_unique_section(2),
        Err(Error::SectionNotFound(2))
    ));
}

#[test]
fn release_always_lands_on_the_section_end() {
    let first = payload(4, 16);
    let second = payload(5, 16);

    // partial read, then release
    let cursor = build(Family::R1CS, 1, &[(1, &first), (2, &second)]);
    let mut container =
        ContainerReader::open(cursor, Family::R1CS).expect("failed to open container");

    let mut section = container.start_unique_section(1).expect("start section");
    let mut prefix = [0u8; 3];

    section.read_exact(&mut prefix).expect("partial read");
    section.end().expect("failed to release");

    drop(section);

    let entry = container.entries(1)[0];
    let expected = entry.offset + entry.size;
    let mut source = container.into_inner();

    assert_eq!(source.stream_position().expect("position"), expected);

    // the next section reads the same bytes whether or not the previous one
    // was consumed
    let mut container =
        ContainerReader::open(source, Family::R1CS).expect("failed to reopen container");

    let mut section = container.start_unique_section(2).expect("start section");

    assert_eq!(section.read_to_end().expect("failed to read"), second);

    section.end().expect("failed to release");
}

#[test]
fn released_cursor_is_unusable() {
    let cursor = build(Family::R1CS, 1, &[(1, &payload(6, 8))]);
    let mut container =
        ContainerReader::open(cursor, Family::R1CS).expect("failed to open container");

    let mut section = container.start_unique_section(1).expect("start section");

    section.end().expect("failed to release");

    assert!(matches!(section.read_u32_le(), Err(Error::UseAfterRelease)));
    assert!(matches!(section.end(), Err(Error::UseAfterRelease)));
}

#[test]
fn dropped_cursor_still_advances_the_stream() {
    let second = payload(7, 12);
    let cursor = build(Family::R1CS, 1, &[(1, &payload(8, 12)), (2, &second)]);
    let mut container =
        ContainerReader::open(cursor, Family::R1CS).expect("failed to open container");

    {
        let _section = container.start_unique_section(1).expect("start section");
    }

    let mut section = container.start_unique_section(2).expect("start section");

    assert_eq!(section.read_to_end().expect("failed to read"), second);

    section.end().expect("failed to release");
}

#[test]
fn over_read_is_a_hard_error() {
    let cursor = build(Family::R1CS, 1, &[(1, &[1, 2, 3, 4])]);
    let mut container =
        ContainerReader::open(cursor, Family::R1CS).expect("failed to open container");

    let mut section = container.start_unique_section(1).expect("start section");

    assert!(matches!(section.read_u64_le(), Err(Error::TruncatedInput)));
}

#[test]
fn repeated_sections_iterate_in_file_order() {
    let batches: Vec<Vec<u8>> = vec![payload(9, 10), payload(10, 20), payload(11, 30)];
    let sections: Vec<(u32, &[u8])> = batches.iter().map(|b| (2, b.as_slice())).collect();

    let cursor = build(Family::R1CS, 1, &sections);
    let mut container =
        ContainerReader::open(cursor, Family::R1CS).expect("failed to open container");

    assert_eq!(container.section_count(2), 3);

    let mut iter = container.iter_sections(2);
    let mut decoded = Vec::new();

    while let Some(mut section) = iter.next_section().expect("failed to advance") {
        decoded.push(section.read_to_end().expect("failed to read"));
        section.end().expect("failed to release");
    }

    assert_eq!(decoded, batches);
    assert_eq!(iter.remaining(), 0);
    assert!(iter.next_section().expect("exhausted pass").is_none());

    // absent id yields an empty pass, not an error
    let mut iter = container.iter_sections(42);

    assert!(iter.next_section().expect("empty pass").is_none());

    // positioned access to a single occurrence, counted in file order
    let mut section = container
        .start_section_at(2, 1)
        .expect("failed to start occurrence");

    assert_eq!(section.read_to_end().expect("failed to read"), batches[1]);

    section.end().expect("failed to release");
    drop(section);

    assert!(matches!(
        container.start_section_at(2, 3),
        Err(Error::SectionNotFound(2))
    ));
}

#[test]
fn closing_with_missing_sections_is_incomplete() {
    let mut writer = ContainerWriter::create(Cursor::new(Vec::new()), Family::WTNS, 2, 2)
        .expect("failed to create container");

    writer.write_section(1, &[0u8; 8]).expect("write section");

    assert!(matches!(
        writer.close(),
        Err(Error::IncompleteContainer {
            declared: 2,
            written: 1
        })
    ));
}

#[test]
fn writing_past_the_declared_count_overflows() {
    let mut writer = ContainerWriter::create(Cursor::new(Vec::new()), Family::WTNS, 2, 1)
        .expect("failed to create container");

    writer.write_section(1, &[0u8; 8]).expect("write section");

    assert!(matches!(
        writer.start_section(2),
        Err(Error::SectionOverflow { declared: 1 })
    ));
}

#[test]
fn limits_bound_the_directory_walk() {
    let cursor = build(Family::R1CS, 1, &[(1, &[0u8; 4]), (2, &[0u8; 4])]);
    let mut limits = Limits::default();

    limits.with_max_sections(1);

    assert!(matches!(
        ContainerReader::open_with_limits(cursor, Family::R1CS, limits),
        Err(Error::TooManySections { found: 2, max: 1 })
    ));

    let cursor = build(Family::R1CS, 1, &[(1, &[0u8; 64])]);
    let mut limits = Limits::default();

    limits.with_max_section_size(32);

    assert!(matches!(
        ContainerReader::open_with_limits(cursor, Family::R1CS, limits),
        Err(Error::SectionTooLarge {
            id: 1,
            size: 64,
            max: 32
        })
    ));
}
