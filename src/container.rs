//! Framing layer of the container format.
//!
//! A container is a magic tag, a version word, a section count, and then the
//! declared number of sections laid out back to back, each prefixed by its id
//! and payload size:
//!
//! ```text
//! offset 0:  magic        4 bytes, ASCII
//! offset 4:  version      u32 LE
//! offset 8:  nSections    u32 LE
//! repeated nSections times:
//!   sectionId   u32 LE
//!   sectionSize u64 LE
//!   <sectionSize bytes of payload>
//! ```
//!
//! The same id may appear more than once; whether that is legal is a property
//! of the concrete schema, not of the framing. Header schemas read through
//! [`ContainerReader::start_unique_section`], batched payload schemas through
//! [`ContainerReader::iter_sections`].

mod reader;
mod writer;

pub use reader::{ContainerReader, SectionIter, SectionReader};
pub use writer::{ContainerWriter, SectionWriter};

/// Bytes occupied by the global header (magic, version, section count).
pub const GLOBAL_HEADER_LEN: u64 = 12;

/// Bytes occupied by one directory entry (section id and size).
pub const SECTION_HEADER_LEN: u64 = 12;

/// A format family: the fixed magic tag and the newest version this
/// implementation accepts for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Family {
    /// Four ASCII bytes identifying the family.
    pub magic: [u8; 4],
    /// Maximum accepted version; anything newer is rejected.
    pub max_version: u32,
}

impl Family {
    /// Rank-1 constraint system containers.
    pub const R1CS: Self = Self {
        magic: *b"r1cs",
        max_version: 1,
    };

    /// Witness vector containers.
    pub const WTNS: Self = Self {
        magic: *b"wtns",
        max_version: 2,
    };
}

/// One occurrence of a section in the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionEntry {
    /// Section id, small positive integer defined per format family.
    pub id: u32,
    /// Absolute offset of the payload within the container.
    pub offset: u64,
    /// Declared payload size in bytes.
    pub size: u64,
}
