use std::io;

use thiserror::Error;

use crate::FieldElement;

/// Convenience alias for fallible container operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Failures surfaced by the container layer.
///
/// Corruption and truncation are always hard failures; nothing is downgraded
/// to a default value and nothing is retried. The caller decides whether to
/// re-fetch or re-generate the source file.
#[derive(Debug, Error)]
pub enum Error {
    /// The first four bytes of the source do not match the expected family
    /// tag.
    #[error("unrecognized magic bytes {0:02x?}")]
    BadMagic([u8; 4]),

    /// The container declares a version newer than this implementation
    /// supports.
    #[error("unsupported container version {found}, expected at most {max}")]
    UnsupportedVersion {
        /// Version found in the container.
        found: u32,
        /// Maximum version accepted for the family.
        max: u32,
    },

    /// The source ended before the declared layout was fully read.
    #[error("truncated input: the source ended before the declared layout")]
    TruncatedInput,

    /// The requested section id is absent from the directory.
    #[error("section {0} not found")]
    SectionNotFound(u32),

    /// A section id declared unique by its schema occurs more than once.
    #[error("section {0} occurs more than once")]
    DuplicateSection(u32),

    /// An operation was attempted on a section cursor after its release.
    #[error("section cursor used after release")]
    UseAfterRelease,

    /// The writer was closed before all declared sections were written.
    #[error("container closed after {written} of {declared} declared sections")]
    IncompleteContainer {
        /// Sections declared at creation.
        declared: u32,
        /// Sections actually written.
        written: u32,
    },

    /// The field byte width is zero or inconsistent with the declared size of
    /// a fixed-width payload.
    #[error("malformed field width {0}")]
    MalformedFieldWidth(u32),

    /// The declared layout does not cover the source length exactly.
    #[error("declared layout of {declared} bytes does not match {actual} available")]
    SizeMismatch {
        /// Bytes the layout accounts for.
        declared: u64,
        /// Bytes actually present.
        actual: u64,
    },

    /// The prime modulus failed the parsing sanity check (odd, greater than
    /// one). This is not a primality test.
    #[error("prime modulus fails the sanity check: {0}")]
    InvalidPrime(FieldElement),

    /// The directory declares more sections than the configured limit.
    #[error("directory declares {found} sections, at most {max} allowed")]
    TooManySections {
        /// Sections declared by the directory.
        found: u32,
        /// Configured maximum.
        max: u32,
    },

    /// A directory entry declares a size above the configured limit.
    #[error("section {id} declares {size} bytes, at most {max} allowed")]
    SectionTooLarge {
        /// Section id of the offending entry.
        id: u32,
        /// Declared payload size.
        size: u64,
        /// Configured maximum.
        max: u64,
    },

    /// The writer was asked for more sections than it declared at creation.
    #[error("attempt to write more sections than the {declared} declared")]
    SectionOverflow {
        /// Sections declared at creation.
        declared: u32,
    },

    /// Underlying I/O failure that is not an end-of-input condition.
    #[error("i/o failure: {0}")]
    Io(io::Error),
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        // an unexpected end of input is a framing violation, not a generic
        // i/o failure
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Self::TruncatedInput
        } else {
            Self::Io(e)
        }
    }
}
