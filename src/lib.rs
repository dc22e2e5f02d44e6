#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

//! The binary format is a framed, sectioned container.
//!
//! A container opens with a 4-byte ASCII magic identifying its format family,
//! a little-endian version word, and a section count. Each section follows as
//! an id, a declared payload size, and the payload itself. Section ids may
//! repeat; whether repetition is legal is declared by the concrete schema.
//!
//! Two families ride on the framing: [`Family::R1CS`] containers persist
//! compiled constraint systems and [`Family::WTNS`] containers persist witness
//! vectors. Both declare their field byte width (`n8`) and prime modulus once,
//! in their header section; every later field element is `n8` little-endian
//! bytes.
//!
//! Since these containers are often large, nothing beyond the directory is
//! read at open time. Payloads are fetched through scoped cursors that bound
//! every read to the declared section size and reposition the stream at the
//! section end on release.

mod codec;
mod config;
mod container;
mod curve;
mod error;
mod field;

pub mod r1cs;
pub mod wtns;

pub use codec::{ReadBytesLe, WriteBytesLe};
pub use config::{BaseConfig, Limits};
pub use container::{
    ContainerReader, ContainerWriter, Family, SectionEntry, SectionIter, SectionReader,
    SectionWriter, GLOBAL_HEADER_LEN, SECTION_HEADER_LEN,
};
pub use curve::Curve;
pub use error::{Error, Result};
pub use field::FieldElement;
pub use r1cs::R1csHeader;
pub use wtns::WtnsHeader;
