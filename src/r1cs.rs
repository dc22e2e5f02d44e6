//! Schema for the header section of an `r1cs` container.
//!
//! Only the header (section id 1) has a layout fixed by the container format.
//! The constraint and wire-map payloads carry compiler-defined encodings and
//! are read through the generic section accessor, sized by the counts this
//! header declares.

use std::io::{Read, Seek, Write};

use serde::Serialize;

use crate::{ContainerReader, ContainerWriter, Curve, Error, Family, FieldElement, Result};

/// Section id of the header.
pub const HEADER_SECTION: u32 = 1;

/// Section id of the constraint payload.
///
/// Constraint batches may legitimately repeat this id; read them with
/// [`ContainerReader::iter_sections`].
pub const CONSTRAINTS_SECTION: u32 = 2;

/// Section id of the wire-to-label map.
pub const WIRE_MAP_SECTION: u32 = 3;

/// Header bytes besides the prime: n8, four u32 counters, one u64 and one u32.
const FIXED_LEN: u64 = 32;

/// Semantic view of section id 1 in an `r1cs` container.
///
/// Parsed once per open container and immutable thereafter. The counts are
/// descriptive at this layer; the payload sections are read through the
/// generic accessor using them as sizing hints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct R1csHeader {
    /// Byte width of every field element in the container.
    pub n8: u32,
    /// Prime modulus of the field, `n8` bytes little-endian.
    pub prime: FieldElement,
    /// Total wire count, including the constant wire.
    pub n_wires: u32,
    /// Public output count.
    pub n_pub_out: u32,
    /// Public input count.
    pub n_pub_in: u32,
    /// Private input count.
    pub n_prv_in: u32,
    /// Label count.
    pub n_labels: u64,
    /// Constraint count.
    pub n_constraints: u32,
}

impl R1csHeader {
    /// Curve implied by the prime, if it is a known modulus.
    pub fn curve(&self) -> Option<Curve> {
        Curve::from_prime(&self.prime)
    }

    /// Read the unique header section of an open container.
    pub fn read<S>(container: &mut ContainerReader<S>) -> Result<Self>
    where
        S: Read + Seek,
    {
        let mut section = container.start_unique_section(HEADER_SECTION)?;

        let n8 = section.read_u32_le()?;

        if n8 == 0 || section.size() != FIXED_LEN + n8 as u64 {
            return Err(Error::MalformedFieldWidth(n8));
        }

        let prime = section.read_field_element(n8 as usize)?;

        prime.check_prime()?;

        let header = Self {
            n8,
            prime,
            n_wires: section.read_u32_le()?,
            n_pub_out: section.read_u32_le()?,
            n_pub_in: section.read_u32_le()?,
            n_prv_in: section.read_u32_le()?,
            n_labels: section.read_u64_le()?,
            n_constraints: section.read_u32_le()?,
        };

        section.end()?;

        Ok(header)
    }

    /// Write the header section into an in-progress container.
    pub fn write<S>(&self, container: &mut ContainerWriter<S>) -> Result<()>
    where
        S: Write + Seek,
    {
        if self.n8 == 0 || self.prime.n8() != self.n8 as usize {
            return Err(Error::MalformedFieldWidth(self.n8));
        }

        let mut section = container.start_section(HEADER_SECTION)?;

        section.write_u32_le(self.n8)?;
        section.write_field_element(&self.prime)?;
        section.write_u32_le(self.n_wires)?;
        section.write_u32_le(self.n_pub_out)?;
        section.write_u32_le(self.n_pub_in)?;
        section.write_u32_le(self.n_prv_in)?;
        section.write_u64_le(self.n_labels)?;
        section.write_u32_le(self.n_constraints)?;

        section.end()
    }
}

/// Open an `r1cs` container, parsing its directory.
pub fn open<S>(source: S) -> Result<ContainerReader<S>>
where
    S: Read + Seek,
{
    ContainerReader::open(source, Family::R1CS)
}
