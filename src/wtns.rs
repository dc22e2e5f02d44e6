//! Schema for `wtns` containers: the header section and the witness vector.

use std::io::{Read, Seek, Write};

use serde::Serialize;

use crate::{ContainerReader, ContainerWriter, Error, Family, FieldElement, Result};

/// Section id of the header.
pub const HEADER_SECTION: u32 = 1;

/// Section id of the witness vector.
pub const WITNESS_SECTION: u32 = 2;

/// Header bytes besides the prime: n8 and the witness count.
const FIXED_LEN: u64 = 8;

/// Semantic view of section id 1 in a `wtns` container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WtnsHeader {
    /// Byte width of every field element in the container.
    pub n8: u32,
    /// Prime modulus of the field, `n8` bytes little-endian.
    pub prime: FieldElement,
    /// Number of field elements in the witness vector.
    pub n_witness: u32,
}

impl WtnsHeader {
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

        let n_witness = section.read_u32_le()?;

        section.end()?;

        Ok(Self {
            n8,
            prime,
            n_witness,
        })
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
        section.write_u32_le(self.n_witness)?;

        section.end()
    }
}

/// Read the witness vector (section id 2) into a caller-owned buffer.
///
/// The section must hold exactly `n_witness` elements of `n8` bytes. Index 0
/// is conventionally the multiplicative identity, but the container format
/// does not enforce that and neither does this function.
pub fn read_witness<S>(
    container: &mut ContainerReader<S>,
    header: &WtnsHeader,
) -> Result<Vec<FieldElement>>
where
    S: Read + Seek,
{
    let mut section = container.start_unique_section(WITNESS_SECTION)?;

    let expected = header.n_witness as u64 * header.n8 as u64;

    if section.size() != expected {
        return Err(Error::SizeMismatch {
            declared: expected,
            actual: section.size(),
        });
    }

    let mut witness = Vec::with_capacity(header.n_witness as usize);

    for _ in 0..header.n_witness {
        witness.push(section.read_field_element(header.n8 as usize)?);
    }

    section.end()?;

    Ok(witness)
}

/// Open a `wtns` container, parsing its directory.
pub fn open<S>(source: S) -> Result<ContainerReader<S>>
where
    S: Read + Seek,
{
    ContainerReader::open(source, Family::WTNS)
}

/// Open a `wtns` container and read both sections.
pub fn read<S>(source: S) -> Result<(WtnsHeader, Vec<FieldElement>)>
where
    S: Read + Seek,
{
    let mut container = open(source)?;
    let header = WtnsHeader::read(&mut container)?;
    let witness = read_witness(&mut container, &header)?;

    Ok((header, witness))
}

/// Write a complete `wtns` container: header section and witness vector.
///
/// Every element must match the header width, and the vector length must
/// match `n_witness`.
pub fn write<S>(sink: S, header: &WtnsHeader, witness: &[FieldElement]) -> Result<S>
where
    S: Write + Seek,
{
    if witness.len() != header.n_witness as usize
        || witness.iter().any(|value| value.n8() != header.n8 as usize)
    {
        return Err(Error::MalformedFieldWidth(header.n8));
    }

    let mut container = ContainerWriter::create(sink, Family::WTNS, Family::WTNS.max_version, 2)?;

    header.write(&mut container)?;

    let mut section = container.start_section(WITNESS_SECTION)?;

    for value in witness {
        section.write_field_element(value)?;
    }

    section.end()?;

    container.close()
}
