//! Fixed-width little-endian primitives shared by the framing layer and the
//! section schemas.
//!
//! Byte order is a wire contract: values are little-endian regardless of the
//! host, so the implementations go through [`byteorder`] with an explicit
//! [`LittleEndian`] parameter rather than native conversions.

use std::io;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::{FieldElement, Result};

/// Sequential little-endian reads over any [`io::Read`] source.
///
/// Running out of bytes yields [`Error::TruncatedInput`], never a short read.
///
/// [`Error::TruncatedInput`]: crate::Error::TruncatedInput
pub trait ReadBytesLe: io::Read {
    /// Read a little-endian `u32`.
    fn read_u32_le(&mut self) -> Result<u32> {
        Ok(ReadBytesExt::read_u32::<LittleEndian>(self)?)
    }

    /// Read a little-endian `u64`.
    fn read_u64_le(&mut self) -> Result<u64> {
        Ok(ReadBytesExt::read_u64::<LittleEndian>(self)?)
    }

    /// Read exactly `n8` bytes as a little-endian unsigned integer.
    fn read_field_element(&mut self, n8: usize) -> Result<FieldElement> {
        let mut bytes = vec![0u8; n8];

        self.read_exact(&mut bytes)?;

        Ok(FieldElement::from_le_bytes(bytes))
    }
}

impl<R> ReadBytesLe for R where R: io::Read + ?Sized {}

/// Sequential little-endian writes over any [`io::Write`] sink.
pub trait WriteBytesLe: io::Write {
    /// Write a little-endian `u32`.
    fn write_u32_le(&mut self, value: u32) -> Result<()> {
        Ok(WriteBytesExt::write_u32::<LittleEndian>(self, value)?)
    }

    /// Write a little-endian `u64`.
    fn write_u64_le(&mut self, value: u64) -> Result<()> {
        Ok(WriteBytesExt::write_u64::<LittleEndian>(self, value)?)
    }

    /// Write the full little-endian representation of a field element.
    fn write_field_element(&mut self, value: &FieldElement) -> Result<()> {
        Ok(self.write_all(value.as_le_bytes())?)
    }
}

impl<W> WriteBytesLe for W where W: io::Write + ?Sized {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use quickcheck::{quickcheck, TestResult};
    use std::io::Cursor;

    #[test]
    fn words_round_trip() {
        fn prop(a: u32, b: u64) -> bool {
            let mut buf = Vec::new();

            buf.write_u32_le(a).and_then(|_| buf.write_u64_le(b)).is_ok() && {
                let mut cursor = Cursor::new(buf);

                cursor.read_u32_le().ok() == Some(a) && cursor.read_u64_le().ok() == Some(b)
            }
        }

        quickcheck(prop as fn(_, _) -> _);
    }

    #[test]
    fn field_elements_round_trip() {
        fn prop(data: Vec<u8>) -> TestResult {
            for n8 in [4usize, 8, 16, 32] {
                let mut bytes = data.clone();

                bytes.resize(n8, 0);

                let fe = FieldElement::from_le_bytes(bytes);
                let mut buf = Vec::new();

                if buf.write_field_element(&fe).is_err() {
                    return TestResult::failed();
                }

                match Cursor::new(buf).read_field_element(n8) {
                    Ok(decoded) if decoded == fe => (),
                    _ => return TestResult::failed(),
                }
            }

            TestResult::passed()
        }

        quickcheck(prop as fn(_) -> _);
    }

    #[test]
    fn wire_order_is_little_endian() {
        let mut buf = Vec::new();

        buf.write_u32_le(0x0102_0304).expect("write to vec");

        assert_eq!(buf, [0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn short_source_is_truncated_input() {
        let mut cursor = Cursor::new(vec![0u8; 3]);

        assert!(matches!(cursor.read_u32_le(), Err(Error::TruncatedInput)));

        let mut cursor = Cursor::new(vec![0u8; 7]);

        assert!(matches!(
            cursor.read_field_element(8),
            Err(Error::TruncatedInput)
        ));
    }
}
