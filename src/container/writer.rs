use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

use crate::{Error, Family, FieldElement, Result, WriteBytesLe};

/// An in-progress container.
///
/// Sections are appended in the order supplied; the size of each is
/// back-patched once its body is fully written, so the sink must be seekable.
/// The writer is only valid once [`close`] succeeds — closing before the
/// declared number of sections was written is a programming error, not a
/// recoverable one.
///
/// [`close`]: ContainerWriter::close
#[derive(Debug)]
pub struct ContainerWriter<S>
where
    S: Write + Seek,
{
    sink: S,
    family: Family,
    declared: u32,
    written: u32,
}

impl ContainerWriter<File> {
    /// Begin a new container file, truncating any previous content.
    ///
    /// Atomic publish (write-to-temp-then-rename) is the producer's
    /// responsibility, not this layer's.
    pub fn create_file<P>(path: P, family: Family, version: u32, sections: u32) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        Self::create(file, family, version, sections)
    }
}

impl<S> ContainerWriter<S>
where
    S: Write + Seek,
{
    /// Begin a new container, writing the global header.
    pub fn create(mut sink: S, family: Family, version: u32, sections: u32) -> Result<Self> {
        sink.write_all(&family.magic)?;
        sink.write_u32_le(version)?;
        sink.write_u32_le(sections)?;

        tracing::debug!(
            magic = %String::from_utf8_lossy(&family.magic),
            version,
            sections,
            "container created"
        );

        Ok(Self {
            sink,
            family,
            declared: sections,
            written: 0,
        })
    }

    /// Begin the next section, writing its id and a size placeholder.
    ///
    /// The placeholder is patched when the returned cursor is released; only
    /// one section may be open at a time.
    pub fn start_section(&mut self, id: u32) -> Result<SectionWriter<'_, S>> {
        if self.written == self.declared {
            return Err(Error::SectionOverflow {
                declared: self.declared,
            });
        }

        self.sink.write_u32_le(id)?;

        let size_offset = self.sink.stream_position()?;

        self.sink.write_u64_le(0)?;

        tracing::trace!(id, "section write started");

        Ok(SectionWriter {
            writer: Some(self),
            id,
            size_offset,
        })
    }

    /// Write a whole section from a byte slice.
    pub fn write_section(&mut self, id: u32, payload: &[u8]) -> Result<()> {
        let mut section = self.start_section(id)?;

        section.write_bytes(payload)?;
        section.end()
    }

    /// Finish the container, failing with [`Error::IncompleteContainer`] when
    /// fewer sections than declared were written.
    pub fn close(mut self) -> Result<S> {
        if self.written != self.declared {
            return Err(Error::IncompleteContainer {
                declared: self.declared,
                written: self.written,
            });
        }

        self.sink.flush()?;

        tracing::debug!(
            magic = %String::from_utf8_lossy(&self.family.magic),
            sections = self.written,
            "container closed"
        );

        Ok(self.sink)
    }
}

/// Scoped write access to one in-progress section.
///
/// The section's size is the one piece of framing that cannot be computed
/// until the body is fully written, so [`end`] seeks back to patch the
/// placeholder left by [`ContainerWriter::start_section`].
///
/// [`end`]: SectionWriter::end
#[derive(Debug)]
pub struct SectionWriter<'w, S>
where
    S: Write + Seek,
{
    writer: Option<&'w mut ContainerWriter<S>>,
    id: u32,
    size_offset: u64,
}

impl<'w, S> SectionWriter<'w, S>
where
    S: Write + Seek,
{
    fn sink(&mut self) -> Result<&mut S> {
        self.writer
            .as_deref_mut()
            .map(|writer| &mut writer.sink)
            .ok_or(Error::UseAfterRelease)
    }

    /// Append a little-endian `u32` to the section body.
    pub fn write_u32_le(&mut self, value: u32) -> Result<()> {
        self.sink()?.write_u32_le(value)
    }

    /// Append a little-endian `u64` to the section body.
    pub fn write_u64_le(&mut self, value: u64) -> Result<()> {
        self.sink()?.write_u64_le(value)
    }

    /// Append the full little-endian representation of a field element.
    pub fn write_field_element(&mut self, value: &FieldElement) -> Result<()> {
        self.sink()?.write_field_element(value)
    }

    /// Append raw bytes to the section body.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        Ok(self.sink()?.write_all(bytes)?)
    }

    /// Release the section, back-patching its size into the directory entry.
    ///
    /// Any write after this fails with [`Error::UseAfterRelease`], and so
    /// does a second release.
    pub fn end(&mut self) -> Result<()> {
        let writer = self.writer.take().ok_or(Error::UseAfterRelease)?;

        let end = writer.sink.stream_position()?;
        let size = end - (self.size_offset + 8);

        writer.sink.seek(SeekFrom::Start(self.size_offset))?;
        writer.sink.write_u64_le(size)?;
        writer.sink.seek(SeekFrom::Start(end))?;

        writer.written += 1;

        tracing::trace!(id = self.id, size, "section write released");

        Ok(())
    }
}
