use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::{Error, Family, FieldElement, Limits, ReadBytesLe, Result, SectionEntry};

/// An open container with its directory fully parsed.
///
/// Since containers are often large, no section payload is read at open time;
/// the directory walk only skips over the declared sizes. Payloads are fetched
/// lazily through scoped [`SectionReader`] cursors.
#[derive(Debug)]
pub struct ContainerReader<S> {
    source: S,
    family: Family,
    version: u32,
    sections: BTreeMap<u32, Vec<SectionEntry>>,
}

impl ContainerReader<File> {
    /// Open a container file as read-only.
    pub fn open_file<P>(path: P, family: Family) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let file = OpenOptions::new().read(true).open(path)?;

        Self::open(file, family)
    }
}

impl<S> ContainerReader<S>
where
    S: Read + Seek,
{
    /// Parse magic, version and the section directory with default [`Limits`].
    ///
    /// No payload bytes are interpreted. Fails with [`Error::BadMagic`] when
    /// the tag does not match the family, [`Error::UnsupportedVersion`] when
    /// the container is newer than the family accepts, and
    /// [`Error::TruncatedInput`] when the source ends before the declared
    /// layout does.
    pub fn open(source: S, family: Family) -> Result<Self> {
        Self::open_with_limits(source, family, Limits::DEFAULT)
    }

    /// Parse the container with explicit directory guards.
    pub fn open_with_limits(mut source: S, family: Family, limits: Limits) -> Result<Self> {
        let total = source.seek(SeekFrom::End(0))?;

        source.seek(SeekFrom::Start(0))?;

        let mut magic = [0u8; 4];

        source.read_exact(&mut magic)?;

        if magic != family.magic {
            return Err(Error::BadMagic(magic));
        }

        let version = source.read_u32_le()?;

        if version > family.max_version {
            return Err(Error::UnsupportedVersion {
                found: version,
                max: family.max_version,
            });
        }

        let count = source.read_u32_le()?;

        if count > limits.max_sections {
            return Err(Error::TooManySections {
                found: count,
                max: limits.max_sections,
            });
        }

        let mut sections: BTreeMap<u32, Vec<SectionEntry>> = BTreeMap::new();

        for _ in 0..count {
            let id = source.read_u32_le()?;
            let size = source.read_u64_le()?;

            if size > limits.max_section_size {
                return Err(Error::SectionTooLarge {
                    id,
                    size,
                    max: limits.max_section_size,
                });
            }

            let offset = source.stream_position()?;
            let end = offset
                .checked_add(size)
                .filter(|end| *end <= total)
                .ok_or(Error::TruncatedInput)?;

            sections
                .entry(id)
                .or_default()
                .push(SectionEntry { id, offset, size });

            source.seek(SeekFrom::Start(end))?;
        }

        // the declared layout must cover the source exactly; trailing bytes
        // are corruption, not slack
        let end = source.stream_position()?;

        if end != total {
            return Err(Error::SizeMismatch {
                declared: end,
                actual: total,
            });
        }

        tracing::debug!(
            magic = %String::from_utf8_lossy(&family.magic),
            version,
            sections = count,
            "container opened"
        );

        Ok(Self {
            source,
            family,
            version,
            sections,
        })
    }

    /// Locate the single expected occurrence of `id` and position a scoped
    /// cursor at its start.
    ///
    /// This is the strict form used for header sections: it fails with
    /// [`Error::SectionNotFound`] when the id is absent and
    /// [`Error::DuplicateSection`] when it occurs more than once.
    pub fn start_unique_section(&mut self, id: u32) -> Result<SectionReader<'_, S>> {
        let entries = self
            .sections
            .get(&id)
            .filter(|entries| !entries.is_empty())
            .ok_or(Error::SectionNotFound(id))?;

        if entries.len() > 1 {
            return Err(Error::DuplicateSection(id));
        }

        let entry = entries[0];

        SectionReader::start(&mut self.source, entry)
    }

    /// Position a scoped cursor at the given occurrence of `id`, counted in
    /// file order.
    pub fn start_section_at(&mut self, id: u32, occurrence: usize) -> Result<SectionReader<'_, S>> {
        let entry = self
            .sections
            .get(&id)
            .and_then(|entries| entries.get(occurrence))
            .copied()
            .ok_or(Error::SectionNotFound(id))?;

        SectionReader::start(&mut self.source, entry)
    }

    /// Iterate every occurrence of `id` in file order.
    ///
    /// The sequence is finite and not restartable; a fresh pass requires a
    /// fresh call, which re-reads the parsed directory.
    pub fn iter_sections(&mut self, id: u32) -> SectionIter<'_, S> {
        let entries = self.sections.get(&id).cloned().unwrap_or_default();

        SectionIter {
            source: &mut self.source,
            entries,
            next: 0,
        }
    }

    /// Return the inner source
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S> ContainerReader<S> {
    /// Version declared by the container.
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Family the container was opened as.
    pub const fn family(&self) -> &Family {
        &self.family
    }

    /// Number of occurrences of `id` in the directory.
    pub fn section_count(&self, id: u32) -> usize {
        self.sections.get(&id).map(Vec::len).unwrap_or(0)
    }

    /// Directory entries for `id`, in file order.
    pub fn entries(&self, id: u32) -> &[SectionEntry] {
        self.sections
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Finite, non-restartable pass over the occurrences of one section id.
#[derive(Debug)]
pub struct SectionIter<'r, S> {
    source: &'r mut S,
    entries: Vec<SectionEntry>,
    next: usize,
}

impl<'r, S> SectionIter<'r, S>
where
    S: Read + Seek,
{
    /// Yield a cursor over the next occurrence, or `None` once exhausted.
    pub fn next_section(&mut self) -> Result<Option<SectionReader<'_, S>>> {
        let entry = match self.entries.get(self.next) {
            Some(entry) => *entry,
            None => return Ok(None),
        };

        self.next += 1;

        SectionReader::start(self.source, entry).map(Some)
    }

    /// Occurrences left to yield.
    pub fn remaining(&self) -> usize {
        self.entries.len() - self.next
    }
}

/// Positioned, bounded access to one section occurrence.
///
/// Reads never cross the declared size. Releasing the cursor, through
/// [`end`] or by dropping it, leaves the underlying stream at the section's
/// declared end regardless of how many bytes were consumed: under-read is a
/// padded skip, over-read is a hard error.
///
/// [`end`]: SectionReader::end
#[derive(Debug)]
pub struct SectionReader<'s, S>
where
    S: Read + Seek,
{
    source: Option<&'s mut S>,
    entry: SectionEntry,
    remaining: u64,
}

impl<'s, S> SectionReader<'s, S>
where
    S: Read + Seek,
{
    fn start(source: &'s mut S, entry: SectionEntry) -> Result<Self> {
        source.seek(SeekFrom::Start(entry.offset))?;

        tracing::trace!(id = entry.id, size = entry.size, "section read started");

        Ok(Self {
            source: Some(source),
            entry,
            remaining: entry.size,
        })
    }

    /// Reserve `len` bytes of the section budget and expose the source.
    fn source(&mut self, len: u64) -> Result<&mut S> {
        let remaining = self.remaining;
        let source = self
            .source
            .as_deref_mut()
            .ok_or(Error::UseAfterRelease)?;

        if len > remaining {
            return Err(Error::TruncatedInput);
        }

        self.remaining = remaining - len;

        Ok(source)
    }

    /// Read a little-endian `u32` from the section.
    pub fn read_u32_le(&mut self) -> Result<u32> {
        self.source(4)?.read_u32_le()
    }

    /// Read a little-endian `u64` from the section.
    pub fn read_u64_le(&mut self) -> Result<u64> {
        self.source(8)?.read_u64_le()
    }

    /// Read one field element of `n8` bytes from the section.
    pub fn read_field_element(&mut self, n8: usize) -> Result<FieldElement> {
        self.source(n8 as u64)?.read_field_element(n8)
    }

    /// Fill `buf` from the section.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        Ok(self.source(buf.len() as u64)?.read_exact(buf)?)
    }

    /// Read the remainder of the section into an owned buffer.
    pub fn read_to_end(&mut self) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; self.remaining as usize];

        self.read_exact(&mut buf)?;

        Ok(buf)
    }

    /// Skip `len` bytes without interpreting them.
    pub fn skip(&mut self, len: u64) -> Result<()> {
        self.source(len)?.seek(SeekFrom::Current(len as i64))?;

        Ok(())
    }

    /// Bytes left before the declared end of the section.
    pub const fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Section id of this occurrence.
    pub const fn id(&self) -> u32 {
        self.entry.id
    }

    /// Declared payload size of this occurrence.
    pub const fn size(&self) -> u64 {
        self.entry.size
    }

    /// Absolute payload offset of this occurrence.
    pub const fn offset(&self) -> u64 {
        self.entry.offset
    }

    /// Release the cursor, advancing the stream to the declared section end.
    ///
    /// Any read operation after this fails with [`Error::UseAfterRelease`],
    /// and so does a second release.
    pub fn end(&mut self) -> Result<()> {
        let source = self.source.take().ok_or(Error::UseAfterRelease)?;

        source.seek(SeekFrom::Start(self.entry.offset + self.entry.size))?;
        self.remaining = 0;

        tracing::trace!(id = self.entry.id, "section read released");

        Ok(())
    }
}

impl<'s, S> Drop for SectionReader<'s, S>
where
    S: Read + Seek,
{
    fn drop(&mut self) {
        // backstop for early-return paths; failures cannot surface here, so
        // the explicit `end` is the reliable release
        if let Some(source) = self.source.take() {
            tracing::warn!(id = self.entry.id, "section cursor released by drop");

            let _ = source.seek(SeekFrom::Start(self.entry.offset + self.entry.size));
        }
    }
}
