use crate::block_cache::BlockCache;
use crate::reader::{ReadAt, ReadOutcome};
use crate::Error;

/// Origin of a seek.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    /// Absolute position.
    Start,
    /// Relative to the current position.
    Current,
    /// Distance back from the end of the resource.
    End,
}

impl TryFrom<i32> for Whence {
    type Error = Error;

    fn try_from(whence: i32) -> Result<Self, Error> {
        match whence {
            0 => Ok(Whence::Start),
            1 => Ok(Whence::Current),
            2 => Ok(Whence::End),
            _ => Err(Error::InvalidWhence(whence)),
        }
    }
}

/// Seekable stream over a random access source.
///
/// Holds a read cursor and reads through a [`BlockCache`], which forwards
/// every read to the source when created without block size.
pub struct RangeStream<R> {
    source: BlockCache<R>,
    cursor: u64,
    content_length: u64,
}

impl<R> RangeStream<R> {
    /// Create a stream over a source of `content_length` bytes, reading whole
    /// blocks of `block_size` bytes (0 disables buffering).
    pub fn new(reader: R, content_length: u64, block_size: u64) -> Result<Self, Error> {
        Ok(Self {
            source: BlockCache::new(reader, content_length, block_size)?,
            cursor: 0,
            content_length,
        })
    }

    pub fn position(&self) -> u64 {
        self.cursor
    }

    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    pub fn block_size(&self) -> u64 {
        self.source.block_size()
    }

    pub fn cache(&self) -> &BlockCache<R> {
        &self.source
    }

    pub fn get_ref(&self) -> &R {
        self.source.get_ref()
    }

    pub fn into_inner(self) -> R {
        self.source.into_inner()
    }

    /// Move the cursor and return the new position.
    ///
    /// Seeking from [`Whence::End`] moves `offset` bytes back from the end.
    /// The position is not bounded by the content length, reading beyond it
    /// gives an empty read with end of stream set.
    pub fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64, Error> {
        let offset = i128::from(offset);
        let position = match whence {
            Whence::Start => offset,
            Whence::Current => i128::from(self.cursor) + offset,
            Whence::End => i128::from(self.content_length) - offset,
        };
        self.cursor = u64::try_from(position).map_err(|_| Error::InvalidPosition(position))?;
        log::trace!("Seek {} ({:?}) to {}", offset, whence, self.cursor);
        Ok(self.cursor)
    }
}

impl<R> RangeStream<R>
where
    R: ReadAt + Send,
{
    /// Read at `offset` without moving the cursor.
    pub async fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<ReadOutcome, R::Error> {
        self.source.read_at(offset, buf).await
    }

    /// Read at the cursor and advance it by the number of bytes read.
    pub async fn read(&mut self, buf: &mut [u8]) -> Result<ReadOutcome, R::Error> {
        let outcome = self.source.read_at(self.cursor, buf).await?;
        self.cursor += outcome.len as u64;
        Ok(outcome)
    }

    /// Release the underlying source and all cached blocks. Reads after close
    /// fail with the error of the source.
    pub fn close(&mut self) -> Result<(), R::Error> {
        self.source.close()
    }
}
