mod http_reader;
mod io_reader;

use async_trait::async_trait;

// Re-export reader implementations.
pub use http_reader::HttpReader;
pub use io_reader::IoReader;

/// Result of a single positional read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOutcome {
    /// Number of bytes written to the start of the read buffer.
    pub len: usize,
    /// No more bytes follow the ones returned.
    ///
    /// Always set when `len` is less than the size of the buffer. Readers which
    /// know the size of their source also set it when a read ends exactly at
    /// the end of the source. A short read still carries valid data.
    pub end_of_stream: bool,
}

impl ReadOutcome {
    pub fn new(len: usize, end_of_stream: bool) -> Self {
        Self {
            len,
            end_of_stream,
        }
    }

    /// The buffer was filled and the source may have more to give.
    pub fn filled(len: usize) -> Self {
        Self::new(len, false)
    }

    /// The source ended after `len` bytes.
    pub fn end(len: usize) -> Self {
        Self::new(len, true)
    }
}

/// Trait may be implemented for any type which can be read at arbitrary offsets.
#[async_trait]
pub trait ReadAt {
    type Error;

    /// Read into `buf` starting at `offset` of the source.
    async fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<ReadOutcome, Self::Error>;

    /// Release any resources held by the reader.
    fn close(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[async_trait]
impl<R> ReadAt for &mut R
where
    R: ReadAt + Send + ?Sized,
{
    type Error = R::Error;

    async fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<ReadOutcome, Self::Error> {
        (**self).read_at(offset, buf).await
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        (**self).close()
    }
}
