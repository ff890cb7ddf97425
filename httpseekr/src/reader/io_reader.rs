use async_trait::async_trait;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt};

use crate::reader::{ReadAt, ReadOutcome};

/// Wrapper which implements ReadAt for any type which implements
/// tokio AsyncRead and AsyncSeek.
pub struct IoReader<T>(T);

impl<T> IoReader<T> {
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for IoReader<T> {
    fn from(inner: T) -> Self {
        Self(inner)
    }
}

#[async_trait]
impl<T> ReadAt for IoReader<T>
where
    T: AsyncRead + AsyncSeek + Unpin + Send,
{
    type Error = io::Error;

    async fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<ReadOutcome, io::Error> {
        self.0.seek(io::SeekFrom::Start(offset)).await?;
        let mut filled = 0;
        while filled < buf.len() {
            match self.0.read(&mut buf[filled..]).await? {
                0 => return Ok(ReadOutcome::end(filled)),
                n => filled += n,
            }
        }
        Ok(ReadOutcome::filled(filled))
    }
}
