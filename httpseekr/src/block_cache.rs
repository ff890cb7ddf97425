use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;

use crate::reader::{ReadAt, ReadOutcome};
use crate::Error;

/// Number of blocks of `block_size` needed to cover `content_length` bytes.
pub fn block_count(content_length: u64, block_size: u64) -> u64 {
    if block_size == 0 {
        return 0;
    }
    content_length.div_ceil(block_size)
}

/// Size of block `index`. Only the last block may be shorter than `block_size`.
pub fn block_len(content_length: u64, block_size: u64, index: u64) -> u64 {
    let start = index.saturating_mul(block_size);
    std::cmp::min(block_size, content_length.saturating_sub(start))
}

/// Block aligned read cache in front of a random access reader.
///
/// Every read is snapped to whole blocks of the configured size. Blocks are
/// fetched from the inner reader on first use and kept for the lifetime of the
/// cache. A block size of zero disables the cache and forwards every read.
///
/// Closing releases all cached blocks. Reads after close are forwarded to the
/// closed inner reader.
pub struct BlockCache<R> {
    inner: R,
    block_size: u64,
    content_length: u64,
    blocks: HashMap<u64, Bytes>,
    closed: bool,
}

impl<R> BlockCache<R> {
    pub fn new(inner: R, content_length: u64, block_size: u64) -> Result<Self, Error> {
        if block_size > 0 && content_length == 0 {
            return Err(Error::BufferingWithoutLength);
        }
        Ok(Self {
            inner,
            block_size,
            content_length,
            blocks: HashMap::new(),
            closed: false,
        })
    }

    /// Create a cache which forwards every read to the inner reader.
    pub fn pass_through(inner: R) -> Self {
        Self {
            inner,
            block_size: 0,
            content_length: 0,
            blocks: HashMap::new(),
            closed: false,
        }
    }

    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    pub fn is_buffered(&self) -> bool {
        self.block_size > 0
    }

    pub fn block_count(&self) -> u64 {
        block_count(self.content_length, self.block_size)
    }

    pub fn block_len(&self, index: u64) -> u64 {
        block_len(self.content_length, self.block_size, index)
    }

    pub fn cached_blocks(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_cached(&self, index: u64) -> bool {
        self.blocks.contains_key(&index)
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R> BlockCache<R>
where
    R: ReadAt + Send,
{
    async fn block(&mut self, index: u64) -> Result<Bytes, R::Error> {
        if let Some(block) = self.blocks.get(&index) {
            return Ok(block.clone());
        }
        let offset = index * self.block_size;
        let size = self.block_len(index) as usize;
        let mut data = vec![0u8; size];
        let outcome = self.inner.read_at(offset, &mut data).await?;
        if outcome.len < size {
            log::debug!(
                "Block {} ended after {} of {} bytes",
                index,
                outcome.len,
                size
            );
        }
        data.truncate(outcome.len);
        log::trace!(
            "Filled block {} with {} bytes starting from {}",
            index,
            data.len(),
            offset
        );
        let block = Bytes::from(data);
        self.blocks.insert(index, block.clone());
        Ok(block)
    }
}

#[async_trait]
impl<R> ReadAt for BlockCache<R>
where
    R: ReadAt + Send,
{
    type Error = R::Error;

    async fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<ReadOutcome, R::Error> {
        if self.block_size == 0 || self.closed {
            return self.inner.read_at(offset, buf).await;
        }
        if buf.is_empty() {
            return Ok(ReadOutcome::filled(0));
        }
        if offset >= self.content_length {
            return Ok(ReadOutcome::end(0));
        }

        let end = std::cmp::min(offset.saturating_add(buf.len() as u64), self.content_length);
        let first_block = offset / self.block_size;
        let last_block = (end - 1) / self.block_size;
        log::trace!(
            "Read at {} with size {} spans blocks {}..={}",
            offset,
            buf.len(),
            first_block,
            last_block
        );

        let mut filled = 0;
        for index in first_block..=last_block {
            let block = self.block(index).await?;
            let block_start = index * self.block_size;
            let start = (offset.max(block_start) - block_start) as usize;
            let stop = std::cmp::min(end - block_start, block.len() as u64) as usize;
            if start < stop {
                let slice = &block[start..stop];
                buf[filled..filled + slice.len()].copy_from_slice(slice);
                filled += slice.len();
            }
            if (block.len() as u64) < self.block_len(index) {
                // Source ended inside this block, nothing follows.
                break;
            }
        }

        let end_of_stream = filled < buf.len() || offset + filled as u64 >= self.content_length;
        Ok(ReadOutcome::new(filled, end_of_stream))
    }

    fn close(&mut self) -> Result<(), R::Error> {
        self.blocks = HashMap::new();
        self.closed = true;
        self.inner.close()
    }
}
