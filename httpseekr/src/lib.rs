//! Seekable, random access reads of http/https hosted resources.
//!
//! Reads are translated into `Range` requests bound to the version of the
//! resource seen when it was opened. Reads may optionally be cached in whole
//! blocks to turn many small reads into fewer, larger requests.
//!
//! ```no_run
//! # async fn example() -> Result<(), httpseekr::Error> {
//! use httpseekr::{Client, Whence};
//!
//! let mut stream = Client::new()
//!     .block_size(64 * 1024)
//!     .get("http://textfiles.com/100/phrack.01.phk".parse().unwrap())
//!     .await?;
//! stream.seek(555, Whence::Start)?;
//! let mut buf = [0u8; 33];
//! let read = stream.read(&mut buf).await?;
//! println!("{}", String::from_utf8_lossy(&buf[..read.len]));
//! # Ok(())
//! # }
//! ```
mod block_cache;
mod client;
mod error;
mod probe;
mod stream;

pub mod reader;

pub use block_cache::{block_count, block_len, BlockCache};
pub use client::{Client, HttpStream};
pub use error::Error;
pub use probe::{Probe, VersionToken};
pub use reader::{HttpReader, IoReader, ReadAt, ReadOutcome};
pub use stream::{RangeStream, Whence};
