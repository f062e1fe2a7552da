mod http;
mod local;
mod temp;

pub use http::{Downloader, zipball_url};
pub use local::LocalFileReader;
pub use temp::TempArchive;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for random access reading from a data source
#[async_trait]
pub trait ReadAt: Send + Sync {
    /// Fill `buf` with the bytes starting at `offset`
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize>;

    /// Get the total size of the data source
    fn size(&self) -> u64;
}

#[cfg(test)]
#[async_trait]
impl ReadAt for Vec<u8> {
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        let start = offset as usize;
        let end = start + buf.len();
        if end > self.len() {
            return Err(crate::Error::archive("read past end of buffer"));
        }
        buf.copy_from_slice(&self[start..end]);
        Ok(buf.len())
    }

    fn size(&self) -> u64 {
        self.len() as u64
    }
}
