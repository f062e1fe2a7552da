use flate2::Crc;
use flate2::read::DeflateDecoder;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};
use crate::io::ReadAt;

use super::parser::ZipParser;
use super::structures::{CompressionMethod, ZipFileEntry};

/// ZIP file extractor
pub struct ZipExtractor<R: ReadAt> {
    parser: ZipParser<R>,
}

impl<R: ReadAt> ZipExtractor<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            parser: ZipParser::new(reader),
        }
    }

    /// List all entries in the archive
    pub async fn list_files(&self) -> Result<Vec<ZipFileEntry>> {
        self.parser.list_files().await
    }

    /// Extract file data to memory, inflating and checking the CRC-32
    pub async fn extract_to_memory(&self, entry: &ZipFileEntry) -> Result<Vec<u8>> {
        let data_offset = self.parser.get_data_offset(entry).await?;
        let compressed_len = usize::try_from(entry.compressed_size)
            .map_err(|_| Error::archive(format!("{} is too large", entry.file_name)))?;
        let raw = self.parser.read_range(data_offset, compressed_len).await?;

        let data = match entry.compression_method {
            CompressionMethod::Stored => raw,
            CompressionMethod::Deflate => {
                // The recorded size is untrusted; read at most one byte past it
                // and let the length check below reject the difference.
                let mut out = Vec::new();
                DeflateDecoder::new(raw.as_slice())
                    .take(entry.uncompressed_size.saturating_add(1))
                    .read_to_end(&mut out)
                    .map_err(|e| {
                        Error::archive(format!("Failed to inflate {}: {e}", entry.file_name))
                    })?;
                out
            }
            CompressionMethod::Unknown(method) => {
                return Err(Error::archive(format!(
                    "Unsupported compression method {method} for {}",
                    entry.file_name
                )));
            }
        };

        if data.len() as u64 != entry.uncompressed_size {
            return Err(Error::archive(format!(
                "Size mismatch for {}: expected {} bytes, got {}",
                entry.file_name,
                entry.uncompressed_size,
                data.len()
            )));
        }

        let mut crc = Crc::new();
        crc.update(&data);
        if crc.sum() != entry.crc32 {
            return Err(Error::archive(format!(
                "CRC-32 mismatch for {}",
                entry.file_name
            )));
        }

        Ok(data)
    }

    /// Extract file to disk, creating it with the entry's permission bits.
    ///
    /// An existing file at `output_path` is truncated and overwritten.
    pub async fn extract_to_file(&self, entry: &ZipFileEntry, output_path: &Path) -> Result<()> {
        if let Some(parent) = output_path.parent()
            && !parent.as_os_str().is_empty()
        {
            create_dir(parent).await?;
        }

        let data = self.extract_to_memory(entry).await?;

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(entry.permissions());

        let mut file = options
            .open(output_path)
            .await
            .map_err(|e| Error::filesystem(output_path, e))?;
        file.write_all(&data)
            .await
            .map_err(|e| Error::filesystem(output_path, e))?;
        file.flush()
            .await
            .map_err(|e| Error::filesystem(output_path, e))?;

        Ok(())
    }
}

/// Create a directory and all of its missing parents
pub async fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .map_err(|e| Error::filesystem(path, e))
}
