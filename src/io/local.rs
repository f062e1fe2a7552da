use super::ReadAt;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Local file reader with random access support
pub struct LocalFileReader {
    file: std::fs::File,
    path: PathBuf,
    size: u64,
}

impl LocalFileReader {
    pub fn new(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| Error::filesystem(path, e))?;
        let size = file
            .metadata()
            .map_err(|e| Error::filesystem(path, e))?
            .len();
        Ok(Self {
            file,
            path: path.to_path_buf(),
            size,
        })
    }
}

#[async_trait]
impl ReadAt for LocalFileReader {
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::FileExt;
            self.file
                .read_exact_at(buf, offset)
                .map_err(|e| Error::filesystem(&self.path, e))?;
            Ok(buf.len())
        }

        #[cfg(windows)]
        {
            use std::os::windows::fs::FileExt;
            let mut filled = 0;
            while filled < buf.len() {
                let n = self
                    .file
                    .seek_read(&mut buf[filled..], offset + filled as u64)
                    .map_err(|e| Error::filesystem(&self.path, e))?;
                if n == 0 {
                    return Err(Error::filesystem(
                        &self.path,
                        std::io::ErrorKind::UnexpectedEof.into(),
                    ));
                }
                filled += n;
            }
            Ok(filled)
        }
    }

    fn size(&self) -> u64 {
        self.size
    }
}
