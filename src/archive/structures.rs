use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

use crate::error::{Error, Result};

/// ZIP compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Stored,
    Deflate,
    Unknown(u16),
}

impl CompressionMethod {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflate,
            _ => CompressionMethod::Unknown(value),
        }
    }
}

/// End of Central Directory (EOCD) - 22 bytes minimum
pub struct EndOfCentralDirectory {
    pub disk_entries: u16,
    pub total_entries: u16,
    pub cd_size: u32,
    pub cd_offset: u32,
}

impl EndOfCentralDirectory {
    pub const SIGNATURE: &'static [u8] = b"PK\x05\x06";
    pub const SIZE: usize = 22;

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE || &data[0..4] != Self::SIGNATURE {
            return Err(Error::archive("Invalid End of Central Directory"));
        }

        // Skip disk number and disk holding the central directory
        Self::read_fields(&mut Cursor::new(&data[8..]))
            .map_err(|e| Error::archive(format!("Invalid End of Central Directory: {e}")))
    }

    fn read_fields(cursor: &mut Cursor<&[u8]>) -> std::io::Result<Self> {
        Ok(Self {
            disk_entries: cursor.read_u16::<LittleEndian>()?,
            total_entries: cursor.read_u16::<LittleEndian>()?,
            cd_size: cursor.read_u32::<LittleEndian>()?,
            cd_offset: cursor.read_u32::<LittleEndian>()?,
        })
    }

    pub fn is_zip64(&self) -> bool {
        self.disk_entries == 0xFFFF
            || self.total_entries == 0xFFFF
            || self.cd_size == 0xFFFFFFFF
            || self.cd_offset == 0xFFFFFFFF
    }
}

/// ZIP64 End of Central Directory Locator - 20 bytes
pub struct Zip64EOCDLocator {
    pub eocd64_offset: u64,
}

impl Zip64EOCDLocator {
    pub const SIGNATURE: &'static [u8] = b"PK\x06\x07";
    pub const SIZE: usize = 20;

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE || &data[0..4] != Self::SIGNATURE {
            return Err(Error::archive("Invalid ZIP64 format"));
        }

        let eocd64_offset = u64::from_le_bytes(
            data[8..16]
                .try_into()
                .map_err(|_| Error::archive("Invalid ZIP64 format"))?,
        );
        Ok(Self { eocd64_offset })
    }
}

/// ZIP64 End of Central Directory - 56 bytes minimum
pub struct Zip64EOCD {
    pub total_entries: u64,
    pub cd_size: u64,
    pub cd_offset: u64,
}

impl Zip64EOCD {
    pub const SIGNATURE: &'static [u8] = b"PK\x06\x06";
    pub const MIN_SIZE: usize = 56;

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < Self::MIN_SIZE || &data[0..4] != Self::SIGNATURE {
            return Err(Error::archive("Invalid ZIP64 format"));
        }

        // Total entries start after the record size, versions and disk fields
        Self::read_fields(&mut Cursor::new(&data[32..]))
            .map_err(|e| Error::archive(format!("Invalid ZIP64 format: {e}")))
    }

    fn read_fields(cursor: &mut Cursor<&[u8]>) -> std::io::Result<Self> {
        Ok(Self {
            total_entries: cursor.read_u64::<LittleEndian>()?,
            cd_size: cursor.read_u64::<LittleEndian>()?,
            cd_offset: cursor.read_u64::<LittleEndian>()?,
        })
    }
}

/// Central Directory File Header (CDFH) - 46 bytes minimum
pub const CDFH_SIGNATURE: &[u8] = b"PK\x01\x02";
pub const CDFH_MIN_SIZE: usize = 46;

/// Local File Header (LFH) - 30 bytes
pub const LFH_SIGNATURE: &[u8] = b"PK\x03\x04";
pub const LFH_SIZE: usize = 30;

/// Host system value in the upper byte of "version made by" for Unix
const HOST_UNIX: u8 = 3;
const S_IFMT: u32 = 0o170000;
const S_IFDIR: u32 = 0o040000;
/// MS-DOS read-only attribute bit
const DOS_READ_ONLY: u32 = 0x01;
/// MS-DOS directory attribute bit
const DOS_DIRECTORY: u32 = 0x10;

/// Parsed ZIP file entry information
#[derive(Debug, Clone)]
pub struct ZipFileEntry {
    pub file_name: String,
    pub compression_method: CompressionMethod,
    pub compressed_size: u64,
    pub uncompressed_size: u64,
    pub crc32: u32,
    pub lfh_offset: u64,
    pub version_made_by: u16,
    pub external_attrs: u32,
    pub is_directory: bool,
}

impl ZipFileEntry {
    fn unix_mode(&self) -> Option<u32> {
        if (self.version_made_by >> 8) as u8 == HOST_UNIX {
            Some(self.external_attrs >> 16)
        } else {
            None
        }
    }

    /// Whether the entry is a directory: trailing slash, Unix file type for
    /// Unix-made archives, DOS directory attribute for everything else
    pub(crate) fn detect_directory(
        file_name: &str,
        version_made_by: u16,
        external_attrs: u32,
    ) -> bool {
        if file_name.ends_with('/') {
            return true;
        }
        if (version_made_by >> 8) as u8 == HOST_UNIX {
            (external_attrs >> 16) & S_IFMT == S_IFDIR
        } else {
            external_attrs & DOS_DIRECTORY != 0
        }
    }

    /// Permission bits to create the extracted file with.
    ///
    /// Unix-made archives carry the mode in the upper half of the external
    /// attributes. Anything else gets `0o666`, or `0o444` when the DOS
    /// read-only bit is set. A Unix entry with no permission bits at all
    /// falls back to `0o644` so the extracted file stays readable.
    pub fn permissions(&self) -> u32 {
        match self.unix_mode() {
            Some(mode) if mode & 0o777 != 0 => mode & 0o777,
            Some(_) => 0o644,
            None if self.external_attrs & DOS_READ_ONLY != 0 => 0o444,
            None => 0o666,
        }
    }
}
