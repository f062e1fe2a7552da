//! # nobuild
//!
//! Download a repository zipball from the GitHub API and extract one
//! template folder from it.
//!
//! The flow is strictly sequential: the archive is downloaded to a
//! temporary file, the selected entries are extracted, and the temporary
//! file is removed whatever the outcome.
//!
//! ## Features
//!
//! - Template selection below the zipball's wrapper folder, or the whole
//!   archive with the `.` selector
//! - STORED and DEFLATE entries, ZIP64 central directories, CRC-32 checks
//! - Unix permission bits preserved on extracted files
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use nobuild::{Downloader, Selector, TempArchive, extract_template, zipball_url};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> nobuild::Result<()> {
//!     let archive = TempArchive::new("repo.zip");
//!     let url = zipball_url("https://api.github.com", "debdut/no-build");
//!     Downloader::new()?.download(&url, archive.path()).await?;
//!
//!     let summary = extract_template(archive.path(), &Selector::parse("react"), Path::new(".")).await?;
//!     println!("{} files", summary.files);
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod cli;
pub mod error;
pub mod io;
pub mod template;

pub use cli::Cli;
pub use error::{Error, Result};
pub use io::{Downloader, LocalFileReader, ReadAt, TempArchive, zipball_url};
pub use template::{ExtractSummary, Selector, extract_template};
