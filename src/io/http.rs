use reqwest::Client;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};

/// Build the zipball endpoint for `repo` (an `owner/name` pair).
pub fn zipball_url(api_base: &str, repo: &str) -> String {
    format!("{}/repos/{}/zipball", api_base.trim_end_matches('/'), repo)
}

/// Whole-body HTTP downloader
pub struct Downloader {
    client: Client,
}

impl Downloader {
    /// Create a new downloader
    ///
    /// No timeout is configured; a stalled transfer blocks until the
    /// process is terminated. Redirects are followed, which the zipball
    /// endpoint relies on.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Download `url` into `destination`, creating or truncating it.
    ///
    /// Single attempt only. A failure part way through leaves whatever was
    /// already written on disk; removing it is the caller's job.
    ///
    /// # Returns
    ///
    /// The number of body bytes written.
    pub async fn download(&self, url: &str, destination: &Path) -> Result<u64> {
        log::debug!("GET {url}");
        let mut resp = self.client.get(url).send().await?;

        if !resp.status().is_success() {
            return Err(Error::HttpStatus(resp.status()));
        }

        let mut file = fs::File::create(destination)
            .await
            .map_err(|e| Error::filesystem(destination, e))?;

        let mut written = 0u64;
        while let Some(chunk) = resp.chunk().await? {
            file.write_all(&chunk)
                .await
                .map_err(|e| Error::filesystem(destination, e))?;
            written += chunk.len() as u64;
        }
        file.flush()
            .await
            .map_err(|e| Error::filesystem(destination, e))?;

        log::debug!("wrote {written} bytes to {}", destination.display());
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve one canned HTTP response on a loopback port.
    fn serve_once(status: &'static str, body: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 4096];
            let _ = stream.read(&mut request);
            let head = format!(
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(body).unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn builds_zipball_url() {
        assert_eq!(
            zipball_url("https://api.github.com", "debdut/no-build"),
            "https://api.github.com/repos/debdut/no-build/zipball"
        );
        assert_eq!(
            zipball_url("http://127.0.0.1:8080/", "a/b"),
            "http://127.0.0.1:8080/repos/a/b/zipball"
        );
    }

    #[tokio::test]
    async fn writes_body_to_destination() {
        let base = serve_once("200 OK", b"zip bytes here");
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("repo.zip");
        std::fs::write(&dest, b"stale content that is longer than the body").unwrap();

        let written = Downloader::new()
            .unwrap()
            .download(&format!("{base}/file"), &dest)
            .await
            .unwrap();

        assert_eq!(written, 14);
        assert_eq!(std::fs::read(&dest).unwrap(), b"zip bytes here");
    }

    #[tokio::test]
    async fn non_success_status_is_a_network_error() {
        let base = serve_once("404 Not Found", b"{\"message\":\"Not Found\"}");
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("repo.zip");

        let err = Downloader::new()
            .unwrap()
            .download(&format!("{base}/file"), &dest)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::HttpStatus(s) if s.as_u16() == 404));
        assert!(err.is_network());
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        // Bind then drop to get a port nobody listens on.
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("repo.zip");

        let err = Downloader::new()
            .unwrap()
            .download(&format!("http://127.0.0.1:{port}/file"), &dest)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Network(_)));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn unwritable_destination_is_a_filesystem_error() {
        let base = serve_once("200 OK", b"data");
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("missing").join("repo.zip");

        let err = Downloader::new()
            .unwrap()
            .download(&format!("{base}/file"), &dest)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Filesystem { .. }));
    }
}
