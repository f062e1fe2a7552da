use assert_cmd::Command;
use predicates::str::contains;
use std::io::{Cursor, Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;

use zip::write::SimpleFileOptions;

/// Loopback HTTP server answering every request with the same response.
struct TestServer {
    base: String,
    paths: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    fn start(status: &'static str, body: Vec<u8>) -> Self {
        let content_length = body.len();
        Self::start_with_length(status, body, content_length)
    }

    /// Like `start`, but advertises `content_length` whatever the body size,
    /// then closes the connection after the body.
    fn start_with_length(status: &'static str, body: Vec<u8>, content_length: usize) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let paths = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&paths);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let request = String::from_utf8_lossy(&request);
                if let Some(path) = request.split_whitespace().nth(1) {
                    seen.lock().unwrap().push(path.to_string());
                }

                let head = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: application/zip\r\nContent-Length: {content_length}\r\nConnection: close\r\n\r\n"
                );
                let _ = stream.write_all(head.as_bytes());
                let _ = stream.write_all(&body);
            }
        });

        Self { base, paths }
    }

    fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

fn zipball() -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o644);
    writer.add_directory("no-build-9f8e7d/", options).unwrap();
    writer.start_file("no-build-9f8e7d/README.md", options).unwrap();
    writer.write_all(b"# no-build\n").unwrap();
    writer.add_directory("no-build-9f8e7d/react/", options).unwrap();
    writer
        .start_file("no-build-9f8e7d/react/index.html", options)
        .unwrap();
    writer.write_all(b"<script type=\"module\"></script>\n").unwrap();
    writer.add_directory("no-build-9f8e7d/vue/", options).unwrap();
    writer.start_file("no-build-9f8e7d/vue/app.js", options).unwrap();
    writer.write_all(b"createApp({}).mount('#app');\n").unwrap();
    writer.finish().unwrap().into_inner()
}

fn nobuild(cwd: &Path, api_url: &str) -> Command {
    let mut cmd = Command::cargo_bin("nobuild").unwrap();
    cmd.current_dir(cwd)
        .env("NOBUILD_API_URL", api_url)
        .env_remove("RUST_LOG");
    cmd
}

fn dir_is_empty(path: &Path) -> bool {
    std::fs::read_dir(path).unwrap().next().is_none()
}

#[test]
fn no_arguments_prints_usage() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("nobuild").unwrap();
    cmd.current_dir(dir.path());
    cmd.assert()
        .code(1)
        .stdout(contains("Usage: nobuild <template> or nobuild <repo> <template>"));
    assert!(dir_is_empty(dir.path()));
}

#[test]
fn too_many_arguments_prints_usage() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("nobuild").unwrap();
    cmd.current_dir(dir.path()).args(["a/b", "react", "extra"]);
    cmd.assert().code(1).stdout(contains("Usage:"));
}

#[test]
fn extracts_template_into_working_directory() {
    let server = TestServer::start("200 OK", zipball());
    let dir = tempfile::tempdir().unwrap();

    nobuild(dir.path(), &server.base)
        .args(["someone/templates", "react"])
        .assert()
        .success()
        .stdout("Template 'react' downloaded successfully.\n");

    assert_eq!(server.paths(), ["/repos/someone/templates/zipball"]);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("react/index.html")).unwrap(),
        "<script type=\"module\"></script>\n"
    );
    assert!(!dir.path().join("vue").exists());
    assert!(!dir.path().join("README.md").exists());
    assert!(!dir.path().join("repo.zip").exists());
}

#[test]
fn single_argument_uses_default_repository() {
    let server = TestServer::start("200 OK", zipball());
    let dir = tempfile::tempdir().unwrap();

    nobuild(dir.path(), &server.base)
        .arg("vue")
        .assert()
        .success();

    assert_eq!(server.paths(), ["/repos/debdut/no-build/zipball"]);
    assert!(dir.path().join("vue/app.js").is_file());
}

#[test]
fn sentinel_extracts_whole_archive() {
    let server = TestServer::start("200 OK", zipball());
    let dir = tempfile::tempdir().unwrap();

    nobuild(dir.path(), &server.base)
        .args(["someone/templates", "."])
        .assert()
        .success()
        .stdout(contains("Template '.' downloaded successfully."));

    let root = dir.path().join("no-build-9f8e7d");
    assert!(root.join("README.md").is_file());
    assert!(root.join("react/index.html").is_file());
    assert!(root.join("vue/app.js").is_file());
    assert!(!dir.path().join("repo.zip").exists());
}

#[test]
fn unknown_template_succeeds_without_output() {
    let server = TestServer::start("200 OK", zipball());
    let dir = tempfile::tempdir().unwrap();

    nobuild(dir.path(), &server.base)
        .arg("svelte")
        .assert()
        .success()
        .stdout(contains("Template 'svelte' downloaded successfully."));

    assert!(dir_is_empty(dir.path()));
}

#[test]
fn rerun_overwrites_with_identical_content() {
    let server = TestServer::start("200 OK", zipball());
    let dir = tempfile::tempdir().unwrap();

    nobuild(dir.path(), &server.base).arg("react").assert().success();
    std::fs::write(
        dir.path().join("react/index.html"),
        "locally edited, and longer than the original file",
    )
    .unwrap();
    nobuild(dir.path(), &server.base).arg("react").assert().success();

    assert_eq!(
        std::fs::read_to_string(dir.path().join("react/index.html")).unwrap(),
        "<script type=\"module\"></script>\n"
    );
}

#[test]
fn unreachable_api_reports_download_error() {
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let dir = tempfile::tempdir().unwrap();

    nobuild(dir.path(), &format!("http://127.0.0.1:{port}"))
        .arg("react")
        .assert()
        .code(1)
        .stdout(contains("Error downloading repository: "));

    assert!(dir_is_empty(dir.path()));
}

#[test]
fn error_status_reports_download_error() {
    let server = TestServer::start("404 Not Found", b"{\"message\":\"Not Found\"}".to_vec());
    let dir = tempfile::tempdir().unwrap();

    nobuild(dir.path(), &server.base)
        .args(["nobody/nothing", "react"])
        .assert()
        .code(1)
        .stdout(contains("Error downloading repository: HTTP request failed with status: 404"));

    assert!(dir_is_empty(dir.path()));
}

#[test]
fn invalid_archive_reports_extract_error_and_cleans_up() {
    let server = TestServer::start("200 OK", b"<html>not a zip</html>".to_vec());
    let dir = tempfile::tempdir().unwrap();

    nobuild(dir.path(), &server.base)
        .arg("react")
        .assert()
        .code(1)
        .stdout(contains("Error extracting template: Not a valid ZIP file"));

    assert!(!dir.path().join("repo.zip").exists());
    assert!(dir_is_empty(dir.path()));
}

#[test]
fn interrupted_download_removes_partial_archive() {
    let body = zipball();
    let declared = body.len() * 2;
    let server = TestServer::start_with_length("200 OK", body, declared);
    let dir = tempfile::tempdir().unwrap();

    nobuild(dir.path(), &server.base)
        .arg("react")
        .assert()
        .code(1)
        .stdout(contains("Error downloading repository: "));

    assert!(!dir.path().join("repo.zip").exists());
    assert!(dir_is_empty(dir.path()));
}
