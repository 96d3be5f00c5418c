use log::{debug, info};
use std::cmp::Ordering;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DecisionsError, Result};

/// Environment variable listing extra directories searched for libraries.
pub const LIBRARY_PATH_ENV: &str = "LICENSE_DECISIONS_LIBRARY_PATH";

/// Where inherited decision files come from.
///
/// Every method is a single blocking attempt; failures are returned to
/// the caller untouched.
pub trait SourceReader {
    fn read_file(&self, path: &Path) -> Result<String>;

    /// GET `url`, sending `authorization` verbatim as the `Authorization` header.
    fn fetch(&self, url: &str, authorization: Option<&str>) -> Result<String>;

    /// Installation directory of the named library.
    fn library_dir(&self, name: &str) -> Result<PathBuf>;

    fn env_var(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }
}

/// Reads from the filesystem and over HTTP with `ureq`.
#[derive(Debug, Clone, Default)]
pub struct DefaultReader {
    library_paths: Vec<PathBuf>,
}

impl DefaultReader {
    pub fn new(library_paths: Vec<PathBuf>) -> Self {
        Self { library_paths }
    }

    /// Library paths taken from [`LIBRARY_PATH_ENV`] only.
    pub fn from_env() -> Self {
        Self::new(Vec::new())
    }

    fn search_paths(&self) -> Vec<PathBuf> {
        let mut paths = self.library_paths.clone();
        if let Some(extra) = env::var_os(LIBRARY_PATH_ENV) {
            paths.extend(env::split_paths(&extra));
        }
        paths
    }
}

impl SourceReader for DefaultReader {
    fn read_file(&self, path: &Path) -> Result<String> {
        debug!("reading decisions from {}", path.display());
        fs::read_to_string(path).map_err(|source| DecisionsError::ReadFailure {
            path: path.to_path_buf(),
            source,
        })
    }

    fn fetch(&self, url: &str, authorization: Option<&str>) -> Result<String> {
        info!("fetching decisions from {}", url);
        let mut request = ureq::get(url);
        if let Some(authorization) = authorization {
            request = request.set("Authorization", authorization);
        }
        let response = request
            .call()
            .map_err(|source| DecisionsError::FetchFailure {
                url: url.to_string(),
                source: Box::new(source),
            })?;
        response
            .into_string()
            .map_err(|source| DecisionsError::ResponseBody {
                url: url.to_string(),
                source,
            })
    }

    fn library_dir(&self, name: &str) -> Result<PathBuf> {
        for root in self.search_paths() {
            if let Some(dir) = find_library_in(&root, name) {
                debug!("located library {} at {}", name, dir.display());
                return Ok(dir);
            }
        }
        Err(DecisionsError::LibraryNotFound {
            name: name.to_string(),
        })
    }
}

/// Find `<root>/<name>` or the highest `<root>/<name>-<version>`.
pub fn find_library_in(root: &Path, name: &str) -> Option<PathBuf> {
    let entries = fs::read_dir(root).ok()?;
    let versioned_prefix = format!("{}-", name);

    let mut best: Option<(Option<String>, PathBuf)> = None;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let version = if file_name == name {
            None
        } else if let Some(version) = file_name.strip_prefix(&versioned_prefix) {
            if !version.starts_with(|c: char| c.is_ascii_digit()) {
                continue;
            }
            Some(version.to_string())
        } else {
            continue;
        };

        let newer = match &best {
            None => true,
            Some((current, _)) => compare_versions(version.as_deref(), current.as_deref()).is_gt(),
        };
        if newer {
            best = Some((version, path));
        }
    }

    best.map(|(_, path)| path)
}

fn compare_versions(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => version_key(a).cmp(&version_key(b)),
    }
}

fn version_key(version: &str) -> Vec<(u64, String)> {
    version
        .split(['.', '-', '+'])
        .map(|segment| {
            let digits: String = segment.chars().take_while(|c| c.is_ascii_digit()).collect();
            let number = digits.parse().unwrap_or(0);
            (number, segment[digits.len()..].to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use tempfile::tempdir;

    /// Answer one HTTP request with `status` and `body`, returning the raw request.
    fn serve_once(status: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/decisions.yml", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/yaml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });
        (url, handle)
    }

    #[test]
    fn test_fetch_sends_bearer_authorization() {
        let (url, server) = serve_once("200 OK", "- - permit\n  - MIT\n");

        let body = DefaultReader::default()
            .fetch(&url, Some("Bearer Token"))
            .unwrap();
        let request = server.join().unwrap();

        assert_eq!(body, "- - permit\n  - MIT\n");
        assert!(request.starts_with("GET /decisions.yml HTTP/1.1\r\n"));
        let auth_headers: Vec<&str> = request
            .lines()
            .filter(|line| line.to_ascii_lowercase().starts_with("authorization:"))
            .collect();
        assert_eq!(auth_headers.len(), 1);
        assert_eq!(auth_headers[0].splitn(2, ':').nth(1).map(str::trim), Some("Bearer Token"));
    }

    #[test]
    fn test_fetch_without_authorization_sends_no_header() {
        let (url, server) = serve_once("200 OK", "---\n");

        DefaultReader::default().fetch(&url, None).unwrap();
        let request = server.join().unwrap();

        assert!(!request.to_ascii_lowercase().contains("authorization:"));
    }

    #[test]
    fn test_fetch_http_error_is_fetch_failure() {
        let (url, server) = serve_once("404 Not Found", "missing");

        let err = DefaultReader::default().fetch(&url, None).unwrap_err();
        server.join().unwrap();

        match err {
            DecisionsError::FetchFailure { url: failed, .. } => assert_eq!(failed, url),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_find_library_prefers_highest_version() {
        let root = tempdir().unwrap();
        for dir in ["acme-policy", "acme-policy-1.9.0", "acme-policy-1.10.0", "acme-policy-tools"] {
            fs::create_dir(root.path().join(dir)).unwrap();
        }

        let found = find_library_in(root.path(), "acme-policy").unwrap();
        assert_eq!(found, root.path().join("acme-policy-1.10.0"));
    }

    #[test]
    fn test_find_library_exact_name() {
        let root = tempdir().unwrap();
        fs::create_dir(root.path().join("acme-policy")).unwrap();
        fs::write(root.path().join("acme-policy-2.0.0"), "not a directory").unwrap();

        let found = find_library_in(root.path(), "acme-policy").unwrap();
        assert_eq!(found, root.path().join("acme-policy"));
        assert!(find_library_in(root.path(), "other").is_none());
    }

    #[test]
    fn test_library_dir_reports_missing_library() {
        let reader = DefaultReader::new(vec![tempdir().unwrap().path().to_path_buf()]);
        let err = reader.library_dir("definitely-not-installed").unwrap_err();
        assert!(matches!(err, DecisionsError::LibraryNotFound { .. }));
    }

    #[test]
    fn test_read_file_failure_names_the_path() {
        let reader = DefaultReader::default();
        let err = reader.read_file(Path::new("/nonexistent/decisions.yml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/decisions.yml"));
    }
}
