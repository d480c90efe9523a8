//! Fetching background images from files and HTTP servers.

use std::path::PathBuf;
use std::time::Duration;

use emojiart_editor::{FetchError, Fetcher};
use futures::future::BoxFuture;
use reqwest::Url;

const USER_AGENT_VALUE: &str = concat!("emojiart/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where a locator points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    File(PathBuf),
    Http(Url),
}

/// Resolve a background locator.
///
/// `file://` URLs and anything that does not parse as a URL are read from
/// disk; `http` and `https` URLs are downloaded.
pub fn resolve(locator: &str) -> Result<Target, FetchError> {
    let url = match Url::parse(locator) {
        Ok(url) => url,
        Err(_) => return Ok(Target::File(PathBuf::from(locator))),
    };

    match url.scheme() {
        "http" | "https" => Ok(Target::Http(url)),
        "file" => url
            .to_file_path()
            .map(Target::File)
            .map_err(|()| FetchError::UnsupportedLocator(locator.to_string())),
        _ => Err(FetchError::UnsupportedLocator(locator.to_string())),
    }
}

/// Fetcher for file paths, `file://` and `http(s)://` locators
#[derive(Clone)]
pub struct LocatorFetcher {
    client: reqwest::Client,
}

impl LocatorFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT_VALUE)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

impl Fetcher for LocatorFetcher {
    fn fetch(&self, locator: &str) -> BoxFuture<'static, Result<Vec<u8>, FetchError>> {
        let target = resolve(locator);
        let client = self.client.clone();

        Box::pin(async move {
            match target? {
                Target::File(path) => {
                    tracing::debug!("Reading background from {}", path.display());
                    tokio::fs::read(&path)
                        .await
                        .map_err(|e| FetchError::Transport(format!("{}: {e}", path.display())))
                }
                Target::Http(url) => {
                    tracing::debug!("Downloading background from {}", url);
                    let response = client
                        .get(url.clone())
                        .send()
                        .await
                        .map_err(|e| FetchError::Transport(e.to_string()))?;

                    let status = response.status();
                    if !status.is_success() {
                        return Err(FetchError::Transport(format!("{url} returned {status}")));
                    }

                    let bytes = response
                        .bytes()
                        .await
                        .map_err(|e| FetchError::Transport(e.to_string()))?;
                    Ok(bytes.to_vec())
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_locators() {
        assert_eq!(
            resolve("https://example.com/a.png").unwrap(),
            Target::Http(Url::parse("https://example.com/a.png").unwrap())
        );
        assert_eq!(
            resolve("images/a.png").unwrap(),
            Target::File(PathBuf::from("images/a.png"))
        );
        assert!(matches!(
            resolve("ftp://example.com/a.png"),
            Err(FetchError::UnsupportedLocator(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_file_url_decodes_path() {
        assert_eq!(
            resolve("file:///tmp/my%20art.png").unwrap(),
            Target::File(PathBuf::from("/tmp/my art.png"))
        );
    }

    #[tokio::test]
    async fn test_fetch_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bg.png");
        std::fs::write(&path, b"bytes").unwrap();

        let fetcher = LocatorFetcher::new().unwrap();
        let bytes = fetcher.fetch(path.to_str().unwrap()).await.unwrap();
        assert_eq!(bytes, b"bytes");

        let url = Url::from_file_path(&path).unwrap();
        assert_eq!(fetcher.fetch(url.as_str()).await.unwrap(), b"bytes");
    }

    #[tokio::test]
    async fn test_fetch_missing_file_is_transport_error() {
        let fetcher = LocatorFetcher::new().unwrap();
        let result = fetcher.fetch("/definitely/not/here.png").await;
        assert!(matches!(result, Err(FetchError::Transport(_))));
    }

    #[tokio::test]
    async fn test_fetch_unsupported_scheme() {
        let fetcher = LocatorFetcher::new().unwrap();
        let result = fetcher.fetch("gopher://example.com/a.png").await;
        assert!(matches!(result, Err(FetchError::UnsupportedLocator(_))));
    }
}
