//! # Background Fetching
//!
//! State of the document's background image and the collaborators used to
//! obtain it.
//!
//! ```text
//! Idle ──set Some(l)──▶ Fetching(l) ──bytes decoded──▶ Found(image)
//!   ▲                        │
//!   └──── set None ──────────┴──transport / decode error──▶ Failed(reason)
//! ```
//!
//! Transport and decoding are collaborators ([`Fetcher`], [`ImageDecoder`]);
//! the session only sees a [`FetchOutcome`] for the locator it asked for.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use thiserror::Error;

/// Decoded background image
#[derive(Clone, PartialEq, Eq)]
pub struct ImageHandle {
    width: u32,
    height: u32,
    bytes: Arc<[u8]>,
}

impl ImageHandle {
    /// Wrap the encoded bytes of an image whose dimensions are known
    pub fn new(width: u32, height: u32, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            width,
            height,
            bytes: bytes.into(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The encoded bytes the image was decoded from
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageHandle")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Observable state of the background image
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BackgroundState {
    /// No background set
    #[default]
    Idle,

    /// Waiting for the image at this locator
    Fetching(String),

    /// Image ready to display
    Found(ImageHandle),

    /// Fetch or decode failed; human readable reason
    Failed(String),
}

impl BackgroundState {
    pub fn image(&self) -> Option<&ImageHandle> {
        match self {
            BackgroundState::Found(image) => Some(image),
            _ => None,
        }
    }

    pub fn locator_being_fetched(&self) -> Option<&str> {
        match self {
            BackgroundState::Fetching(locator) => Some(locator),
            _ => None,
        }
    }

    pub fn is_fetching(&self) -> bool {
        self.locator_being_fetched().is_some()
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            BackgroundState::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("bad image data: {0}")]
    BadImageData(String),

    #[error("unsupported locator: {0}")]
    UnsupportedLocator(String),
}

/// Retrieves the bytes behind a locator
pub trait Fetcher: Send + Sync {
    fn fetch(&self, locator: &str) -> BoxFuture<'static, Result<Vec<u8>, FetchError>>;
}

/// Turns fetched bytes into an image
pub trait ImageDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<ImageHandle, FetchError>;
}

/// Result of one fetch, delivered back to the session
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub locator: String,
    pub result: Result<ImageHandle, FetchError>,
}

/// Fetch and decode `locator`. Runs on a background task.
pub(crate) async fn fetch_background(
    fetcher: Arc<dyn Fetcher>,
    decoder: Arc<dyn ImageDecoder>,
    locator: String,
) -> FetchOutcome {
    let result = match fetcher.fetch(&locator).await {
        Ok(bytes) => decoder.decode(&bytes),
        Err(e) => Err(e),
    };
    FetchOutcome { locator, result }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_accessors() {
        let image = ImageHandle::new(2, 3, vec![1u8, 2, 3]);

        assert!(BackgroundState::Fetching("a".into()).is_fetching());
        assert_eq!(
            BackgroundState::Fetching("a".into()).locator_being_fetched(),
            Some("a")
        );
        assert_eq!(BackgroundState::Found(image.clone()).image(), Some(&image));
        assert_eq!(
            BackgroundState::Failed("nope".into()).failure_reason(),
            Some("nope")
        );
        assert_eq!(BackgroundState::default(), BackgroundState::Idle);
        assert!(!BackgroundState::Idle.is_fetching());
    }

    #[test]
    fn test_image_handle_debug_hides_bytes() {
        let image = ImageHandle::new(4, 4, vec![0u8; 1024]);
        let text = format!("{:?}", image);
        assert!(text.contains("bytes: 1024"));
    }
}
