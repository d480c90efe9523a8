//! In-memory stand-ins for the background collaborators.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use tokio::sync::Semaphore;

use crate::background::{FetchError, Fetcher, ImageDecoder, ImageHandle};

/// Prefix [`MockImageDecoder`] requires on valid image bytes
pub const MOCK_IMAGE_MAGIC: &[u8] = b"IMG";

/// Fetcher serving bytes from a map. Unknown locators fail with a transport error.
///
/// A locator can be held with [`MemoryFetcher::hold`]; its fetches then wait
/// until [`MemoryFetcher::release`] is called, which lets tests control the
/// order in which concurrent fetches complete.
#[derive(Default)]
pub struct MemoryFetcher {
    resources: Mutex<HashMap<String, Vec<u8>>>,
    gates: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, locator: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        lock(&self.resources).insert(locator.into(), bytes.into());
    }

    /// Block fetches of `locator` until released
    pub fn hold(&self, locator: impl Into<String>) {
        lock(&self.gates).insert(locator.into(), Arc::new(Semaphore::new(0)));
    }

    /// Let one pending (or future) fetch of `locator` complete
    pub fn release(&self, locator: &str) {
        if let Some(gate) = lock(&self.gates).get(locator) {
            gate.add_permits(1);
        }
    }
}

impl Fetcher for MemoryFetcher {
    fn fetch(&self, locator: &str) -> BoxFuture<'static, Result<Vec<u8>, FetchError>> {
        let gate = lock(&self.gates).get(locator).cloned();
        let found = lock(&self.resources).get(locator).cloned();
        let locator = locator.to_string();

        Box::pin(async move {
            if let Some(gate) = gate {
                let permit = gate
                    .acquire()
                    .await
                    .map_err(|e| FetchError::Transport(e.to_string()))?;
                permit.forget();
            }
            found.ok_or_else(|| FetchError::Transport(format!("{locator} not found")))
        })
    }
}

/// Decoder accepting any bytes that start with [`MOCK_IMAGE_MAGIC`].
/// The decoded width is the payload length, the height is 1.
pub struct MockImageDecoder;

impl ImageDecoder for MockImageDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<ImageHandle, FetchError> {
        match bytes.strip_prefix(MOCK_IMAGE_MAGIC) {
            Some(payload) => Ok(ImageHandle::new(payload.len() as u32, 1, bytes.to_vec())),
            None => Err(FetchError::BadImageData(format!(
                "{} bytes without image header",
                bytes.len()
            ))),
        }
    }
}

/// Bytes that [`MockImageDecoder`] accepts
pub fn mock_image(payload: &[u8]) -> Vec<u8> {
    let mut bytes = MOCK_IMAGE_MAGIC.to_vec();
    bytes.extend_from_slice(payload);
    bytes
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
