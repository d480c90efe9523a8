//! Runtime wiring for Emoji Art: configuration, the concrete background
//! fetcher and decoder, and the palette directory watcher.

pub mod app;
pub mod config;
pub mod decode;
pub mod error;
pub mod fetch;
pub mod watcher;

pub use app::Workspace;
pub use config::{Config, DEFAULT_CONFIG_NAME};
pub use decode::RasterDecoder;
pub use error::{WorkspaceError, WorkspaceResult};
pub use fetch::{resolve, LocatorFetcher, Target};
pub use watcher::{StoreChanged, StoreWatcher};
