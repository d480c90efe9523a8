//! Shared infrastructure for the Emoji Art crates: the error type, the
//! persistence collaborators and the observer registry.

pub mod error;
pub mod filesystem;
pub mod observer;
pub mod storage;

pub use error::*;
pub use filesystem::*;
pub use observer::*;
pub use storage::*;
