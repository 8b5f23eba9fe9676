//! Writing generated artifacts to disk

mod writer;

pub use writer::{write_artifact, WriteError};
