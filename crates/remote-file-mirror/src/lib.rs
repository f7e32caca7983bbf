//! Remote image mirroring with deterministic local paths
//!
//! Downloads remote images, validates their format, and stores them under
//! a path derived from the SHA-1 of the source URL. Mirrored files stay
//! fresh for a configurable TTL window; any failure degrades to the
//! original remote URL so callers always get a usable reference.

mod error;
mod mirror;
mod types;

pub use error::MirrorError;
pub use mirror::FileMirror;
pub use types::ImageKind;
