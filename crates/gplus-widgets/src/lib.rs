//! Embeddable profile and activity feed widgets
//!
//! Fetches a public profile and activity feed from the Google+-shaped
//! people API, optionally mirrors remote images to local storage and
//! caches the rendered HTML, and serves the result as widget fragments,
//! either inline or deferred via a small client-side loader.

pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod localize;
pub mod render;
pub mod server;
pub mod templates;
pub mod types;
