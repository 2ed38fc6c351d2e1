//! Password-gated personal archive.
//!
//! `keepsake` stores a handful of user-curated collections (gallery images,
//! achievements, todos and tribute images) together with a single display
//! setting, and exposes them over a small JSON api.
//!
//! The storage side is usable on its own through [`Database`] and the
//! [`collection`] functions. The http side lives in the [`axum`] module.
//!
//! ```ignore
//! #[tokio::main]
//! async fn main() -> keepsake::Result<()> {
//!     let config = keepsake::config::load()?;
//!     keepsake::axum::start(config).await
//! }
//! ```

#[macro_use]
extern crate serde_derive;

pub mod achievement;
pub mod auth;
pub mod collection;
pub mod config;
pub mod db;
pub mod error;
pub mod image;
pub mod settings;
pub mod todo;
pub mod tracing;

#[cfg(feature = "axum")]
pub mod axum;

pub use achievement::Achievement;
pub use auth::Gate;
pub use collection::Document;
pub use config::Config;
pub use db::Database;
pub use error::{Error, ErrorKind, Result};
pub use image::{GalleryImage, TributeImage};
pub use todo::Todo;
