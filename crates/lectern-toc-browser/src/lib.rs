//! Browser DOM layer for the table of contents.
//!
//! This crate wires the platform-free tracker to the real page: an
//! intersection observer and a scroll-driven scan feed it position
//! signals, clicks scroll smoothly to their section, and server-rendered
//! heading anchors get their sanitizer prefix swept away. It assumes a
//! `wasm32-unknown-unknown` target environment; on other targets only
//! the sweep entry point exists, as a no-op.
//!
//! # Architecture
//!
//! - `controller`: lifecycle, signal plumbing and teardown
//! - `dom`: heading lookups and position snapshots
//! - `observer`: intersection observer wiring
//! - `navigate`: click navigation and fragment updates
//! - `sweep`: heading id cleanup for server-rendered pages
//!
//! # Re-exports
//!
//! This crate re-exports `lectern-toc-core` for convenience, so consumers
//! only need to depend on `lectern-toc-browser`.

// Re-export core crate
pub use lectern_toc_core;
pub use lectern_toc_core::*;

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub mod controller;
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub mod dom;
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub mod navigate;
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub mod observer;
pub mod sweep;

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub use controller::TocController;
pub use sweep::strip_heading_prefixes;
