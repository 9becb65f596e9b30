//! cachedeck: a terminal operator console for a tiered cache service.
//!
//! The console holds no cache data of its own. It is a thin, continuously
//! resynchronizing view over the cache service's REST API: fetchers pull
//! typed snapshots, reconcilers derive view state from them, and a small
//! event loop decides what to fetch and when. Rendering happens behind the
//! [`surface::Surface`] contract and stays mechanical.

pub mod client;
pub mod config;
pub mod console;
pub mod error;
pub mod infra;
pub mod surface;
