//! # Tally
//!
//! A habit-tracking server, usable both as a standalone binary and as a
//! library.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! tally = { version = "0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::path::PathBuf;
//! use tally::server::{AppState, create_router};
//! use tally::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new(&PathBuf::from("./data/tally.db")).unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState::new(
//!     Arc::new(store),
//!     chrono_tz::Asia::Ho_Chi_Minh,
//! ));
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes the `tally` binary's CLI. Disable with
//!   `default-features = false`.

pub mod auth;
pub mod config;
pub mod core;
pub mod error;
pub mod server;
pub mod store;
pub mod types;
