//! Stockroom: inventory and supplier management.
//!
//! The crate houses both halves of the application. The server side
//! (`config`, `store`, `auth`, `http`, `app`) exposes a REST API over a
//! document store and serves the bundled web assets. The client side
//! (`client`, `ui`) is the ported frontend: a typed API client plus
//! per-page state machines driven by the console binary.

pub mod app;
pub mod auth;
pub mod client;
pub mod config;
pub mod http;
pub mod model;
pub mod store;
pub mod ui;
pub mod util;
