//! Frontend state layer
//!
//! The original web UI is ported as plain state machines: each page owns
//! the data it fetched, a loading flag, and any open dialog state. Pages
//! are created when the user navigates in and dropped when they navigate
//! away, which also aborts any fetch still in flight. The console binary
//! is the thin shell that renders these structs.

pub mod csv_ops;
pub mod dashboard;
pub mod inventory;
pub mod session;
pub mod suppliers;
pub mod task;
pub mod toast;
