//! Event check-in API server.
//!
//! Attendees register for an event and receive a unique ticket code, rendered
//! as a QR code by the client. At the door, staff scan or type the code
//! against the scanner endpoint; the check-in core guarantees every ticket
//! transitions from `REGISTERED` to `ATTENDED` exactly once, even under
//! concurrent duplicate scans, and reports whether a given scan caused the
//! transition or merely observed it.

pub mod checkin;
pub mod config;
pub mod handlers;
pub mod models;
pub mod registry;
pub mod routes;
pub mod state;
pub mod utils;
