//! Typed client for the kernel's `"dpll"` generic netlink family.
//!
//! The DPLL subsystem exposes clock-lock devices and their input/output
//! pins. This module layers a typed request/response API on top of the
//! wire plumbing in [`crate::netlink`]:
//!
//! - [`uapi`] states the family's commands, attribute ids and enum codes.
//! - [`schema`] declares each attribute's payload kind and cardinality.
//! - [`parse`] decodes one reply message into a [`types::Device`] or
//!   [`types::Pin`], aggregating attributes that repeat at top level.
//! - [`connection`] resolves the family and drives requests and dumps.
//! - [`events`] decodes the `monitor` multicast notifications.

pub mod connection;
pub mod enums;
pub mod events;
pub mod parse;
pub mod schema;
pub mod types;
pub mod uapi;

pub use connection::DpllConnection;
pub use events::{DpllEvent, DpllEventStream};
