//! Async generic netlink client library for the Linux DPLL subsystem.
//!
//! This crate implements the protocol engine behind the `dpll` command-line
//! tool: a typed encoder/decoder for the `"dpll"` generic netlink family,
//! a message-scoped aggregator for attributes that repeat at the top level
//! of a reply, and an event stream for the family's `monitor` multicast
//! group.
//!
//! # Example
//!
//! ```ignore
//! use dpll_nl::dpll::DpllConnection;
//!
//! # async fn example() -> dpll_nl::Result<()> {
//! let conn = DpllConnection::connect().await?;
//! for device in conn.devices().await? {
//!     println!("device {} mode {:?}", device.id, device.mode);
//! }
//! # Ok(())
//! # }
//! ```

pub mod dpll;
pub mod netlink;
pub mod output;
pub mod util;

// Re-export common types at crate root for convenience
pub use netlink::{Error, Result};
