//! Generic netlink protocol plumbing.
//!
//! This module carries the wire-level pieces the DPLL layer is built on:
//! the netlink and generic netlink headers, attribute iteration and typed
//! payload extraction, an outbound message builder with nested-attribute
//! support, and an async socket over `NETLINK_GENERIC`.

pub mod attr;
mod builder;
mod error;
pub mod genl;
pub mod message;
mod socket;

pub use attr::{AttrIter, NlAttr};
pub use builder::{MessageBuilder, NestToken};
pub use error::{Error, Result};
pub use message::{MessageIter, NLMSG_HDRLEN, NlMsgHdr};
pub use socket::NetlinkSocket;
