//! Notification events from the `monitor` multicast group.
//!
//! The kernel sends create/change/delete notifications with the same
//! attribute payload as get replies, so each event carries a fully
//! decoded [`Device`] or [`Pin`].

use std::collections::VecDeque;
use std::pin::Pin as StdPin;
use std::task::{Context, Poll};

use tokio_stream::Stream;

use crate::netlink::genl::GenlMsgHdr;
use crate::netlink::{Error, MessageIter, NetlinkSocket, Result};

use super::parse;
use super::types::{Device, Pin};
use super::uapi::cmd;

/// A decoded notification.
#[derive(Debug, Clone)]
pub enum DpllEvent {
    DeviceCreate(Device),
    DeviceChange(Device),
    DeviceDelete(Device),
    PinCreate(Pin),
    PinChange(Pin),
    PinDelete(Pin),
}

impl DpllEvent {
    /// Upper-case tag used as the text-mode line prefix.
    pub fn tag(&self) -> &'static str {
        match self {
            DpllEvent::DeviceCreate(_) => "DEVICE_CREATE",
            DpllEvent::DeviceChange(_) => "DEVICE_CHANGE",
            DpllEvent::DeviceDelete(_) => "DEVICE_DELETE",
            DpllEvent::PinCreate(_) => "PIN_CREATE",
            DpllEvent::PinChange(_) => "PIN_CHANGE",
            DpllEvent::PinDelete(_) => "PIN_DELETE",
        }
    }

    /// Lower-case kind name used in JSON output.
    pub fn kind_name(&self) -> &'static str {
        match self {
            DpllEvent::DeviceCreate(_) => "device-create",
            DpllEvent::DeviceChange(_) => "device-change",
            DpllEvent::DeviceDelete(_) => "device-delete",
            DpllEvent::PinCreate(_) => "pin-create",
            DpllEvent::PinChange(_) => "pin-change",
            DpllEvent::PinDelete(_) => "pin-delete",
        }
    }
}

/// Decode one notification payload (GENL header included).
///
/// Returns `Ok(None)` for commands that are not notifications; the
/// caller skips those.
pub fn parse_event(payload: &[u8]) -> Result<Option<DpllEvent>> {
    let genl = GenlMsgHdr::from_bytes(payload).ok_or(Error::Truncated {
        expected: std::mem::size_of::<GenlMsgHdr>(),
        actual: payload.len(),
    })?;

    let event = match genl.cmd {
        cmd::DEVICE_CREATE_NTF => DpllEvent::DeviceCreate(parse::parse_device(payload)?),
        cmd::DEVICE_CHANGE_NTF => DpllEvent::DeviceChange(parse::parse_device(payload)?),
        cmd::DEVICE_DELETE_NTF => DpllEvent::DeviceDelete(parse::parse_device(payload)?),
        cmd::PIN_CREATE_NTF => DpllEvent::PinCreate(parse::parse_pin(payload)?),
        cmd::PIN_CHANGE_NTF => DpllEvent::PinChange(parse::parse_pin(payload)?),
        cmd::PIN_DELETE_NTF => DpllEvent::PinDelete(parse::parse_pin(payload)?),
        other => {
            tracing::warn!("unknown notification command: {}", other);
            return Ok(None);
        }
    };

    Ok(Some(event))
}

/// Stream of notifications from a subscribed socket.
///
/// Decode failures of individual notifications are logged and skipped;
/// only transport errors surface as stream items, and the caller treats
/// those as fatal.
pub struct DpllEventStream<'a> {
    socket: &'a NetlinkSocket,
    pending: VecDeque<DpllEvent>,
}

impl<'a> DpllEventStream<'a> {
    pub(crate) fn new(socket: &'a NetlinkSocket) -> Self {
        Self {
            socket,
            pending: VecDeque::new(),
        }
    }
}

impl Stream for DpllEventStream<'_> {
    type Item = Result<DpllEvent>;

    fn poll_next(self: StdPin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if let Some(event) = this.pending.pop_front() {
                return Poll::Ready(Some(Ok(event)));
            }

            let data = match this.socket.poll_recv(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Err(e)) => return Poll::Ready(Some(Err(e))),
                Poll::Ready(Ok(data)) => data,
            };

            // One delivery may carry several messages; queue them all.
            for result in MessageIter::new(&data) {
                match result {
                    Ok((header, payload)) => {
                        if header.is_error() || header.is_done() {
                            continue;
                        }
                        match parse_event(payload) {
                            Ok(Some(event)) => this.pending.push_back(event),
                            Ok(None) => {}
                            Err(e) => tracing::warn!("skipping notification: {}", e),
                        }
                    }
                    Err(e) => {
                        tracing::warn!("malformed message in notification buffer: {}", e);
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dpll::uapi::{device_attr, pin_attr};
    use crate::netlink::{MessageBuilder, NLMSG_HDRLEN};

    fn notification(command: u8, build: impl FnOnce(&mut MessageBuilder)) -> Vec<u8> {
        let mut builder = MessageBuilder::new(0x23, 0);
        builder.append_bytes(GenlMsgHdr::new(command, 1).as_bytes());
        build(&mut builder);
        builder.finish()[NLMSG_HDRLEN..].to_vec()
    }

    #[test]
    fn test_parse_device_change() {
        let payload = notification(cmd::DEVICE_CHANGE_NTF, |b| {
            b.append_attr_u32(device_attr::ID, 0);
            b.append_attr_u32(device_attr::LOCK_STATUS, 4);
        });

        let event = parse_event(&payload).unwrap().unwrap();
        assert_eq!(event.tag(), "DEVICE_CHANGE");
        match event {
            DpllEvent::DeviceChange(device) => assert_eq!(device.id, 0),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_parse_pin_events() {
        for (command, tag) in [
            (cmd::PIN_CREATE_NTF, "PIN_CREATE"),
            (cmd::PIN_CHANGE_NTF, "PIN_CHANGE"),
            (cmd::PIN_DELETE_NTF, "PIN_DELETE"),
        ] {
            let payload = notification(command, |b| {
                b.append_attr_u32(pin_attr::ID, 7);
            });
            let event = parse_event(&payload).unwrap().unwrap();
            assert_eq!(event.tag(), tag);
        }
    }

    #[test]
    fn test_unknown_command_skipped() {
        let payload = notification(99, |b| {
            b.append_attr_u32(device_attr::ID, 1);
        });
        assert!(parse_event(&payload).unwrap().is_none());
    }

    #[test]
    fn test_event_without_id_is_decode_error() {
        let payload = notification(cmd::PIN_CHANGE_NTF, |b| {
            b.append_attr_u64(pin_attr::FREQUENCY, 1);
        });
        assert!(parse_event(&payload).is_err());
    }

    #[test]
    fn test_kind_names() {
        let payload = notification(cmd::PIN_DELETE_NTF, |b| {
            b.append_attr_u32(pin_attr::ID, 3);
        });
        let event = parse_event(&payload).unwrap().unwrap();
        assert_eq!(event.kind_name(), "pin-delete");
    }
}
