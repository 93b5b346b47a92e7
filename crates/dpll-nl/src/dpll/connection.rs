//! Connection to the DPLL generic netlink family.
//!
//! The family ID is dynamic, so connecting resolves it by name through
//! the GENL control family; the resolved info also carries the multicast
//! group used by [`subscribe_monitor`](DpllConnection::subscribe_monitor).

use crate::netlink::genl::{self, FamilyInfo, GenlMsgHdr};
use crate::netlink::message::{NLM_F_ACK, NLM_F_DUMP, NLM_F_REQUEST, NlMsgError};
use crate::netlink::{Error, MessageBuilder, MessageIter, NetlinkSocket, Result};

use super::events::DpllEventStream;
use super::parse;
use super::types::{Device, Pin};
use super::uapi::{self, cmd, device_attr, pin_attr};

/// Build a request message for the family: netlink header plus GENL
/// header with the family version.
pub fn new_request(family_id: u16, command: u8) -> MessageBuilder {
    let mut builder = MessageBuilder::new(family_id, NLM_F_REQUEST | NLM_F_ACK);
    builder.append_bytes(GenlMsgHdr::new(command, uapi::DPLL_FAMILY_VERSION).as_bytes());
    builder
}

/// Build a dump request message for the family.
pub fn new_dump_request(family_id: u16, command: u8) -> MessageBuilder {
    let mut builder = MessageBuilder::new(family_id, NLM_F_REQUEST | NLM_F_ACK | NLM_F_DUMP);
    builder.append_bytes(GenlMsgHdr::new(command, uapi::DPLL_FAMILY_VERSION).as_bytes());
    builder
}

/// Connection to the `"dpll"` family.
pub struct DpllConnection {
    socket: NetlinkSocket,
    family: FamilyInfo,
}

impl DpllConnection {
    /// Open a generic netlink socket and resolve the DPLL family.
    ///
    /// Fails with [`Error::FamilyNotFound`] on kernels without DPLL
    /// support.
    pub async fn connect() -> Result<Self> {
        let socket = NetlinkSocket::new()?;
        let family = genl::resolve_family(&socket, uapi::DPLL_FAMILY_NAME).await?;
        tracing::debug!("resolved dpll family id {}", family.id);
        Ok(Self { socket, family })
    }

    /// The resolved family ID.
    pub fn family_id(&self) -> u16 {
        self.family.id
    }

    /// Start a request for the given command.
    pub fn request(&self, command: u8) -> MessageBuilder {
        new_request(self.family.id, command)
    }

    /// Start a dump request for the given command.
    pub fn dump_request(&self, command: u8) -> MessageBuilder {
        new_dump_request(self.family.id, command)
    }

    /// Send a request and collect the data payloads of the reply.
    ///
    /// Returns the payload (GENL header and attributes) of every data
    /// message, in delivery order. The reply sequence ends at the ACK for
    /// plain requests and at the DONE marker for dumps; a kernel error
    /// code terminates the call with [`Error::Kernel`].
    pub async fn transact(&self, mut builder: MessageBuilder) -> Result<Vec<Vec<u8>>> {
        let seq = self.socket.next_seq();
        builder.set_seq(seq);
        builder.set_pid(self.socket.pid());

        let msg = builder.finish();
        self.socket.send(&msg).await?;

        let mut payloads = Vec::new();

        loop {
            let data = self.socket.recv_msg().await?;

            for result in MessageIter::new(&data) {
                let (header, payload) = result?;

                if header.nlmsg_seq != seq {
                    continue;
                }

                if header.is_error() {
                    let err = NlMsgError::from_bytes(payload)?;
                    if !err.is_ack() {
                        return Err(Error::from_errno(err.error));
                    }
                    return Ok(payloads);
                }

                if header.is_done() {
                    return Ok(payloads);
                }

                payloads.push(payload.to_vec());
            }
        }
    }

    /// Send a request whose reply is only a success code.
    pub async fn execute(&self, builder: MessageBuilder) -> Result<()> {
        self.transact(builder).await?;
        Ok(())
    }

    /// Get one device by id.
    pub async fn device(&self, id: u32) -> Result<Device> {
        let mut req = self.request(cmd::DEVICE_GET);
        req.append_attr_u32(device_attr::ID, id);
        let payloads = self.transact(req).await?;
        let payload = payloads.first().ok_or(Error::MissingId("device"))?;
        parse::parse_device(payload)
    }

    /// Dump all devices.
    pub async fn devices(&self) -> Result<Vec<Device>> {
        let payloads = self.transact(self.dump_request(cmd::DEVICE_GET)).await?;
        let mut devices = Vec::with_capacity(payloads.len());
        for payload in &payloads {
            match parse::parse_device(payload) {
                Ok(device) => devices.push(device),
                Err(e) => tracing::warn!("skipping device reply: {}", e),
            }
        }
        Ok(devices)
    }

    /// Get one pin by id.
    pub async fn pin(&self, id: u32) -> Result<Pin> {
        let mut req = self.request(cmd::PIN_GET);
        req.append_attr_u32(pin_attr::ID, id);
        let payloads = self.transact(req).await?;
        let payload = payloads.first().ok_or(Error::MissingId("pin"))?;
        parse::parse_pin(payload)
    }

    /// Dump pins, optionally restricted to one device.
    pub async fn pins(&self, device_id: Option<u32>) -> Result<Vec<Pin>> {
        let mut req = self.dump_request(cmd::PIN_GET);
        if let Some(id) = device_id {
            req.append_attr_u32(device_attr::ID, id);
        }
        let payloads = self.transact(req).await?;
        let mut pins = Vec::with_capacity(payloads.len());
        for payload in &payloads {
            match parse::parse_pin(payload) {
                Ok(pin) => pins.push(pin),
                Err(e) => tracing::warn!("skipping pin reply: {}", e),
            }
        }
        Ok(pins)
    }

    /// Join the family's `monitor` multicast group.
    pub fn subscribe_monitor(&mut self) -> Result<()> {
        let group = self
            .family
            .mcast_groups
            .get(uapi::DPLL_MCGRP_MONITOR)
            .copied()
            .ok_or_else(|| {
                Error::InvalidMessage(format!(
                    "dpll family has no \"{}\" multicast group",
                    uapi::DPLL_MCGRP_MONITOR
                ))
            })?;
        self.socket.add_membership(group)
    }

    /// Stream of notifications; subscribe first.
    pub fn events(&self) -> DpllEventStream<'_> {
        DpllEventStream::new(&self.socket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlink::attr::{AttrIter, get};
    use crate::netlink::genl::GENL_HDRLEN;
    use crate::netlink::{NLMSG_HDRLEN, NlMsgHdr};

    #[test]
    fn test_request_shape() {
        let mut req = new_request(0x23, cmd::DEVICE_SET);
        req.append_attr_u32(device_attr::ID, 5);
        let msg = req.finish();

        let header = NlMsgHdr::from_bytes(&msg).unwrap();
        assert_eq!(header.nlmsg_type, 0x23);
        assert_eq!(header.nlmsg_flags, NLM_F_REQUEST | NLM_F_ACK);

        let genl = GenlMsgHdr::from_bytes(&msg[NLMSG_HDRLEN..]).unwrap();
        assert_eq!(genl.cmd, cmd::DEVICE_SET);
        assert_eq!(genl.version, uapi::DPLL_FAMILY_VERSION);

        let attrs: Vec<_> = AttrIter::new(&msg[NLMSG_HDRLEN + GENL_HDRLEN..]).collect();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].0, device_attr::ID);
        assert_eq!(get::u32_ne(attrs[0].1).unwrap(), 5);
    }

    #[test]
    fn test_dump_request_flags() {
        let msg = new_dump_request(0x23, cmd::PIN_GET).finish();
        let header = NlMsgHdr::from_bytes(&msg).unwrap();
        assert_eq!(header.nlmsg_flags, NLM_F_REQUEST | NLM_F_ACK | NLM_F_DUMP);
    }
}
