//! Reply message decoding.
//!
//! One reply (or notification) message is decoded in three passes:
//!
//! 1. **Count** — walk the top-level attributes and count occurrences of
//!    every id the schema declares multi, then allocate each sequence
//!    with exactly that capacity.
//! 2. **Collect** — walk again; single attributes land in a flat table
//!    indexed by wire id (last occurrence wins), multi attributes append
//!    their payload slice in wire order.
//! 3. **Expand** — each collected slice of a multi attribute is parsed
//!    into its typed sub-record.
//!
//! Counting before collecting keeps every sequence at a single, exact
//! allocation while slices into the message buffer are live; the table
//! and all sub-records borrow from the one message and are dropped when
//! decoding returns.

use crate::netlink::attr::{AttrIter, get};
use crate::netlink::genl::GENL_HDRLEN;
use crate::netlink::{Error, Result};

use super::enums::{
    ClockQualityLevel, DeviceType, LockStatus, LockStatusError, Mode, PinDirection, PinState,
    PinType,
};
use super::schema::{self, AttrDef, Cardinality};
use super::types::{
    Device, FrequencyRange, ParentDevice, ParentPin, Pin, PinCapabilities, ReferenceSync,
};
use super::uapi::{device_attr, pin_attr};

/// Attribute table for one message: singles indexed by wire id, multi
/// payloads kept in wire order.
struct AttrTable<'a> {
    single: Vec<Option<&'a [u8]>>,
    multi: Vec<(u16, Vec<&'a [u8]>)>,
}

impl<'a> AttrTable<'a> {
    fn collect(attrs: &'a [u8], table: &'static [AttrDef]) -> Self {
        // Count pass: one counter per multi id in the schema.
        let mut counts: Vec<(u16, usize)> = table
            .iter()
            .filter(|def| def.cardinality == Cardinality::Multi)
            .map(|def| (def.id, 0))
            .collect();
        for (ty, _) in AttrIter::new(attrs) {
            if let Some(entry) = counts.iter_mut().find(|(id, _)| *id == ty) {
                entry.1 += 1;
            }
        }
        let mut multi: Vec<(u16, Vec<&'a [u8]>)> = counts
            .into_iter()
            .map(|(id, n)| (id, Vec::with_capacity(n)))
            .collect();

        let max_id = table.iter().map(|def| def.id).max().unwrap_or(0) as usize;
        let mut single: Vec<Option<&'a [u8]>> = vec![None; max_id + 1];

        // Collect pass.
        for (ty, payload) in AttrIter::new(attrs) {
            if let Some(entry) = multi.iter_mut().find(|(id, _)| *id == ty) {
                entry.1.push(payload);
            } else if (ty as usize) <= max_id {
                single[ty as usize] = Some(payload);
            }
        }

        Self { single, multi }
    }

    fn get(&self, id: u16) -> Option<&'a [u8]> {
        self.single.get(id as usize).copied().flatten()
    }

    fn multi(&self, id: u16) -> &[&'a [u8]] {
        self.multi
            .iter()
            .find(|(i, _)| *i == id)
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }
}

fn genl_attrs(payload: &[u8]) -> Result<&[u8]> {
    if payload.len() < GENL_HDRLEN {
        return Err(Error::Truncated {
            expected: GENL_HDRLEN,
            actual: payload.len(),
        });
    }
    Ok(&payload[GENL_HDRLEN..])
}

/// Read a width-variable signed field, treating bad widths as absent.
fn signed_or_absent(payload: &[u8], what: &str) -> Option<i64> {
    match get::signed_ne(payload) {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(
                "{}: unexpected payload width {}, field dropped",
                what,
                payload.len()
            );
            None
        }
    }
}

/// Decode one device reply or notification payload (GENL header included).
pub fn parse_device(payload: &[u8]) -> Result<Device> {
    let attrs = genl_attrs(payload)?;
    let tab = AttrTable::collect(attrs, schema::DEVICE);

    let id = tab
        .get(device_attr::ID)
        .map(get::u32_ne)
        .transpose()?
        .ok_or(Error::MissingId("device"))?;

    let mut device = Device {
        id,
        ..Device::default()
    };

    if let Some(data) = tab.get(device_attr::MODULE_NAME) {
        device.module_name = Some(get::string(data)?.to_string());
    }
    if let Some(data) = tab.get(device_attr::MODE) {
        device.mode = Some(Mode::from_raw(get::u32_ne(data)?));
    }
    if let Some(data) = tab.get(device_attr::CLOCK_ID) {
        device.clock_id = Some(get::u64_ne(data)?);
    }
    if let Some(data) = tab.get(device_attr::TYPE) {
        device.device_type = Some(DeviceType::from_raw(get::u32_ne(data)?));
    }
    if let Some(data) = tab.get(device_attr::LOCK_STATUS) {
        device.lock_status = Some(LockStatus::from_raw(get::u32_ne(data)?));
    }
    if let Some(data) = tab.get(device_attr::LOCK_STATUS_ERROR) {
        device.lock_status_error = Some(LockStatusError::from_raw(get::u32_ne(data)?));
    }
    if let Some(data) = tab.get(device_attr::TEMP) {
        device.temp = Some(get::i32_ne(data)?);
    }
    if let Some(data) = tab.get(device_attr::PHASE_OFFSET_MONITOR) {
        device.phase_offset_monitor = Some(get::u32_ne(data)? != 0);
    }
    if let Some(data) = tab.get(device_attr::PHASE_OFFSET_AVG_FACTOR) {
        device.phase_offset_avg_factor = Some(get::u32_ne(data)?);
    }

    // Expand pass
    device.mode_supported = tab
        .multi(device_attr::MODE_SUPPORTED)
        .iter()
        .map(|data| get::u32_ne(data).map(Mode::from_raw))
        .collect::<Result<_>>()?;
    device.clock_quality_level = tab
        .multi(device_attr::CLOCK_QUALITY_LEVEL)
        .iter()
        .map(|data| get::u32_ne(data).map(ClockQualityLevel::from_raw))
        .collect::<Result<_>>()?;

    Ok(device)
}

/// Decode one pin reply or notification payload (GENL header included).
pub fn parse_pin(payload: &[u8]) -> Result<Pin> {
    let attrs = genl_attrs(payload)?;
    let tab = AttrTable::collect(attrs, schema::PIN);

    let id = tab
        .get(pin_attr::ID)
        .map(get::u32_ne)
        .transpose()?
        .ok_or(Error::MissingId("pin"))?;

    let mut pin = Pin {
        id,
        ..Pin::default()
    };

    if let Some(data) = tab.get(pin_attr::MODULE_NAME) {
        pin.module_name = Some(get::string(data)?.to_string());
    }
    if let Some(data) = tab.get(pin_attr::CLOCK_ID) {
        pin.clock_id = Some(get::u64_ne(data)?);
    }
    if let Some(data) = tab.get(pin_attr::BOARD_LABEL) {
        pin.board_label = Some(get::string(data)?.to_string());
    }
    if let Some(data) = tab.get(pin_attr::PANEL_LABEL) {
        pin.panel_label = Some(get::string(data)?.to_string());
    }
    if let Some(data) = tab.get(pin_attr::PACKAGE_LABEL) {
        pin.package_label = Some(get::string(data)?.to_string());
    }
    if let Some(data) = tab.get(pin_attr::TYPE) {
        pin.pin_type = Some(PinType::from_raw(get::u32_ne(data)?));
    }
    if let Some(data) = tab.get(pin_attr::FREQUENCY) {
        pin.frequency = Some(get::u64_ne(data)?);
    }
    if let Some(data) = tab.get(pin_attr::CAPABILITIES) {
        pin.capabilities = Some(PinCapabilities::from_raw(get::u32_ne(data)?));
    }
    if let Some(data) = tab.get(pin_attr::PHASE_ADJUST_MIN) {
        pin.phase_adjust_min = Some(get::i32_ne(data)?);
    }
    if let Some(data) = tab.get(pin_attr::PHASE_ADJUST_MAX) {
        pin.phase_adjust_max = Some(get::i32_ne(data)?);
    }
    if let Some(data) = tab.get(pin_attr::PHASE_ADJUST_GRAN) {
        pin.phase_adjust_gran = Some(get::i32_ne(data)?);
    }
    if let Some(data) = tab.get(pin_attr::PHASE_ADJUST) {
        pin.phase_adjust = Some(get::i32_ne(data)?);
    }
    if let Some(data) = tab.get(pin_attr::FRACTIONAL_FREQUENCY_OFFSET) {
        pin.fractional_frequency_offset = signed_or_absent(data, "fractional-frequency-offset");
    }
    if let Some(data) = tab.get(pin_attr::ESYNC_FREQUENCY) {
        pin.esync_frequency = Some(get::u64_ne(data)?);
    }
    if let Some(data) = tab.get(pin_attr::ESYNC_PULSE) {
        pin.esync_pulse = Some(get::u32_ne(data)?);
    }

    // Expand pass
    pin.frequency_supported = tab
        .multi(pin_attr::FREQUENCY_SUPPORTED)
        .iter()
        .map(|data| parse_frequency_range(data))
        .collect::<Result<_>>()?;
    pin.esync_frequency_supported = tab
        .multi(pin_attr::ESYNC_FREQUENCY_SUPPORTED)
        .iter()
        .map(|data| parse_frequency_range(data))
        .collect::<Result<_>>()?;
    pin.parent_devices = tab
        .multi(pin_attr::PARENT_DEVICE)
        .iter()
        .map(|data| parse_parent_device(data))
        .collect::<Result<_>>()?;
    pin.parent_pins = tab
        .multi(pin_attr::PARENT_PIN)
        .iter()
        .map(|data| parse_parent_pin(data))
        .collect::<Result<_>>()?;
    pin.reference_sync = tab
        .multi(pin_attr::REFERENCE_SYNC)
        .iter()
        .map(|data| parse_reference_sync(data))
        .collect::<Result<_>>()?;

    Ok(pin)
}

fn parse_frequency_range(data: &[u8]) -> Result<FrequencyRange> {
    let mut range = FrequencyRange::default();
    for (ty, payload) in AttrIter::new(data) {
        match ty {
            pin_attr::FREQUENCY_MIN => range.min = Some(get::u64_ne(payload)?),
            pin_attr::FREQUENCY_MAX => range.max = Some(get::u64_ne(payload)?),
            _ => {}
        }
    }
    Ok(range)
}

fn parse_parent_device(data: &[u8]) -> Result<ParentDevice> {
    let mut parent = ParentDevice::default();
    for (ty, payload) in AttrIter::new(data) {
        match ty {
            pin_attr::PARENT_ID => parent.parent_id = Some(get::u32_ne(payload)?),
            pin_attr::DIRECTION => {
                parent.direction = Some(PinDirection::from_raw(get::u32_ne(payload)?));
            }
            pin_attr::PRIO => parent.prio = Some(get::u32_ne(payload)?),
            pin_attr::STATE => parent.state = Some(PinState::from_raw(get::u32_ne(payload)?)),
            pin_attr::PHASE_OFFSET => {
                parent.phase_offset = signed_or_absent(payload, "parent-device phase-offset");
            }
            _ => {}
        }
    }
    Ok(parent)
}

fn parse_parent_pin(data: &[u8]) -> Result<ParentPin> {
    let mut parent = ParentPin::default();
    for (ty, payload) in AttrIter::new(data) {
        match ty {
            pin_attr::PARENT_ID => parent.parent_id = Some(get::u32_ne(payload)?),
            pin_attr::STATE => parent.state = Some(PinState::from_raw(get::u32_ne(payload)?)),
            _ => {}
        }
    }
    Ok(parent)
}

fn parse_reference_sync(data: &[u8]) -> Result<ReferenceSync> {
    let mut reference = ReferenceSync::default();
    for (ty, payload) in AttrIter::new(data) {
        match ty {
            pin_attr::ID => reference.pin_id = Some(get::u32_ne(payload)?),
            pin_attr::STATE => reference.state = Some(PinState::from_raw(get::u32_ne(payload)?)),
            _ => {}
        }
    }
    Ok(reference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlink::genl::GenlMsgHdr;
    use crate::netlink::{MessageBuilder, NLMSG_HDRLEN};

    fn message(build: impl FnOnce(&mut MessageBuilder)) -> Vec<u8> {
        let mut builder = MessageBuilder::new(0x23, 0);
        builder.append_bytes(GenlMsgHdr::new(0, 1).as_bytes());
        build(&mut builder);
        builder.finish()[NLMSG_HDRLEN..].to_vec()
    }

    #[test]
    fn test_device_basic_fields() {
        let payload = message(|b| {
            b.append_attr_u32(device_attr::ID, 0);
            b.append_attr_str(device_attr::MODULE_NAME, "ice");
            b.append_attr_u32(device_attr::MODE, 1);
            b.append_attr_u64(device_attr::CLOCK_ID, 0x44AA_BBCC);
            b.append_attr_u32(device_attr::TYPE, 2);
            b.append_attr_u32(device_attr::LOCK_STATUS, 2);
            b.append_attr(device_attr::TEMP, &(-1500i32).to_ne_bytes());
        });

        let device = parse_device(&payload).unwrap();
        assert_eq!(device.id, 0);
        assert_eq!(device.module_name.as_deref(), Some("ice"));
        assert_eq!(device.mode, Some(Mode::Manual));
        assert_eq!(device.clock_id, Some(0x44AA_BBCC));
        assert_eq!(device.device_type, Some(DeviceType::Eec));
        assert_eq!(device.lock_status, Some(LockStatus::Locked));
        assert_eq!(device.temp, Some(-1500));
        assert!(device.mode_supported.is_empty());
    }

    #[test]
    fn test_device_mode_supported_aggregation() {
        let payload = message(|b| {
            b.append_attr_u32(device_attr::ID, 1);
            b.append_attr_u32(device_attr::MODE_SUPPORTED, 2);
            b.append_attr_u32(device_attr::MODE, 2);
            b.append_attr_u32(device_attr::MODE_SUPPORTED, 1);
        });

        let device = parse_device(&payload).unwrap();
        // Wire order, not sorted
        assert_eq!(device.mode_supported, vec![Mode::Automatic, Mode::Manual]);
    }

    #[test]
    fn test_device_missing_id_is_an_error() {
        let payload = message(|b| {
            b.append_attr_u32(device_attr::MODE, 1);
        });
        assert!(matches!(
            parse_device(&payload),
            Err(Error::MissingId("device"))
        ));
    }

    #[test]
    fn test_device_duplicate_single_last_wins() {
        let payload = message(|b| {
            b.append_attr_u32(device_attr::ID, 7);
            b.append_attr_u32(device_attr::MODE, 1);
            b.append_attr_u32(device_attr::MODE, 2);
        });
        let device = parse_device(&payload).unwrap();
        assert_eq!(device.mode, Some(Mode::Automatic));
    }

    #[test]
    fn test_device_unknown_attr_ignored() {
        let payload = message(|b| {
            b.append_attr_u32(device_attr::ID, 3);
            b.append_attr_u32(250, 9);
        });
        assert_eq!(parse_device(&payload).unwrap().id, 3);
    }

    #[test]
    fn test_pin_nested_parent_devices_in_wire_order() {
        let payload = message(|b| {
            b.append_attr_u32(pin_attr::ID, 13);
            let nest = b.nest_start(pin_attr::PARENT_DEVICE);
            b.append_attr_u32(pin_attr::PARENT_ID, 0);
            b.append_attr_u32(pin_attr::DIRECTION, 1);
            b.append_attr_u32(pin_attr::PRIO, 10);
            b.append_attr_u32(pin_attr::STATE, 1);
            b.append_attr(pin_attr::PHASE_OFFSET, &(-100i64).to_ne_bytes());
            b.nest_end(nest);
            let nest = b.nest_start(pin_attr::PARENT_DEVICE);
            b.append_attr_u32(pin_attr::PARENT_ID, 1);
            b.append_attr_u32(pin_attr::DIRECTION, 2);
            b.nest_end(nest);
        });

        let pin = parse_pin(&payload).unwrap();
        assert_eq!(pin.id, 13);
        assert_eq!(pin.parent_devices.len(), 2);
        assert_eq!(pin.parent_devices[0].parent_id, Some(0));
        assert_eq!(pin.parent_devices[0].direction, Some(PinDirection::Input));
        assert_eq!(pin.parent_devices[0].prio, Some(10));
        assert_eq!(pin.parent_devices[0].state, Some(PinState::Connected));
        assert_eq!(pin.parent_devices[0].phase_offset, Some(-100));
        assert_eq!(pin.parent_devices[1].parent_id, Some(1));
        assert_eq!(pin.parent_devices[1].direction, Some(PinDirection::Output));
        assert_eq!(pin.parent_devices[1].prio, None);
    }

    #[test]
    fn test_pin_frequency_ranges() {
        let payload = message(|b| {
            b.append_attr_u32(pin_attr::ID, 2);
            b.append_attr_u64(pin_attr::FREQUENCY, 10_000_000);
            let nest = b.nest_start(pin_attr::FREQUENCY_SUPPORTED);
            b.append_attr_u64(pin_attr::FREQUENCY_MIN, 1);
            b.append_attr_u64(pin_attr::FREQUENCY_MAX, 20_000_000);
            b.nest_end(nest);
            let nest = b.nest_start(pin_attr::FREQUENCY_SUPPORTED);
            b.append_attr_u64(pin_attr::FREQUENCY_MIN, 40_000_000);
            b.nest_end(nest);
        });

        let pin = parse_pin(&payload).unwrap();
        assert_eq!(pin.frequency, Some(10_000_000));
        assert_eq!(pin.frequency_supported.len(), 2);
        assert_eq!(pin.frequency_supported[0].min, Some(1));
        assert_eq!(pin.frequency_supported[0].max, Some(20_000_000));
        assert_eq!(pin.frequency_supported[1].min, Some(40_000_000));
        assert_eq!(pin.frequency_supported[1].max, None);
    }

    #[test]
    fn test_pin_ffo_widths() {
        // 4-byte payload sign-extends
        let payload = message(|b| {
            b.append_attr_u32(pin_attr::ID, 1);
            b.append_attr(pin_attr::FRACTIONAL_FREQUENCY_OFFSET, &(-5i32).to_ne_bytes());
        });
        assert_eq!(
            parse_pin(&payload).unwrap().fractional_frequency_offset,
            Some(-5)
        );

        // 8-byte payload reads as s64
        let payload = message(|b| {
            b.append_attr_u32(pin_attr::ID, 1);
            b.append_attr(
                pin_attr::FRACTIONAL_FREQUENCY_OFFSET,
                &(-5_000_000_000i64).to_ne_bytes(),
            );
        });
        assert_eq!(
            parse_pin(&payload).unwrap().fractional_frequency_offset,
            Some(-5_000_000_000)
        );

        // Any other width leaves the field absent
        let payload = message(|b| {
            b.append_attr_u32(pin_attr::ID, 1);
            b.append_attr(pin_attr::FRACTIONAL_FREQUENCY_OFFSET, &[1, 2]);
        });
        assert_eq!(parse_pin(&payload).unwrap().fractional_frequency_offset, None);
    }

    #[test]
    fn test_pin_reference_sync_and_parent_pin() {
        let payload = message(|b| {
            b.append_attr_u32(pin_attr::ID, 7);
            let nest = b.nest_start(pin_attr::PARENT_PIN);
            b.append_attr_u32(pin_attr::PARENT_ID, 2);
            b.append_attr_u32(pin_attr::STATE, 3);
            b.nest_end(nest);
            let nest = b.nest_start(pin_attr::REFERENCE_SYNC);
            b.append_attr_u32(pin_attr::ID, 1);
            b.append_attr_u32(pin_attr::STATE, 1);
            b.nest_end(nest);
        });

        let pin = parse_pin(&payload).unwrap();
        // The reference-sync nest carries a pin id attribute; it must not
        // clobber the pin's own id.
        assert_eq!(pin.id, 7);
        assert_eq!(pin.parent_pins.len(), 1);
        assert_eq!(pin.parent_pins[0].parent_id, Some(2));
        assert_eq!(pin.parent_pins[0].state, Some(PinState::Selectable));
        assert_eq!(pin.reference_sync.len(), 1);
        assert_eq!(pin.reference_sync[0].pin_id, Some(1));
        assert_eq!(pin.reference_sync[0].state, Some(PinState::Connected));
    }

    #[test]
    fn test_truncated_genl_header() {
        assert!(matches!(
            parse_device(&[0u8; 2]),
            Err(Error::Truncated { .. })
        ));
    }
}
