//! End-to-end checks: messages built with the encoder decode through the
//! public API into the expected domain objects and rendered output.

use dpll_nl::dpll::enums::{Mode, PinState};
use dpll_nl::dpll::parse::{parse_device, parse_pin};
use dpll_nl::dpll::uapi::{device_attr, pin_attr};
use dpll_nl::netlink::genl::GenlMsgHdr;
use dpll_nl::netlink::{MessageBuilder, NLMSG_HDRLEN};
use dpll_nl::output::{OutputOptions, Printable};

fn reply(build: impl FnOnce(&mut MessageBuilder)) -> Vec<u8> {
    let mut builder = MessageBuilder::new(0x23, 0);
    builder.append_bytes(GenlMsgHdr::new(0, 1).as_bytes());
    build(&mut builder);
    builder.finish()[NLMSG_HDRLEN..].to_vec()
}

#[test]
fn device_reply_round_trip() {
    let payload = reply(|b| {
        b.append_attr_u32(device_attr::ID, 0);
        b.append_attr_u32(device_attr::MODE, 1);
        b.append_attr_u32(device_attr::TYPE, 2);
        b.append_attr_u32(device_attr::MODE_SUPPORTED, 1);
        b.append_attr_u32(device_attr::MODE_SUPPORTED, 2);
        b.append_attr_u32(device_attr::PHASE_OFFSET_MONITOR, 1);
        b.append_attr_u32(device_attr::PHASE_OFFSET_AVG_FACTOR, 10);
    });

    let device = parse_device(&payload).unwrap();
    assert_eq!(device.id, 0);
    assert_eq!(device.mode_supported, vec![Mode::Manual, Mode::Automatic]);
    assert_eq!(device.phase_offset_monitor, Some(true));
    assert_eq!(device.phase_offset_avg_factor, Some(10));

    let json = device.to_json();
    assert_eq!(json["mode"], "manual");
    assert_eq!(json["type"], "eec");
    assert_eq!(json["phase-offset-monitor"], "enabled");
}

#[test]
fn pin_reply_with_every_multi_attribute() {
    let payload = reply(|b| {
        b.append_attr_u32(pin_attr::ID, 7);
        b.append_attr_str(pin_attr::BOARD_LABEL, "SMA1");
        for (min, max) in [(1u64, 25_000_000u64), (40_000_000, 40_000_000)] {
            let nest = b.nest_start(pin_attr::FREQUENCY_SUPPORTED);
            b.append_attr_u64(pin_attr::FREQUENCY_MIN, min);
            b.append_attr_u64(pin_attr::FREQUENCY_MAX, max);
            b.nest_end(nest);
        }
        let nest = b.nest_start(pin_attr::ESYNC_FREQUENCY_SUPPORTED);
        b.append_attr_u64(pin_attr::FREQUENCY_MIN, 1);
        b.append_attr_u64(pin_attr::FREQUENCY_MAX, 1);
        b.nest_end(nest);
        for parent in [0u32, 1] {
            let nest = b.nest_start(pin_attr::PARENT_DEVICE);
            b.append_attr_u32(pin_attr::PARENT_ID, parent);
            b.append_attr_u32(pin_attr::STATE, 1);
            b.nest_end(nest);
        }
        let nest = b.nest_start(pin_attr::PARENT_PIN);
        b.append_attr_u32(pin_attr::PARENT_ID, 3);
        b.nest_end(nest);
        let nest = b.nest_start(pin_attr::REFERENCE_SYNC);
        b.append_attr_u32(pin_attr::ID, 9);
        b.append_attr_u32(pin_attr::STATE, 2);
        b.nest_end(nest);
    });

    let pin = parse_pin(&payload).unwrap();
    assert_eq!(pin.id, 7);
    assert_eq!(pin.board_label.as_deref(), Some("SMA1"));
    assert_eq!(pin.frequency_supported.len(), 2);
    assert_eq!(pin.esync_frequency_supported.len(), 1);
    assert_eq!(pin.parent_devices.len(), 2);
    assert_eq!(pin.parent_devices[0].parent_id, Some(0));
    assert_eq!(pin.parent_devices[1].parent_id, Some(1));
    assert_eq!(pin.parent_pins.len(), 1);
    assert_eq!(pin.reference_sync.len(), 1);
    assert_eq!(pin.reference_sync[0].pin_id, Some(9));
    assert_eq!(pin.reference_sync[0].state, Some(PinState::Disconnected));
}

#[test]
fn multi_attribute_count_is_faithful() {
    for n in [0usize, 1, 5, 17] {
        let payload = reply(|b| {
            b.append_attr_u32(pin_attr::ID, 1);
            for i in 0..n {
                let nest = b.nest_start(pin_attr::PARENT_DEVICE);
                b.append_attr_u32(pin_attr::PARENT_ID, i as u32);
                b.nest_end(nest);
            }
        });
        let pin = parse_pin(&payload).unwrap();
        assert_eq!(pin.parent_devices.len(), n);
        for (i, parent) in pin.parent_devices.iter().enumerate() {
            assert_eq!(parent.parent_id, Some(i as u32));
        }
    }
}

#[test]
fn rendering_same_entity_twice_is_identical() {
    let payload = reply(|b| {
        b.append_attr_u32(pin_attr::ID, 2);
        b.append_attr_u64(pin_attr::FREQUENCY, 1);
        b.append_attr_u32(pin_attr::CAPABILITIES, 7);
    });
    let pin = parse_pin(&payload).unwrap();

    let opts = OutputOptions::default();
    let mut first = Vec::new();
    let mut second = Vec::new();
    pin.print_text(&mut first, &opts).unwrap();
    pin.print_text(&mut second, &opts).unwrap();
    assert_eq!(first, second);
}
