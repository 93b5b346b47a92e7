//! Domain types decoded from DPLL replies and notifications.
//!
//! Each value exists for one reply message: the parser builds it from the
//! message buffer and hands it to the renderer; nothing here keeps
//! references into the transport.

use super::enums::{
    ClockQualityLevel, DeviceType, LockStatus, LockStatusError, Mode, PinDirection, PinState,
    PinType,
};

/// A DPLL device instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Device {
    pub id: u32,
    pub module_name: Option<String>,
    pub mode: Option<Mode>,
    /// Modes the device can be switched to; repeated attribute on the wire.
    pub mode_supported: Vec<Mode>,
    pub clock_id: Option<u64>,
    pub device_type: Option<DeviceType>,
    pub lock_status: Option<LockStatus>,
    pub lock_status_error: Option<LockStatusError>,
    /// Quality levels; repeated attribute on the wire.
    pub clock_quality_level: Vec<ClockQualityLevel>,
    /// Milli-degrees Celsius.
    pub temp: Option<i32>,
    pub phase_offset_monitor: Option<bool>,
    pub phase_offset_avg_factor: Option<u32>,
}

/// A clock signal pin attached to one or more devices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pin {
    pub id: u32,
    pub module_name: Option<String>,
    pub clock_id: Option<u64>,
    pub board_label: Option<String>,
    pub panel_label: Option<String>,
    pub package_label: Option<String>,
    pub pin_type: Option<PinType>,
    /// Hertz.
    pub frequency: Option<u64>,
    pub frequency_supported: Vec<FrequencyRange>,
    pub capabilities: Option<PinCapabilities>,
    pub phase_adjust_min: Option<i32>,
    pub phase_adjust_max: Option<i32>,
    pub phase_adjust_gran: Option<i32>,
    pub phase_adjust: Option<i32>,
    /// Parts per billion; 4 or 8 bytes on the wire.
    pub fractional_frequency_offset: Option<i64>,
    pub esync_frequency: Option<u64>,
    pub esync_frequency_supported: Vec<FrequencyRange>,
    pub esync_pulse: Option<u32>,
    pub parent_devices: Vec<ParentDevice>,
    pub parent_pins: Vec<ParentPin>,
    pub reference_sync: Vec<ReferenceSync>,
}

/// One supported frequency range of a pin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrequencyRange {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

/// Per-device registration of a pin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParentDevice {
    pub parent_id: Option<u32>,
    pub direction: Option<PinDirection>,
    pub prio: Option<u32>,
    pub state: Option<PinState>,
    /// 4 or 8 bytes on the wire.
    pub phase_offset: Option<i64>,
}

/// Attachment of a pin to a multiplexing parent pin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParentPin {
    pub parent_id: Option<u32>,
    pub state: Option<PinState>,
}

/// Reference-sync pairing with another pin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReferenceSync {
    pub pin_id: Option<u32>,
    pub state: Option<PinState>,
}

/// Pin capability bit set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PinCapabilities(u32);

impl PinCapabilities {
    pub const DIRECTION_CAN_CHANGE: u32 = 1;
    pub const PRIORITY_CAN_CHANGE: u32 = 2;
    pub const STATE_CAN_CHANGE: u32 = 4;

    /// Wrap a raw capability mask.
    pub fn from_raw(v: u32) -> Self {
        Self(v)
    }

    /// The raw mask, unknown bits included.
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Names of the known bits present, in canonical order.
    /// Unknown bits are ignored.
    pub fn names(self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.0 & Self::STATE_CAN_CHANGE != 0 {
            names.push("state-can-change");
        }
        if self.0 & Self::PRIORITY_CAN_CHANGE != 0 {
            names.push("priority-can-change");
        }
        if self.0 & Self::DIRECTION_CAN_CHANGE != 0 {
            names.push("direction-can-change");
        }
        names
    }
}
