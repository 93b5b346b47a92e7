//! Wire constants of the DPLL generic netlink family.
//!
//! Values mirror the kernel uapi header that defines the interface; the
//! family ID itself is dynamic and resolved by name at connect time.

/// Generic netlink family name.
pub const DPLL_FAMILY_NAME: &str = "dpll";

/// Family interface version sent in every request.
pub const DPLL_FAMILY_VERSION: u8 = 1;

/// Multicast group carrying create/change/delete notifications.
pub const DPLL_MCGRP_MONITOR: &str = "monitor";

/// Divider for the temperature attribute (milli-degrees Celsius).
pub const DPLL_TEMP_DIVIDER: i32 = 1000;

/// Family commands.
pub mod cmd {
    pub const DEVICE_ID_GET: u8 = 1;
    pub const DEVICE_GET: u8 = 2;
    pub const DEVICE_SET: u8 = 3;
    pub const DEVICE_CREATE_NTF: u8 = 4;
    pub const DEVICE_DELETE_NTF: u8 = 5;
    pub const DEVICE_CHANGE_NTF: u8 = 6;
    pub const PIN_ID_GET: u8 = 7;
    pub const PIN_GET: u8 = 8;
    pub const PIN_SET: u8 = 9;
    pub const PIN_CREATE_NTF: u8 = 10;
    pub const PIN_DELETE_NTF: u8 = 11;
    pub const PIN_CHANGE_NTF: u8 = 12;
}

/// Device attributes.
pub mod device_attr {
    pub const ID: u16 = 1;
    pub const MODULE_NAME: u16 = 2;
    pub const CLOCK_ID: u16 = 4;
    pub const MODE: u16 = 5;
    pub const MODE_SUPPORTED: u16 = 6;
    pub const LOCK_STATUS: u16 = 7;
    pub const TEMP: u16 = 8;
    pub const TYPE: u16 = 9;
    pub const LOCK_STATUS_ERROR: u16 = 10;
    pub const CLOCK_QUALITY_LEVEL: u16 = 11;
    pub const PHASE_OFFSET_MONITOR: u16 = 12;
    pub const PHASE_OFFSET_AVG_FACTOR: u16 = 13;
}

/// Pin attributes.
pub mod pin_attr {
    pub const ID: u16 = 1;
    pub const PARENT_ID: u16 = 2;
    pub const MODULE_NAME: u16 = 3;
    pub const CLOCK_ID: u16 = 5;
    pub const BOARD_LABEL: u16 = 6;
    pub const PANEL_LABEL: u16 = 7;
    pub const PACKAGE_LABEL: u16 = 8;
    pub const TYPE: u16 = 9;
    pub const DIRECTION: u16 = 10;
    pub const FREQUENCY: u16 = 11;
    pub const FREQUENCY_SUPPORTED: u16 = 12;
    pub const FREQUENCY_MIN: u16 = 13;
    pub const FREQUENCY_MAX: u16 = 14;
    pub const PRIO: u16 = 15;
    pub const STATE: u16 = 16;
    pub const CAPABILITIES: u16 = 17;
    pub const PARENT_DEVICE: u16 = 18;
    pub const PARENT_PIN: u16 = 19;
    pub const PHASE_ADJUST_MIN: u16 = 20;
    pub const PHASE_ADJUST_MAX: u16 = 21;
    pub const PHASE_ADJUST: u16 = 22;
    pub const PHASE_OFFSET: u16 = 23;
    pub const FRACTIONAL_FREQUENCY_OFFSET: u16 = 24;
    pub const ESYNC_FREQUENCY: u16 = 25;
    pub const ESYNC_FREQUENCY_SUPPORTED: u16 = 26;
    pub const ESYNC_PULSE: u16 = 27;
    pub const REFERENCE_SYNC: u16 = 28;
    pub const PHASE_ADJUST_GRAN: u16 = 29;
}
