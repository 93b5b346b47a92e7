//! Bi-directional codec between DPLL wire enum codes and their labels.
//!
//! Decoding is total: out-of-range codes map to the `Unknown` variant,
//! which renders as `"unknown"`. Encoding (via `FromStr`) is strict:
//! only declared labels are accepted, anything else is an argument error.

use std::str::FromStr;

use crate::netlink::Error;

/// Device clock selection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Manual,
    Automatic,
    Unknown,
}

impl Mode {
    /// Parse from kernel value.
    pub fn from_raw(v: u32) -> Self {
        match v {
            1 => Mode::Manual,
            2 => Mode::Automatic,
            _ => Mode::Unknown,
        }
    }

    /// Convert to kernel value.
    pub fn raw(self) -> u32 {
        match self {
            Mode::Manual => 1,
            Mode::Automatic => 2,
            Mode::Unknown => 0,
        }
    }

    /// Textual label.
    pub fn name(self) -> &'static str {
        match self {
            Mode::Manual => "manual",
            Mode::Automatic => "automatic",
            Mode::Unknown => "unknown",
        }
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(Mode::Manual),
            "automatic" => Ok(Mode::Automatic),
            _ => Err(Error::InvalidArgument {
                what: "mode".into(),
                value: s.into(),
            }),
        }
    }
}

/// Device lock status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStatus {
    Unlocked,
    Locked,
    LockedHoAcq,
    Holdover,
    Unknown,
}

impl LockStatus {
    pub fn from_raw(v: u32) -> Self {
        match v {
            1 => LockStatus::Unlocked,
            2 => LockStatus::Locked,
            3 => LockStatus::LockedHoAcq,
            4 => LockStatus::Holdover,
            _ => LockStatus::Unknown,
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            LockStatus::Unlocked => 1,
            LockStatus::Locked => 2,
            LockStatus::LockedHoAcq => 3,
            LockStatus::Holdover => 4,
            LockStatus::Unknown => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LockStatus::Unlocked => "unlocked",
            LockStatus::Locked => "locked",
            LockStatus::LockedHoAcq => "locked-ho-acq",
            LockStatus::Holdover => "holdover",
            LockStatus::Unknown => "unknown",
        }
    }
}

/// Reason the device is not locked (or holding over).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStatusError {
    None,
    Undefined,
    MediaDown,
    FractionalFrequencyOffsetTooHigh,
    Unknown,
}

impl LockStatusError {
    pub fn from_raw(v: u32) -> Self {
        match v {
            1 => LockStatusError::None,
            2 => LockStatusError::Undefined,
            3 => LockStatusError::MediaDown,
            4 => LockStatusError::FractionalFrequencyOffsetTooHigh,
            _ => LockStatusError::Unknown,
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            LockStatusError::None => 1,
            LockStatusError::Undefined => 2,
            LockStatusError::MediaDown => 3,
            LockStatusError::FractionalFrequencyOffsetTooHigh => 4,
            LockStatusError::Unknown => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LockStatusError::None => "none",
            LockStatusError::Undefined => "undefined",
            LockStatusError::MediaDown => "media-down",
            LockStatusError::FractionalFrequencyOffsetTooHigh => {
                "fractional-frequency-offset-too-high"
            }
            LockStatusError::Unknown => "unknown",
        }
    }
}

/// Device type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceType {
    Pps,
    Eec,
    Unknown,
}

impl DeviceType {
    pub fn from_raw(v: u32) -> Self {
        match v {
            1 => DeviceType::Pps,
            2 => DeviceType::Eec,
            _ => DeviceType::Unknown,
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            DeviceType::Pps => 1,
            DeviceType::Eec => 2,
            DeviceType::Unknown => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DeviceType::Pps => "pps",
            DeviceType::Eec => "eec",
            DeviceType::Unknown => "unknown",
        }
    }
}

impl FromStr for DeviceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pps" => Ok(DeviceType::Pps),
            "eec" => Ok(DeviceType::Eec),
            _ => Err(Error::InvalidArgument {
                what: "type".into(),
                value: s.into(),
            }),
        }
    }
}

/// ITU clock quality level advertised by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockQualityLevel {
    ItuOpt1Prc,
    ItuOpt1SsuA,
    ItuOpt1SsuB,
    ItuOpt1Eec1,
    ItuOpt1Prtc,
    ItuOpt1Eprtc,
    ItuOpt1Eeec,
    ItuOpt1Eprc,
    Unknown,
}

impl ClockQualityLevel {
    pub fn from_raw(v: u32) -> Self {
        match v {
            1 => ClockQualityLevel::ItuOpt1Prc,
            2 => ClockQualityLevel::ItuOpt1SsuA,
            3 => ClockQualityLevel::ItuOpt1SsuB,
            4 => ClockQualityLevel::ItuOpt1Eec1,
            5 => ClockQualityLevel::ItuOpt1Prtc,
            6 => ClockQualityLevel::ItuOpt1Eprtc,
            7 => ClockQualityLevel::ItuOpt1Eeec,
            8 => ClockQualityLevel::ItuOpt1Eprc,
            _ => ClockQualityLevel::Unknown,
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            ClockQualityLevel::ItuOpt1Prc => 1,
            ClockQualityLevel::ItuOpt1SsuA => 2,
            ClockQualityLevel::ItuOpt1SsuB => 3,
            ClockQualityLevel::ItuOpt1Eec1 => 4,
            ClockQualityLevel::ItuOpt1Prtc => 5,
            ClockQualityLevel::ItuOpt1Eprtc => 6,
            ClockQualityLevel::ItuOpt1Eeec => 7,
            ClockQualityLevel::ItuOpt1Eprc => 8,
            ClockQualityLevel::Unknown => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ClockQualityLevel::ItuOpt1Prc => "itu-opt1-prc",
            ClockQualityLevel::ItuOpt1SsuA => "itu-opt1-ssu-a",
            ClockQualityLevel::ItuOpt1SsuB => "itu-opt1-ssu-b",
            ClockQualityLevel::ItuOpt1Eec1 => "itu-opt1-eec1",
            ClockQualityLevel::ItuOpt1Prtc => "itu-opt1-prtc",
            ClockQualityLevel::ItuOpt1Eprtc => "itu-opt1-eprtc",
            ClockQualityLevel::ItuOpt1Eeec => "itu-opt1-eeec",
            ClockQualityLevel::ItuOpt1Eprc => "itu-opt1-eprc",
            ClockQualityLevel::Unknown => "unknown",
        }
    }
}

/// Pin type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinType {
    Mux,
    Ext,
    SynceEthPort,
    IntOscillator,
    Gnss,
    Unknown,
}

impl PinType {
    pub fn from_raw(v: u32) -> Self {
        match v {
            1 => PinType::Mux,
            2 => PinType::Ext,
            3 => PinType::SynceEthPort,
            4 => PinType::IntOscillator,
            5 => PinType::Gnss,
            _ => PinType::Unknown,
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            PinType::Mux => 1,
            PinType::Ext => 2,
            PinType::SynceEthPort => 3,
            PinType::IntOscillator => 4,
            PinType::Gnss => 5,
            PinType::Unknown => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PinType::Mux => "mux",
            PinType::Ext => "ext",
            PinType::SynceEthPort => "synce-eth-port",
            PinType::IntOscillator => "int-oscillator",
            PinType::Gnss => "gnss",
            PinType::Unknown => "unknown",
        }
    }
}

impl FromStr for PinType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mux" => Ok(PinType::Mux),
            "ext" => Ok(PinType::Ext),
            "synce-eth-port" => Ok(PinType::SynceEthPort),
            "int-oscillator" => Ok(PinType::IntOscillator),
            "gnss" => Ok(PinType::Gnss),
            _ => Err(Error::InvalidArgument {
                what: "type".into(),
                value: s.into(),
            }),
        }
    }
}

/// Pin signal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinDirection {
    Input,
    Output,
    Unknown,
}

impl PinDirection {
    pub fn from_raw(v: u32) -> Self {
        match v {
            1 => PinDirection::Input,
            2 => PinDirection::Output,
            _ => PinDirection::Unknown,
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            PinDirection::Input => 1,
            PinDirection::Output => 2,
            PinDirection::Unknown => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PinDirection::Input => "input",
            PinDirection::Output => "output",
            PinDirection::Unknown => "unknown",
        }
    }
}

impl FromStr for PinDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "input" => Ok(PinDirection::Input),
            "output" => Ok(PinDirection::Output),
            _ => Err(Error::InvalidArgument {
                what: "direction".into(),
                value: s.into(),
            }),
        }
    }
}

/// Pin connection state on a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinState {
    Connected,
    Disconnected,
    Selectable,
    Unknown,
}

impl PinState {
    pub fn from_raw(v: u32) -> Self {
        match v {
            1 => PinState::Connected,
            2 => PinState::Disconnected,
            3 => PinState::Selectable,
            _ => PinState::Unknown,
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            PinState::Connected => 1,
            PinState::Disconnected => 2,
            PinState::Selectable => 3,
            PinState::Unknown => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PinState::Connected => "connected",
            PinState::Disconnected => "disconnected",
            PinState::Selectable => "selectable",
            PinState::Unknown => "unknown",
        }
    }
}

impl FromStr for PinState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "connected" => Ok(PinState::Connected),
            "disconnected" => Ok(PinState::Disconnected),
            "selectable" => Ok(PinState::Selectable),
            _ => Err(Error::InvalidArgument {
                what: "state".into(),
                value: s.into(),
            }),
        }
    }
}
