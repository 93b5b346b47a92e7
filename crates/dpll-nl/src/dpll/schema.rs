//! Static attribute schema for the DPLL family.
//!
//! One table per object lists every attribute the engine understands:
//! its wire id, payload kind, and whether it may occur more than once at
//! the top level of a message. The decoder takes cardinality from here;
//! this is the single place the wire layout is stated.

use super::uapi::{device_attr, pin_attr};

/// Payload kind of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind {
    U32,
    U64,
    S32,
    /// Signed, 4 or 8 bytes on the wire.
    S64,
    Str,
    Nest,
}

/// How often an attribute may appear at the top level of one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Single,
    Multi,
}

/// Description of one attribute.
#[derive(Debug, Clone, Copy)]
pub struct AttrDef {
    pub id: u16,
    pub kind: AttrKind,
    pub cardinality: Cardinality,
}

const fn single(id: u16, kind: AttrKind) -> AttrDef {
    AttrDef {
        id,
        kind,
        cardinality: Cardinality::Single,
    }
}

const fn multi(id: u16, kind: AttrKind) -> AttrDef {
    AttrDef {
        id,
        kind,
        cardinality: Cardinality::Multi,
    }
}

/// Device reply attributes.
pub const DEVICE: &[AttrDef] = &[
    single(device_attr::ID, AttrKind::U32),
    single(device_attr::MODULE_NAME, AttrKind::Str),
    single(device_attr::CLOCK_ID, AttrKind::U64),
    single(device_attr::MODE, AttrKind::U32),
    multi(device_attr::MODE_SUPPORTED, AttrKind::U32),
    single(device_attr::LOCK_STATUS, AttrKind::U32),
    single(device_attr::TEMP, AttrKind::S32),
    single(device_attr::TYPE, AttrKind::U32),
    single(device_attr::LOCK_STATUS_ERROR, AttrKind::U32),
    multi(device_attr::CLOCK_QUALITY_LEVEL, AttrKind::U32),
    single(device_attr::PHASE_OFFSET_MONITOR, AttrKind::U32),
    single(device_attr::PHASE_OFFSET_AVG_FACTOR, AttrKind::U32),
];

/// Pin reply attributes. The same ids are used inside the nested
/// parent/reference records.
pub const PIN: &[AttrDef] = &[
    single(pin_attr::ID, AttrKind::U32),
    single(pin_attr::PARENT_ID, AttrKind::U32),
    single(pin_attr::MODULE_NAME, AttrKind::Str),
    single(pin_attr::CLOCK_ID, AttrKind::U64),
    single(pin_attr::BOARD_LABEL, AttrKind::Str),
    single(pin_attr::PANEL_LABEL, AttrKind::Str),
    single(pin_attr::PACKAGE_LABEL, AttrKind::Str),
    single(pin_attr::TYPE, AttrKind::U32),
    single(pin_attr::DIRECTION, AttrKind::U32),
    single(pin_attr::FREQUENCY, AttrKind::U64),
    multi(pin_attr::FREQUENCY_SUPPORTED, AttrKind::Nest),
    single(pin_attr::FREQUENCY_MIN, AttrKind::U64),
    single(pin_attr::FREQUENCY_MAX, AttrKind::U64),
    single(pin_attr::PRIO, AttrKind::U32),
    single(pin_attr::STATE, AttrKind::U32),
    single(pin_attr::CAPABILITIES, AttrKind::U32),
    multi(pin_attr::PARENT_DEVICE, AttrKind::Nest),
    multi(pin_attr::PARENT_PIN, AttrKind::Nest),
    single(pin_attr::PHASE_ADJUST_MIN, AttrKind::S32),
    single(pin_attr::PHASE_ADJUST_MAX, AttrKind::S32),
    single(pin_attr::PHASE_ADJUST, AttrKind::S32),
    single(pin_attr::PHASE_OFFSET, AttrKind::S64),
    single(pin_attr::FRACTIONAL_FREQUENCY_OFFSET, AttrKind::S64),
    single(pin_attr::ESYNC_FREQUENCY, AttrKind::U64),
    multi(pin_attr::ESYNC_FREQUENCY_SUPPORTED, AttrKind::Nest),
    single(pin_attr::ESYNC_PULSE, AttrKind::U32),
    multi(pin_attr::REFERENCE_SYNC, AttrKind::Nest),
    single(pin_attr::PHASE_ADJUST_GRAN, AttrKind::S32),
];

/// Look up an attribute definition by wire id.
pub fn lookup(table: &'static [AttrDef], id: u16) -> Option<&'static AttrDef> {
    table.iter().find(|def| def.id == id)
}

/// Whether the table declares the id as multi-occurrence.
pub fn is_multi(table: &'static [AttrDef], id: u16) -> bool {
    matches!(
        lookup(table, id),
        Some(AttrDef {
            cardinality: Cardinality::Multi,
            ..
        })
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_duplicate_ids() {
        for table in [DEVICE, PIN] {
            for (i, def) in table.iter().enumerate() {
                assert!(
                    table[i + 1..].iter().all(|other| other.id != def.id),
                    "duplicate id {} in schema",
                    def.id
                );
            }
        }
    }

    #[test]
    fn test_multi_attrs() {
        assert!(is_multi(DEVICE, device_attr::MODE_SUPPORTED));
        assert!(is_multi(DEVICE, device_attr::CLOCK_QUALITY_LEVEL));
        assert!(!is_multi(DEVICE, device_attr::MODE));

        assert!(is_multi(PIN, pin_attr::PARENT_DEVICE));
        assert!(is_multi(PIN, pin_attr::PARENT_PIN));
        assert!(is_multi(PIN, pin_attr::REFERENCE_SYNC));
        assert!(is_multi(PIN, pin_attr::FREQUENCY_SUPPORTED));
        assert!(is_multi(PIN, pin_attr::ESYNC_FREQUENCY_SUPPORTED));
        assert!(!is_multi(PIN, pin_attr::FREQUENCY));
    }

    #[test]
    fn test_lookup_kinds() {
        assert_eq!(lookup(PIN, pin_attr::FREQUENCY).unwrap().kind, AttrKind::U64);
        assert_eq!(lookup(PIN, pin_attr::PHASE_ADJUST).unwrap().kind, AttrKind::S32);
        assert_eq!(
            lookup(PIN, pin_attr::FRACTIONAL_FREQUENCY_OFFSET).unwrap().kind,
            AttrKind::S64
        );
        assert!(lookup(DEVICE, 200).is_none());
    }
}
