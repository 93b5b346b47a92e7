//! Printable implementation for Pin.

use std::io::Write;

use crate::dpll::types::{FrequencyRange, Pin};
use crate::output::{OutputOptions, Printable};

fn print_range<W: Write>(w: &mut W, range: &FrequencyRange) -> std::io::Result<()> {
    write!(w, "    ")?;
    if let Some(min) = range.min {
        write!(w, "{}", min)?;
    }
    write!(w, "-")?;
    if let Some(max) = range.max {
        write!(w, "{}", max)?;
    }
    writeln!(w, " Hz")
}

fn range_to_json(range: &FrequencyRange) -> serde_json::Value {
    let mut obj = serde_json::json!({});
    if let Some(min) = range.min {
        obj["frequency-min"] = serde_json::json!(min);
    }
    if let Some(max) = range.max {
        obj["frequency-max"] = serde_json::json!(max);
    }
    obj
}

impl Printable for Pin {
    fn print_text<W: Write>(&self, w: &mut W, _opts: &OutputOptions) -> std::io::Result<()> {
        writeln!(w, "pin id {}:", self.id)?;

        if let Some(ref name) = self.module_name {
            writeln!(w, "  module-name: {}", name)?;
        }
        if let Some(clock_id) = self.clock_id {
            writeln!(w, "  clock-id: {:#x}", clock_id)?;
        }
        if let Some(ref label) = self.board_label {
            writeln!(w, "  board-label: {}", label)?;
        }
        if let Some(ref label) = self.panel_label {
            writeln!(w, "  panel-label: {}", label)?;
        }
        if let Some(ref label) = self.package_label {
            writeln!(w, "  package-label: {}", label)?;
        }
        if let Some(pin_type) = self.pin_type {
            writeln!(w, "  type: {}", pin_type.name())?;
        }
        if let Some(frequency) = self.frequency {
            writeln!(w, "  frequency: {} Hz", frequency)?;
        }
        if !self.frequency_supported.is_empty() {
            writeln!(w, "  frequency-supported:")?;
            for range in &self.frequency_supported {
                print_range(w, range)?;
            }
        }
        if let Some(caps) = self.capabilities {
            write!(w, "  capabilities: {:#x}", caps.raw())?;
            for name in caps.names() {
                write!(w, " {}", name)?;
            }
            writeln!(w)?;
        }
        if let Some(value) = self.phase_adjust_min {
            writeln!(w, "  phase-adjust-min: {}", value)?;
        }
        if let Some(value) = self.phase_adjust_max {
            writeln!(w, "  phase-adjust-max: {}", value)?;
        }
        if let Some(value) = self.phase_adjust_gran {
            writeln!(w, "  phase-adjust-gran: {}", value)?;
        }
        if let Some(value) = self.phase_adjust {
            writeln!(w, "  phase-adjust: {}", value)?;
        }
        if let Some(offset) = self.fractional_frequency_offset {
            writeln!(w, "  fractional-frequency-offset: {} ppb", offset)?;
        }
        if let Some(frequency) = self.esync_frequency {
            writeln!(w, "  esync-frequency: {} Hz", frequency)?;
        }
        if !self.esync_frequency_supported.is_empty() {
            writeln!(w, "  esync-frequency-supported:")?;
            for range in &self.esync_frequency_supported {
                print_range(w, range)?;
            }
        }
        if let Some(pulse) = self.esync_pulse {
            writeln!(w, "  esync-pulse: {}", pulse)?;
        }
        if !self.parent_devices.is_empty() {
            writeln!(w, "  parent-device:")?;
            for parent in &self.parent_devices {
                write!(w, "    ")?;
                if let Some(id) = parent.parent_id {
                    write!(w, "id {}", id)?;
                }
                if let Some(direction) = parent.direction {
                    write!(w, " direction {}", direction.name())?;
                }
                if let Some(prio) = parent.prio {
                    write!(w, " prio {}", prio)?;
                }
                if let Some(state) = parent.state {
                    write!(w, " state {}", state.name())?;
                }
                if let Some(offset) = parent.phase_offset {
                    write!(w, " phase-offset {}", offset)?;
                }
                writeln!(w)?;
            }
        }
        if !self.parent_pins.is_empty() {
            writeln!(w, "  parent-pin:")?;
            for parent in &self.parent_pins {
                write!(w, "    ")?;
                if let Some(id) = parent.parent_id {
                    write!(w, "id {}", id)?;
                }
                if let Some(state) = parent.state {
                    write!(w, " state {}", state.name())?;
                }
                writeln!(w)?;
            }
        }
        if !self.reference_sync.is_empty() {
            writeln!(w, "  reference-sync:")?;
            for reference in &self.reference_sync {
                write!(w, "    ")?;
                if let Some(id) = reference.pin_id {
                    write!(w, "pin {}", id)?;
                }
                if let Some(state) = reference.state {
                    write!(w, " state {}", state.name())?;
                }
                writeln!(w)?;
            }
        }

        Ok(())
    }

    fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::json!({ "id": self.id });

        if let Some(ref name) = self.module_name {
            obj["module-name"] = serde_json::json!(name);
        }
        if let Some(clock_id) = self.clock_id {
            obj["clock-id"] = serde_json::json!(clock_id);
        }
        if let Some(ref label) = self.board_label {
            obj["board-label"] = serde_json::json!(label);
        }
        if let Some(ref label) = self.panel_label {
            obj["panel-label"] = serde_json::json!(label);
        }
        if let Some(ref label) = self.package_label {
            obj["package-label"] = serde_json::json!(label);
        }
        if let Some(pin_type) = self.pin_type {
            obj["type"] = serde_json::json!(pin_type.name());
        }
        if let Some(frequency) = self.frequency {
            obj["frequency"] = serde_json::json!(frequency);
        }
        if !self.frequency_supported.is_empty() {
            let ranges: Vec<_> = self.frequency_supported.iter().map(range_to_json).collect();
            obj["frequency-supported"] = serde_json::json!(ranges);
        }
        if let Some(caps) = self.capabilities {
            obj["capabilities"] = serde_json::json!(caps.names());
        }
        if let Some(value) = self.phase_adjust_min {
            obj["phase-adjust-min"] = serde_json::json!(value);
        }
        if let Some(value) = self.phase_adjust_max {
            obj["phase-adjust-max"] = serde_json::json!(value);
        }
        if let Some(value) = self.phase_adjust_gran {
            obj["phase-adjust-gran"] = serde_json::json!(value);
        }
        if let Some(value) = self.phase_adjust {
            obj["phase-adjust"] = serde_json::json!(value);
        }
        if let Some(offset) = self.fractional_frequency_offset {
            obj["fractional-frequency-offset"] = serde_json::json!(offset);
        }
        if let Some(frequency) = self.esync_frequency {
            obj["esync-frequency"] = serde_json::json!(frequency);
        }
        if !self.esync_frequency_supported.is_empty() {
            let ranges: Vec<_> = self
                .esync_frequency_supported
                .iter()
                .map(range_to_json)
                .collect();
            obj["esync-frequency-supported"] = serde_json::json!(ranges);
        }
        if let Some(pulse) = self.esync_pulse {
            obj["esync-pulse"] = serde_json::json!(pulse);
        }
        if !self.parent_devices.is_empty() {
            let parents: Vec<_> = self
                .parent_devices
                .iter()
                .map(|parent| {
                    let mut entry = serde_json::json!({});
                    if let Some(id) = parent.parent_id {
                        entry["parent-id"] = serde_json::json!(id);
                    }
                    if let Some(direction) = parent.direction {
                        entry["direction"] = serde_json::json!(direction.name());
                    }
                    if let Some(prio) = parent.prio {
                        entry["prio"] = serde_json::json!(prio);
                    }
                    if let Some(state) = parent.state {
                        entry["state"] = serde_json::json!(state.name());
                    }
                    if let Some(offset) = parent.phase_offset {
                        entry["phase-offset"] = serde_json::json!(offset);
                    }
                    entry
                })
                .collect();
            obj["parent-device"] = serde_json::json!(parents);
        }
        if !self.parent_pins.is_empty() {
            let parents: Vec<_> = self
                .parent_pins
                .iter()
                .map(|parent| {
                    let mut entry = serde_json::json!({});
                    if let Some(id) = parent.parent_id {
                        entry["parent-id"] = serde_json::json!(id);
                    }
                    if let Some(state) = parent.state {
                        entry["state"] = serde_json::json!(state.name());
                    }
                    entry
                })
                .collect();
            obj["parent-pin"] = serde_json::json!(parents);
        }
        if !self.reference_sync.is_empty() {
            let references: Vec<_> = self
                .reference_sync
                .iter()
                .map(|reference| {
                    let mut entry = serde_json::json!({});
                    if let Some(id) = reference.pin_id {
                        entry["id"] = serde_json::json!(id);
                    }
                    if let Some(state) = reference.state {
                        entry["state"] = serde_json::json!(state.name());
                    }
                    entry
                })
                .collect();
            obj["reference-sync"] = serde_json::json!(references);
        }

        obj
    }
}
