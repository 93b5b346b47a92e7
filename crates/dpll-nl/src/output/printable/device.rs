//! Printable implementation for Device.

use std::io::Write;

use crate::dpll::types::Device;
use crate::dpll::uapi::DPLL_TEMP_DIVIDER;
use crate::output::{OutputOptions, Printable};

impl Printable for Device {
    fn print_text<W: Write>(&self, w: &mut W, _opts: &OutputOptions) -> std::io::Result<()> {
        writeln!(w, "device id {}:", self.id)?;

        if let Some(ref name) = self.module_name {
            writeln!(w, "  module-name: {}", name)?;
        }
        if let Some(mode) = self.mode {
            writeln!(w, "  mode: {}", mode.name())?;
        }
        if let Some(clock_id) = self.clock_id {
            writeln!(w, "  clock-id: {:#x}", clock_id)?;
        }
        if let Some(device_type) = self.device_type {
            writeln!(w, "  type: {}", device_type.name())?;
        }
        if let Some(status) = self.lock_status {
            writeln!(w, "  lock-status: {}", status.name())?;
        }
        if let Some(error) = self.lock_status_error {
            writeln!(w, "  lock-status-error: {}", error.name())?;
        }
        if let Some(temp) = self.temp {
            let sign = if temp < 0 { "-" } else { "" };
            writeln!(
                w,
                "  temperature: {}{}.{:03} C",
                sign,
                (temp / DPLL_TEMP_DIVIDER).abs(),
                (temp % DPLL_TEMP_DIVIDER).abs()
            )?;
        }
        if !self.mode_supported.is_empty() {
            let names: Vec<&str> = self.mode_supported.iter().map(|m| m.name()).collect();
            writeln!(w, "  mode-supported: {}", names.join(" "))?;
        }
        if !self.clock_quality_level.is_empty() {
            let names: Vec<&str> = self.clock_quality_level.iter().map(|q| q.name()).collect();
            writeln!(w, "  clock-quality-level: {}", names.join(" "))?;
        }
        if let Some(enabled) = self.phase_offset_monitor {
            writeln!(
                w,
                "  phase-offset-monitor: {}",
                if enabled { "enabled" } else { "disabled" }
            )?;
        }
        if let Some(factor) = self.phase_offset_avg_factor {
            writeln!(w, "  phase-offset-avg-factor: {}", factor)?;
        }

        Ok(())
    }

    fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::json!({ "id": self.id });

        if let Some(ref name) = self.module_name {
            obj["module-name"] = serde_json::json!(name);
        }
        if let Some(mode) = self.mode {
            obj["mode"] = serde_json::json!(mode.name());
        }
        if !self.mode_supported.is_empty() {
            let names: Vec<&str> = self.mode_supported.iter().map(|m| m.name()).collect();
            obj["mode-supported"] = serde_json::json!(names);
        }
        if let Some(clock_id) = self.clock_id {
            obj["clock-id"] = serde_json::json!(clock_id);
        }
        if let Some(device_type) = self.device_type {
            obj["type"] = serde_json::json!(device_type.name());
        }
        if let Some(status) = self.lock_status {
            obj["lock-status"] = serde_json::json!(status.name());
        }
        if let Some(error) = self.lock_status_error {
            obj["lock-status-error"] = serde_json::json!(error.name());
        }
        if !self.clock_quality_level.is_empty() {
            let names: Vec<&str> = self.clock_quality_level.iter().map(|q| q.name()).collect();
            obj["clock-quality-level"] = serde_json::json!(names);
        }
        if let Some(temp) = self.temp {
            obj["temperature"] = serde_json::json!(f64::from(temp) / f64::from(DPLL_TEMP_DIVIDER));
        }
        if let Some(enabled) = self.phase_offset_monitor {
            obj["phase-offset-monitor"] =
                serde_json::json!(if enabled { "enabled" } else { "disabled" });
        }
        if let Some(factor) = self.phase_offset_avg_factor {
            obj["phase-offset-avg-factor"] = serde_json::json!(factor);
        }

        obj
    }
}
