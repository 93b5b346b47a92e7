//! Printable implementations for the DPLL domain types.

mod device;
mod pin;
