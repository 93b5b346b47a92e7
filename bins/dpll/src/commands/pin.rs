//! `dpll pin` subcommands.
//!
//! `pin set` drives an iproute2-style keyword loop. `state`, `prio` and
//! `direction` double as sub-keywords of the `parent-device`,
//! `parent-pin` and `reference-sync` nested blocks: while a block is
//! open they bind to it, and the first token outside the block's
//! sub-keyword set closes the nest and is re-read at top level.

use dpll_nl::dpll::connection::{DpllConnection, new_request};
use dpll_nl::dpll::enums::{PinDirection, PinState, PinType};
use dpll_nl::dpll::parse::parse_pin;
use dpll_nl::dpll::uapi::{cmd, pin_attr};
use dpll_nl::netlink::MessageBuilder;
use dpll_nl::output::{OutputFormat, OutputOptions};
use dpll_nl::{Error, Result};

use super::{emit_entity, emit_json, emit_list, require_enum, require_i32, require_u32,
    require_u64, require_value};
use crate::cursor::TokenCursor;

pub fn print_help() {
    eprintln!("Usage: dpll pin show [ id PIN_ID ] [ device DEVICE_ID ]");
    eprintln!("       dpll pin set id PIN_ID [ frequency FREQ ]");
    eprintln!("                              [ direction {{ input | output }} ]");
    eprintln!("                              [ prio PRIO ]");
    eprintln!(
        "                              [ state {{ connected | disconnected | selectable }} ]"
    );
    eprintln!("                              [ phase-adjust ADJUST ]");
    eprintln!("                              [ esync-frequency FREQ ]");
    eprintln!("                              [ parent-device DEVICE_ID [ direction DIR ]");
    eprintln!("                                                        [ prio PRIO ]");
    eprintln!("                                                        [ state STATE ] ]");
    eprintln!("                              [ parent-pin PIN_ID [ state STATE ] ]");
    eprintln!("                              [ reference-sync PIN_ID [ state STATE ] ]");
    eprintln!("       dpll pin id-get [ module-name NAME ] [ clock-id ID ]");
    eprintln!("                       [ board-label LABEL ] [ panel-label LABEL ]");
    eprintln!("                       [ package-label LABEL ] [ type TYPE ]");
}

pub async fn run(
    cursor: &mut TokenCursor<'_>,
    format: OutputFormat,
    opts: &OutputOptions,
) -> Result<()> {
    if cursor.is_empty() || cursor.matches("help") {
        print_help();
        return Ok(());
    }

    let result = if cursor.take_if("show") {
        show(cursor, format, opts).await
    } else if cursor.take_if("set") {
        set(cursor).await
    } else if cursor.take_if("id-get") {
        id_get(cursor, format, opts).await
    } else {
        Err(Error::UnknownCommand(
            cursor.peek().unwrap_or_default().to_string(),
        ))
    };

    if let Err(ref e) = result {
        if e.is_usage() {
            print_help();
        }
    }
    result
}

#[derive(Debug, Default, PartialEq, Eq)]
struct ShowFilter {
    pin_id: Option<u32>,
    device_id: Option<u32>,
}

fn parse_show_args(cursor: &mut TokenCursor<'_>) -> Result<ShowFilter> {
    let mut filter = ShowFilter::default();
    while let Some(keyword) = cursor.peek() {
        match keyword {
            "id" => {
                cursor.advance();
                filter.pin_id = Some(require_u32(cursor, "id", "pin id")?);
            }
            "device" => {
                cursor.advance();
                filter.device_id = Some(require_u32(cursor, "device", "device id")?);
            }
            _ => return Err(Error::UnknownOption(keyword.to_string())),
        }
    }
    Ok(filter)
}

async fn show(
    cursor: &mut TokenCursor<'_>,
    format: OutputFormat,
    opts: &OutputOptions,
) -> Result<()> {
    let conn = DpllConnection::connect().await?;
    let filter = parse_show_args(cursor)?;
    match filter.pin_id {
        Some(id) => {
            let pin = conn.pin(id).await?;
            emit_entity(&pin, format, opts)
        }
        None => {
            let pins = conn.pins(filter.device_id).await?;
            emit_list("pin", &pins, format, opts)
        }
    }
}

/// Append the sub-keywords of one `parent-device` block until a token
/// outside the block's keyword set is seen.
fn parse_parent_device_block(req: &mut MessageBuilder, cursor: &mut TokenCursor<'_>) -> Result<()> {
    let parent_id = require_u32(cursor, "parent-device", "parent-device id")?;
    let nest = req.nest_start(pin_attr::PARENT_DEVICE);
    req.append_attr_u32(pin_attr::PARENT_ID, parent_id);

    loop {
        match cursor.peek() {
            Some("direction") => {
                cursor.advance();
                let direction: PinDirection = require_enum(cursor, "direction")?;
                req.append_attr_u32(pin_attr::DIRECTION, direction.raw());
            }
            Some("prio") => {
                cursor.advance();
                req.append_attr_u32(pin_attr::PRIO, require_u32(cursor, "prio", "prio")?);
            }
            Some("state") => {
                cursor.advance();
                let state: PinState = require_enum(cursor, "state")?;
                req.append_attr_u32(pin_attr::STATE, state.raw());
            }
            // Not a parent-device sub-keyword: close the block and let
            // the top-level loop re-read the token.
            _ => break,
        }
    }

    req.nest_end(nest);
    Ok(())
}

/// Append one `parent-pin` or `reference-sync` block; both accept a
/// mandatory id followed by optional `state` sub-keywords.
fn parse_pin_ref_block(
    req: &mut MessageBuilder,
    cursor: &mut TokenCursor<'_>,
    keyword: &str,
    nest_attr: u16,
    id_attr: u16,
) -> Result<()> {
    let id = require_u32(cursor, keyword, &format!("{} id", keyword))?;
    let nest = req.nest_start(nest_attr);
    req.append_attr_u32(id_attr, id);

    while cursor.matches("state") {
        cursor.advance();
        let state: PinState = require_enum(cursor, "state")?;
        req.append_attr_u32(pin_attr::STATE, state.raw());
    }

    req.nest_end(nest);
    Ok(())
}

pub(crate) fn build_set_request(
    family_id: u16,
    cursor: &mut TokenCursor<'_>,
) -> Result<MessageBuilder> {
    let mut req = new_request(family_id, cmd::PIN_SET);
    let mut has_id = false;

    while let Some(keyword) = cursor.peek() {
        match keyword {
            "id" => {
                cursor.advance();
                req.append_attr_u32(pin_attr::ID, require_u32(cursor, "id", "pin id")?);
                has_id = true;
            }
            "frequency" => {
                cursor.advance();
                req.append_attr_u64(
                    pin_attr::FREQUENCY,
                    require_u64(cursor, "frequency", "frequency")?,
                );
            }
            "prio" => {
                cursor.advance();
                req.append_attr_u32(pin_attr::PRIO, require_u32(cursor, "prio", "prio")?);
            }
            "direction" => {
                cursor.advance();
                let direction: PinDirection = require_enum(cursor, "direction")?;
                req.append_attr_u32(pin_attr::DIRECTION, direction.raw());
            }
            "state" => {
                cursor.advance();
                let state: PinState = require_enum(cursor, "state")?;
                req.append_attr_u32(pin_attr::STATE, state.raw());
            }
            "phase-adjust" => {
                cursor.advance();
                req.append_attr_i32(
                    pin_attr::PHASE_ADJUST,
                    require_i32(cursor, "phase-adjust", "phase-adjust")?,
                );
            }
            "esync-frequency" => {
                cursor.advance();
                req.append_attr_u64(
                    pin_attr::ESYNC_FREQUENCY,
                    require_u64(cursor, "esync-frequency", "esync-frequency")?,
                );
            }
            "parent-device" => {
                cursor.advance();
                parse_parent_device_block(&mut req, cursor)?;
            }
            "parent-pin" => {
                cursor.advance();
                parse_pin_ref_block(
                    &mut req,
                    cursor,
                    "parent-pin",
                    pin_attr::PARENT_PIN,
                    pin_attr::PARENT_ID,
                )?;
            }
            "reference-sync" => {
                cursor.advance();
                parse_pin_ref_block(
                    &mut req,
                    cursor,
                    "reference-sync",
                    pin_attr::REFERENCE_SYNC,
                    pin_attr::ID,
                )?;
            }
            _ => return Err(Error::UnknownOption(keyword.to_string())),
        }
    }

    if !has_id {
        return Err(Error::RequiredAttribute {
            keyword: "pin id".into(),
        });
    }

    Ok(req)
}

async fn set(cursor: &mut TokenCursor<'_>) -> Result<()> {
    let conn = DpllConnection::connect().await?;
    let req = build_set_request(conn.family_id(), cursor)?;
    conn.execute(req).await
}

pub(crate) fn build_id_get_request(
    family_id: u16,
    cursor: &mut TokenCursor<'_>,
) -> Result<MessageBuilder> {
    let mut req = new_request(family_id, cmd::PIN_ID_GET);

    while let Some(keyword) = cursor.peek() {
        match keyword {
            "module-name" => {
                cursor.advance();
                req.append_attr_str(
                    pin_attr::MODULE_NAME,
                    require_value(cursor, "module-name")?,
                );
            }
            "clock-id" => {
                cursor.advance();
                req.append_attr_u64(
                    pin_attr::CLOCK_ID,
                    require_u64(cursor, "clock-id", "clock-id")?,
                );
            }
            "board-label" => {
                cursor.advance();
                req.append_attr_str(
                    pin_attr::BOARD_LABEL,
                    require_value(cursor, "board-label")?,
                );
            }
            "panel-label" => {
                cursor.advance();
                req.append_attr_str(
                    pin_attr::PANEL_LABEL,
                    require_value(cursor, "panel-label")?,
                );
            }
            "package-label" => {
                cursor.advance();
                req.append_attr_str(
                    pin_attr::PACKAGE_LABEL,
                    require_value(cursor, "package-label")?,
                );
            }
            "type" => {
                cursor.advance();
                let pin_type: PinType = require_enum(cursor, "type")?;
                req.append_attr_u32(pin_attr::TYPE, pin_type.raw());
            }
            _ => return Err(Error::UnknownOption(keyword.to_string())),
        }
    }

    Ok(req)
}

async fn id_get(
    cursor: &mut TokenCursor<'_>,
    format: OutputFormat,
    opts: &OutputOptions,
) -> Result<()> {
    let conn = DpllConnection::connect().await?;
    let req = build_id_get_request(conn.family_id(), cursor)?;
    let payloads = conn.transact(req).await?;

    let Some(payload) = payloads.first() else {
        return Ok(());
    };
    let pin = parse_pin(payload)?;

    match format {
        OutputFormat::Text => println!("{}", pin.id),
        OutputFormat::Json => {
            let mut stdout = std::io::stdout().lock();
            emit_json(&mut stdout, &serde_json::json!({ "id": pin.id }), opts)?;
        }
    }
    Ok(())
}
