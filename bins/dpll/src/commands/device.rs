//! `dpll device` subcommands.

use dpll_nl::dpll::connection::{DpllConnection, new_request};
use dpll_nl::dpll::enums::DeviceType;
use dpll_nl::dpll::parse::parse_device;
use dpll_nl::dpll::uapi::{cmd, device_attr};
use dpll_nl::netlink::MessageBuilder;
use dpll_nl::output::{OutputFormat, OutputOptions};
use dpll_nl::{Error, Result};

use super::{emit_entity, emit_json, emit_list, require_enum, require_u32, require_u64,
    require_value};
use crate::cursor::TokenCursor;

pub fn print_help() {
    eprintln!("Usage: dpll device show [ id DEVICE_ID ]");
    eprintln!("       dpll device set id DEVICE_ID [ phase-offset-monitor {{ true | false }} ]");
    eprintln!("                                    [ phase-offset-avg-factor NUM ]");
    eprintln!(
        "       dpll device id-get [ module-name NAME ] [ clock-id ID ] [ type {{ pps | eec }} ]"
    );
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

fn parse_show_args(cursor: &mut TokenCursor<'_>) -> Result<Option<u32>> {
    let mut id = None;
    while let Some(keyword) = cursor.peek() {
        match keyword {
            "id" => {
                cursor.advance();
                id = Some(require_u32(cursor, "id", "device id")?);
            }
            _ => return Err(Error::UnknownOption(keyword.to_string())),
        }
    }
    Ok(id)
}

async fn show(
    cursor: &mut TokenCursor<'_>,
    format: OutputFormat,
    opts: &OutputOptions,
) -> Result<()> {
    let conn = DpllConnection::connect().await?;
    match parse_show_args(cursor)? {
        Some(id) => {
            let device = conn.device(id).await?;
            emit_entity(&device, format, opts)
        }
        None => {
            let devices = conn.devices().await?;
            emit_list("device", &devices, format, opts)
        }
    }
}

pub(crate) fn build_set_request(
    family_id: u16,
    cursor: &mut TokenCursor<'_>,
) -> Result<MessageBuilder> {
    let mut req = new_request(family_id, cmd::DEVICE_SET);
    let mut has_id = false;

    while let Some(keyword) = cursor.peek() {
        match keyword {
            "id" => {
                cursor.advance();
                req.append_attr_u32(device_attr::ID, require_u32(cursor, "id", "device id")?);
                has_id = true;
            }
            "phase-offset-monitor" => {
                cursor.advance();
                let value = require_value(cursor, "phase-offset-monitor")?;
                let state = match value {
                    "true" | "1" => 1u32,
                    "false" | "0" => 0u32,
                    _ => {
                        return Err(Error::InvalidArgument {
                            what: "phase-offset-monitor".into(),
                            value: value.into(),
                        });
                    }
                };
                req.append_attr_u32(device_attr::PHASE_OFFSET_MONITOR, state);
            }
            "phase-offset-avg-factor" => {
                cursor.advance();
                req.append_attr_u32(
                    device_attr::PHASE_OFFSET_AVG_FACTOR,
                    require_u32(
                        cursor,
                        "phase-offset-avg-factor",
                        "phase-offset-avg-factor",
                    )?,
                );
            }
            _ => return Err(Error::UnknownOption(keyword.to_string())),
        }
    }

    if !has_id {
        return Err(Error::RequiredAttribute {
            keyword: "device id".into(),
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
    let mut req = new_request(family_id, cmd::DEVICE_ID_GET);

    while let Some(keyword) = cursor.peek() {
        match keyword {
            "module-name" => {
                cursor.advance();
                req.append_attr_str(
                    device_attr::MODULE_NAME,
                    require_value(cursor, "module-name")?,
                );
            }
            "clock-id" => {
                cursor.advance();
                req.append_attr_u64(
                    device_attr::CLOCK_ID,
                    require_u64(cursor, "clock-id", "clock-id")?,
                );
            }
            "type" => {
                cursor.advance();
                let device_type: DeviceType = require_enum(cursor, "type")?;
                req.append_attr_u32(device_attr::TYPE, device_type.raw());
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
    let device = parse_device(payload)?;

    match format {
        OutputFormat::Text => println!("{}", device.id),
        OutputFormat::Json => {
            let mut stdout = std::io::stdout().lock();
            emit_json(&mut stdout, &serde_json::json!({ "id": device.id }), opts)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpll_nl::netlink::NLMSG_HDRLEN;
    use dpll_nl::netlink::attr::{AttrIter, get};
    use dpll_nl::netlink::genl::GENL_HDRLEN;

    const FAMILY: u16 = 0x23;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn attrs(msg: &[u8]) -> Vec<(u16, Vec<u8>)> {
        AttrIter::new(&msg[NLMSG_HDRLEN + GENL_HDRLEN..])
            .map(|(ty, payload)| (ty, payload.to_vec()))
            .collect()
    }

    #[test]
    fn test_set_request_attrs() {
        let tokens = tokens(&["id", "0", "phase-offset-monitor", "true"]);
        let mut cursor = TokenCursor::new(&tokens);
        let req = build_set_request(FAMILY, &mut cursor).unwrap();
        let msg = req.finish();

        let attrs = attrs(&msg);
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].0, device_attr::ID);
        assert_eq!(get::u32_ne(&attrs[0].1).unwrap(), 0);
        assert_eq!(attrs[1].0, device_attr::PHASE_OFFSET_MONITOR);
        assert_eq!(get::u32_ne(&attrs[1].1).unwrap(), 1);
    }

    #[test]
    fn test_set_requires_id() {
        let tokens = tokens(&["phase-offset-avg-factor", "5"]);
        let mut cursor = TokenCursor::new(&tokens);
        assert!(matches!(
            build_set_request(FAMILY, &mut cursor),
            Err(Error::RequiredAttribute { .. })
        ));
    }

    #[test]
    fn test_set_keyword_without_value() {
        let tokens = tokens(&["id"]);
        let mut cursor = TokenCursor::new(&tokens);
        assert!(matches!(
            build_set_request(FAMILY, &mut cursor),
            Err(Error::MissingArgument { .. })
        ));
    }

    #[test]
    fn test_set_rejects_bad_bool() {
        let tokens = tokens(&["id", "0", "phase-offset-monitor", "maybe"]);
        let mut cursor = TokenCursor::new(&tokens);
        assert!(matches!(
            build_set_request(FAMILY, &mut cursor),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_id_get_request_attrs() {
        let tokens = tokens(&["module-name", "ice", "clock-id", "0x11", "type", "pps"]);
        let mut cursor = TokenCursor::new(&tokens);
        let req = build_id_get_request(FAMILY, &mut cursor).unwrap();
        let msg = req.finish();

        let attrs = attrs(&msg);
        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs[0].0, device_attr::MODULE_NAME);
        assert_eq!(attrs[0].1, b"ice\0");
        assert_eq!(attrs[1].0, device_attr::CLOCK_ID);
        assert_eq!(get::u64_ne(&attrs[1].1).unwrap(), 17);
        assert_eq!(attrs[2].0, device_attr::TYPE);
        assert_eq!(get::u32_ne(&attrs[2].1).unwrap(), 1);
    }

    #[test]
    fn test_id_get_rejects_unknown_type() {
        let tokens = tokens(&["type", "quartz"]);
        let mut cursor = TokenCursor::new(&tokens);
        assert!(matches!(
            build_id_get_request(FAMILY, &mut cursor),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_show_args() {
        let with_id = tokens(&["id", "3"]);
        let mut cursor = TokenCursor::new(&with_id);
        assert_eq!(parse_show_args(&mut cursor).unwrap(), Some(3));

        let empty: Vec<String> = Vec::new();
        let mut cursor = TokenCursor::new(&empty);
        assert_eq!(parse_show_args(&mut cursor).unwrap(), None);

        let bad = tokens(&["frequency", "1"]);
        let mut cursor = TokenCursor::new(&bad);
        assert!(matches!(
            parse_show_args(&mut cursor),
            Err(Error::UnknownOption(_))
        ));
    }
}
