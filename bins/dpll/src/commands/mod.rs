//! Object-level command dispatch and shared executor helpers.

use std::io::{self, Write};
use std::str::FromStr;

use dpll_nl::output::{OutputFormat, OutputOptions, Printable};
use dpll_nl::util::parse::{parse_i32, parse_u32, parse_u64};
use dpll_nl::{Error, Result};

use crate::cursor::TokenCursor;

pub mod device;
pub mod monitor;
pub mod pin;

pub fn usage() {
    eprintln!("Usage: dpll [ OPTIONS ] OBJECT {{ COMMAND | help }}");
    eprintln!("       dpll [ -j[son] ] [ -p[retty] ]");
    eprintln!("where  OBJECT := {{ device | pin | monitor }}");
    eprintln!("       OPTIONS := {{ -V[ersion] | -j[son] | -p[retty] }}");
}

/// Dispatch the token stream to an object handler.
///
/// Help requests never reach the transport: each object handler prints
/// its usage before any connection is attempted, and the top-level help
/// path returns here immediately.
pub async fn run(tokens: &[String], format: OutputFormat, opts: &OutputOptions) -> Result<()> {
    let mut cursor = TokenCursor::new(tokens);

    if cursor.is_empty() || cursor.matches("help") {
        usage();
        return Ok(());
    }

    if cursor.take_if("device") {
        device::run(&mut cursor, format, opts).await
    } else if cursor.take_if("pin") {
        pin::run(&mut cursor, format, opts).await
    } else if cursor.take_if("monitor") {
        monitor::run(&mut cursor, format, opts).await
    } else {
        usage();
        Err(Error::UnknownCommand(
            cursor.peek().unwrap_or_default().to_string(),
        ))
    }
}

/// Take the value token following `keyword`.
pub(crate) fn require_value<'a>(cursor: &mut TokenCursor<'a>, keyword: &str) -> Result<&'a str> {
    cursor.take().ok_or_else(|| Error::MissingArgument {
        keyword: keyword.to_string(),
    })
}

pub(crate) fn require_u32(cursor: &mut TokenCursor<'_>, keyword: &str, what: &str) -> Result<u32> {
    let value = require_value(cursor, keyword)?;
    parse_u32(value).map_err(|_| Error::InvalidArgument {
        what: what.to_string(),
        value: value.to_string(),
    })
}

pub(crate) fn require_u64(cursor: &mut TokenCursor<'_>, keyword: &str, what: &str) -> Result<u64> {
    let value = require_value(cursor, keyword)?;
    parse_u64(value).map_err(|_| Error::InvalidArgument {
        what: what.to_string(),
        value: value.to_string(),
    })
}

pub(crate) fn require_i32(cursor: &mut TokenCursor<'_>, keyword: &str, what: &str) -> Result<i32> {
    let value = require_value(cursor, keyword)?;
    parse_i32(value).map_err(|_| Error::InvalidArgument {
        what: what.to_string(),
        value: value.to_string(),
    })
}

/// Take and strictly parse an enum label.
pub(crate) fn require_enum<T>(cursor: &mut TokenCursor<'_>, keyword: &str) -> Result<T>
where
    T: FromStr<Err = Error>,
{
    require_value(cursor, keyword)?.parse()
}

/// Render a single entity: bare text, or a top-level JSON object.
pub(crate) fn emit_entity<P: Printable>(
    entity: &P,
    format: OutputFormat,
    opts: &OutputOptions,
) -> Result<()> {
    let mut stdout = io::stdout().lock();
    entity.print(&mut stdout, format, opts)?;
    Ok(())
}

/// Render a dump: one text block per entity, or `{key: [..]}` in JSON.
pub(crate) fn emit_list<P: Printable>(
    key: &str,
    items: &[P],
    format: OutputFormat,
    opts: &OutputOptions,
) -> Result<()> {
    let mut stdout = io::stdout().lock();
    match format {
        OutputFormat::Text => {
            for item in items {
                item.print_text(&mut stdout, opts)?;
            }
        }
        OutputFormat::Json => {
            let entries: Vec<_> = items.iter().map(Printable::to_json).collect();
            let value = serde_json::json!({ key: entries });
            emit_json(&mut stdout, &value, opts)?;
        }
    }
    Ok(())
}

pub(crate) fn emit_json<W: Write>(
    w: &mut W,
    value: &serde_json::Value,
    opts: &OutputOptions,
) -> io::Result<()> {
    if opts.pretty {
        serde_json::to_writer_pretty(&mut *w, value)?;
    } else {
        serde_json::to_writer(&mut *w, value)?;
    }
    writeln!(w)
}
