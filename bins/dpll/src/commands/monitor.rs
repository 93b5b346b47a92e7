//! `dpll monitor` - render notifications until cancelled.
//!
//! The loop polls the subscribed socket with a one second tick; SIGINT
//! and SIGTERM set a flag the loop reads on each tick, so cancellation
//! is observed within one tick even when no events arrive. In JSON mode
//! the `monitor` array is opened on entry and closed on every exit path.

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::signal;
use tokio::signal::unix::{SignalKind, signal as unix_signal};
use tokio_stream::StreamExt;

use dpll_nl::dpll::{DpllConnection, DpllEvent};
use dpll_nl::output::{OutputFormat, OutputOptions, Printable};
use dpll_nl::Result;

use crate::cursor::TokenCursor;

const POLL_TICK: Duration = Duration::from_secs(1);

pub fn print_help() {
    eprintln!("Usage: dpll monitor");
}

pub async fn run(
    cursor: &mut TokenCursor<'_>,
    format: OutputFormat,
    opts: &OutputOptions,
) -> Result<()> {
    if cursor.matches("help") {
        print_help();
        return Ok(());
    }

    let mut conn = DpllConnection::connect().await?;
    conn.subscribe_monitor()?;

    let cancel = Arc::new(AtomicBool::new(false));
    let mut sigterm = unix_signal(SignalKind::terminate())?;
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
            cancel.store(true, Ordering::Relaxed);
        });
    }

    let mut stdout = io::stdout().lock();
    let mut sink = EventSink::open(&mut stdout, format, *opts)?;

    let mut events = conn.events();
    let mut result = Ok(());

    while !cancel.load(Ordering::Relaxed) {
        match tokio::time::timeout(POLL_TICK, events.next()).await {
            // Tick: nothing received, re-check the cancellation flag.
            Err(_elapsed) => continue,
            Ok(None) => break,
            Ok(Some(Ok(event))) => sink.push(&event)?,
            Ok(Some(Err(e))) => {
                result = Err(e);
                break;
            }
        }
    }

    sink.close()?;
    result
}

/// Streams events to the output, wrapping them in a `monitor` JSON array
/// when requested.
struct EventSink<'a, W: Write> {
    w: &'a mut W,
    format: OutputFormat,
    opts: OutputOptions,
    count: usize,
}

impl<'a, W: Write> EventSink<'a, W> {
    fn open(w: &'a mut W, format: OutputFormat, opts: OutputOptions) -> io::Result<Self> {
        if format == OutputFormat::Json {
            if opts.pretty {
                writeln!(w, "{{\"monitor\": [")?;
            } else {
                write!(w, "{{\"monitor\":[")?;
            }
        }
        Ok(Self {
            w,
            format,
            opts,
            count: 0,
        })
    }

    fn push(&mut self, event: &DpllEvent) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                write!(self.w, "[{}] ", event.tag())?;
                match event {
                    DpllEvent::DeviceCreate(device)
                    | DpllEvent::DeviceChange(device)
                    | DpllEvent::DeviceDelete(device) => {
                        device.print_text(self.w, &self.opts)?;
                    }
                    DpllEvent::PinCreate(pin)
                    | DpllEvent::PinChange(pin)
                    | DpllEvent::PinDelete(pin) => {
                        pin.print_text(self.w, &self.opts)?;
                    }
                }
            }
            OutputFormat::Json => {
                let mut value = match event {
                    DpllEvent::DeviceCreate(device)
                    | DpllEvent::DeviceChange(device)
                    | DpllEvent::DeviceDelete(device) => device.to_json(),
                    DpllEvent::PinCreate(pin)
                    | DpllEvent::PinChange(pin)
                    | DpllEvent::PinDelete(pin) => pin.to_json(),
                };
                value["event"] = serde_json::json!(event.kind_name());

                if self.count > 0 {
                    if self.opts.pretty {
                        writeln!(self.w, ",")?;
                    } else {
                        write!(self.w, ",")?;
                    }
                }
                if self.opts.pretty {
                    serde_json::to_writer_pretty(&mut *self.w, &value)?;
                } else {
                    serde_json::to_writer(&mut *self.w, &value)?;
                }
            }
        }
        self.count += 1;
        self.w.flush()
    }

    fn close(self) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            if self.opts.pretty {
                writeln!(self.w, "\n]}}")?;
            } else {
                writeln!(self.w, "]}}")?;
            }
            self.w.flush()?;
        }
        Ok(())
    }
}
