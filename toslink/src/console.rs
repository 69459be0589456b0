//! Operator console: line parsing, command execution, output rendering.
//!
//! One line of operator text maps to one [`ConsoleCommand`]. The tokenizer
//! produces a tagged variant so dispatch is an exhaustive match; lines that
//! match no verb parse to `None` and are silently ignored, which keeps the
//! prompt forgiving of typos.
//!
//! Numeric arguments follow C numeric-literal conventions: `0x` prefix for
//! hexadecimal, a leading `0` for octal, decimal otherwise.
//!
//! `read` and `save` deliberately disagree about bad counts: `read` is an
//! exploratory tool and quietly substitutes [`DEFAULT_READ_WORDS`], while
//! `save` refuses rather than write an empty or oversized file.

use {
    crate::{
        error::{Error, Result},
        protocol::{DEFAULT_READ_WORDS, DeviceStatus, MAX_TRANSFER, WORD_SIZE},
        session::Session,
        transport::{PurgeMask, Transport},
    },
    log::debug,
    std::{fmt::Write as _, fs, io::Write},
};

/// One parsed operator command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// `exit` or `quit`: leave the console.
    Quit,
    /// `purge [rx|tx|all]`: clear transport buffers.
    Purge(PurgeMask),
    /// `read <address> <count>`: hex-dump device memory.
    Read {
        /// Word address to read from.
        addr: u32,
        /// Word count, already normalized to a valid transfer size.
        count: u32,
    },
    /// `save <address> <count> <filename>`: dump device memory to a file.
    Save {
        /// Word address to read from.
        addr: u32,
        /// Word count, validated strictly.
        count: u32,
        /// Output path; the remainder of the line, spaces included.
        path: String,
    },
    /// `capture <count>`: start a capture.
    Capture {
        /// Number of frames to capture.
        count: u32,
    },
    /// `status`: print the synchronization/progress line.
    Status,
    /// `chstatus`: print the raw channel status bytes.
    ChannelStatus,
}

/// Split the next whitespace-delimited token off `input`.
fn split_token(input: &str) -> (Option<&str>, &str) {
    let s = input.trim_start();
    if s.is_empty() {
        return (None, s);
    }
    match s.find(char::is_whitespace) {
        Some(i) => (Some(&s[..i]), &s[i..]),
        None => (Some(s), ""),
    }
}

/// Parse an unsigned integer with C numeric-literal base prefixes.
fn parse_number(token: &str) -> Option<u32> {
    if let Some(hex) = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()
    } else if token.len() > 1 && token.starts_with('0') {
        u32::from_str_radix(&token[1..], 8).ok()
    } else {
        token.parse().ok()
    }
}

/// True when `count` words fit the accumulation buffer.
fn count_in_range(count: u32) -> bool {
    count != 0 && u64::from(count) * WORD_SIZE as u64 <= MAX_TRANSFER as u64
}

fn syntax(msg: &str) -> Error {
    Error::Syntax(msg.to_string())
}

/// Parse one line of operator input.
///
/// Returns `Ok(None)` for empty and unrecognized lines, which the loop
/// ignores without comment. `Err(Error::Syntax)` carries the complete
/// one-line diagnostic for a recognized verb with bad arguments.
pub fn parse_line(line: &str) -> Result<Option<ConsoleCommand>> {
    let (verb, rest) = split_token(line);
    let Some(verb) = verb else {
        return Ok(None);
    };
    let rest = rest.trim_start();

    match verb {
        // Zero-argument verbs take the whole line; trailing text means the
        // line matches nothing and is ignored like any other unknown input.
        "exit" | "quit" if rest.is_empty() => Ok(Some(ConsoleCommand::Quit)),
        "status" if rest.is_empty() => Ok(Some(ConsoleCommand::Status)),
        "chstatus" if rest.is_empty() => Ok(Some(ConsoleCommand::ChannelStatus)),
        "purge" => {
            let mask = match rest {
                "" | "all" => PurgeMask::ALL,
                "rx" => PurgeMask::RX,
                "tx" => PurgeMask::TX,
                // Unrecognized sub-argument purges nothing but still
                // succeeds. Longstanding behavior, kept as-is.
                _ => PurgeMask::NONE,
            };
            Ok(Some(ConsoleCommand::Purge(mask)))
        },
        "read" => {
            let (addr_tok, rest) = split_token(rest);
            let addr = addr_tok
                .and_then(parse_number)
                .ok_or_else(|| syntax("Syntax error - expected address"))?;

            let (count_tok, _) = split_token(rest);
            let count = match count_tok.and_then(parse_number) {
                Some(c) if count_in_range(c) => c,
                _ => DEFAULT_READ_WORDS,
            };

            Ok(Some(ConsoleCommand::Read { addr, count }))
        },
        "save" => {
            let (addr_tok, rest) = split_token(rest);
            let addr = addr_tok
                .and_then(parse_number)
                .ok_or_else(|| syntax("Syntax error - expected address"))?;

            let (count_tok, rest) = split_token(rest);
            let count = count_tok
                .and_then(parse_number)
                .ok_or_else(|| syntax("Syntax error - expected count"))?;
            if count == 0 {
                return Err(syntax("No bytes to save"));
            }
            if !count_in_range(count) {
                return Err(syntax("Too many bytes to save"));
            }

            let path = rest.trim();
            if path.is_empty() {
                return Err(syntax("Syntax error - expected filename"));
            }

            Ok(Some(ConsoleCommand::Save {
                addr,
                count,
                path: path.to_string(),
            }))
        },
        "capture" => {
            let (count_tok, _) = split_token(rest);
            let count = count_tok
                .and_then(parse_number)
                .ok_or_else(|| syntax("Syntax error"))?;
            Ok(Some(ConsoleCommand::Capture { count }))
        },
        _ => Ok(None),
    }
}

/// Render a hex dump: 16 bytes per line, each line prefixed with the
/// 8-digit hex address of its first byte.
pub fn hex_dump(addr: u32, data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 3 + data.len() / 16 * 11);
    for (n, chunk) in data.chunks(16).enumerate() {
        if n != 0 {
            out.push('\n');
        }
        #[allow(clippy::cast_possible_truncation)] // transfers are bounded well below u32::MAX
        let line_addr = addr.wrapping_add((n * 16) as u32);
        let _ = write!(out, "{line_addr:08x}:");
        for byte in chunk {
            let _ = write!(out, " {byte:02x}");
        }
    }
    out
}

/// Render the status line.
pub fn format_status(status: &DeviceStatus) -> String {
    format!(
        "{}, {}, {} frames left",
        if status.synchronized { "Synchronized" } else { "LOS" },
        if status.done { "Done" } else { "Running" },
        status.frames_left
    )
}

/// Render channel status bytes as space-separated two-digit hex.
pub fn format_channel_status(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 3);
    for (n, byte) in data.iter().enumerate() {
        if n != 0 {
            out.push(' ');
        }
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Execute one parsed command against the session, writing any result to
/// `out`.
///
/// Errors are returned for the loop to report; nothing is printed to `out`
/// for a failed command, so an aborted bulk transfer leaves no partial dump
/// and no partial file.
pub fn execute<T: Transport, W: Write>(
    session: &mut Session<T>,
    cmd: &ConsoleCommand,
    out: &mut W,
) -> Result<()> {
    debug!("executing {cmd:?}");
    match cmd {
        ConsoleCommand::Quit => Ok(()),
        ConsoleCommand::Purge(mask) => {
            session.purge(*mask)?;
            writeln!(out, "OK")?;
            Ok(())
        },
        ConsoleCommand::Read { addr, count } => {
            let data = session.read_memory(*addr, *count)?;
            let dump = hex_dump(*addr, data);
            writeln!(out, "{dump}")?;
            Ok(())
        },
        ConsoleCommand::Save { addr, count, path } => {
            let data = session.read_memory(*addr, *count)?;
            fs::write(path, data).map_err(Error::File)?;
            Ok(())
        },
        ConsoleCommand::Capture { count } => {
            session.capture(*count)?;
            writeln!(out, "Capture started")?;
            Ok(())
        },
        ConsoleCommand::Status => {
            let status = session.status()?;
            writeln!(out, "{}", format_status(&status))?;
            Ok(())
        },
        ConsoleCommand::ChannelStatus => {
            let raw = session.channel_status()?;
            writeln!(out, "{}", format_channel_status(&raw))?;
            Ok(())
        },
    }
}
