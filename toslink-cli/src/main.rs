//! toslink CLI - interactive console for TOSLINK capture hardware.
//!
//! Run without arguments to list attached devices. Run with a device's
//! display name or serial number to open it and enter the command prompt:
//!
//! ```text
//! > status
//! Synchronized, Running, 4800 frames left
//! > read 0x0 16
//! 00000000: 00 01 02 03 ...
//! > quit
//! ```

use clap::Parser;
use console::style;
use env_logger::Env;
use log::debug;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::Duration;

use toslink::console::{execute, parse_line};
use toslink::{
    ConsoleCommand, NativeEnumerator, NativeTransport, Session, Transport, TransportEnumerator,
};

/// Interactive console for TOSLINK optical-audio capture hardware.
#[derive(Parser)]
#[command(name = "toslink")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Device to open, matched against display name or serial number.
    /// Omit to list attached devices.
    device: Option<String>,

    /// Transport read/write timeout in milliseconds.
    #[arg(long, default_value_t = 1000, value_name = "MS", env = "TOSLINK_TIMEOUT_MS")]
    timeout_ms: u64,

    /// Verbose output level (-v, -vv for increasing detail).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_target(cli.verbose >= 2)
        .format_timestamp(None)
        .init();

    debug!("toslink v{}", env!("CARGO_PKG_VERSION"));

    let devices = match NativeEnumerator::enumerate() {
        Ok(devices) => devices,
        Err(e) => {
            eprintln!("toslink: {e}");
            return ExitCode::FAILURE;
        },
    };

    let selected = cli
        .device
        .as_deref()
        .and_then(|selector| devices.iter().find(|d| d.matches(selector)));

    // No selector, or a selector matching nothing: list and leave.
    let Some(device) = selected else {
        println!("Found {} devices.", devices.len());
        for d in &devices {
            println!(
                "{}: {} ({}, {:08x})",
                d.index,
                style(&d.name).cyan(),
                d.serial,
                d.location
            );
        }
        return ExitCode::SUCCESS;
    };

    println!(
        "Using device {} ({}, {:08x})",
        style(&device.name).cyan(),
        device.serial,
        device.location
    );

    let timeout = Duration::from_millis(cli.timeout_ms);
    let mut transport = match NativeTransport::open(device, timeout) {
        Ok(transport) => transport,
        Err(e) => {
            println!("{e}");
            return ExitCode::from(1);
        },
    };

    if let Err(e) = transport.set_timeouts(timeout, timeout) {
        println!("{e}");
        let _ = transport.close();
        return ExitCode::from(1);
    }

    println!("Ready");

    let mut session = Session::new(transport);
    let code = run_console(&mut session);

    // Close on every exit path; nothing to do if it fails at this point.
    let _ = session.close();
    code
}

/// The blocking command loop: prompt, read, dispatch, repeat.
///
/// All errors inside the loop are local to one command; the loop only ends
/// on `exit`/`quit` or end of input.
fn run_console<T: Transport>(session: &mut Session<T>) -> ExitCode {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();

    loop {
        print!("> ");
        let _ = stdout.flush();

        line.clear();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {},
            Err(e) => {
                println!("Error: {e}");
                break;
            },
        }
        let line = line.trim_end_matches(['\r', '\n']);

        match parse_line(line) {
            Ok(Some(ConsoleCommand::Quit)) => break,
            Ok(Some(cmd)) => {
                if let Err(e) = execute(session, &cmd, &mut stdout) {
                    println!("{e}");
                }
            },
            Ok(None) => {}, // unrecognized input is silently ignored
            Err(e) => println!("{e}"),
        }
    }

    ExitCode::SUCCESS
}
