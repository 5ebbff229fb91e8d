//! Pipe transport for a stack: one command per stdin line, one reply per
//! stdout line.
//!
//! ```text
//! write <hex>          push the encoded units     -> ok <bytes consumed>
//! read <bytes>         pop up to bytes/4 units    -> ok <hex>
//! resize <n>           change capacity            -> ok 0
//! ioctl <cmd> <arg>    numeric control command    -> ok 0
//! stat                 current fill               -> ok <len> <capacity>
//! ```
//!
//! Failures reply `err <errno> <message>`.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{LevelFilter, info};

use stackdev::control::RESIZE_VERB;
use stackdev::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "stackdev", version, about = "Serve a bounded i32 stack over stdin/stdout")]
struct Args {
    /// Initial capacity in units (overrides STACKDEV_CAPACITY)
    #[arg(long)]
    capacity: Option<usize>,

    /// Largest capacity a resize may request (overrides STACKDEV_MAX_CAPACITY)
    #[arg(long)]
    max_capacity: Option<usize>,

    /// Enable debug logging on stderr
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let mut builder =
        env_logger::Builder::from_env(Env::default().default_filter_or(default_level.as_str()));
    builder.format_timestamp_millis();
    let _ = builder.try_init();
}

fn load_config(args: &Args) -> Result<StackConfig> {
    let mut config = StackConfig::from_env().context("reading stack configuration")?;
    if let Some(capacity) = args.capacity {
        config.capacity = capacity;
    }
    if args.max_capacity.is_some() {
        config.max_capacity = args.max_capacity;
    }
    config.validate()?;
    Ok(config)
}

fn parse_number(raw: &str) -> Option<u64> {
    match raw.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    }
}

fn reply<T: std::fmt::Display>(result: Result<T, StackError>) -> String {
    match result {
        Ok(value) => format!("ok {value}"),
        Err(err) => format!("err {} {err}", err.errno()),
    }
}

fn handle_line(dev: &StackDevice, line: &str) -> Option<String> {
    let mut words = line.split_whitespace();
    let verb = words.next()?;
    let args: Vec<&str> = words.collect();

    let response = match (verb, args.as_slice()) {
        ("write", [payload]) => match hex::decode(payload) {
            Ok(bytes) => reply(write_bytes(dev.stack(), &bytes)),
            Err(_) => reply::<usize>(Err(StackError::InvalidArgument)),
        },
        ("read", [requested]) => match requested.parse::<usize>() {
            Ok(requested) => reply(read_bytes(dev.stack(), requested).map(hex::encode)),
            Err(_) => reply::<String>(Err(StackError::InvalidArgument)),
        },
        (RESIZE_VERB, _) => reply(
            ControlCommand::parse(line)
                .and_then(|cmd| cmd.apply(dev.stack()))
                .map(|()| 0),
        ),
        ("ioctl", [cmd, arg]) => {
            let cmd = parse_number(cmd).and_then(|c| u32::try_from(c).ok());
            match (cmd, parse_number(arg)) {
                (Some(cmd), Some(arg)) => reply(dev.ioctl(cmd, arg).map(|()| 0)),
                _ => reply::<i32>(Err(StackError::InvalidArgument)),
            }
        }
        ("stat", []) => {
            let (len, capacity) = dev.stack().with_locked(|s| (s.len(), s.capacity()));
            format!("ok {len} {capacity}")
        }
        _ => reply::<i32>(Err(StackError::InvalidArgument)),
    };
    Some(response)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(&args)?;
    let stack = config
        .build()
        .with_context(|| format!("allocating stack of {} units", config.capacity))?;
    info!("serving stack with capacity {}", config.capacity);

    let dev = StackDevice::new(stack);
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if let Some(response) = handle_line(&dev, &line) {
            writeln!(stdout, "{response}")?;
            stdout.flush()?;
        }
    }
    Ok(())
}
