mod exit;
mod logging;

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use bytes::Bytes;
use clap::{ArgGroup, Parser};
use tracing::{debug, warn};
use v4link::constants::DEFAULT_BAUD_RATE;
use v4link::{Command, Frame, LinkSession, Program};

use crate::logging::{LogLevel, init_logging};

#[derive(Parser, Debug)]
#[command(name = "v4link-send", version, about = "Send V4-link commands to a device")]
#[command(group(
    ArgGroup::new("commands")
        .required(true)
        .multiple(true)
        .args(["ping", "exec", "reset"])
))]
struct Cli {
    /// Serial device path, or tcp://host:port for a network serial bridge.
    #[arg(short, long, value_name = "TARGET", env = "V4LINK_PORT")]
    port: String,

    /// Line rate (serial targets only).
    #[arg(short, long, value_name = "BAUD", default_value_t = DEFAULT_BAUD_RATE)]
    baud: u32,

    /// Response timeout in seconds.
    #[arg(
        short,
        long,
        value_name = "SECONDS",
        default_value = "2.0",
        value_parser = parse_timeout
    )]
    timeout: Duration,

    /// Send PING.
    #[arg(long)]
    ping: bool,

    /// Send the raw bytecode in FILE with EXEC.
    #[arg(long, value_name = "FILE")]
    exec: Option<PathBuf>,

    /// Send RESET.
    #[arg(long)]
    reset: bool,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    log_level: LogLevel,
}

fn parse_timeout(s: &str) -> Result<Duration, String> {
    let secs: f64 = s
        .parse()
        .map_err(|_| format!("`{s}` is not a number of seconds"))?;

    let timeout = Duration::try_from_secs_f64(secs)
        .map_err(|e| format!("invalid timeout {s}: {e}"))?;

    if timeout.is_zero() {
        return Err(format!("timeout must be positive, got {s}"));
    }

    Ok(timeout)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Ping,
    Exec(PathBuf),
    Reset,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Ping => write!(f, "PING"),
            Step::Exec(path) => write!(f, "EXEC {}", path.display()),
            Step::Reset => write!(f, "RESET"),
        }
    }
}

impl Cli {
    /// Requested commands, always ping then exec then reset
    fn steps(&self) -> Vec<Step> {
        let mut steps = Vec::new();
        if self.ping {
            steps.push(Step::Ping);
        }
        if let Some(path) = &self.exec {
            steps.push(Step::Exec(path.clone()));
        }
        if self.reset {
            steps.push(Step::Reset);
        }
        steps
    }
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            let _ = err.print();
            std::process::exit(exit::FAILURE);
        }
    };
    init_logging(cli.log_level);

    match run(&cli).await {
        Ok(all_ok) => std::process::exit(exit::code(all_ok)),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(exit::FAILURE);
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<bool> {
    let mut link = LinkSession::open_target(&cli.port, cli.baud)
        .with_context(|| format!("invalid target `{}`", cli.port))?
        .with_timeout(cli.timeout);

    link.connect()
        .await
        .with_context(|| format!("failed to open {}", cli.port))?;

    println!("Connected to {}", cli.port);

    let mut all_ok = true;
    for step in cli.steps() {
        all_ok &= run_step(&mut link, &step).await;
    }

    if let Err(e) = link.disconnect().await {
        warn!("Failed to close {}: {}", cli.port, e);
    }

    Ok(all_ok)
}

/// Run one command, report it on stdout, and say whether the device answered OK
async fn run_step(link: &mut LinkSession, step: &Step) -> bool {
    let (command, payload) = match step {
        Step::Ping => (Command::Ping, Bytes::new()),
        Step::Exec(path) => match Program::from_file(path) {
            Ok(program) => {
                debug!("Program:\n{}", program.disassemble());
                (Command::Exec, program.bytes())
            }
            Err(e) => {
                eprintln!("{step}: {e}");
                return false;
            }
        },
        Step::Reset => (Command::Reset, Bytes::new()),
    };

    if let Ok(frame) = Frame::new(command, payload.clone()) {
        println!("{step}");
        println!("  sent:     {}", hex::encode(frame.encode()));
    }

    let timeout = link.timeout();
    match link.send(command, payload, timeout).await {
        Ok(status) => {
            println!("  received: {}", hex::encode(link.last_received()));
            println!("  status:   {status}");
            status.is_ok()
        }
        Err(e) => {
            eprintln!("{step}: {e}");
            false
        }
    }
}
