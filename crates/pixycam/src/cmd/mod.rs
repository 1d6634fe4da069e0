use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand, ValueEnum};
use pixycam_session::{connect_with_config, BridgeSession, SessionConfig};
use pixycam_transport::LinkConfig;
use tracing::debug;

use crate::exit::{session_error, CliResult};
use crate::output::OutputFormat;

pub mod blocks;
pub mod error;
pub mod frame;
pub mod get;
pub mod set;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show firmware version (or client build info with --client).
    Version(VersionArgs),
    /// Poll detected objects.
    Blocks(BlocksArgs),
    /// Grab a raw frame, optionally saving it.
    Frame(FrameArgs),
    /// Read a camera, servo or LED setting.
    Get(GetArgs),
    /// Change a camera, servo or LED setting.
    Set(SetArgs),
    /// Describe a status code.
    Error(ErrorArgs),
}

/// Where and how to reach the bridge.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub socket: PathBuf,
    pub timeout: Duration,
}

impl ConnectOptions {
    pub fn connect(&self) -> CliResult<BridgeSession> {
        let link_config = LinkConfig {
            read_timeout: Some(self.timeout),
            write_timeout: Some(self.timeout),
            ..LinkConfig::default()
        };
        debug!(socket = %self.socket.display(), timeout = ?self.timeout, "connecting");
        connect_with_config(&self.socket, link_config, SessionConfig::default())
            .map_err(|err| session_error("connect failed", err))
    }
}

pub fn run(command: Command, conn: &ConnectOptions, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Version(args) => version::run(args, conn, format),
        Command::Blocks(args) => blocks::run(args, conn, format),
        Command::Frame(args) => frame::run(args, conn, format),
        Command::Get(args) => get::run(args, conn, format),
        Command::Set(args) => set::run(args, conn, format),
        Command::Error(args) => error::run(args, format),
    }
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show this client's build info instead of asking the device.
    #[arg(long)]
    pub client: bool,
}

#[derive(Args, Debug)]
pub struct BlocksArgs {
    /// Maximum number of blocks per poll.
    #[arg(long, default_value = "25")]
    pub max: u16,
    /// Keep polling until interrupted.
    #[arg(long)]
    pub watch: bool,
    /// Poll interval for --watch (e.g. 100ms, 1s).
    #[arg(long, default_value = "100ms", value_parser = parse_duration)]
    pub interval: Duration,
}

#[derive(Args, Debug)]
pub struct FrameArgs {
    /// Capture mode (decimal or 0x-prefixed hex).
    #[arg(long, default_value = "0x21", value_parser = parse_u8)]
    pub mode: u8,
    #[arg(long, default_value = "0")]
    pub x: u16,
    #[arg(long, default_value = "0")]
    pub y: u16,
    #[arg(long, default_value = "320")]
    pub width: u16,
    #[arg(long, default_value = "200")]
    pub height: u16,
    /// Write the demosaiced image as binary PPM.
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
    /// Write the raw pixel bytes.
    #[arg(long, value_name = "FILE")]
    pub raw: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Setting {
    AutoWhiteBalance,
    AutoExposure,
    Brightness,
    Exposure,
    WhiteBalance,
    CameraMode,
    Servo,
    ServoFrequency,
    Led,
    LedMaxCurrent,
}

impl Setting {
    pub fn name(self) -> &'static str {
        match self {
            Setting::AutoWhiteBalance => "auto-white-balance",
            Setting::AutoExposure => "auto-exposure",
            Setting::Brightness => "brightness",
            Setting::Exposure => "exposure",
            Setting::WhiteBalance => "white-balance",
            Setting::CameraMode => "camera-mode",
            Setting::Servo => "servo",
            Setting::ServoFrequency => "servo-frequency",
            Setting::Led => "led",
            Setting::LedMaxCurrent => "led-max-current",
        }
    }
}

#[derive(Args, Debug)]
pub struct GetArgs {
    pub setting: Setting,
    /// Servo channel, for `get servo`.
    #[arg(long, default_value = "0")]
    pub channel: u8,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    pub setting: Setting,
    /// New value(s): `on`/`off`, a number, `R G B`, `GAIN COMP` or `CHANNEL POSITION`.
    #[arg(required = true, num_args = 1..=3)]
    pub values: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ErrorArgs {
    /// Status code, e.g. -151.
    #[arg(allow_negative_numbers = true)]
    pub code: i32,
}

/// Parse `150ms`, `5s` or a bare number of seconds.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| format!("invalid duration: {input:?}"))?;
    if value == 0 {
        return Err("duration must be greater than zero".to_string());
    }
    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}

/// Parse a byte in decimal or `0x` hex.
pub fn parse_u8(input: &str) -> Result<u8, String> {
    let parsed = match input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => input.parse(),
    };
    parsed.map_err(|_| format!("expected a byte value, got {input:?}"))
}
