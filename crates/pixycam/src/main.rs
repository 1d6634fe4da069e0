mod cmd;
mod exit;
mod logging;
mod output;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::cmd::{parse_duration, Command, ConnectOptions};
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "pixycam", version, about = "Pixy vision sensor client")]
struct Cli {
    /// Bridge socket path.
    #[arg(
        long,
        value_name = "PATH",
        env = "PIXYCAM_SOCKET",
        default_value = "/tmp/pixycam.sock",
        global = true
    )]
    socket: PathBuf,

    /// Read/write timeout on the bridge link (e.g. 500ms, 5s).
    #[arg(long, value_name = "DURATION", default_value = "5s", value_parser = parse_duration, global = true)]
    timeout: Duration,

    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let conn = ConnectOptions {
        socket: cli.socket,
        timeout: cli.timeout,
    };

    match cmd::run(cli.command, &conn, format) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::Setting;

    #[test]
    fn parses_blocks_with_globals() {
        let cli = Cli::try_parse_from([
            "pixycam",
            "blocks",
            "--max",
            "10",
            "--socket",
            "/tmp/bridge.sock",
            "--timeout",
            "250ms",
        ])
        .expect("blocks args should parse");

        assert_eq!(cli.socket, PathBuf::from("/tmp/bridge.sock"));
        assert_eq!(cli.timeout, Duration::from_millis(250));
        match cli.command {
            Command::Blocks(args) => {
                assert_eq!(args.max, 10);
                assert!(!args.watch);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_frame_defaults() {
        let cli = Cli::try_parse_from(["pixycam", "frame"]).expect("frame args should parse");
        match cli.command {
            Command::Frame(args) => {
                assert_eq!(args.mode, 0x21);
                assert_eq!((args.width, args.height), (320, 200));
                assert!(args.output.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_set_with_several_values() {
        let cli = Cli::try_parse_from(["pixycam", "set", "led", "255", "0", "0"])
            .expect("set args should parse");
        match cli.command {
            Command::Set(args) => {
                assert_eq!(args.setting, Setting::Led);
                assert_eq!(args.values, ["255", "0", "0"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn error_accepts_negative_code() {
        let cli = Cli::try_parse_from(["pixycam", "error", "-151"]).expect("error should parse");
        assert!(matches!(cli.command, Command::Error(ref args) if args.code == -151));
    }

    #[test]
    fn set_requires_a_value() {
        let err = Cli::try_parse_from(["pixycam", "set", "brightness"])
            .expect_err("missing value should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }
}
