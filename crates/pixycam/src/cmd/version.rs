use serde::Serialize;

use crate::cmd::{ConnectOptions, VersionArgs};
use crate::exit::{session_error, CliResult, SUCCESS};
use crate::output::{print_report, OutputFormat, Report};

#[derive(Serialize)]
struct FirmwareOutput {
    firmware: String,
    major: u16,
    minor: u16,
    build: u16,
}

impl Report for FirmwareOutput {
    fn table(&self) -> (Vec<&'static str>, Vec<Vec<String>>) {
        (
            vec!["MAJOR", "MINOR", "BUILD"],
            vec![vec![
                self.major.to_string(),
                self.minor.to_string(),
                self.build.to_string(),
            ]],
        )
    }

    fn pretty(&self) -> String {
        format!("Pixy firmware {}", self.firmware)
    }

    fn raw(&self) -> String {
        self.firmware.clone()
    }
}

#[derive(Serialize)]
struct ClientOutput {
    name: &'static str,
    version: &'static str,
    target: &'static str,
    profile: &'static str,
    os: &'static str,
    arch: &'static str,
}

impl Report for ClientOutput {
    fn table(&self) -> (Vec<&'static str>, Vec<Vec<String>>) {
        (
            vec!["NAME", "VERSION", "TARGET", "PROFILE"],
            vec![vec![
                self.name.to_string(),
                self.version.to_string(),
                self.target.to_string(),
                self.profile.to_string(),
            ]],
        )
    }

    fn pretty(&self) -> String {
        format!(
            "{} {} ({}, {} build)",
            self.name, self.version, self.target, self.profile
        )
    }

    fn raw(&self) -> String {
        self.version.to_string()
    }
}

pub fn run(args: VersionArgs, conn: &ConnectOptions, format: OutputFormat) -> CliResult<i32> {
    if args.client {
        let out = ClientOutput {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            target: option_env!("PIXYCAM_BUILD_TARGET").unwrap_or("unknown"),
            profile: option_env!("PIXYCAM_BUILD_PROFILE").unwrap_or("unknown"),
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
        };
        print_report(&out, format);
        return Ok(SUCCESS);
    }

    let mut session = conn.connect()?;
    let version = session
        .firmware_version()
        .map_err(|err| session_error("version failed", err))?;
    let out = FirmwareOutput {
        firmware: version.to_string(),
        major: version.major,
        minor: version.minor,
        build: version.build,
    };
    print_report(&out, format);
    Ok(SUCCESS)
}
