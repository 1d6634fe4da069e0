use std::str::FromStr;

use pixycam_session::{BridgeSession, ExposureCompensation, Rgb};
use serde::Serialize;
use tracing::info;

use crate::cmd::{ConnectOptions, SetArgs, Setting};
use crate::exit::{session_error, CliError, CliResult, SUCCESS};
use crate::output::{print_report, OutputFormat, Report};

/// A parsed `set` request, checked before anything is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    AutoWhiteBalance(bool),
    AutoExposure(bool),
    Brightness(u8),
    Exposure(ExposureCompensation),
    WhiteBalance(Rgb),
    CameraMode(u8),
    Servo { channel: u8, position: u16 },
    ServoFrequency(u16),
    Led(Rgb),
    LedMaxCurrent(u32),
}

#[derive(Serialize)]
struct SetOutput {
    setting: &'static str,
    values: Vec<String>,
    status: i32,
}

impl Report for SetOutput {
    fn table(&self) -> (Vec<&'static str>, Vec<Vec<String>>) {
        (
            vec!["SETTING", "VALUE", "STATUS"],
            vec![vec![
                self.setting.to_string(),
                self.values.join(" "),
                self.status.to_string(),
            ]],
        )
    }

    fn pretty(&self) -> String {
        format!("{} set to {}", self.setting, self.values.join(" "))
    }

    fn raw(&self) -> String {
        self.status.to_string()
    }
}

pub fn run(args: SetArgs, conn: &ConnectOptions, format: OutputFormat) -> CliResult<i32> {
    let change = parse_change(args.setting, &args.values)?;

    let mut session = conn.connect()?;
    apply(&mut session, change).map_err(|err| session_error("set failed", err))?;
    info!(setting = args.setting.name(), values = ?args.values, "setting changed");

    let out = SetOutput {
        setting: args.setting.name(),
        values: args.values,
        status: 0,
    };
    print_report(&out, format);
    Ok(SUCCESS)
}

fn apply(session: &mut BridgeSession, change: Change) -> pixycam_session::Result<()> {
    match change {
        Change::AutoWhiteBalance(on) => session.set_auto_white_balance(on),
        Change::AutoExposure(on) => session.set_auto_exposure_compensation(on),
        Change::Brightness(value) => session.set_brightness(value),
        Change::Exposure(exposure) => session.set_exposure_compensation(exposure),
        Change::WhiteBalance(color) => session.set_white_balance_value(color),
        Change::CameraMode(mode) => session.set_camera_mode(mode),
        Change::Servo { channel, position } => session.set_servo_position(channel, position),
        Change::ServoFrequency(hz) => session.set_servo_frequency(hz),
        Change::Led(color) => session.set_led(color),
        Change::LedMaxCurrent(current) => session.set_led_max_current(current),
    }
}

fn parse_change(setting: Setting, values: &[String]) -> CliResult<Change> {
    let change = match (setting, values) {
        (Setting::AutoWhiteBalance, [v]) => Change::AutoWhiteBalance(parse_switch(v)?),
        (Setting::AutoExposure, [v]) => Change::AutoExposure(parse_switch(v)?),
        (Setting::Brightness, [v]) => Change::Brightness(parse_num(setting, v)?),
        (Setting::CameraMode, [v]) => Change::CameraMode(parse_num(setting, v)?),
        (Setting::ServoFrequency, [v]) => Change::ServoFrequency(parse_num(setting, v)?),
        (Setting::LedMaxCurrent, [v]) => Change::LedMaxCurrent(parse_num(setting, v)?),
        (Setting::Exposure, [gain, comp]) => Change::Exposure(ExposureCompensation {
            gain: parse_num(setting, gain)?,
            compensation: parse_num(setting, comp)?,
        }),
        (Setting::Servo, [channel, position]) => Change::Servo {
            channel: parse_num(setting, channel)?,
            position: parse_num(setting, position)?,
        },
        (Setting::WhiteBalance, [r, g, b]) => Change::WhiteBalance(parse_rgb(setting, r, g, b)?),
        (Setting::Led, [r, g, b]) => Change::Led(parse_rgb(setting, r, g, b)?),
        _ => {
            return Err(CliError::usage(format!(
                "{} expects {}, got {} value(s)",
                setting.name(),
                expected_values(setting),
                values.len()
            )))
        }
    };
    Ok(change)
}

fn expected_values(setting: Setting) -> &'static str {
    match setting {
        Setting::AutoWhiteBalance | Setting::AutoExposure => "on|off",
        Setting::Brightness | Setting::CameraMode => "one byte",
        Setting::ServoFrequency => "HZ",
        Setting::LedMaxCurrent => "MICROAMPS",
        Setting::Exposure => "GAIN COMPENSATION",
        Setting::Servo => "CHANNEL POSITION",
        Setting::WhiteBalance | Setting::Led => "RED GREEN BLUE",
    }
}

fn parse_switch(value: &str) -> CliResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        _ => Err(CliError::usage(format!("expected on or off, got {value:?}"))),
    }
}

fn parse_num<T: FromStr>(setting: Setting, value: &str) -> CliResult<T> {
    value.parse().map_err(|_| {
        CliError::usage(format!(
            "invalid value {value:?} for {}",
            setting.name()
        ))
    })
}

fn parse_rgb(setting: Setting, r: &str, g: &str, b: &str) -> CliResult<Rgb> {
    Ok(Rgb::new(
        parse_num(setting, r)?,
        parse_num(setting, g)?,
        parse_num(setting, b)?,
    ))
}
