use pixycam_session::commands::Rgb;
use pixycam_session::BridgeSession;
use serde::Serialize;

use crate::cmd::{ConnectOptions, GetArgs, Setting};
use crate::exit::{session_error, CliError, CliResult, SUCCESS};
use crate::output::{print_report, OutputFormat, Report};

#[derive(Serialize)]
pub(crate) struct SettingOutput {
    pub setting: &'static str,
    pub value: serde_json::Value,
    pub display: String,
}

impl Report for SettingOutput {
    fn table(&self) -> (Vec<&'static str>, Vec<Vec<String>>) {
        (
            vec!["SETTING", "VALUE"],
            vec![vec![self.setting.to_string(), self.display.clone()]],
        )
    }

    fn pretty(&self) -> String {
        format!("{}: {}", self.setting, self.display)
    }

    fn raw(&self) -> String {
        self.display.clone()
    }
}

pub fn run(args: GetArgs, conn: &ConnectOptions, format: OutputFormat) -> CliResult<i32> {
    let mut session = conn.connect()?;
    let out = read_setting(&mut session, args.setting, args.channel)?;
    print_report(&out, format);
    Ok(SUCCESS)
}

fn read_setting(
    session: &mut BridgeSession,
    setting: Setting,
    channel: u8,
) -> CliResult<SettingOutput> {
    let context = "get failed";
    let fail = |err| session_error(context, err);

    let (value, display) = match setting {
        Setting::AutoWhiteBalance => scalar(session.auto_white_balance().map_err(fail)?),
        Setting::AutoExposure => scalar(session.auto_exposure_compensation().map_err(fail)?),
        Setting::Brightness => scalar(session.brightness().map_err(fail)?),
        Setting::CameraMode => scalar(session.camera_mode().map_err(fail)?),
        Setting::Servo => scalar(session.servo_position(channel).map_err(fail)?),
        Setting::LedMaxCurrent => scalar(session.led_max_current().map_err(fail)?),
        Setting::Exposure => {
            let exposure = session.exposure_compensation().map_err(fail)?;
            (
                serde_json::json!({
                    "gain": exposure.gain,
                    "compensation": exposure.compensation,
                }),
                format!("gain {} compensation {}", exposure.gain, exposure.compensation),
            )
        }
        Setting::WhiteBalance => {
            let packed = session.white_balance_value().map_err(fail)?;
            let Rgb { red, green, blue } = Rgb::from_white_balance(packed);
            (
                serde_json::json!({ "red": red, "green": green, "blue": blue }),
                format!("{red} {green} {blue}"),
            )
        }
        Setting::ServoFrequency | Setting::Led => {
            return Err(CliError::usage(format!(
                "{} can be set but not read back",
                setting.name()
            )));
        }
    };

    Ok(SettingOutput {
        setting: setting.name(),
        value,
        display,
    })
}

fn scalar(value: i32) -> (serde_json::Value, String) {
    (serde_json::Value::from(value), value.to_string())
}
