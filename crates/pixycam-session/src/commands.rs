//! Typed wrappers for the camera, servo and LED procedures.
//!
//! Setters succeed when the call is dispatched and answered; they report
//! nothing else. Getters hand back the device's response value untouched,
//! since for these procedures that value is the setting itself.

use std::fmt;

use pixycam_chirp::schema::{
    CAM_GET_AEC, CAM_GET_AWB, CAM_GET_BRIGHTNESS, CAM_GET_ECV, CAM_GET_MODE, CAM_GET_WBV,
    CAM_SET_AEC, CAM_SET_AWB, CAM_SET_BRIGHTNESS, CAM_SET_ECV, CAM_SET_MODE, CAM_SET_WBV,
    LED_GET_MAX_CURRENT, LED_SET, LED_SET_MAX_CURRENT, RCS_GET_POS, RCS_SET_FREQ, RCS_SET_POS,
    VERSION,
};
use pixycam_chirp::{Call, CallBuilder, CommandSchema};
use pixycam_transport::Link;

use crate::error::{Result, SessionError};
use crate::session::Session;

pub const CAMERA_MODE_25FPS_1280X800: u8 = 0;
pub const CAMERA_MODE_50FPS_640X400: u8 = 1;

pub const SERVO_CHANNEL_MAX: u8 = 1;
pub const SERVO_POSITION_MAX: u16 = 999;
pub const SERVO_FREQUENCY_MIN: u16 = 20;
pub const SERVO_FREQUENCY_MAX: u16 = 300;

/// An 8-bit-per-channel color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Packing used by `led_set`.
    pub fn led_packed(self) -> u32 {
        u32::from(self.blue) | u32::from(self.green) << 8 | u32::from(self.red) << 16
    }

    /// Packing used by the white balance value.
    pub fn white_balance_packed(self) -> u32 {
        u32::from(self.green) | u32::from(self.red) << 8 | u32::from(self.blue) << 16
    }

    pub fn from_white_balance(packed: u32) -> Self {
        Self {
            green: packed as u8,
            red: (packed >> 8) as u8,
            blue: (packed >> 16) as u8,
        }
    }
}

/// Manual exposure: gain in the low byte, compensation above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExposureCompensation {
    pub gain: u8,
    pub compensation: u16,
}

impl ExposureCompensation {
    pub fn packed(self) -> u32 {
        u32::from(self.gain) | u32::from(self.compensation) << 8
    }

    pub fn from_packed(packed: u32) -> Self {
        Self {
            gain: (packed & 0xFF) as u8,
            compensation: ((packed >> 8) & 0xFFFF) as u16,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FirmwareVersion {
    pub major: u16,
    pub minor: u16,
    pub build: u16,
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.build)
    }
}

impl<L: Link> Session<L> {
    pub fn set_auto_white_balance(&mut self, enable: bool) -> Result<()> {
        self.dispatch(Call::new(CAM_SET_AWB).arg(u8::from(enable)))
    }

    pub fn auto_white_balance(&mut self) -> Result<i32> {
        self.response(CAM_GET_AWB)
    }

    pub fn set_white_balance_value(&mut self, color: Rgb) -> Result<()> {
        self.dispatch(Call::new(CAM_SET_WBV).arg(color.white_balance_packed()))
    }

    /// Packed white balance; see [`Rgb::from_white_balance`].
    pub fn white_balance_value(&mut self) -> Result<u32> {
        let call = Call::new(CAM_GET_WBV).build()?;
        Ok(self.call(&call)?.u32(0)?)
    }

    pub fn set_auto_exposure_compensation(&mut self, enable: bool) -> Result<()> {
        self.dispatch(Call::new(CAM_SET_AEC).arg(u8::from(enable)))
    }

    pub fn auto_exposure_compensation(&mut self) -> Result<i32> {
        self.response(CAM_GET_AEC)
    }

    pub fn set_exposure_compensation(&mut self, exposure: ExposureCompensation) -> Result<()> {
        self.dispatch(Call::new(CAM_SET_ECV).arg(exposure.packed()))
    }

    pub fn exposure_compensation(&mut self) -> Result<ExposureCompensation> {
        let call = Call::new(CAM_GET_ECV).build()?;
        let packed = self.call(&call)?.u32(0)?;
        Ok(ExposureCompensation::from_packed(packed))
    }

    pub fn set_brightness(&mut self, brightness: u8) -> Result<()> {
        self.dispatch(Call::new(CAM_SET_BRIGHTNESS).arg(brightness))
    }

    pub fn brightness(&mut self) -> Result<i32> {
        self.response(CAM_GET_BRIGHTNESS)
    }

    pub fn set_camera_mode(&mut self, mode: u8) -> Result<()> {
        self.dispatch(Call::new(CAM_SET_MODE).arg(mode))
    }

    pub fn camera_mode(&mut self) -> Result<i32> {
        self.response(CAM_GET_MODE)
    }

    pub fn servo_position(&mut self, channel: u8) -> Result<i32> {
        let call = Call::new(RCS_GET_POS).arg(channel).build()?;
        Ok(self.call(&call)?.i32(0)?)
    }

    /// Move a servo. Channel must be 0 or 1 and position at most 999.
    pub fn set_servo_position(&mut self, channel: u8, position: u16) -> Result<()> {
        if channel > SERVO_CHANNEL_MAX || position > SERVO_POSITION_MAX {
            return Err(SessionError::InvalidParameter(format!(
                "servo channel {channel} position {position} out of range"
            )));
        }
        self.dispatch(Call::new(RCS_SET_POS).arg(channel).arg(position))
    }

    /// Set the servo PWM frequency in Hz, 20 through 300.
    pub fn set_servo_frequency(&mut self, frequency: u16) -> Result<()> {
        if !(SERVO_FREQUENCY_MIN..=SERVO_FREQUENCY_MAX).contains(&frequency) {
            return Err(SessionError::InvalidParameter(format!(
                "servo frequency {frequency} Hz out of range"
            )));
        }
        self.dispatch(Call::new(RCS_SET_FREQ).arg(frequency))
    }

    pub fn set_led(&mut self, color: Rgb) -> Result<()> {
        self.dispatch(Call::new(LED_SET).arg(color.led_packed()))
    }

    pub fn set_led_max_current(&mut self, current: u32) -> Result<()> {
        self.dispatch(Call::new(LED_SET_MAX_CURRENT).arg(current))
    }

    pub fn led_max_current(&mut self) -> Result<i32> {
        self.response(LED_GET_MAX_CURRENT)
    }

    pub fn firmware_version(&mut self) -> Result<FirmwareVersion> {
        let call = Call::new(VERSION).build()?;
        let reply = self.call(&call)?;
        match reply.bytes(1)? {
            [a, b, c, d, e, f, ..] => Ok(FirmwareVersion {
                major: u16::from_le_bytes([*a, *b]),
                minor: u16::from_le_bytes([*c, *d]),
                build: u16::from_le_bytes([*e, *f]),
            }),
            short => Err(SessionError::Protocol(format!(
                "version payload is {} bytes, expected 6",
                short.len()
            ))),
        }
    }

    fn dispatch(&mut self, call: CallBuilder<'_>) -> Result<()> {
        let call = call.build()?;
        self.call(&call)?;
        Ok(())
    }

    fn response(&mut self, schema: CommandSchema<'_>) -> Result<i32> {
        let call = Call::new(schema).build()?;
        Ok(self.call(&call)?.i32(0)?)
    }
}

#[cfg(test)]
mod tests {
    use pixycam_chirp::ResultValue;

    use super::*;
    use crate::status::StatusCode;
    use crate::testing::ScriptedLink;

    fn session_with(link: ScriptedLink) -> Session<ScriptedLink> {
        let mut session = Session::new(link);
        session.open().unwrap();
        session
    }

    fn ok() -> ScriptedLink {
        ScriptedLink::new().reply(&[ResultValue::I32(0)])
    }

    #[test]
    fn servo_channel_out_of_range_does_no_io() {
        let mut session = session_with(ok());
        let err = session.set_servo_position(2, 500).unwrap_err();
        assert_eq!(err.status(), StatusCode::InvalidParameter);
        assert_eq!(err.code(), -150);
        assert!(session.link().calls.is_empty());

        assert!(session.set_servo_position(0, 1000).is_err());
        assert!(session.link().calls.is_empty());
    }

    #[test]
    fn servo_frequency_bounds() {
        let mut session = session_with(ok());
        for bad in [10, 19, 301, 400] {
            let err = session.set_servo_frequency(bad).unwrap_err();
            assert_eq!(err.status(), StatusCode::InvalidParameter);
        }
        assert!(session.link().calls.is_empty());

        session.set_servo_frequency(150).unwrap();
        let (name, args) = &session.link().calls[0];
        assert_eq!(name, "rcs_setFreq");
        assert_eq!(args, &[0x02, 150, 0, 0x00]);
    }

    #[test]
    fn servo_position_in_range_dispatches() {
        let mut session = session_with(ok());
        session.set_servo_position(1, 999).unwrap();
        let (name, args) = &session.link().calls[0];
        assert_eq!(name, "rcs_setPos");
        assert_eq!(args, &[0x01, 1, 0x02, 0xE7, 0x03, 0x00]);
    }

    #[test]
    fn led_packs_blue_low() {
        let mut session = session_with(ok());
        session.set_led(Rgb::new(0x11, 0x22, 0x33)).unwrap();
        let (_, args) = &session.link().calls[0];
        assert_eq!(args, &[0x04, 0x33, 0x22, 0x11, 0x00, 0x00]);
    }

    #[test]
    fn white_balance_packs_green_low() {
        let color = Rgb::new(0x11, 0x22, 0x33);
        assert_eq!(color.white_balance_packed(), 0x0033_1122);
        assert_eq!(Rgb::from_white_balance(0x0033_1122), color);

        let mut session = session_with(ok());
        session.set_white_balance_value(color).unwrap();
        assert_eq!(session.link().calls[0].0, "cam_setWBV");
    }

    #[test]
    fn exposure_unpacks() {
        let mut session = session_with(ScriptedLink::new().reply(&[ResultValue::U32(0x0012_3456)]));
        let exposure = session.exposure_compensation().unwrap();
        assert_eq!(
            exposure,
            ExposureCompensation {
                gain: 0x56,
                compensation: 0x1234
            }
        );
        assert_eq!(exposure.packed(), 0x0012_3456);
    }

    #[test]
    fn getters_return_the_response() {
        let mut session = session_with(
            ScriptedLink::new()
                .reply(&[ResultValue::I32(1)])
                .reply(&[ResultValue::I32(40)])
                .reply(&[ResultValue::I32(500)]),
        );
        assert_eq!(session.auto_white_balance().unwrap(), 1);
        assert_eq!(session.brightness().unwrap(), 40);
        assert_eq!(session.servo_position(0).unwrap(), 500);
        assert_eq!(session.link().calls[2].1, vec![0x01, 0x00, 0x00]);
    }

    #[test]
    fn firmware_version_from_bytes() {
        let mut session = session_with(ScriptedLink::new().reply(&[
            ResultValue::I32(0),
            ResultValue::Bytes(&[2, 0, 0, 0, 11, 0]),
        ]));
        let version = session.firmware_version().unwrap();
        assert_eq!(version.to_string(), "2.0.11");
    }

    #[test]
    fn short_firmware_version_is_protocol_error() {
        let mut session = session_with(
            ScriptedLink::new().reply(&[ResultValue::I32(0), ResultValue::Bytes(&[2, 0])]),
        );
        let err = session.firmware_version().unwrap_err();
        assert_eq!(err.status(), StatusCode::ChirpProtocolError);
    }

    #[test]
    fn setter_failure_carries_status() {
        let mut session = session_with(
            ScriptedLink::new().fail(pixycam_transport::TransportError::Busy),
        );
        let err = session.set_brightness(80).unwrap_err();
        assert_eq!(err.code(), -6);
    }
}
