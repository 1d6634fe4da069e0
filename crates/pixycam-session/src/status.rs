use std::fmt;

/// Signed status values reported by session operations.
///
/// The USB values are libusb's. Zero and positive values are success; many
/// calls use the non-negative value itself as their payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum StatusCode {
    Success = 0,
    UsbIo = -1,
    UsbNoDevice = -4,
    UsbNotFound = -5,
    UsbBusy = -6,
    InvalidParameter = -150,
    ChirpProtocolError = -151,
    InvalidCommand = -152,
    /// The session was not opened, or has been closed.
    NotInitialized = -153,
}

impl StatusCode {
    pub const ALL: [StatusCode; 9] = [
        StatusCode::Success,
        StatusCode::UsbIo,
        StatusCode::UsbNoDevice,
        StatusCode::UsbNotFound,
        StatusCode::UsbBusy,
        StatusCode::InvalidParameter,
        StatusCode::ChirpProtocolError,
        StatusCode::InvalidCommand,
        StatusCode::NotInitialized,
    ];

    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn from_i32(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_i32() == code)
    }

    /// Human-readable diagnostic. For display only.
    pub fn describe(self) -> &'static str {
        match self {
            StatusCode::Success => "Success",
            StatusCode::UsbIo => "USB Error: I/O",
            StatusCode::UsbNoDevice => "USB Error: No device",
            StatusCode::UsbNotFound => "USB Error: Target not found",
            StatusCode::UsbBusy => "USB Error: Busy",
            StatusCode::InvalidParameter => "Pixy Error: Invalid parameter",
            StatusCode::ChirpProtocolError => "Chirp Protocol Error",
            StatusCode::InvalidCommand => "Pixy Error: Invalid command",
            StatusCode::NotInitialized => "Pixy Error: Not initialized",
        }
    }

    /// Symbolic name, as used in CLI output.
    pub fn name(self) -> &'static str {
        match self {
            StatusCode::Success => "SUCCESS",
            StatusCode::UsbIo => "USB_IO",
            StatusCode::UsbNoDevice => "USB_NO_DEVICE",
            StatusCode::UsbNotFound => "USB_NOT_FOUND",
            StatusCode::UsbBusy => "USB_BUSY",
            StatusCode::InvalidParameter => "INVALID_PARAMETER",
            StatusCode::ChirpProtocolError => "CHIRP_PROTOCOL_ERROR",
            StatusCode::InvalidCommand => "INVALID_COMMAND",
            StatusCode::NotInitialized => "NOT_INITIALIZED",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Diagnostic text for any integer status; unknown codes get "Undefined error".
pub fn status_text(code: i32) -> &'static str {
    StatusCode::from_i32(code)
        .map(StatusCode::describe)
        .unwrap_or("Undefined error")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for status in StatusCode::ALL {
            assert_eq!(StatusCode::from_i32(status.as_i32()), Some(status));
        }
        assert_eq!(StatusCode::UsbBusy.as_i32(), -6);
        assert_eq!(StatusCode::InvalidParameter.as_i32(), -150);
    }

    #[test]
    fn texts() {
        assert_eq!(status_text(0), "Success");
        assert_eq!(status_text(-151), "Chirp Protocol Error");
        assert_eq!(status_text(-5), "USB Error: Target not found");
        assert_eq!(status_text(-2), "Undefined error");
        assert_eq!(status_text(42), "Undefined error");
    }

    #[test]
    fn not_initialized_does_not_collide_with_usb_io() {
        assert_ne!(
            StatusCode::NotInitialized.as_i32(),
            StatusCode::UsbIo.as_i32()
        );
    }
}
