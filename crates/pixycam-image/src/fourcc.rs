use std::fmt;

/// Pack four ASCII characters into a FourCC, first character in the low byte.
pub const fn fourcc(tag: [u8; 4]) -> u32 {
    u32::from_le_bytes(tag)
}

const BA81: u32 = fourcc(*b"BA81");
const CCQ1: u32 = fourcc(*b"CCQ1");
const CCB1: u32 = fourcc(*b"CCB1");
const CMV1: u32 = fourcc(*b"CMV1");

/// Pixel formats a Pixy frame reply can announce.
///
/// Unrecognized codes resolve to [`PixelFormat::Unknown`]; resolution never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelFormat {
    #[default]
    Unknown,
    /// Raw 8-bit Bayer plane.
    Ba81,
    Ccq1,
    Ccb1,
    Cmv1,
}

impl PixelFormat {
    pub const KNOWN: [PixelFormat; 4] = [
        PixelFormat::Ba81,
        PixelFormat::Ccq1,
        PixelFormat::Ccb1,
        PixelFormat::Cmv1,
    ];

    pub fn from_fourcc(value: u32) -> Self {
        match value {
            BA81 => PixelFormat::Ba81,
            CCQ1 => PixelFormat::Ccq1,
            CCB1 => PixelFormat::Ccb1,
            CMV1 => PixelFormat::Cmv1,
            _ => PixelFormat::Unknown,
        }
    }

    /// Numeric identifier: 0 for unknown, 1 through 4 for the known formats.
    pub fn code(self) -> i32 {
        match self {
            PixelFormat::Unknown => 0,
            PixelFormat::Ba81 => 1,
            PixelFormat::Ccq1 => 2,
            PixelFormat::Ccb1 => 3,
            PixelFormat::Cmv1 => 4,
        }
    }

    pub fn from_code(code: i32) -> Self {
        match code {
            1 => PixelFormat::Ba81,
            2 => PixelFormat::Ccq1,
            3 => PixelFormat::Ccb1,
            4 => PixelFormat::Cmv1,
            _ => PixelFormat::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PixelFormat::Unknown => "???",
            PixelFormat::Ba81 => "BA81",
            PixelFormat::Ccq1 => "CCQ1",
            PixelFormat::Ccb1 => "CCB1",
            PixelFormat::Cmv1 => "CMV1",
        }
    }

    /// The packed FourCC, `None` for [`PixelFormat::Unknown`].
    pub fn fourcc(self) -> Option<u32> {
        match self {
            PixelFormat::Unknown => None,
            PixelFormat::Ba81 => Some(BA81),
            PixelFormat::Ccq1 => Some(CCQ1),
            PixelFormat::Ccb1 => Some(CCB1),
            PixelFormat::Cmv1 => Some(CMV1),
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
