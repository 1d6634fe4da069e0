//! Per-command call shapes.
//!
//! The device resolves procedures by name only, so a schema is what keeps
//! the host's argument and result lists in step with the firmware.

use crate::value::ValueKind::{self, Bytes, I32, I8, U16, U32, U8};

/// Name, argument kinds and result kinds of one remote procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSchema<'s> {
    pub name: &'s str,
    pub args: &'s [ValueKind],
    pub results: &'s [ValueKind],
}

impl<'s> CommandSchema<'s> {
    /// Describe a procedure. Any name may be used; unknown names fail on the device.
    pub const fn new(name: &'s str, args: &'s [ValueKind], results: &'s [ValueKind]) -> Self {
        Self {
            name,
            args,
            results,
        }
    }
}

pub const VERSION: CommandSchema<'static> = CommandSchema::new("version", &[], &[I32, Bytes]);

pub const CAM_GET_FRAME: CommandSchema<'static> = CommandSchema::new(
    "cam_getFrame",
    &[U8, U16, U16, U16, U16],
    &[I32, U32, I8, U16, U16, U32, Bytes],
);

pub const CAM_SET_AWB: CommandSchema<'static> = CommandSchema::new("cam_setAWB", &[U8], &[I32]);
pub const CAM_GET_AWB: CommandSchema<'static> = CommandSchema::new("cam_getAWB", &[], &[I32]);
pub const CAM_SET_WBV: CommandSchema<'static> = CommandSchema::new("cam_setWBV", &[U32], &[I32]);
pub const CAM_GET_WBV: CommandSchema<'static> = CommandSchema::new("cam_getWBV", &[], &[U32]);
pub const CAM_SET_AEC: CommandSchema<'static> = CommandSchema::new("cam_setAEC", &[U8], &[I32]);
pub const CAM_GET_AEC: CommandSchema<'static> = CommandSchema::new("cam_getAEC", &[], &[I32]);
pub const CAM_SET_ECV: CommandSchema<'static> = CommandSchema::new("cam_setECV", &[U32], &[I32]);
pub const CAM_GET_ECV: CommandSchema<'static> = CommandSchema::new("cam_getECV", &[], &[U32]);
pub const CAM_SET_BRIGHTNESS: CommandSchema<'static> =
    CommandSchema::new("cam_setBrightness", &[U8], &[I32]);
pub const CAM_GET_BRIGHTNESS: CommandSchema<'static> =
    CommandSchema::new("cam_getBrightness", &[], &[I32]);
pub const CAM_SET_MODE: CommandSchema<'static> = CommandSchema::new("cam_setMode", &[U8], &[I32]);
pub const CAM_GET_MODE: CommandSchema<'static> = CommandSchema::new("cam_getMode", &[], &[I32]);

pub const RCS_GET_POS: CommandSchema<'static> = CommandSchema::new("rcs_getPos", &[U8], &[I32]);
pub const RCS_SET_POS: CommandSchema<'static> =
    CommandSchema::new("rcs_setPos", &[U8, U16], &[I32]);
pub const RCS_SET_FREQ: CommandSchema<'static> =
    CommandSchema::new("rcs_setFreq", &[U16], &[I32]);

pub const LED_SET: CommandSchema<'static> = CommandSchema::new("led_set", &[U32], &[I32]);
pub const LED_SET_MAX_CURRENT: CommandSchema<'static> =
    CommandSchema::new("led_setMaxCurrent", &[U32], &[I32]);
pub const LED_GET_MAX_CURRENT: CommandSchema<'static> =
    CommandSchema::new("led_getMaxCurrent", &[], &[I32]);

/// Block poll: `max` requested, device count plus packed 14-byte records.
pub const BLK_GET_BLOCKS: CommandSchema<'static> =
    CommandSchema::new("blk_getBlocks", &[U16], &[I32, Bytes]);

/// Every built-in schema.
pub const ALL: &[CommandSchema<'static>] = &[
    VERSION,
    CAM_GET_FRAME,
    CAM_SET_AWB,
    CAM_GET_AWB,
    CAM_SET_WBV,
    CAM_GET_WBV,
    CAM_SET_AEC,
    CAM_GET_AEC,
    CAM_SET_ECV,
    CAM_GET_ECV,
    CAM_SET_BRIGHTNESS,
    CAM_GET_BRIGHTNESS,
    CAM_SET_MODE,
    CAM_GET_MODE,
    RCS_GET_POS,
    RCS_SET_POS,
    RCS_SET_FREQ,
    LED_SET,
    LED_SET_MAX_CURRENT,
    LED_GET_MAX_CURRENT,
    BLK_GET_BLOCKS,
];

/// Find a built-in schema by procedure name.
pub fn lookup(name: &str) -> Option<&'static CommandSchema<'static>> {
    ALL.iter().find(|schema| schema.name == name)
}
