use pixycam_chirp::schema::CAM_GET_FRAME;
use pixycam_chirp::Call;
use pixycam_image::{demosaic, ImageError, PixelFormat, RgbPlanes};
use pixycam_transport::Link;
use tracing::debug;

use crate::error::{Result, SessionError};
use crate::session::Session;

/// Capture mode and region for a frame grab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRequest {
    pub mode: u8,
    pub x_offset: u16,
    pub y_offset: u16,
    pub width: u16,
    pub height: u16,
}

impl Default for FrameRequest {
    fn default() -> Self {
        Self {
            mode: 0x21,
            x_offset: 0,
            y_offset: 0,
            width: 320,
            height: 200,
        }
    }
}

/// A frame whose pixels still live in the session's receive buffer.
///
/// The device may clamp the requested region; `width` and `height` are
/// what it actually sent.
#[derive(Debug, Clone, Copy)]
pub struct RawFrame<'a> {
    status: i32,
    fourcc: u32,
    render_flags: i8,
    width: u16,
    height: u16,
    pixel_count: u32,
    data: &'a [u8],
}

impl<'a> RawFrame<'a> {
    /// Device response value. Negative means no pixels were captured.
    pub fn status(&self) -> i32 {
        self.status
    }

    pub fn fourcc(&self) -> u32 {
        self.fourcc
    }

    pub fn pixel_format(&self) -> PixelFormat {
        PixelFormat::from_fourcc(self.fourcc)
    }

    pub fn render_flags(&self) -> i8 {
        self.render_flags
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn pixel_count(&self) -> u32 {
        self.pixel_count
    }

    /// Exactly `pixel_count` bytes, or `None` when the status is negative.
    pub fn pixels(&self) -> Option<&'a [u8]> {
        if self.status < 0 {
            return None;
        }
        self.data.get(..self.pixel_count as usize)
    }

    /// Copy the pixels into `dst` and return the status.
    ///
    /// Nothing is copied when the status is negative. `dst` must hold at
    /// least `pixel_count` bytes; bytes past that are left alone.
    pub fn copy_into(&self, dst: &mut [u8]) -> Result<i32> {
        let Some(pixels) = self.pixels() else {
            return Ok(self.status);
        };
        if dst.len() < pixels.len() {
            return Err(SessionError::InvalidParameter(format!(
                "destination holds {} bytes, frame has {}",
                dst.len(),
                pixels.len()
            )));
        }
        dst[..pixels.len()].copy_from_slice(pixels);
        Ok(self.status)
    }

    /// Detach the frame from the session.
    pub fn to_owned_frame(&self) -> Frame {
        Frame {
            status: self.status,
            fourcc: self.fourcc,
            render_flags: self.render_flags,
            width: self.width,
            height: self.height,
            pixel_count: self.pixel_count,
            pixels: self.pixels().map(<[u8]>::to_vec).unwrap_or_default(),
        }
    }
}

/// A frame that owns its pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub status: i32,
    pub fourcc: u32,
    pub render_flags: i8,
    pub width: u16,
    pub height: u16,
    /// Pixel count the device announced, kept even when the status is negative.
    pub pixel_count: u32,
    /// `pixel_count` bytes; empty when the status was negative.
    pub pixels: Vec<u8>,
}

impl Frame {
    pub fn pixel_format(&self) -> PixelFormat {
        PixelFormat::from_fourcc(self.fourcc)
    }

    /// Demosaic a BA81 frame into color planes.
    pub fn render(&self) -> pixycam_image::Result<RgbPlanes> {
        match self.pixel_format() {
            PixelFormat::Ba81 => demosaic(
                usize::from(self.width),
                usize::from(self.height),
                &self.pixels,
            ),
            other => Err(ImageError::Unsupported(other.as_str())),
        }
    }
}

impl<L: Link> Session<L> {
    /// Grab one frame. The pixels borrow the receive buffer.
    pub fn get_frame(&mut self, request: FrameRequest) -> Result<RawFrame<'_>> {
        let call = Call::new(CAM_GET_FRAME)
            .arg(request.mode)
            .arg(request.x_offset)
            .arg(request.y_offset)
            .arg(request.width)
            .arg(request.height)
            .build()?;
        let reply = self.call(&call)?;

        let frame = RawFrame {
            status: reply.i32(0)?,
            fourcc: reply.u32(1)?,
            render_flags: reply.i8(2)?,
            width: reply.u16(3)?,
            height: reply.u16(4)?,
            pixel_count: reply.u32(5)?,
            data: reply.bytes(6)?,
        };
        if frame.status >= 0 && frame.data.len() < frame.pixel_count as usize {
            return Err(SessionError::Protocol(format!(
                "frame announces {} pixels but carries {} bytes",
                frame.pixel_count,
                frame.data.len()
            )));
        }

        debug!(
            status = frame.status,
            format = %frame.pixel_format(),
            width = frame.width,
            height = frame.height,
            pixels = frame.pixel_count,
            "frame received"
        );
        Ok(frame)
    }

    /// Grab one frame and copy it out of the session.
    pub fn get_frame_owned(&mut self, request: FrameRequest) -> Result<Frame> {
        Ok(self.get_frame(request)?.to_owned_frame())
    }
}
