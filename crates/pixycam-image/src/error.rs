/// Errors raised while rendering a frame.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// The frame is too small to have any interior pixel.
    #[error("frame {width}x{height} is too small to demosaic (need at least 3x3)")]
    TooSmall { width: usize, height: usize },

    /// Fewer bytes than `width * height`.
    #[error("bayer plane holds {found} bytes, {width}x{height} needs {needed}")]
    ShortBuffer {
        width: usize,
        height: usize,
        needed: usize,
        found: usize,
    },

    /// The frame is not in a format this crate can render.
    #[error("cannot render pixel format {0}")]
    Unsupported(&'static str),

    /// Writing the rendered image failed.
    #[error("image I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ImageError>;
