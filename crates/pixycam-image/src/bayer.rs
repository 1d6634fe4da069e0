use std::io::Write;

use tracing::trace;

use crate::error::{ImageError, Result};

/// Three dense 8-bit planes rendered from one Bayer plane.
///
/// The outermost rows and columns of the source have no full neighborhood,
/// so the planes are two pixels narrower and two pixels shorter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbPlanes {
    width: usize,
    height: usize,
    red: Vec<u8>,
    green: Vec<u8>,
    blue: Vec<u8>,
}

impl RgbPlanes {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn red(&self) -> &[u8] {
        &self.red
    }

    pub fn green(&self) -> &[u8] {
        &self.green
    }

    pub fn blue(&self) -> &[u8] {
        &self.blue
    }

    /// Color of the output pixel at `(x, y)`, if in range.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = y * self.width + x;
        Some([self.red[i], self.green[i], self.blue[i]])
    }

    /// Row-major RGB triplets.
    pub fn interleaved(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.red.len() * 3);
        for ((&r, &g), &b) in self.red.iter().zip(&self.green).zip(&self.blue) {
            out.extend_from_slice(&[r, g, b]);
        }
        out
    }

    /// Write a binary PPM (P6) image.
    pub fn write_ppm<W: Write>(&self, mut writer: W) -> Result<()> {
        write!(writer, "P6\n{} {}\n255\n", self.width, self.height)?;
        writer.write_all(&self.interleaved())?;
        writer.flush()?;
        Ok(())
    }
}

/// Reconstruct color planes from a raw Bayer plane.
///
/// Only interior pixels are produced. Each one takes its own sample for
/// one channel and truncated averages of its neighbors for the other two,
/// depending on the parity of its row and column.
pub fn demosaic(width: usize, height: usize, bayer: &[u8]) -> Result<RgbPlanes> {
    if width < 3 || height < 3 {
        return Err(ImageError::TooSmall { width, height });
    }
    let needed = width * height;
    if bayer.len() < needed {
        return Err(ImageError::ShortBuffer {
            width,
            height,
            needed,
            found: bayer.len(),
        });
    }

    let out_w = width - 2;
    let out_h = height - 2;
    let mut red = vec![0u8; out_w * out_h];
    let mut green = vec![0u8; out_w * out_h];
    let mut blue = vec![0u8; out_w * out_h];

    let rows = red
        .chunks_exact_mut(out_w)
        .zip(green.chunks_exact_mut(out_w))
        .zip(blue.chunks_exact_mut(out_w));
    for (row, ((r_row, g_row), b_row)) in rows.enumerate() {
        let y = row + 1;
        let above = &bayer[(y - 1) * width..y * width];
        let here = &bayer[y * width..(y + 1) * width];
        let below = &bayer[(y + 1) * width..(y + 2) * width];

        for col in 0..out_w {
            let x = col + 1;
            let center = here[x];
            let horizontal = avg2(here[x - 1], here[x + 1]);
            let vertical = avg2(above[x], below[x]);
            let cross = avg4(here[x - 1], here[x + 1], above[x], below[x]);
            let diagonal = avg4(above[x - 1], above[x + 1], below[x - 1], below[x + 1]);

            let (r, g, b) = match (y & 1, x & 1) {
                (0, 0) => (diagonal, cross, center),
                (0, _) => (horizontal, center, vertical),
                (_, 0) => (vertical, center, horizontal),
                _ => (center, cross, diagonal),
            };
            r_row[col] = r;
            g_row[col] = g;
            b_row[col] = b;
        }
    }

    trace!(width, height, "demosaiced bayer plane");
    Ok(RgbPlanes {
        width: out_w,
        height: out_h,
        red,
        green,
        blue,
    })
}

fn avg2(a: u8, b: u8) -> u8 {
    ((u16::from(a) + u16::from(b)) >> 1) as u8
}

fn avg4(a: u8, b: u8, c: u8, d: u8) -> u8 {
    ((u16::from(a) + u16::from(b) + u16::from(c) + u16::from(d)) >> 2) as u8
}
