//! Rendering base: clips drawing operations to the image

use crate::color::Color;
use crate::color::Rgb8;
use crate::color::Rgba8;
use crate::img;
use crate::pixfmt::Pixel;
use crate::pixfmt::Pixfmt;
use crate::PixelData;

use std::cmp::max;
use std::cmp::min;
use std::path::Path as FilePath;

/// Pixel format plus bounds clamping of every operation
pub struct RenderingBase<T: Pixel> {
    pub pixf: Pixfmt<T>,
}

impl<T: Pixel> RenderingBase<T> {
    pub fn new(pixf: Pixfmt<T>) -> Self {
        RenderingBase { pixf }
    }
    /// Fill the whole image
    pub fn clear(&mut self, color: Rgba8) {
        self.pixf.fill(&color);
    }
    /// Valid pixel range as (xmin, xmax, ymin, ymax), inclusive
    pub fn limits(&self) -> (i64, i64, i64, i64) {
        let w = self.pixf.width() as i64;
        let h = self.pixf.height() as i64;
        (0, w - 1, 0, h - 1)
    }
    /// Blend a constant-coverage run from x1 to x2 inclusive on row y
    pub fn blend_hline<C: Color>(&mut self, x1: i64, y: i64, x2: i64, c: &C, cover: u64) {
        let (xmin, xmax, ymin, ymax) = self.limits();
        let (x1, x2) = if x2 > x1 { (x1, x2) } else { (x2, x1) };
        if y > ymax || y < ymin || x1 > xmax || x2 < xmin {
            return;
        }
        let x1 = max(x1, xmin);
        let x2 = min(x2, xmax);
        self.pixf.blend_hline(x1, y, x2 - x1 + 1, c, cover);
    }
    /// Blend a per-pixel coverage run of `len` pixels starting at (x,y)
    pub fn blend_solid_hspan<C: Color>(
        &mut self,
        x: i64,
        y: i64,
        len: i64,
        c: &C,
        covers: &[u64],
    ) {
        let (xmin, xmax, ymin, ymax) = self.limits();
        if y > ymax || y < ymin {
            return;
        }
        let (mut x, mut len, mut off) = (x, len, 0);
        if x < xmin {
            len -= xmin - x;
            if len <= 0 {
                return;
            }
            off += xmin - x;
            x = xmin;
        }
        if x + len - 1 > xmax {
            len = xmax - x + 1;
            if len <= 0 {
                return;
            }
        }
        self.pixf
            .blend_solid_hspan(x, y, len, c, &covers[off as usize..]);
    }
}

impl<T: Pixel> PixelData for RenderingBase<T> {
    fn pixeldata(&self) -> &[u8] {
        &self.pixf.rbuf.data
    }
}

impl RenderingBase<Rgb8> {
    /// Save the image; the format follows the file extension
    pub fn to_file<P: AsRef<FilePath>>(&self, filename: P) -> Result<(), std::io::Error> {
        img::write_file(
            &self.pixf.rbuf.data,
            self.pixf.width(),
            self.pixf.height(),
            filename,
        )
    }
}
