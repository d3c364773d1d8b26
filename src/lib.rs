//! Anti-aliased polygon rasterization, scanline by scanline.
//!
//! How does this work
//!
//! ```text
//! ras = RasterizerScanline()     (or RasterizerCompound for multi-style)
//! sl  = ScanlineU8()
//! ren = RenderingScanlineAASolid( RenderingBase( Pixfmt( .. ) ) )
//! Accumulate coverage
//!   add_path / move_to / line_to
//!     clip.line_to()                  -- segment clipped against the box
//!       cells.line()
//!         render_hline()              -- per-scanline cover/area deposits
//!           set_curr_cell()
//!   Output: cells with x, y, cover and area
//! Render to an image
//!   render_scanlines(ras, sl, ren)
//!     rewind_scanlines()
//!       close_polygon()
//!       sort_cells()                  -- once, scanline-major x-minor
//!     sweep_scanline()                -- cells -> spans of 8-bit alpha
//!       render()
//!         blend_solid_hspan / blend_hline
//! ```
//!
//! The compound rasterizer runs the same pipeline but tags every edge with a
//! left/right style pair and partitions each scanline's cells per style, so
//! adjoining fills sharing a boundary rasterize without seams or double
//! coverage.

pub mod path;
pub mod cell;
pub mod clip;
pub mod scan;
pub mod raster;
pub mod compound;
pub mod color;
pub mod math;
pub mod buffer;
pub mod pixfmt;
pub mod base;
pub mod render;
pub mod img;

pub use crate::path::*;
pub use crate::cell::*;
pub use crate::clip::*;
pub use crate::scan::*;
pub use crate::raster::*;
pub use crate::compound::*;
pub use crate::color::*;
pub use crate::math::*;
pub use crate::buffer::*;
pub use crate::pixfmt::*;
pub use crate::base::*;
pub use crate::render::*;

/// Fractional bits of the fixed-point coordinate representation
pub const POLY_SUBPIXEL_SHIFT: i64 = 8;
/// Fixed-point scale, `1 << POLY_SUBPIXEL_SHIFT`
pub const POLY_SUBPIXEL_SCALE: i64 = 1 << POLY_SUBPIXEL_SHIFT;
/// Mask extracting the fractional part of a fixed-point coordinate
pub const POLY_SUBPIXEL_MASK: i64 = POLY_SUBPIXEL_SCALE - 1;

pub(crate) const AA_SHIFT: i64 = 8;
pub(crate) const AA_SCALE: i64 = 1 << AA_SHIFT;
pub(crate) const AA_MASK: i64 = AA_SCALE - 1;
pub(crate) const AA_SCALE2: i64 = AA_SCALE * 2;
pub(crate) const AA_MASK2: i64 = AA_SCALE2 - 1;

/// Access to raw pixel component data
pub trait PixelData {
    fn pixeldata(&self) -> &[u8];
}

/// Sweep rasterized cells into scanlines of coverage spans
pub trait Rasterize {
    /// Empty accumulated cells and prepare for a new shape
    fn reset(&mut self);
    /// Pull every vertex of `vs`, starting at `path_id`, into the rasterizer
    fn add_path<VS: VertexSource>(&mut self, vs: &mut VS, path_id: u64);
    /// Close the outline, sort cells, and position at the first scanline
    ///
    /// Returns `false` when there is nothing to draw
    fn rewind_scanlines(&mut self) -> bool;
    /// Fill `sl` with the next non-empty scanline
    ///
    /// Returns `false` when no scanlines remain
    fn sweep_scanline(&mut self, sl: &mut ScanlineU8) -> bool;
    fn min_x(&self) -> i64;
    fn max_x(&self) -> i64;
    fn min_y(&self) -> i64;
    fn max_y(&self) -> i64;
}

/// Render a scanline of coverage spans with a color
pub trait Render {
    /// Render a single scanline
    fn render(&mut self, sl: &ScanlineU8);
    /// Set the current color
    fn color<C: Color>(&mut self, color: &C);
    /// Called once before a rendering pass
    fn prepare(&mut self) {}
}
