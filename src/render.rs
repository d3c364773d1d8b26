//! Renderers: scanlines of coverage spans into blended pixels

use crate::base::RenderingBase;
use crate::color::Color;
use crate::color::Rgba8;
use crate::compound::RasterizerCompound;
use crate::path::VertexSource;
use crate::pixfmt::Pixel;
use crate::scan::ScanlineU8;
use crate::Rasterize;
use crate::Render;

/// Solid-color renderer without anti-aliasing
pub struct RenderingScanlineBinSolid<'a, T: Pixel> {
    pub base: &'a mut RenderingBase<T>,
    pub color: Rgba8,
}

/// Solid-color renderer with anti-aliasing
pub struct RenderingScanlineAASolid<'a, T: Pixel> {
    pub base: &'a mut RenderingBase<T>,
    pub color: Rgba8,
}

/// Render one scanline at full coverage, span lengths only
fn render_scanline_bin_solid<T: Pixel, C: Color>(
    sl: &ScanlineU8,
    ren: &mut RenderingBase<T>,
    color: &C,
) {
    let cover_full = 255;
    for span in sl.spans() {
        ren.blend_hline(
            span.x,
            sl.y(),
            span.x - 1 + span.len.abs(),
            color,
            cover_full,
        );
    }
}

/// Render one scanline honoring per-pixel and constant coverage
fn render_scanline_aa_solid<T: Pixel, C: Color>(
    sl: &ScanlineU8,
    ren: &mut RenderingBase<T>,
    color: &C,
) {
    let y = sl.y();
    for span in sl.spans() {
        if span.len > 0 {
            ren.blend_solid_hspan(span.x, y, span.len, color, &span.covers);
        } else {
            ren.blend_hline(span.x, y, span.x - span.len - 1, color, span.covers[0]);
        }
    }
}

impl<'a, T: Pixel> Render for RenderingScanlineAASolid<'a, T> {
    fn render(&mut self, sl: &ScanlineU8) {
        render_scanline_aa_solid(sl, self.base, &self.color);
    }
    fn color<C: Color>(&mut self, color: &C) {
        self.color = Rgba8::from_color(color);
    }
}

impl<'a, T: Pixel> Render for RenderingScanlineBinSolid<'a, T> {
    fn render(&mut self, sl: &ScanlineU8) {
        render_scanline_bin_solid(sl, self.base, &self.color);
    }
    fn color<C: Color>(&mut self, color: &C) {
        self.color = Rgba8::from_color(color);
    }
}

impl<'a, T: Pixel> RenderingScanlineBinSolid<'a, T> {
    /// Create a new renderer over a rendering base
    pub fn with_base(base: &'a mut RenderingBase<T>) -> Self {
        Self {
            base,
            color: Rgba8::black(),
        }
    }
}

impl<'a, T: Pixel> RenderingScanlineAASolid<'a, T> {
    /// Create a new renderer over a rendering base
    pub fn with_base(base: &'a mut RenderingBase<T>) -> Self {
        Self {
            base,
            color: Rgba8::black(),
        }
    }
}

/// Rewind the rasterizer and render every scanline with the current color
pub fn render_scanlines<RAS, REN>(ras: &mut RAS, sl: &mut ScanlineU8, ren: &mut REN)
where
    RAS: Rasterize,
    REN: Render,
{
    if ras.rewind_scanlines() {
        sl.reset(ras.min_x(), ras.max_x());
        ren.prepare();
        while ras.sweep_scanline(sl) {
            ren.render(sl);
        }
    }
}

/// Rasterize and render each path in its own color
pub fn render_all_paths<RAS, REN, VS, C>(
    ras: &mut RAS,
    sl: &mut ScanlineU8,
    ren: &mut REN,
    paths: &mut [VS],
    colors: &[C],
) where
    RAS: Rasterize,
    REN: Render,
    VS: VertexSource,
    C: Color,
{
    debug_assert!(paths.len() == colors.len());
    for (path, color) in paths.iter_mut().zip(colors.iter()) {
        ras.reset();
        ras.add_path(path, 0);
        ren.color(color);
        render_scanlines(ras, sl, ren);
    }
}

/// Render a compound rasterization, one solid color per style id
///
/// Styles whose id has no entry in `colors` are skipped.
pub fn render_scanlines_compound<T: Pixel>(
    ras: &mut RasterizerCompound,
    sl: &mut ScanlineU8,
    base: &mut RenderingBase<T>,
    colors: &[Rgba8],
) {
    if !ras.rewind_scanlines() {
        return;
    }
    sl.reset(ras.min_x(), ras.max_x());
    loop {
        let num_styles = ras.sweep_styles();
        if num_styles == 0 {
            break;
        }
        for i in 0..num_styles {
            if ras.sweep_scanline(sl, i as i64) {
                let style = ras.style(i);
                if let Some(color) = colors.get(style as usize) {
                    render_scanline_aa_solid(sl, base, color);
                }
            }
        }
    }
}
