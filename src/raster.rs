//! Anti-aliased scanline rasterizer

use crate::AA_MASK;
use crate::AA_MASK2;
use crate::AA_SCALE;
use crate::AA_SCALE2;
use crate::AA_SHIFT;
use crate::POLY_SUBPIXEL_SCALE;
use crate::POLY_SUBPIXEL_SHIFT;

use crate::cell::RasterizerCells;
use crate::clip::Clip;
use crate::path::PathCommand;
use crate::path::VertexSource;
use crate::scan::ScanlineU8;
use crate::Rasterize;

use std::cmp::max;
use std::cmp::min;

/// Conversion between floating-point path coordinates and the fixed-point
/// integers all rasterization math runs on
pub struct RasConvInt;
impl RasConvInt {
    pub fn upscale(v: f64) -> i64 {
        (v * POLY_SUBPIXEL_SCALE as f64).round() as i64
    }
    pub fn downscale(v: i64) -> i64 {
        v
    }
}

/// Winding convention deciding which crossings fill
#[derive(Debug, PartialEq, Copy, Clone)]
pub enum FillingRule {
    NonZero,
    EvenOdd,
}
impl Default for FillingRule {
    fn default() -> FillingRule {
        FillingRule::NonZero
    }
}

#[derive(Debug, PartialEq, Copy, Clone)]
pub enum PathStatus {
    Initial,
    Closed,
    MoveTo,
    LineTo,
}
impl Default for PathStatus {
    fn default() -> PathStatus {
        PathStatus::Initial
    }
}

/// Polygon rasterizer producing anti-aliased scanlines
///
/// Owns its cell store and clip state exclusively; an instance accumulates
/// a single shape and must be `reset` before reuse.
#[derive(Debug)]
pub struct RasterizerScanline {
    clipper: Clip,
    outline: RasterizerCells<()>,
    status: PathStatus,
    start_x: i64,
    start_y: i64,
    scan_y: i64,
    filling_rule: FillingRule,
    gamma: Vec<u64>,
}

impl Rasterize for RasterizerScanline {
    fn reset(&mut self) {
        self.outline.reset();
        self.status = PathStatus::Initial;
    }
    fn add_path<VS: VertexSource>(&mut self, vs: &mut VS, path_id: u64) {
        vs.rewind(path_id);
        if self.outline.sorted() {
            self.reset();
        }
        loop {
            let v = vs.vertex();
            match v.cmd {
                PathCommand::Stop => break,
                PathCommand::MoveTo => self.move_to_d(v.x, v.y),
                PathCommand::LineTo => self.line_to_d(v.x, v.y),
                PathCommand::Close => self.close_polygon(),
            }
        }
    }
    fn rewind_scanlines(&mut self) -> bool {
        self.close_polygon();
        self.outline.sort_cells();
        tracing::debug!(cells = self.outline.total_cells(), "rewind scanlines");
        if self.outline.total_cells() == 0 {
            return false;
        }
        self.scan_y = self.outline.min_y();
        true
    }
    fn sweep_scanline(&mut self, sl: &mut ScanlineU8) -> bool {
        loop {
            if self.scan_y > self.outline.max_y() {
                return false;
            }
            sl.reset_spans();

            let row = self.outline.scanline_cells(self.scan_y);
            let mut cover = 0;
            let mut i = 0;
            while i < row.len() {
                let c = self.outline.cell(row[i]);
                let mut x = c.x;
                let mut area = c.area;
                cover += c.cover;
                i += 1;
                // Accumulate all cells with the same x
                while i < row.len() {
                    let c = self.outline.cell(row[i]);
                    if c.x != x {
                        break;
                    }
                    area += c.area;
                    cover += c.cover;
                    i += 1;
                }
                if area != 0 {
                    let alpha =
                        self.calculate_alpha((cover << (POLY_SUBPIXEL_SHIFT + 1)) - area);
                    if alpha > 0 {
                        sl.add_cell(x, alpha);
                    }
                    x += 1;
                }
                if i < row.len() {
                    let next_x = self.outline.cell(row[i]).x;
                    if next_x > x {
                        let alpha = self.calculate_alpha(cover << (POLY_SUBPIXEL_SHIFT + 1));
                        if alpha > 0 {
                            sl.add_span(x, next_x - x, alpha);
                        }
                    }
                }
            }

            if sl.num_spans() != 0 {
                break;
            }
            self.scan_y += 1;
        }
        sl.finalize(self.scan_y);
        self.scan_y += 1;
        true
    }
    fn min_x(&self) -> i64 {
        self.outline.min_x()
    }
    fn max_x(&self) -> i64 {
        self.outline.max_x()
    }
    fn min_y(&self) -> i64 {
        self.outline.min_y()
    }
    fn max_y(&self) -> i64 {
        self.outline.max_y()
    }
}

impl Default for RasterizerScanline {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterizerScanline {
    pub fn new() -> Self {
        Self {
            clipper: Clip::new(),
            outline: RasterizerCells::new(),
            status: PathStatus::Initial,
            start_x: 0,
            start_y: 0,
            scan_y: 0,
            filling_rule: FillingRule::NonZero,
            gamma: (0..256).collect(),
        }
    }
    /// Set a gamma function remapping computed coverage
    pub fn gamma<F>(&mut self, gfunc: F)
    where
        F: Fn(f64) -> f64,
    {
        let aa_mask = AA_MASK as f64;
        self.gamma = (0..AA_SCALE)
            .map(|i| gfunc(i as f64 / aa_mask))
            .map(|v| (v * aa_mask).round() as u64)
            .collect();
    }
    pub fn new_with_gamma<F>(gfunc: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        let mut new = Self::new();
        new.gamma(gfunc);
        new
    }
    pub fn filling_rule(&mut self, filling_rule: FillingRule) {
        self.filling_rule = filling_rule;
    }
    /// Set the clip box, discarding accumulated geometry
    ///
    /// Effective for all segments added after the call; a shape must be
    /// rasterized under a single clip configuration.
    pub fn clip_box(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.reset();
        self.clipper.clip_box(
            RasConvInt::upscale(x1),
            RasConvInt::upscale(y1),
            RasConvInt::upscale(x2),
            RasConvInt::upscale(y2),
        );
    }
    /// Remove the clip box, discarding accumulated geometry
    pub fn reset_clipping(&mut self) {
        self.reset();
        self.clipper.reset_clipping();
    }
    pub fn move_to_d(&mut self, x: f64, y: f64) {
        self.move_to(RasConvInt::upscale(x), RasConvInt::upscale(y));
    }
    pub fn line_to_d(&mut self, x: f64, y: f64) {
        self.line_to(RasConvInt::upscale(x), RasConvInt::upscale(y));
    }
    /// Move to a point in fixed-point coordinates
    pub fn move_to(&mut self, x: i64, y: i64) {
        if self.outline.sorted() {
            self.reset();
        }
        if self.status == PathStatus::LineTo {
            self.close_polygon();
        }
        self.start_x = x;
        self.start_y = y;
        self.clipper.move_to(x, y);
        self.status = PathStatus::MoveTo;
    }
    /// Draw a line to a point in fixed-point coordinates
    pub fn line_to(&mut self, x: i64, y: i64) {
        self.clipper.line_to(&mut self.outline, x, y);
        self.status = PathStatus::LineTo;
    }
    /// Close the polygon back to its starting point
    pub fn close_polygon(&mut self) {
        if self.status == PathStatus::LineTo {
            self.clipper.line_to(&mut self.outline, self.start_x, self.start_y);
            self.status = PathStatus::Closed;
        }
    }
    /// Map accumulated area to 8-bit coverage
    pub fn calculate_alpha(&self, area: i64) -> u64 {
        let mut cover = area >> (POLY_SUBPIXEL_SHIFT * 2 + 1 - AA_SHIFT);
        cover = cover.abs();
        if self.filling_rule == FillingRule::EvenOdd {
            cover &= AA_MASK2;
            if cover > AA_SCALE {
                cover = AA_SCALE2 - cover;
            }
        }
        let cover = max(0, min(cover, AA_MASK)) as usize;
        self.gamma[cover]
    }
}
