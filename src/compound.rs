//! Compound rasterizer: multiple fill styles in one pass
//!
//! Every edge carries the style ids of the fill regions to its left and
//! right. Per scanline the accumulated cells are partitioned into one run
//! per active style, crediting `(area, cover)` to the left style and
//! `(-area, -cover)` to the right one, so a region's coverage accumulates
//! from "enter at my left boundary, leave at my right boundary" exactly as
//! in the single-style sweep. Adjoining regions sharing an edge therefore
//! fill with no seam and no double coverage.

use crate::AA_MASK;
use crate::AA_MASK2;
use crate::AA_SCALE;
use crate::AA_SCALE2;
use crate::AA_SHIFT;
use crate::POLY_SUBPIXEL_SHIFT;

use crate::cell::RasterizerCells;
use crate::clip::Clip;
use crate::path::PathCommand;
use crate::path::VertexSource;
use crate::raster::FillingRule;
use crate::raster::RasConvInt;
use crate::scan::ScanlineU8;

use std::cmp::max;
use std::cmp::min;

/// Reserved style id meaning "no fill"
///
/// Always present first in the active-style table, so real styles keep a
/// deterministic position relative to the background.
pub const STYLE_NONE: i16 = -1;

/// Fill styles on either side of a directed edge
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StylePair {
    pub left: i16,
    pub right: i16,
}

impl Default for StylePair {
    fn default() -> Self {
        Self {
            left: STYLE_NONE,
            right: STYLE_NONE,
        }
    }
}

/// Order in which `style(idx)` walks the active styles of a scanline
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LayerOrder {
    /// Table order as the styles were encountered
    Unsorted,
    /// Decreasing style id
    Direct,
    /// Increasing style id
    Inverse,
}

/// Partitioned run of one style within the current scanline
#[derive(Debug, Copy, Clone)]
struct StyleInfo {
    start_cell: u32,
    num_cells: u32,
    last_x: i64,
}

impl Default for StyleInfo {
    fn default() -> Self {
        Self {
            start_cell: 0,
            num_cells: 0,
            last_x: std::i64::MIN,
        }
    }
}

/// Cell attributed to a single style
#[derive(Debug, Copy, Clone, Default)]
struct CellInfo {
    x: i64,
    area: i64,
    cover: i64,
}

/// Multi-style polygon rasterizer
///
/// Same accumulation and sweep machinery as the scanline rasterizer, with
/// style-tagged cells and a per-scanline active-style table. Owns its
/// buffers exclusively; `reset` before reusing for a new shape.
#[derive(Debug)]
pub struct RasterizerCompound {
    clipper: Clip,
    outline: RasterizerCells<StylePair>,
    filling_rule: FillingRule,
    layer_order: LayerOrder,
    styles: Vec<StyleInfo>,
    active_styles: Vec<u32>,
    style_mask: Vec<u8>,
    cells: Vec<CellInfo>,
    min_style: i64,
    max_style: i64,
    start_x: i64,
    start_y: i64,
    scan_y: i64,
}

impl Default for RasterizerCompound {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterizerCompound {
    pub fn new() -> Self {
        Self {
            clipper: Clip::new(),
            outline: RasterizerCells::new(),
            filling_rule: FillingRule::NonZero,
            layer_order: LayerOrder::Direct,
            styles: vec![],
            active_styles: vec![],
            style_mask: vec![],
            cells: vec![],
            min_style: std::i64::MAX,
            max_style: std::i64::MIN,
            start_x: 0,
            start_y: 0,
            scan_y: std::i64::MAX,
        }
    }
    /// Empty accumulated cells and styles for a new shape
    pub fn reset(&mut self) {
        self.outline.reset();
        self.min_style = std::i64::MAX;
        self.max_style = std::i64::MIN;
        self.scan_y = std::i64::MAX;
    }
    /// Remove the clip box, discarding accumulated geometry
    pub fn reset_clipping(&mut self) {
        self.reset();
        self.clipper.reset_clipping();
    }
    /// Set the clip box, discarding accumulated geometry
    pub fn clip_box(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.reset();
        self.clipper.clip_box(
            RasConvInt::upscale(x1),
            RasConvInt::upscale(y1),
            RasConvInt::upscale(x2),
            RasConvInt::upscale(y2),
        );
    }
    pub fn filling_rule(&mut self, filling_rule: FillingRule) {
        self.filling_rule = filling_rule;
    }
    pub fn layer_order(&mut self, order: LayerOrder) {
        self.layer_order = order;
    }

    /// Tag subsequently-added edges with a left/right style pair
    ///
    /// Negative ids mean "no fill" on that side.
    pub fn styles(&mut self, left: i64, right: i64) {
        self.outline.set_style(StylePair {
            left: left as i16,
            right: right as i16,
        });
        if left >= 0 {
            self.min_style = min(self.min_style, left);
            self.max_style = max(self.max_style, left);
        }
        if right >= 0 {
            self.min_style = min(self.min_style, right);
            self.max_style = max(self.max_style, right);
        }
    }

    /// Move to a point in fixed-point coordinates
    pub fn move_to(&mut self, x: i64, y: i64) {
        if self.outline.sorted() {
            self.reset();
        }
        self.start_x = x;
        self.start_y = y;
        self.clipper.move_to(x, y);
    }
    /// Draw an edge to a point in fixed-point coordinates
    pub fn line_to(&mut self, x: i64, y: i64) {
        self.clipper.line_to(&mut self.outline, x, y);
    }
    pub fn move_to_d(&mut self, x: f64, y: f64) {
        self.move_to(RasConvInt::upscale(x), RasConvInt::upscale(y));
    }
    pub fn line_to_d(&mut self, x: f64, y: f64) {
        self.line_to(RasConvInt::upscale(x), RasConvInt::upscale(y));
    }
    /// Close the current polygon back to its starting point
    pub fn close_polygon(&mut self) {
        let (x, y) = (self.start_x, self.start_y);
        self.clipper.line_to(&mut self.outline, x, y);
    }
    pub fn add_vertex(&mut self, x: f64, y: f64, cmd: PathCommand) {
        match cmd {
            PathCommand::MoveTo => self.move_to_d(x, y),
            PathCommand::LineTo => self.line_to_d(x, y),
            PathCommand::Close => self.close_polygon(),
            PathCommand::Stop => {}
        }
    }
    /// Pull every vertex of `vs`, starting at `path_id`, into the rasterizer
    pub fn add_path<VS: VertexSource>(&mut self, vs: &mut VS, path_id: u64) {
        vs.rewind(path_id);
        if self.outline.sorted() {
            self.reset();
        }
        loop {
            let v = vs.vertex();
            if v.cmd == PathCommand::Stop {
                break;
            }
            self.add_vertex(v.x, v.y, v.cmd);
        }
    }

    pub fn min_x(&self) -> i64 {
        self.outline.min_x()
    }
    pub fn max_x(&self) -> i64 {
        self.outline.max_x()
    }
    pub fn min_y(&self) -> i64 {
        self.outline.min_y()
    }
    pub fn max_y(&self) -> i64 {
        self.outline.max_y()
    }
    pub fn min_style(&self) -> i64 {
        self.min_style
    }
    pub fn max_style(&self) -> i64 {
        self.max_style
    }

    /// Sort cells and position at the first scanline
    ///
    /// Returns `false` when there are no cells or no styles in range:
    /// nothing to render.
    pub fn rewind_scanlines(&mut self) -> bool {
        self.outline.sort_cells();
        tracing::debug!(
            cells = self.outline.total_cells(),
            min_style = self.min_style,
            max_style = self.max_style,
            "rewind compound scanlines"
        );
        if self.outline.total_cells() == 0 {
            return false;
        }
        if self.max_style < self.min_style {
            return false;
        }
        self.scan_y = self.outline.min_y();
        let num_styles = (self.max_style - self.min_style + 2) as usize;
        self.styles.clear();
        self.styles.resize(num_styles, StyleInfo::default());
        true
    }

    /// Table slot of a style id; negative ids share the "no fill" slot 0
    fn style_slot(&self, style: i16) -> usize {
        if style < 0 {
            0
        } else {
            (style as i64 - self.min_style + 1) as usize
        }
    }

    fn add_style(&mut self, slot: usize) {
        let nbyte = slot >> 3;
        let mask = 1u8 << (slot & 7);
        if (self.style_mask[nbyte] & mask) == 0 {
            self.active_styles.push(slot as u32);
            self.style_mask[nbyte] |= mask;
            self.styles[slot] = StyleInfo::default();
        }
        // First pass counts cells per style in start_cell
        self.styles[slot].start_cell += 1;
    }

    /// Partition the next non-background scanline by style
    ///
    /// Returns the number of active styles excluding the background, or 0
    /// when no scanlines remain. Scanlines containing only background
    /// coverage are skipped automatically.
    pub fn sweep_styles(&mut self) -> u64 {
        loop {
            if self.scan_y > self.outline.max_y() {
                return 0;
            }
            let row: Vec<u32> = self.outline.scanline_cells(self.scan_y).to_vec();
            let num_styles = (self.max_style - self.min_style + 2) as usize;

            self.cells.clear();
            self.cells.resize(row.len() * 2, CellInfo::default());
            self.active_styles.clear();
            self.style_mask.clear();
            self.style_mask.resize((num_styles + 7) >> 3, 0);

            if !row.is_empty() {
                // Background style occupies slot 0 of every scanline
                self.style_mask[0] |= 1;
                self.active_styles.push(0);
                self.styles[0] = StyleInfo::default();

                // Pass 1: count cells per style
                for &idx in &row {
                    let (left, right) = {
                        let c = self.outline.cell(idx);
                        (c.style.left, c.style.right)
                    };
                    let (ls, rs) = (self.style_slot(left), self.style_slot(right));
                    self.add_style(ls);
                    self.add_style(rs);
                }

                // Convert the histogram into run start offsets
                let mut start_cell = 0;
                for &slot in &self.active_styles {
                    let st = &mut self.styles[slot as usize];
                    let count = st.start_cell;
                    st.start_cell = start_cell;
                    start_cell += count;
                }

                // Pass 2: distribute, left as-is and right negated, merging
                // consecutive cells that share an x within a style's run
                for &idx in &row {
                    let c = *self.outline.cell(idx);

                    let slot = self.style_slot(c.style.left);
                    let st = &mut self.styles[slot];
                    if c.x == st.last_x {
                        let ci = (st.start_cell + st.num_cells - 1) as usize;
                        self.cells[ci].area += c.area;
                        self.cells[ci].cover += c.cover;
                    } else {
                        let ci = (st.start_cell + st.num_cells) as usize;
                        self.cells[ci] = CellInfo {
                            x: c.x,
                            area: c.area,
                            cover: c.cover,
                        };
                        st.last_x = c.x;
                        st.num_cells += 1;
                    }

                    let slot = self.style_slot(c.style.right);
                    let st = &mut self.styles[slot];
                    if c.x == st.last_x {
                        let ci = (st.start_cell + st.num_cells - 1) as usize;
                        self.cells[ci].area -= c.area;
                        self.cells[ci].cover -= c.cover;
                    } else {
                        let ci = (st.start_cell + st.num_cells) as usize;
                        self.cells[ci] = CellInfo {
                            x: c.x,
                            area: -c.area,
                            cover: -c.cover,
                        };
                        st.last_x = c.x;
                        st.num_cells += 1;
                    }
                }
            }

            if self.active_styles.len() > 1 {
                break;
            }
            self.scan_y += 1;
        }
        self.scan_y += 1;

        if self.layer_order != LayerOrder::Unsorted {
            let tail = &mut self.active_styles[1..];
            match self.layer_order {
                LayerOrder::Direct => tail.sort_unstable_by(|a, b| b.cmp(a)),
                LayerOrder::Inverse => tail.sort_unstable(),
                LayerOrder::Unsorted => {}
            }
        }

        (self.active_styles.len() - 1) as u64
    }

    /// Caller's style id of active style index `idx` (0-based, background
    /// excluded)
    pub fn style(&self, idx: u64) -> i64 {
        self.active_styles[idx as usize + 1] as i64 + self.min_style - 1
    }

    /// Sweep the partitioned cells of one active style into `sl`
    ///
    /// `style_idx` is an index returned in range by the last
    /// `sweep_styles`, or negative for the background style. Returns
    /// `false` when the style contributes nothing on this scanline.
    pub fn sweep_scanline(&self, sl: &mut ScanlineU8, style_idx: i64) -> bool {
        let scan_y = self.scan_y - 1;
        if scan_y > self.outline.max_y() {
            return false;
        }
        sl.reset_spans();

        let slot = if style_idx < 0 { 0 } else { style_idx as usize + 1 };
        if slot >= self.active_styles.len() {
            return false;
        }
        let st = self.styles[self.active_styles[slot] as usize];
        let mut num_cells = st.num_cells as usize;
        let mut ci = st.start_cell as usize;

        let mut cover = 0;
        while num_cells > 0 {
            num_cells -= 1;
            let cell = self.cells[ci];
            let mut x = cell.x;
            let area = cell.area;
            cover += cell.cover;
            ci += 1;

            if area != 0 {
                let alpha = self.calculate_alpha((cover << (POLY_SUBPIXEL_SHIFT + 1)) - area);
                sl.add_cell(x, alpha);
                x += 1;
            }
            if num_cells > 0 && self.cells[ci].x > x {
                let alpha = self.calculate_alpha(cover << (POLY_SUBPIXEL_SHIFT + 1));
                if alpha > 0 {
                    sl.add_span(x, self.cells[ci].x - x, alpha);
                }
            }
        }

        if sl.num_spans() == 0 {
            return false;
        }
        sl.finalize(scan_y);
        true
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
        max(0, min(cover, AA_MASK)) as u64
    }
}
