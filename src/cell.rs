//! Coverage cells and the line-to-cell rasterization algorithm

use crate::POLY_SUBPIXEL_MASK;
use crate::POLY_SUBPIXEL_SCALE;
use crate::POLY_SUBPIXEL_SHIFT;

use std::cmp::max;
use std::cmp::min;

/// Per-cell style payload
///
/// The scanline rasterizer carries no payload (`()`); the compound
/// rasterizer attaches a left/right style pair. A style change forces a new
/// cell even at an unchanged pixel position.
pub trait CellStyle: Copy + Default + PartialEq {}
impl<T: Copy + Default + PartialEq> CellStyle for T {}

/// Coverage accumulator for a single pixel
///
/// `cover` counts signed sub-pixel vertical crossings; `area` accumulates
/// the signed double-area swept within the cell. Both are summed over every
/// edge that touches the pixel.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Cell<S: CellStyle> {
    pub x: i64,
    pub y: i64,
    pub cover: i64,
    pub area: i64,
    pub style: S,
}

impl<S: CellStyle> Cell<S> {
    /// Sentinel cell at an unrepresentable position
    pub fn new() -> Self {
        Cell {
            x: std::i64::MAX,
            y: std::i64::MAX,
            cover: 0,
            area: 0,
            style: S::default(),
        }
    }
    pub fn is_empty(&self) -> bool {
        self.cover == 0 && self.area == 0
    }
}

impl<S: CellStyle> Default for Cell<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default, Copy, Clone)]
struct SortedRow {
    start: u32,
    num: u32,
}

/// Growable store of coverage cells plus the line rasterization algorithm
///
/// Cells are appended in path order and merged by summation whenever the
/// position (and style) of the current cell is unchanged. `sort_cells`
/// builds the scanline-major, x-minor iteration order exactly once;
/// re-sorting a sorted store is a no-op.
#[derive(Debug)]
pub struct RasterizerCells<S: CellStyle> {
    cells: Vec<Cell<S>>,
    curr_cell: Cell<S>,
    style: S,
    sorted_cells: Vec<u32>,
    sorted_y: Vec<SortedRow>,
    min_x: i64,
    min_y: i64,
    max_x: i64,
    max_y: i64,
    sorted: bool,
}

impl<S: CellStyle> Default for RasterizerCells<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CellStyle> RasterizerCells<S> {
    pub fn new() -> Self {
        Self {
            cells: vec![],
            curr_cell: Cell::new(),
            style: S::default(),
            sorted_cells: vec![],
            sorted_y: vec![],
            min_x: std::i64::MAX,
            min_y: std::i64::MAX,
            max_x: std::i64::MIN,
            max_y: std::i64::MIN,
            sorted: false,
        }
    }
    /// Empty the store for a new shape
    pub fn reset(&mut self) {
        self.cells.clear();
        self.sorted_cells.clear();
        self.sorted_y.clear();
        self.curr_cell = Cell::new();
        self.min_x = std::i64::MAX;
        self.min_y = std::i64::MAX;
        self.max_x = std::i64::MIN;
        self.max_y = std::i64::MIN;
        self.sorted = false;
    }
    /// Style applied to cells started after this call
    pub fn set_style(&mut self, style: S) {
        self.style = style;
    }
    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }
    pub fn sorted(&self) -> bool {
        self.sorted
    }
    pub fn min_x(&self) -> i64 {
        self.min_x
    }
    pub fn min_y(&self) -> i64 {
        self.min_y
    }
    pub fn max_x(&self) -> i64 {
        self.max_x
    }
    pub fn max_y(&self) -> i64 {
        self.max_y
    }

    /// Cell indices of scanline `y` in increasing-x order
    ///
    /// Empty until `sort_cells` has run.
    pub fn scanline_cells(&self, y: i64) -> &[u32] {
        if self.sorted_y.is_empty() || y < self.min_y || y > self.max_y {
            return &[];
        }
        let row = self.sorted_y[(y - self.min_y) as usize];
        &self.sorted_cells[row.start as usize..(row.start + row.num) as usize]
    }
    pub fn scanline_num_cells(&self, y: i64) -> usize {
        self.scanline_cells(y).len()
    }
    pub fn cell(&self, idx: u32) -> &Cell<S> {
        &self.cells[idx as usize]
    }

    fn add_curr_cell(&mut self) {
        if !self.curr_cell.is_empty() {
            self.cells.push(self.curr_cell);
        }
    }
    fn set_curr_cell(&mut self, x: i64, y: i64) {
        let c = &self.curr_cell;
        if c.x != x || c.y != y || c.style != self.style {
            self.add_curr_cell();
            self.curr_cell = Cell {
                x,
                y,
                cover: 0,
                area: 0,
                style: self.style,
            };
        }
    }

    /// Distribute the edge's coverage across the cells of scanline `ey`
    ///
    /// `x1`,`x2` are full fixed-point positions; `y1`,`y2` are sub-pixel
    /// offsets within the scanline.
    fn render_hline(&mut self, ey: i64, x1: i64, y1: i64, x2: i64, y2: i64) {
        let ex1 = x1 >> POLY_SUBPIXEL_SHIFT;
        let ex2 = x2 >> POLY_SUBPIXEL_SHIFT;
        let fx1 = x1 & POLY_SUBPIXEL_MASK;
        let fx2 = x2 & POLY_SUBPIXEL_MASK;

        // Horizontal segments deposit no cover
        if y1 == y2 {
            self.set_curr_cell(ex2, ey);
            return;
        }

        // Everything in a single cell
        if ex1 == ex2 {
            let delta = y2 - y1;
            self.curr_cell.cover += delta;
            self.curr_cell.area += (fx1 + fx2) * delta;
            return;
        }

        // The edge runs across adjacent cells of the same scanline
        let (mut p, first, incr, dx) = if x2 - x1 < 0 {
            (fx1 * (y2 - y1), 0, -1, x1 - x2)
        } else {
            ((POLY_SUBPIXEL_SCALE - fx1) * (y2 - y1), POLY_SUBPIXEL_SCALE, 1, x2 - x1)
        };
        let mut delta = p / dx;
        let mut xmod = p % dx;
        if xmod < 0 {
            delta -= 1;
            xmod += dx;
        }
        self.curr_cell.cover += delta;
        self.curr_cell.area += (fx1 + first) * delta;

        let mut ex1 = ex1 + incr;
        self.set_curr_cell(ex1, ey);
        let mut y1 = y1 + delta;

        if ex1 != ex2 {
            p = POLY_SUBPIXEL_SCALE * (y2 - y1 + delta);
            let mut lift = p / dx;
            let mut rem = p % dx;
            if rem < 0 {
                lift -= 1;
                rem += dx;
            }
            xmod -= dx;
            while ex1 != ex2 {
                delta = lift;
                xmod += rem;
                if xmod >= 0 {
                    xmod -= dx;
                    delta += 1;
                }
                self.curr_cell.cover += delta;
                self.curr_cell.area += POLY_SUBPIXEL_SCALE * delta;
                y1 += delta;
                ex1 += incr;
                self.set_curr_cell(ex1, ey);
            }
        }
        delta = y2 - y1;
        self.curr_cell.cover += delta;
        self.curr_cell.area += (fx2 + POLY_SUBPIXEL_SCALE - first) * delta;
    }

    /// Deposit the coverage of one line segment, in fixed-point coordinates
    ///
    /// Coordinates are the caller's contract; out-of-range values produce
    /// garbage cells, never an error.
    pub fn line(&mut self, x1: i64, y1: i64, x2: i64, y2: i64) {
        let dx_limit = 16384 << POLY_SUBPIXEL_SHIFT;
        let dx = x2 - x1;
        // Halve overlong segments until the hline walker can take them
        if dx >= dx_limit || dx <= -dx_limit {
            let cx = (x1 + x2) / 2;
            let cy = (y1 + y2) / 2;
            self.line(x1, y1, cx, cy);
            self.line(cx, cy, x2, y2);
            return;
        }

        let dy = y2 - y1;
        let ex1 = x1 >> POLY_SUBPIXEL_SHIFT;
        let ex2 = x2 >> POLY_SUBPIXEL_SHIFT;
        let mut ey1 = y1 >> POLY_SUBPIXEL_SHIFT;
        let ey2 = y2 >> POLY_SUBPIXEL_SHIFT;
        let fy1 = y1 & POLY_SUBPIXEL_MASK;
        let fy2 = y2 & POLY_SUBPIXEL_MASK;

        self.min_x = min(ex2, min(ex1, self.min_x));
        self.min_y = min(ey2, min(ey1, self.min_y));
        self.max_x = max(ex2, max(ex1, self.max_x));
        self.max_y = max(ey2, max(ey1, self.max_y));

        self.set_curr_cell(ex1, ey1);

        // Single scanline
        if ey1 == ey2 {
            self.render_hline(ey1, x1, fy1, x2, fy2);
            return;
        }

        // Vertical segment: every scanline gets the same two-cell pattern
        if dx == 0 {
            let ex = x1 >> POLY_SUBPIXEL_SHIFT;
            let two_fx = (x1 - (ex << POLY_SUBPIXEL_SHIFT)) << 1;
            let (first, incr) = if dy < 0 { (0, -1) } else { (POLY_SUBPIXEL_SCALE, 1) };

            let mut delta = first - fy1;
            self.curr_cell.cover += delta;
            self.curr_cell.area += two_fx * delta;

            ey1 += incr;
            self.set_curr_cell(ex, ey1);
            delta = first + first - POLY_SUBPIXEL_SCALE;
            let area = two_fx * delta;
            while ey1 != ey2 {
                self.curr_cell.cover = delta;
                self.curr_cell.area = area;
                ey1 += incr;
                self.set_curr_cell(ex, ey1);
            }
            delta = fy2 - POLY_SUBPIXEL_SCALE + first;
            self.curr_cell.cover += delta;
            self.curr_cell.area += two_fx * delta;
            return;
        }

        // General case: walk scanlines, delegating each to render_hline
        let (mut p, first, incr, dy) = if dy < 0 {
            (fy1 * dx, 0, -1, -dy)
        } else {
            ((POLY_SUBPIXEL_SCALE - fy1) * dx, POLY_SUBPIXEL_SCALE, 1, dy)
        };
        let mut delta = p / dy;
        let mut xmod = p % dy;
        if xmod < 0 {
            delta -= 1;
            xmod += dy;
        }
        let mut x_from = x1 + delta;
        self.render_hline(ey1, x1, fy1, x_from, first);
        ey1 += incr;
        self.set_curr_cell(x_from >> POLY_SUBPIXEL_SHIFT, ey1);

        if ey1 != ey2 {
            p = POLY_SUBPIXEL_SCALE * dx;
            let mut lift = p / dy;
            let mut rem = p % dy;
            if rem < 0 {
                lift -= 1;
                rem += dy;
            }
            xmod -= dy;
            while ey1 != ey2 {
                delta = lift;
                xmod += rem;
                if xmod >= 0 {
                    xmod -= dy;
                    delta += 1;
                }
                let x_to = x_from + delta;
                self.render_hline(ey1, x_from, POLY_SUBPIXEL_SCALE - first, x_to, first);
                x_from = x_to;
                ey1 += incr;
                self.set_curr_cell(x_from >> POLY_SUBPIXEL_SHIFT, ey1);
            }
        }
        self.render_hline(ey1, x_from, POLY_SUBPIXEL_SCALE - first, x2, fy2);
    }

    /// Build the scanline-major, x-minor iteration order
    ///
    /// Counting sort by scanline into `{start, num}` row offsets, then an
    /// in-row sort by x. Idempotent: a second call returns immediately.
    pub fn sort_cells(&mut self) {
        if self.sorted {
            return;
        }
        self.add_curr_cell();
        self.curr_cell = Cell::new();
        if self.cells.is_empty() {
            return;
        }
        tracing::debug!(
            cells = self.cells.len(),
            min_y = self.min_y,
            max_y = self.max_y,
            "sorting coverage cells"
        );

        self.sorted_cells.clear();
        self.sorted_cells.resize(self.cells.len(), 0);
        self.sorted_y.clear();
        self.sorted_y
            .resize((self.max_y - self.min_y + 1) as usize, SortedRow::default());

        // Histogram of cells per scanline, then prefix offsets
        for c in &self.cells {
            self.sorted_y[(c.y - self.min_y) as usize].start += 1;
        }
        let mut start = 0;
        for row in &mut self.sorted_y {
            let count = row.start;
            row.start = start;
            start += count;
        }
        for (i, c) in self.cells.iter().enumerate() {
            let row = &mut self.sorted_y[(c.y - self.min_y) as usize];
            self.sorted_cells[(row.start + row.num) as usize] = i as u32;
            row.num += 1;
        }
        let cells = &self.cells;
        for row in &self.sorted_y {
            if row.num > 0 {
                let s = row.start as usize;
                let e = s + row.num as usize;
                self.sorted_cells[s..e].sort_unstable_by_key(|&i| cells[i as usize].x);
            }
        }
        self.sorted = true;
    }
}
