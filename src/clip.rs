//! Rectangular clipping of line segments
//!
//! Segments are clipped before cell accumulation: each endpoint is
//! classified into a region code relative to the clip box, the segment is
//! decomposed case by case on the horizontal codes, and every piece is
//! clipped vertically by interpolation against the original endpoint
//! coordinates. The decomposition is exact: clipped and unclipped
//! rasterization agree bit for bit along the box edges.

use crate::cell::CellStyle;
use crate::cell::RasterizerCells;

/// Inside the clip box
pub const INSIDE: u8 = 0b0000;
/// Right of the clip box, `x > x2`
pub const RIGHT: u8 = 0b0001;
/// Above the clip box, `y > y2`
pub const TOP: u8 = 0b0010;
/// Left of the clip box, `x < x1`
pub const LEFT: u8 = 0b0100;
/// Below the clip box, `y < y1`
pub const BOTTOM: u8 = 0b1000;

/// Axis-aligned rectangle
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Rectangle<T: PartialOrd + Copy> {
    /// Minimum x value
    pub x1: T,
    /// Minimum y value
    pub y1: T,
    /// Maximum x value
    pub x2: T,
    /// Maximum y value
    pub y2: T,
}

impl<T: PartialOrd + Copy> Rectangle<T> {
    /// Create a new rectangle, normalized so `x1 <= x2` and `y1 <= y2`
    pub fn new(x1: T, y1: T, x2: T, y2: T) -> Self {
        let (x1, x2) = if x1 > x2 { (x2, x1) } else { (x1, x2) };
        let (y1, y2) = if y1 > y2 { (y2, y1) } else { (y1, y2) };
        Self { x1, y1, x2, y2 }
    }
    /// Region code of the point (x,y) relative to this rectangle
    pub fn clip_flags(&self, x: T, y: T) -> u8 {
        clip_flags(x, y, self)
    }
    /// Grow to include the point (x,y)
    pub fn expand(&mut self, x: T, y: T) {
        if x < self.x1 {
            self.x1 = x;
        }
        if x > self.x2 {
            self.x2 = x;
        }
        if y < self.y1 {
            self.y1 = y;
        }
        if y > self.y2 {
            self.y2 = y;
        }
    }
    /// Grow to include another rectangle
    pub fn expand_rect(&mut self, r: &Rectangle<T>) {
        self.expand(r.x1, r.y1);
        self.expand(r.x2, r.y2);
    }
}

/// Region code of a point: combination of [RIGHT], [TOP], [LEFT], [BOTTOM]
///
/// ```text
///        |        |
///  0110  |  0010  | 0011
/// -------+--------+-------- y2
///  0100  |  0000  | 0001
/// -------+--------+-------- y1
///  1100  |  1000  | 1001
///        |        |
///        x1       x2
/// ```
pub fn clip_flags<T: PartialOrd + Copy>(x: T, y: T, b: &Rectangle<T>) -> u8 {
    let mut code = INSIDE;
    if x > b.x2 {
        code |= RIGHT;
    }
    if y > b.y2 {
        code |= TOP;
    }
    if x < b.x1 {
        code |= LEFT;
    }
    if y < b.y1 {
        code |= BOTTOM;
    }
    code
}

/// Horizontal bits of the region code
pub fn clip_flags_x<T: PartialOrd + Copy>(x: T, b: &Rectangle<T>) -> u8 {
    let mut code = INSIDE;
    if x > b.x2 {
        code |= RIGHT;
    }
    if x < b.x1 {
        code |= LEFT;
    }
    code
}

/// Vertical bits of the region code
pub fn clip_flags_y<T: PartialOrd + Copy>(y: T, b: &Rectangle<T>) -> u8 {
    let mut code = INSIDE;
    if y > b.y2 {
        code |= TOP;
    }
    if y < b.y1 {
        code |= BOTTOM;
    }
    code
}

fn mul_div(a: i64, b: i64, c: i64) -> i64 {
    let (a, b, c) = (a as f64, b as f64, c as f64);
    (a * b / c).round() as i64
}

/// Clip the vertical extent of a sub-segment and pass it to the cells
///
/// `f1`/`f2` are the endpoint region codes; interpolation runs against the
/// passed endpoints so repeated clipping never compounds rounding error.
fn line_clip_y<S: CellStyle>(
    ras: &mut RasterizerCells<S>,
    b: &Rectangle<i64>,
    x1: i64,
    y1: i64,
    x2: i64,
    y2: i64,
    f1: u8,
    f2: u8,
) {
    let f1 = f1 & (TOP | BOTTOM);
    let f2 = f2 & (TOP | BOTTOM);
    if (f1 | f2) == INSIDE {
        // Fully visible in y
        ras.line(x1, y1, x2, y2);
        return;
    }
    if f1 == f2 {
        // Invisible in y
        return;
    }
    let (mut tx1, mut ty1, mut tx2, mut ty2) = (x1, y1, x2, y2);
    if f1 & BOTTOM != 0 {
        tx1 = x1 + mul_div(b.y1 - y1, x2 - x1, y2 - y1);
        ty1 = b.y1;
    }
    if f1 & TOP != 0 {
        tx1 = x1 + mul_div(b.y2 - y1, x2 - x1, y2 - y1);
        ty1 = b.y2;
    }
    if f2 & BOTTOM != 0 {
        tx2 = x1 + mul_div(b.y1 - y1, x2 - x1, y2 - y1);
        ty2 = b.y1;
    }
    if f2 & TOP != 0 {
        tx2 = x1 + mul_div(b.y2 - y1, x2 - x1, y2 - y1);
        ty2 = b.y2;
    }
    ras.line(tx1, ty1, tx2, ty2);
}

fn line_clip_y2<S: CellStyle>(
    ras: &mut RasterizerCells<S>,
    b: &Rectangle<i64>,
    x1: i64,
    y1: i64,
    x2: i64,
    y2: i64,
    x3: i64,
    y3: i64,
) {
    let f2 = clip_flags_y(y2, b);
    line_clip_y(ras, b, x1, y1, x2, y2, clip_flags_y(y1, b), f2);
    line_clip_y(ras, b, x2, y2, x3, y3, f2, clip_flags_y(y3, b));
}

#[allow(clippy::too_many_arguments)]
fn line_clip_y3<S: CellStyle>(
    ras: &mut RasterizerCells<S>,
    b: &Rectangle<i64>,
    x1: i64,
    y1: i64,
    x2: i64,
    y2: i64,
    x3: i64,
    y3: i64,
    x4: i64,
    y4: i64,
) {
    let f2 = clip_flags_y(y2, b);
    let f3 = clip_flags_y(y3, b);
    line_clip_y(ras, b, x1, y1, x2, y2, clip_flags_y(y1, b), f2);
    line_clip_y(ras, b, x2, y2, x3, y3, f2, f3);
    line_clip_y(ras, b, x3, y3, x4, y4, f3, clip_flags_y(y4, b));
}

/// Clipping state for the rasterizers
///
/// Without a clip box every segment passes straight through. With one, a
/// segment is decomposed on its endpoints' horizontal region codes into up
/// to three pieces, each clipped vertically before reaching the cells.
#[derive(Debug, Default)]
pub struct Clip {
    /// Current point, x
    x1: i64,
    /// Current point, y
    y1: i64,
    /// Region code of the current point, valid while clipping
    f1: u8,
    clip_box: Option<Rectangle<i64>>,
}

impl Clip {
    pub fn new() -> Self {
        Self {
            x1: 0,
            y1: 0,
            f1: INSIDE,
            clip_box: None,
        }
    }
    /// Set the clip box; effective for segments added afterwards
    pub fn clip_box(&mut self, x1: i64, y1: i64, x2: i64, y2: i64) {
        let b = Rectangle::new(x1, y1, x2, y2);
        self.clip_box = Some(b);
        self.f1 = clip_flags(self.x1, self.y1, &b);
    }
    /// Remove the clip box
    pub fn reset_clipping(&mut self) {
        self.clip_box = None;
        self.f1 = INSIDE;
    }
    /// Move the current point without emitting geometry
    pub fn move_to(&mut self, x2: i64, y2: i64) {
        self.x1 = x2;
        self.y1 = y2;
        if let Some(ref b) = self.clip_box {
            self.f1 = clip_flags(x2, y2, b);
        }
    }
    /// Clip the segment from the current point to (x2,y2) into `ras`
    pub fn line_to<S: CellStyle>(&mut self, ras: &mut RasterizerCells<S>, x2: i64, y2: i64) {
        if let Some(b) = self.clip_box {
            let f2 = clip_flags(x2, y2, &b);
            let fy1 = self.f1 & (TOP | BOTTOM);
            let fy2 = f2 & (TOP | BOTTOM);
            // Both endpoints above, or both below: nothing visible
            if fy1 != INSIDE && fy1 == fy2 {
                self.x1 = x2;
                self.y1 = y2;
                self.f1 = f2;
                return;
            }
            let (x1, y1, f1) = (self.x1, self.y1, self.f1);
            match (f1 & (LEFT | RIGHT), f2 & (LEFT | RIGHT)) {
                (INSIDE, INSIDE) => line_clip_y(ras, &b, x1, y1, x2, y2, f1, f2),
                (INSIDE, RIGHT) => {
                    let y3 = y1 + mul_div(b.x2 - x1, y2 - y1, x2 - x1);
                    line_clip_y2(ras, &b, x1, y1, b.x2, y3, b.x2, y2);
                }
                (RIGHT, INSIDE) => {
                    let y3 = y1 + mul_div(b.x2 - x1, y2 - y1, x2 - x1);
                    line_clip_y2(ras, &b, b.x2, y1, b.x2, y3, x2, y2);
                }
                (RIGHT, RIGHT) => line_clip_y(ras, &b, b.x2, y1, b.x2, y2, f1, f2),
                (INSIDE, LEFT) => {
                    let y3 = y1 + mul_div(b.x1 - x1, y2 - y1, x2 - x1);
                    line_clip_y2(ras, &b, x1, y1, b.x1, y3, b.x1, y2);
                }
                (RIGHT, LEFT) => {
                    let y3 = y1 + mul_div(b.x2 - x1, y2 - y1, x2 - x1);
                    let y4 = y1 + mul_div(b.x1 - x1, y2 - y1, x2 - x1);
                    line_clip_y3(ras, &b, b.x2, y1, b.x2, y3, b.x1, y4, b.x1, y2);
                }
                (LEFT, INSIDE) => {
                    let y3 = y1 + mul_div(b.x1 - x1, y2 - y1, x2 - x1);
                    line_clip_y2(ras, &b, b.x1, y1, b.x1, y3, x2, y2);
                }
                (LEFT, RIGHT) => {
                    let y3 = y1 + mul_div(b.x1 - x1, y2 - y1, x2 - x1);
                    let y4 = y1 + mul_div(b.x2 - x1, y2 - y1, x2 - x1);
                    line_clip_y3(ras, &b, b.x1, y1, b.x1, y3, b.x2, y4, b.x2, y2);
                }
                (LEFT, LEFT) => line_clip_y(ras, &b, b.x1, y1, b.x1, y2, f1, f2),
                (_, _) => unreachable!("clip flags cannot be both left and right"),
            }
            self.f1 = f2;
        } else {
            ras.line(self.x1, self.y1, x2, y2);
        }
        self.x1 = x2;
        self.y1 = y2;
    }
}

/// Liang-Barsky parametric clipping of a segment against a rectangle
///
/// Returns the visible portion as 0 to 3 points. Purely horizontal or
/// vertical segments are bumped off the degenerate axis by a near-zero
/// delta to avoid dividing by zero.
pub fn clip_liang_barsky(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    b: &Rectangle<f64>,
) -> Vec<(f64, f64)> {
    let nearzero = 1e-30;
    let mut deltax = x2 - x1;
    let mut deltay = y2 - y1;
    let mut points = vec![];

    if deltax == 0.0 {
        // bump off of the vertical
        deltax = if x1 > b.x1 { -nearzero } else { nearzero };
    }
    if deltay == 0.0 {
        // bump off of the horizontal
        deltay = if y1 > b.y1 { -nearzero } else { nearzero };
    }

    let (xin, xout) = if deltax > 0.0 { (b.x1, b.x2) } else { (b.x2, b.x1) };
    let (yin, yout) = if deltay > 0.0 { (b.y1, b.y2) } else { (b.y2, b.y1) };

    let tinx = (xin - x1) / deltax;
    let tiny = (yin - y1) / deltay;
    let (tin1, tin2) = if tinx < tiny { (tinx, tiny) } else { (tiny, tinx) };

    if tin1 > 1.0 {
        return points;
    }
    if tin1 > 0.0 {
        points.push((xin, yin));
    }
    if tin2 > 1.0 {
        return points;
    }
    let toutx = (xout - x1) / deltax;
    let touty = (yout - y1) / deltay;
    let tout1 = if toutx < touty { toutx } else { touty };

    if tin2 > 0.0 || tout1 > 0.0 {
        if tin2 <= tout1 {
            if tin2 > 0.0 {
                if tinx > tiny {
                    points.push((xin, y1 + tinx * deltay));
                } else {
                    points.push((x1 + tiny * deltax, yin));
                }
            }
            if tout1 < 1.0 {
                if toutx < touty {
                    points.push((xout, y1 + toutx * deltay));
                } else {
                    points.push((x1 + touty * deltax, yout));
                }
            } else {
                points.push((x2, y2));
            }
        } else {
            // The segment crosses the corner outside the box
            if tinx > tiny {
                points.push((xin, yout));
            } else {
                points.push((xout, yin));
            }
        }
    }
    points
}

/// Clip a segment against a rectangle, returning the full clipped polyline
///
/// The output is 0 points (invisible), 2 (no horizontal crossing), 3 (one
/// side crossed), or 4 (both sides crossed), with off-box portions flattened
/// onto the box edge. Intended for use outside the rasterizer.
pub fn clip_segment(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    b: &Rectangle<f64>,
) -> Vec<(f64, f64)> {
    let f1 = clip_flags(x1, y1, b);
    let f2 = clip_flags(x2, y2, b);
    // Both endpoints above, or both below: nothing visible
    if (f1 & (TOP | BOTTOM)) == (f2 & (TOP | BOTTOM)) && (f1 & (TOP | BOTTOM)) != INSIDE {
        return vec![];
    }
    let y_at = |bx: f64| y1 + (bx - x1) * (y2 - y1) / (x2 - x1);
    match (f1 & (LEFT | RIGHT), f2 & (LEFT | RIGHT)) {
        (INSIDE, INSIDE) => vec![(x1, y1), (x2, y2)],
        (INSIDE, RIGHT) => vec![(x1, y1), (b.x2, y_at(b.x2)), (b.x2, y2)],
        (RIGHT, INSIDE) => vec![(b.x2, y1), (b.x2, y_at(b.x2)), (x2, y2)],
        (RIGHT, RIGHT) => vec![(b.x2, y1), (b.x2, y2)],
        (INSIDE, LEFT) => vec![(x1, y1), (b.x1, y_at(b.x1)), (b.x1, y2)],
        (RIGHT, LEFT) => vec![
            (b.x2, y1),
            (b.x2, y_at(b.x2)),
            (b.x1, y_at(b.x1)),
            (b.x1, y2),
        ],
        (LEFT, INSIDE) => vec![(b.x1, y1), (b.x1, y_at(b.x1)), (x2, y2)],
        (LEFT, RIGHT) => vec![
            (b.x1, y1),
            (b.x1, y_at(b.x1)),
            (b.x2, y_at(b.x2)),
            (b.x2, y2),
        ],
        (LEFT, LEFT) => vec![(b.x1, y1), (b.x1, y2)],
        (_, _) => unreachable!("clip flags cannot be both left and right"),
    }
}
