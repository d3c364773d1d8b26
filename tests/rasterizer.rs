extern crate scanline;

use scanline::Path;
use scanline::PathOrientation;
use scanline::Rasterize;
use scanline::RasterizerScanline;
use scanline::FillingRule;
use scanline::ScanlineU8;

use std::collections::BTreeMap;

/// Expand every span of every scanline into a pixel coverage map
fn coverage(ras: &mut RasterizerScanline) -> BTreeMap<(i64, i64), u64> {
    let mut map = BTreeMap::new();
    let mut sl = ScanlineU8::new();
    if ras.rewind_scanlines() {
        sl.reset(ras.min_x(), ras.max_x());
        while ras.sweep_scanline(&mut sl) {
            let y = sl.y();
            for span in sl.spans() {
                if span.len > 0 {
                    for (i, &c) in span.covers.iter().enumerate() {
                        if c > 0 {
                            map.insert((span.x + i as i64, y), c);
                        }
                    }
                } else {
                    for i in 0..-span.len {
                        if span.covers[0] > 0 {
                            map.insert((span.x + i, y), span.covers[0]);
                        }
                    }
                }
            }
        }
    }
    map
}

fn square(x1: f64, y1: f64, x2: f64, y2: f64) -> Path {
    let mut path = Path::new();
    path.move_to(x1, y1);
    path.line_to(x2, y1);
    path.line_to(x2, y2);
    path.line_to(x1, y2);
    path.close_polygon();
    path
}

#[test]
fn unit_square_full_coverage() {
    // Grid-aligned 10x10 square: rows 0..=9 each carry one full-coverage
    // span of width 10; the grid line y=10 itself contributes nothing even
    // though max_y() reports it as the geometric bound.
    let mut path = square(0.0, 0.0, 10.0, 10.0);
    let mut ras = RasterizerScanline::new();
    ras.add_path(&mut path, 0);

    assert!(ras.rewind_scanlines());
    assert_eq!(ras.min_x(), 0);
    assert_eq!(ras.max_x(), 10);
    assert_eq!(ras.min_y(), 0);
    assert_eq!(ras.max_y(), 10);

    let mut sl = ScanlineU8::new();
    sl.reset(ras.min_x(), ras.max_x());
    let mut rows = 0;
    while ras.sweep_scanline(&mut sl) {
        assert_eq!(sl.y(), rows);
        assert_eq!(sl.num_spans(), 1);
        let span = &sl.spans()[0];
        assert_eq!(span.x, 0);
        assert_eq!(span.len, -10); // constant-coverage run of 10 pixels
        assert_eq!(span.covers[0], 255);
        rows += 1;
    }
    assert_eq!(rows, 10);
}

#[test]
fn conservation_of_area() {
    // Total emitted coverage equals the analytic polygon area
    let mut path = Path::new();
    path.move_to(1.0, 1.0);
    path.line_to(11.0, 1.0);
    path.line_to(1.0, 11.0);
    path.close_polygon();

    let mut ras = RasterizerScanline::new();
    ras.add_path(&mut path, 0);
    let sum: f64 = coverage(&mut ras)
        .values()
        .map(|&c| c as f64 / 255.0)
        .sum();
    assert!((sum - 50.0).abs() < 0.5, "covered area {} != 50", sum);
}

#[test]
fn sort_is_idempotent() {
    let mut path = Path::new();
    path.move_to(2.0, 1.5);
    path.line_to(14.5, 4.0);
    path.line_to(11.0, 13.0);
    path.line_to(4.5, 9.5);
    path.close_polygon();

    let mut ras = RasterizerScanline::new();
    ras.add_path(&mut path, 0);
    let first = coverage(&mut ras);
    // A second rewind re-enters the sort; the store must not change
    let second = coverage(&mut ras);
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn degenerate_inputs_draw_nothing() {
    // Empty rasterizer
    let mut ras = RasterizerScanline::new();
    assert!(!ras.rewind_scanlines());

    // Zero-length segment
    let mut ras = RasterizerScanline::new();
    ras.move_to_d(5.0, 5.0);
    ras.line_to_d(5.0, 5.0);
    ras.close_polygon();
    assert!(!ras.rewind_scanlines());

    // A lone move_to
    let mut ras = RasterizerScanline::new();
    ras.move_to_d(3.0, 4.0);
    assert!(!ras.rewind_scanlines());
}

#[test]
fn filling_rules_on_overlap() {
    let build = |ras: &mut RasterizerScanline| {
        let mut p1 = square(0.0, 0.0, 6.0, 6.0);
        let mut p2 = square(3.0, 3.0, 9.0, 9.0);
        ras.add_path(&mut p1, 0);
        ras.add_path(&mut p2, 0);
    };

    let mut ras = RasterizerScanline::new();
    build(&mut ras);
    let nonzero = coverage(&mut ras);
    // Winding 2 in the overlap still fills
    assert_eq!(nonzero.get(&(4, 4)), Some(&255));
    assert_eq!(nonzero.get(&(1, 1)), Some(&255));
    assert_eq!(nonzero.get(&(8, 8)), Some(&255));

    let mut ras = RasterizerScanline::new();
    ras.filling_rule(FillingRule::EvenOdd);
    build(&mut ras);
    let evenodd = coverage(&mut ras);
    // Winding 2 empties under even-odd
    assert_eq!(evenodd.get(&(4, 4)), None);
    assert_eq!(evenodd.get(&(1, 1)), Some(&255));
    assert_eq!(evenodd.get(&(8, 8)), Some(&255));
}

#[test]
fn orientation_does_not_change_coverage() {
    let mut cw = square(2.0, 2.0, 9.0, 9.0);
    let mut ccw = square(2.0, 2.0, 9.0, 9.0);
    ccw.arrange_orientations(PathOrientation::CounterClockwise);
    cw.arrange_orientations(PathOrientation::Clockwise);

    let mut ras = RasterizerScanline::new();
    ras.add_path(&mut cw, 0);
    let a = coverage(&mut ras);

    let mut ras = RasterizerScanline::new();
    ras.add_path(&mut ccw, 0);
    let b = coverage(&mut ras);

    assert!(!a.is_empty());
    assert_eq!(a, b);
}

#[test]
fn reset_clears_accumulated_cells() {
    let mut path = square(0.0, 0.0, 10.0, 10.0);
    let mut ras = RasterizerScanline::new();
    ras.add_path(&mut path, 0);
    assert!(!coverage(&mut ras).is_empty());

    ras.reset();
    assert!(!ras.rewind_scanlines());

    // The instance remains usable for a new shape
    let mut path = square(20.0, 20.0, 25.0, 25.0);
    ras.add_path(&mut path, 0);
    let map = coverage(&mut ras);
    assert_eq!(map.get(&(22, 22)), Some(&255));
    assert_eq!(map.get(&(5, 5)), None);
}

#[test]
fn bounds_track_geometry() {
    let mut path = square(2.0, 3.0, 12.0, 13.0);
    let mut ras = RasterizerScanline::new();
    ras.add_path(&mut path, 0);
    assert!(ras.rewind_scanlines());
    assert_eq!(ras.min_x(), 2);
    assert_eq!(ras.max_x(), 12);
    assert_eq!(ras.min_y(), 3);
    assert_eq!(ras.max_y(), 13);
}

#[test]
fn gamma_remaps_coverage() {
    // A gamma function forcing everything nonzero to full coverage
    let mut path = square(1.0, 1.0, 5.5, 5.0);
    let mut ras = RasterizerScanline::new_with_gamma(|v| if v > 0.0 { 1.0 } else { 0.0 });
    ras.add_path(&mut path, 0);
    let map = coverage(&mut ras);
    // The half-covered boundary column reads full after the gamma map
    assert_eq!(map.get(&(5, 2)), Some(&255));
    assert_eq!(map.get(&(2, 2)), Some(&255));
}
