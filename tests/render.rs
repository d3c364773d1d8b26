extern crate scanline;

use scanline::img;
use scanline::Path;
use scanline::Pixfmt;
use scanline::Rasterize;
use scanline::RasterizerCompound;
use scanline::RasterizerScanline;
use scanline::Render;
use scanline::RenderingBase;
use scanline::RenderingScanlineAASolid;
use scanline::RenderingScanlineBinSolid;
use scanline::Rgb8;
use scanline::Rgba8;
use scanline::ScanlineU8;
use scanline::PixelData;

fn square(x1: f64, y1: f64, x2: f64, y2: f64) -> Path {
    let mut path = Path::new();
    path.move_to(x1, y1);
    path.line_to(x2, y1);
    path.line_to(x2, y2);
    path.line_to(x1, y2);
    path.close_polygon();
    path
}

const WHITE: Rgba8 = Rgba8 {
    r: 255,
    g: 255,
    b: 255,
    a: 255,
};
const RED: Rgba8 = Rgba8 {
    r: 255,
    g: 0,
    b: 0,
    a: 255,
};

#[test]
fn aa_solid_square() {
    let pixf = Pixfmt::<Rgb8>::new(30, 30);
    let mut ren_base = RenderingBase::new(pixf);
    ren_base.clear(WHITE);

    let mut ras = RasterizerScanline::new();
    let mut sl = ScanlineU8::new();
    let mut path = square(5.0, 5.0, 25.0, 25.0);
    ras.add_path(&mut path, 0);

    {
        let mut ren = RenderingScanlineAASolid::with_base(&mut ren_base);
        ren.color(&RED);
        scanline::render_scanlines(&mut ras, &mut sl, &mut ren);
    }

    // Interior and grid-aligned boundary pixels are pure color
    assert_eq!(ren_base.pixf.get((10, 10)), RED);
    assert_eq!(ren_base.pixf.get((5, 10)), RED);
    assert_eq!(ren_base.pixf.get((24, 24)), RED);
    // Outside stays untouched
    assert_eq!(ren_base.pixf.get((2, 2)), WHITE);
    assert_eq!(ren_base.pixf.get((26, 26)), WHITE);
}

#[test]
fn aa_partial_coverage_blends() {
    let pixf = Pixfmt::<Rgb8>::new(20, 20);
    let mut ren_base = RenderingBase::new(pixf);
    ren_base.clear(WHITE);

    let mut ras = RasterizerScanline::new();
    let mut sl = ScanlineU8::new();
    // Left edge at x = 5.5: column 5 is half covered
    let mut path = square(5.5, 5.0, 10.0, 10.0);
    ras.add_path(&mut path, 0);

    {
        let mut ren = RenderingScanlineAASolid::with_base(&mut ren_base);
        ren.color(&RED);
        scanline::render_scanlines(&mut ras, &mut sl, &mut ren);
    }

    let pix = ren_base.pixf.get((5, 7));
    assert_eq!(pix.r, 255);
    assert!(
        pix.g > 110 && pix.g < 145,
        "half-covered column should read half blended, got {:?}",
        pix
    );
    assert_eq!(ren_base.pixf.get((7, 7)), RED);
}

#[test]
fn bin_solid_ignores_partial_coverage() {
    let pixf = Pixfmt::<Rgb8>::new(20, 20);
    let mut ren_base = RenderingBase::new(pixf);
    ren_base.clear(WHITE);

    let mut ras = RasterizerScanline::new();
    let mut sl = ScanlineU8::new();
    let mut path = square(5.5, 5.0, 10.0, 10.0);
    ras.add_path(&mut path, 0);

    {
        let mut ren = RenderingScanlineBinSolid::with_base(&mut ren_base);
        ren.color(&RED);
        scanline::render_scanlines(&mut ras, &mut sl, &mut ren);
    }

    // The half-covered column renders at full coverage
    assert_eq!(ren_base.pixf.get((5, 7)), RED);
    assert_eq!(ren_base.pixf.get((7, 7)), RED);
}

#[test]
fn render_all_paths_colors_each_path() {
    let pixf = Pixfmt::<Rgb8>::new(40, 20);
    let mut ren_base = RenderingBase::new(pixf);
    ren_base.clear(WHITE);

    let mut ras = RasterizerScanline::new();
    let mut sl = ScanlineU8::new();
    let mut paths = [square(2.0, 2.0, 12.0, 12.0), square(22.0, 2.0, 32.0, 12.0)];
    let colors = [RED, Rgba8::new(0, 0, 255, 255)];

    {
        let mut ren = RenderingScanlineAASolid::with_base(&mut ren_base);
        scanline::render_all_paths(&mut ras, &mut sl, &mut ren, &mut paths, &colors);
    }

    assert_eq!(ren_base.pixf.get((7, 7)), RED);
    assert_eq!(ren_base.pixf.get((27, 7)), Rgba8::new(0, 0, 255, 255));
    assert_eq!(ren_base.pixf.get((17, 7)), WHITE);
}

#[test]
fn compound_render_two_styles() {
    let pixf = Pixfmt::<Rgb8>::new(30, 30);
    let mut ren_base = RenderingBase::new(pixf);
    ren_base.clear(WHITE);

    let mut ras = RasterizerCompound::new();
    let mut sl = ScanlineU8::new();
    let blue = Rgba8::new(0, 0, 255, 255);
    let green = Rgba8::new(0, 255, 0, 255);

    // Two regions sharing the boundary at x = 15.5
    ras.styles(0, -1);
    ras.move_to_d(10.0, 10.0);
    ras.line_to_d(10.0, 20.0);
    ras.line_to_d(15.5, 20.0);
    ras.styles(0, 1);
    ras.line_to_d(15.5, 10.0);
    ras.styles(0, -1);
    ras.line_to_d(10.0, 10.0);
    ras.styles(1, -1);
    ras.move_to_d(15.5, 20.0);
    ras.line_to_d(20.0, 20.0);
    ras.line_to_d(20.0, 10.0);
    ras.line_to_d(15.5, 10.0);

    scanline::render_scanlines_compound(&mut ras, &mut sl, &mut ren_base, &[blue, green]);

    assert_eq!(ren_base.pixf.get((12, 15)), blue);
    assert_eq!(ren_base.pixf.get((18, 15)), green);
    // The shared pixel blends both fills and keeps no background
    let pix = ren_base.pixf.get((15, 15));
    assert_ne!(pix, WHITE);
    assert!(pix.r < 100, "background should be fully covered: {:?}", pix);
    assert!(pix.b > 100, "left fill missing from shared pixel: {:?}", pix);
    assert!(pix.g > 80, "right fill missing from shared pixel: {:?}", pix);
    // Nothing outside
    assert_eq!(ren_base.pixf.get((8, 15)), WHITE);
    assert_eq!(ren_base.pixf.get((22, 15)), WHITE);
}

#[test]
fn image_write_read_roundtrip() {
    std::fs::create_dir_all("tests/tmp").unwrap();

    let render = |file: &str| {
        let pixf = Pixfmt::<Rgb8>::new(16, 16);
        let mut ren_base = RenderingBase::new(pixf);
        ren_base.clear(WHITE);
        let mut ras = RasterizerScanline::new();
        let mut sl = ScanlineU8::new();
        let mut path = square(2.0, 2.0, 13.5, 13.0);
        ras.add_path(&mut path, 0);
        {
            let mut ren = RenderingScanlineAASolid::with_base(&mut ren_base);
            ren.color(&RED);
            scanline::render_scanlines(&mut ras, &mut sl, &mut ren);
        }
        ren_base.to_file(file).unwrap();
        assert_eq!(ren_base.pixeldata().len(), 16 * 16 * 3);
    };

    render("tests/tmp/roundtrip_a.png");
    render("tests/tmp/roundtrip_b.png");

    let (data, w, h) = img::read_file("tests/tmp/roundtrip_a.png").unwrap();
    assert_eq!((w, h), (16, 16));
    assert_eq!(data.len(), 16 * 16 * 3);
    assert!(img::img_diff("tests/tmp/roundtrip_a.png", "tests/tmp/roundtrip_b.png").unwrap());
}
