//! Reading and writing of image files
//!
//! The file format follows the extension, e.g. `.png` or `.ppm`.

use std::path::Path;

/// Load an image as RGB bytes, returning (data, width, height)
pub fn read_file<P: AsRef<Path>>(
    filename: P,
) -> Result<(Vec<u8>, usize, usize), image::ImageError> {
    let img = image::open(filename)?.to_rgb();
    let (w, h) = img.dimensions();
    let buf = img.into_raw();
    Ok((buf, w as usize, h as usize))
}

/// Save RGB bytes as an image file
pub fn write_file<P: AsRef<Path>>(
    buf: &[u8],
    width: usize,
    height: usize,
    filename: P,
) -> Result<(), std::io::Error> {
    image::save_buffer(filename, buf, width as u32, height as u32, image::RGB(8))
}

/// Compare two image files pixel for pixel
pub fn img_diff<P: AsRef<Path>>(f1: P, f2: P) -> Result<bool, image::ImageError> {
    let (d1, w1, h1) = read_file(f1)?;
    let (d2, w2, h2) = read_file(f2)?;
    if w1 != w2 || h1 != h2 || d1.len() != d2.len() {
        return Ok(false);
    }
    Ok(d1 == d2)
}
