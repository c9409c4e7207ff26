use std::io;
use std::io::{ BufWriter, Write };
use std::fs::File;
use std::path::{ Path, PathBuf };

use log::info;

use crate::color::Color;
use crate::error::Result;

/// A canvas for drawing pixels.
///
/// Stores the color computed for every pixel of an image. Once rendering
/// finishes the canvas can be encoded to an image file; only plain PPM is
/// supported.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Canvas {
    /// The width of the canvas, in pixels.
    pub width: usize,

    /// The height of the canvas, in pixels.
    pub height: usize,

    /// The pixels of the canvas, stored row by row.
    pixels: Vec<Color>,
}

impl Canvas {
    /// Creates a black canvas with the given width and height.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![Color::black(); width * height]
        }
    }

    /// Writes a color to a location on the `Canvas`.
    ///
    /// Out-of-bounds pixels are ignored. `x` is the column and `y` is the row,
    /// both zero-indexed.
    ///
    /// # Examples
    ///
    /// ```
    /// # use whitted_tracer::color::Color;
    /// # use whitted_tracer::canvas::Canvas;
    /// let purple = Color::rgb(1.0, 0.0, 1.0);
    /// let mut canvas = Canvas::new(8, 8);
    /// canvas.write_pixel(4, 2, &purple);
    /// assert_eq!(canvas.read_pixel(4, 2).unwrap(), purple);
    /// ```
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: &Color) {
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[(y * self.width) + x] = *pixel;
    }

    /// Reads a color from a location on the `Canvas`, or `None` when the
    /// location is out of bounds.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None
        }

        Some(self.pixels[(y * self.width) + x])
    }

    /// Encodes the canvas as a plain (P3) PPM image.
    ///
    /// Channels are clamped to `[0, 1]` and scaled to 0..=255. No line of the
    /// output exceeds 70 columns.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "255")?;

        for row in self.pixels.chunks(self.width.max(1)) {
            let mut line = String::new();
            for value in row.iter().flat_map(|c| [c.r, c.g, c.b]) {
                let value = (value.clamp(0.0, 1.0) * 255.0).round() as u8;
                let value = value.to_string();

                if !line.is_empty() && line.len() + 1 + value.len() > 70 {
                    writeln!(out, "{}", line)?;
                    line.clear();
                }
                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(&value);
            }
            writeln!(out, "{}", line)?;
        }

        Ok(())
    }

    /// Saves the canvas to a PPM file.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_ppm(&mut out)?;
        out.flush()
    }
}

/// The pixel sink a camera renders into.
///
/// Pairs a canvas with the file it is eventually written to.
#[derive(Clone, Debug)]
pub struct ImageWriter {
    path: PathBuf,
    canvas: Canvas,
}

impl ImageWriter {
    pub fn new<P: Into<PathBuf>>(path: P, nx: usize, ny: usize) -> ImageWriter {
        ImageWriter { path: path.into(), canvas: Canvas::new(nx, ny) }
    }

    /// Horizontal resolution.
    pub fn nx(&self) -> usize {
        self.canvas.width
    }

    /// Vertical resolution.
    pub fn ny(&self) -> usize {
        self.canvas.height
    }

    pub fn write_pixel(&mut self, col: usize, row: usize, color: &Color) {
        self.canvas.write_pixel(col, row, color);
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_to_image(&self) -> Result<()> {
        self.canvas.save(&self.path)?;
        info!("saved {}x{} image to {}", self.nx(), self.ny(), self.path.display());
        Ok(())
    }
}

#[test]
fn construct_canvas() {
    let c = Canvas::new(10, 20);

    assert_eq!(c.width, 10);
    assert_eq!(c.height, 20);
    assert!(c.pixels.iter().all(|p| *p == Color::black()));
}

#[test]
fn out_of_bounds_pixels_are_ignored() {
    let mut c = Canvas::new(2, 2);
    c.write_pixel(2, 0, &Color::white());

    assert_eq!(c.read_pixel(2, 0), None);
    assert!(c.pixels.iter().all(|p| *p == Color::black()));
}

#[test]
fn ppm_header_and_pixels() {
    let mut c = Canvas::new(5, 3);
    c.write_pixel(0, 0, &Color::rgb(1.5, 0.0, 0.0));
    c.write_pixel(2, 1, &Color::rgb(0.0, 0.5, 0.0));
    c.write_pixel(4, 2, &Color::rgb(-0.5, 0.0, 1.0));

    let mut out = Vec::new();
    c.write_ppm(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines, vec![
        "P3",
        "5 3",
        "255",
        "255 0 0 0 0 0 0 0 0 0 0 0 0 0 0",
        "0 0 0 0 0 0 0 128 0 0 0 0 0 0 0",
        "0 0 0 0 0 0 0 0 0 0 0 0 0 0 255",
    ]);
}

#[test]
fn ppm_lines_are_split_at_70_columns() {
    let mut c = Canvas::new(10, 2);
    for y in 0..2 {
        for x in 0..10 {
            c.write_pixel(x, y, &Color::rgb(1.0, 0.8, 0.6));
        }
    }

    let mut out = Vec::new();
    c.write_ppm(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.lines().all(|l| l.len() <= 70));
    assert_eq!(text.lines().nth(3).unwrap(),
        "255 204 153 255 204 153 255 204 153 255 204 153 255 204 153 255 204");
    assert!(text.ends_with('\n'));
}

#[test]
fn image_writer_resolution() {
    let mut w = ImageWriter::new("unused.ppm", 4, 3);
    w.write_pixel(3, 2, &Color::white());

    assert_eq!(w.nx(), 4);
    assert_eq!(w.ny(), 3);
    assert_eq!(w.canvas().read_pixel(3, 2), Some(Color::white()));
}
