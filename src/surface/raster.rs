use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PonchieError;

/// Opaque 24-bit colour, written as `#rrggbb` in config files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);
    pub const INK: Rgb = Rgb::new(0x1a, 0x1a, 0x1a);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = PonchieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PonchieError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = PonchieError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_string()
    }
}

/// A position in raster pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// How old content is carried into a resized raster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizePolicy {
    /// Copy at the origin unscaled; crop what no longer fits and paint
    /// newly exposed area with the background.
    #[default]
    Anchor,
    /// Nearest-neighbour rescale of the whole drawing.
    Scale,
}

/// Mutable pixel buffer owned by the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl Raster {
    pub fn new(width: u32, height: u32, background: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![background; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgb> {
        self.index(x as i64, y as i64).map(|i| self.pixels[i])
    }

    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Paint every pixel whose centre lies within `width / 2` of the segment
    /// `a`-`b`. A zero-length segment paints a dot.
    pub fn stroke_segment(&mut self, a: Point, b: Point, width: f32, color: Rgb) {
        // never thinner than the pixel that contains the point
        let radius = (width / 2.0).max(0.75);

        let min_x = (a.x.min(b.x) - radius).floor().max(0.0) as i64;
        let min_y = (a.y.min(b.y) - radius).floor().max(0.0) as i64;
        let max_x = ((a.x.max(b.x) + radius).ceil() as i64).min(self.width as i64 - 1);
        let max_y = ((a.y.max(b.y) + radius).ceil() as i64).min(self.height as i64 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let center = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                if distance_to_segment(center, a, b) <= radius {
                    if let Some(i) = self.index(x, y) {
                        self.pixels[i] = color;
                    }
                }
            }
        }
    }

    /// Build a raster of the new size carrying this one's content over.
    pub fn resized(
        &self,
        width: u32,
        height: u32,
        background: Rgb,
        policy: ResizePolicy,
    ) -> Raster {
        let mut next = Raster::new(width, height, background);
        match policy {
            ResizePolicy::Anchor => {
                let copy_w = self.width.min(width) as usize;
                for y in 0..self.height.min(height) as usize {
                    let src = y * self.width as usize;
                    let dst = y * width as usize;
                    next.pixels[dst..dst + copy_w].copy_from_slice(&self.pixels[src..src + copy_w]);
                }
            }
            ResizePolicy::Scale => {
                if self.width == 0 || self.height == 0 {
                    return next;
                }
                for y in 0..height {
                    let sy = (y as u64 * self.height as u64 / height as u64) as u32;
                    for x in 0..width {
                        let sx = (x as u64 * self.width as u64 / width as u64) as u32;
                        next.pixels[(y * width + x) as usize] =
                            self.pixels[(sy * self.width + sx) as usize];
                    }
                }
            }
        }
        next
    }

    pub fn to_image(&self) -> RasterImage {
        RasterImage {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.x + t * dx, a.y + t * dy);
    ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt()
}

/// Frozen copy of a raster, the unit of review and export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Rgb>,
}

impl RasterImage {
    pub fn get(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    /// Number of pixels that differ from `color`
    pub fn count_other_than(&self, color: Rgb) -> usize {
        self.pixels.iter().filter(|&&p| p != color).count()
    }

    pub fn is_uniform(&self, color: Rgb) -> bool {
        self.count_other_than(color) == 0
    }

    /// Encode as binary PPM (P6)
    pub fn encode_ppm(&self) -> Vec<u8> {
        let header = format!("P6\n{} {}\n255\n", self.width, self.height);
        let mut out = Vec::with_capacity(header.len() + self.pixels.len() * 3);
        out.extend_from_slice(header.as_bytes());
        for p in &self.pixels {
            out.extend_from_slice(&[p.r, p.g, p.b]);
        }
        out
    }
}
