pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Color,
    widgets::Widget,
};

use crate::surface::{display_to_raster, Point, Raster, RasterImage, Rgb};
use crate::App;

const HEADER_LINES: u16 = 2;
const FOOTER_LINES: u16 = 1;

/// Upper half block: foreground is the top pixel, background the bottom one
const HALF_BLOCK: &str = "▀";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawingLayout {
    pub header: Rect,
    pub canvas: Rect,
    pub footer: Rect,
}

/// Split the terminal into header, canvas and footer. The front end maps mouse
/// positions with the same layout it renders with.
pub fn drawing_layout(area: Rect) -> DrawingLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_LINES),
            Constraint::Min(1),
            Constraint::Length(FOOTER_LINES),
        ])
        .split(area);

    DrawingLayout {
        header: chunks[0],
        canvas: chunks[1],
        footer: chunks[2],
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        screen::current_screen(self.state()).render(self, area, buf);
    }
}

pub trait PixelSource {
    fn dimensions(&self) -> (u32, u32);
    fn pixel(&self, x: u32, y: u32) -> Option<Rgb>;
}

impl PixelSource for Raster {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        self.get(x, y)
    }
}

impl PixelSource for RasterImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        self.get(x, y)
    }
}

/// Draws a raster into terminal cells, two display pixels per cell.
///
/// Each display pixel shows the darkest raster pixel it covers so thin lines
/// survive downsampling.
pub struct SketchView<'a, P: PixelSource> {
    source: &'a P,
}

impl<'a, P: PixelSource> SketchView<'a, P> {
    pub fn new(source: &'a P) -> Self {
        Self { source }
    }

    fn sample(&self, x: u32, y: u32, display: (f32, f32)) -> Option<Rgb> {
        let raster = self.source.dimensions();
        let from = display_to_raster(Point::new(x as f32, y as f32), display, raster)?;
        let to = display_to_raster(Point::new(x as f32 + 1.0, y as f32 + 1.0), display, raster)?;

        let (x0, y0) = (from.x.floor() as u32, from.y.floor() as u32);
        let x1 = (to.x.ceil() as u32).clamp(x0 + 1, raster.0.max(x0 + 1));
        let y1 = (to.y.ceil() as u32).clamp(y0 + 1, raster.1.max(y0 + 1));

        (y0..y1)
            .flat_map(|py| (x0..x1).map(move |px| (px, py)))
            .filter_map(|(px, py)| self.source.pixel(px, py))
            .min_by_key(luma)
    }
}

impl<P: PixelSource> Widget for SketchView<'_, P> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (w, h) = self.source.dimensions();
        if w == 0 || h == 0 || area.is_empty() {
            return;
        }
        let display = (area.width as f32, area.height as f32 * 2.0);

        for row in 0..area.height {
            for col in 0..area.width {
                let top = self.sample(col as u32, row as u32 * 2, display);
                let bottom = self.sample(col as u32, row as u32 * 2 + 1, display);
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_symbol(HALF_BLOCK)
                        .set_fg(to_color(top))
                        .set_bg(to_color(bottom));
                }
            }
        }
    }
}

fn luma(c: &Rgb) -> u32 {
    299 * c.r as u32 + 587 * c.g as u32 + 114 * c.b as u32
}

fn to_color(rgb: Option<Rgb>) -> Color {
    match rgb {
        Some(Rgb { r, g, b }) => Color::Rgb(r, g, b),
        None => Color::Reset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Point;

    fn symbols(buffer: &Buffer) -> String {
        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_layout_reserves_header_and_footer() {
        let layout = drawing_layout(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.header, Rect::new(0, 0, 80, 2));
        assert_eq!(layout.canvas, Rect::new(0, 2, 80, 21));
        assert_eq!(layout.footer, Rect::new(0, 23, 80, 1));
    }

    #[test]
    fn test_sketch_view_one_to_one() {
        let mut raster = Raster::new(4, 4, Rgb::WHITE);
        // ink only the top row
        raster.stroke_segment(Point::new(0.5, 0.5), Point::new(3.5, 0.5), 1.0, Rgb::INK);

        let area = Rect::new(0, 0, 4, 2);
        let mut buffer = Buffer::empty(area);
        SketchView::new(&raster).render(area, &mut buffer);

        let cell = &buffer[(0, 0)];
        assert_eq!(cell.symbol(), HALF_BLOCK);
        assert_eq!(cell.fg, Color::Rgb(0x1a, 0x1a, 0x1a));
        assert_eq!(cell.bg, Color::Rgb(0xff, 0xff, 0xff));
        assert_eq!(buffer[(0, 1)].fg, Color::Rgb(0xff, 0xff, 0xff));
    }

    #[test]
    fn test_sketch_view_keeps_thin_lines_when_shrinking() {
        const INK: Color = Color::Rgb(0x1a, 0x1a, 0x1a);
        let mut raster = Raster::new(40, 40, Rgb::WHITE);
        raster.stroke_segment(Point::new(0.0, 21.5), Point::new(40.0, 21.5), 1.0, Rgb::INK);

        let area = Rect::new(0, 0, 4, 2);
        let mut buffer = Buffer::empty(area);
        SketchView::new(&raster.to_image()).render(area, &mut buffer);

        let inked = buffer
            .content()
            .iter()
            .filter(|c| c.fg == INK || c.bg == INK)
            .count();
        assert_eq!(inked, 4);
    }

    #[test]
    fn test_sketch_view_empty_area() {
        let raster = Raster::new(4, 4, Rgb::WHITE);
        let area = Rect::new(0, 0, 0, 0);
        let mut buffer = Buffer::empty(area);
        SketchView::new(&raster).render(area, &mut buffer);
        assert!(symbols(&buffer).is_empty());
    }
}
