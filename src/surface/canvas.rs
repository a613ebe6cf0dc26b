use super::brush::{BrushConfig, StrokeStyle, Tool};
use super::raster::{Point, Raster, RasterImage, ResizePolicy};

/// The drawing contract the session controller talks to.
///
/// Coordinates are raster pixels; mapping from the input device happens in
/// [`super::input`]. Every call renders immediately.
pub trait DrawingSurface {
    fn size(&self) -> (u32, u32);

    /// Reallocate the raster, carrying existing ink over. Zero dimensions are
    /// rejected. Deferred until `end_stroke` while a stroke is active.
    fn resize(&mut self, width: u32, height: u32);

    /// Paint everything with the background and drop the active stroke.
    fn clear(&mut self);

    /// Start a stroke and paint a dot at `point`. Ends any active stroke first.
    fn begin_stroke(&mut self, point: Point, tool: Tool);

    /// Paint a segment from the last point. No-op without an active stroke.
    fn extend_stroke(&mut self, point: Point);

    fn end_stroke(&mut self);

    fn snapshot(&self) -> RasterImage;

    fn is_drawing(&self) -> bool;

    /// Tool of the active stroke
    fn tool(&self) -> Option<Tool>;
}

#[derive(Debug, Clone, Copy)]
struct ActiveStroke {
    last: Point,
    tool: Tool,
    style: StrokeStyle,
}

/// Raster-backed surface used by the game
#[derive(Debug, Clone)]
pub struct StrokeCanvas {
    raster: Raster,
    brush: BrushConfig,
    policy: ResizePolicy,
    active: Option<ActiveStroke>,
    pending_resize: Option<(u32, u32)>,
}

impl StrokeCanvas {
    pub fn new(width: u32, height: u32, brush: BrushConfig, policy: ResizePolicy) -> Self {
        Self {
            raster: Raster::new(width, height, brush.background),
            brush,
            policy,
            active: None,
            pending_resize: None,
        }
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    fn apply_resize(&mut self, width: u32, height: u32) {
        if (width, height) == (self.raster.width(), self.raster.height()) {
            return;
        }
        tracing::debug!(
            from_w = self.raster.width(),
            from_h = self.raster.height(),
            width,
            height,
            "resizing canvas"
        );
        self.raster = self
            .raster
            .resized(width, height, self.brush.background, self.policy);
    }
}

impl DrawingSurface for StrokeCanvas {
    fn size(&self) -> (u32, u32) {
        (self.raster.width(), self.raster.height())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            tracing::warn!(width, height, "ignoring canvas resize to an empty size");
            return;
        }
        if self.active.is_some() {
            self.pending_resize = Some((width, height));
            return;
        }
        self.apply_resize(width, height);
    }

    fn clear(&mut self) {
        self.active = None;
        if let Some((w, h)) = self.pending_resize.take() {
            self.apply_resize(w, h);
        }
        self.raster.fill(self.brush.background);
    }

    fn begin_stroke(&mut self, point: Point, tool: Tool) {
        if self.active.is_some() {
            self.end_stroke();
        }
        let style = self.brush.style(tool);
        self.raster.stroke_segment(point, point, style.width, style.color);
        self.active = Some(ActiveStroke {
            last: point,
            tool,
            style,
        });
    }

    fn extend_stroke(&mut self, point: Point) {
        let Some(stroke) = self.active.as_mut() else {
            return;
        };
        self.raster
            .stroke_segment(stroke.last, point, stroke.style.width, stroke.style.color);
        stroke.last = point;
    }

    fn end_stroke(&mut self) {
        self.active = None;
        if let Some((w, h)) = self.pending_resize.take() {
            self.apply_resize(w, h);
        }
    }

    fn snapshot(&self) -> RasterImage {
        self.raster.to_image()
    }

    fn is_drawing(&self) -> bool {
        self.active.is_some()
    }

    fn tool(&self) -> Option<Tool> {
        self.active.map(|stroke| stroke.tool)
    }
}
