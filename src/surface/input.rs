//! Pointer input adapter.
//!
//! Converts device-space pointer events into surface calls. The surface only
//! ever sees raster coordinates; the display-to-raster scale lives here.

use serde::{Deserialize, Serialize};

use super::brush::Tool;
use super::canvas::DrawingSurface;
use super::raster::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Leave,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Pen,
    Touch,
    Mouse,
}

/// A pointer event in display (device) space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Point,
    pub device: DeviceClass,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: f32, y: f32, device: DeviceClass) -> Self {
        Self {
            kind,
            position: Point::new(x, y),
            device,
        }
    }
}

/// Which device classes may draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFilter {
    #[default]
    Any,
    /// Only an active pen draws; touch and mouse are ignored
    PenOnly,
}

impl InputFilter {
    pub fn accepts(&self, device: DeviceClass) -> bool {
        match self {
            InputFilter::Any => true,
            InputFilter::PenOnly => device == DeviceClass::Pen,
        }
    }
}

/// Map a display-space point into raster space.
///
/// The scale is `raster / display` per axis. Returns `None` when the display
/// has no area.
pub fn display_to_raster(point: Point, display: (f32, f32), raster: (u32, u32)) -> Option<Point> {
    let (display_w, display_h) = display;
    if display_w <= 0.0 || display_h <= 0.0 {
        return None;
    }
    Some(Point::new(
        point.x * raster.0 as f32 / display_w,
        point.y * raster.1 as f32 / display_h,
    ))
}

/// Routes pointer events to a surface
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerAdapter {
    filter: InputFilter,
}

impl PointerAdapter {
    pub fn new(filter: InputFilter) -> Self {
        Self { filter }
    }

    /// Dispatch one event. Returns `false` when the event was filtered out or
    /// could not be mapped.
    pub fn apply<S: DrawingSurface + ?Sized>(
        &self,
        event: PointerEvent,
        display: (f32, f32),
        surface: &mut S,
        tool: Tool,
    ) -> bool {
        if !self.filter.accepts(event.device) {
            return false;
        }

        match event.kind {
            PointerKind::Down | PointerKind::Move => {
                let Some(point) = display_to_raster(event.position, display, surface.size())
                else {
                    return false;
                };
                if event.kind == PointerKind::Down {
                    surface.begin_stroke(point, tool);
                } else {
                    surface.extend_stroke(point);
                }
            }
            PointerKind::Up | PointerKind::Leave | PointerKind::Cancel => surface.end_stroke(),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::brush::BrushConfig;
    use crate::surface::canvas::StrokeCanvas;
    use crate::surface::raster::{ResizePolicy, Rgb};

    fn canvas() -> StrokeCanvas {
        StrokeCanvas::new(200, 100, BrushConfig::default(), ResizePolicy::Anchor)
    }

    fn event(kind: PointerKind, x: f32, y: f32, device: DeviceClass) -> PointerEvent {
        PointerEvent::new(kind, x, y, device)
    }

    #[test]
    fn test_display_to_raster_scales_per_axis() {
        let p = display_to_raster(Point::new(50.0, 25.0), (100.0, 50.0), (200, 100)).unwrap();
        assert_eq!(p, Point::new(100.0, 50.0));

        let p = display_to_raster(Point::new(30.0, 30.0), (60.0, 120.0), (60, 60)).unwrap();
        assert_eq!(p, Point::new(30.0, 15.0));
    }

    #[test]
    fn test_display_to_raster_rejects_empty_display() {
        assert_eq!(display_to_raster(Point::new(1.0, 1.0), (0.0, 10.0), (10, 10)), None);
        assert_eq!(display_to_raster(Point::new(1.0, 1.0), (10.0, -1.0), (10, 10)), None);
    }

    #[test]
    fn test_pen_only_filter() {
        assert!(InputFilter::PenOnly.accepts(DeviceClass::Pen));
        assert!(!InputFilter::PenOnly.accepts(DeviceClass::Touch));
        assert!(!InputFilter::PenOnly.accepts(DeviceClass::Mouse));
        assert!(InputFilter::Any.accepts(DeviceClass::Touch));
    }

    #[test]
    fn test_adapter_maps_gesture_to_stroke() {
        let mut surface = canvas();
        let adapter = PointerAdapter::default();
        let display = (100.0, 50.0);
        let mouse = DeviceClass::Mouse;

        let down = event(PointerKind::Down, 10.0, 25.0, mouse);
        adapter.apply(down, display, &mut surface, Tool::Pen);
        let drag = event(PointerKind::Move, 90.0, 25.0, mouse);
        adapter.apply(drag, display, &mut surface, Tool::Pen);
        assert!(surface.is_drawing());
        let up = event(PointerKind::Up, 90.0, 25.0, mouse);
        adapter.apply(up, display, &mut surface, Tool::Pen);
        assert!(!surface.is_drawing());

        // display x 10..90 lands on raster x 20..180
        let snap = surface.snapshot();
        assert_eq!(snap.get(100, 50), Some(Rgb::INK));
        assert_eq!(snap.get(20, 50), Some(Rgb::INK));
        assert_eq!(snap.get(5, 50), Some(Rgb::WHITE));
    }

    #[test]
    fn test_filtered_events_do_not_draw() {
        let mut surface = canvas();
        let adapter = PointerAdapter::new(InputFilter::PenOnly);
        let display = (200.0, 100.0);

        let touch_down = event(PointerKind::Down, 50.0, 50.0, DeviceClass::Touch);
        let accepted = adapter.apply(touch_down, display, &mut surface, Tool::Pen);
        assert!(!accepted);
        assert!(surface.snapshot().is_uniform(Rgb::WHITE));

        let pen_down = event(PointerKind::Down, 50.0, 50.0, DeviceClass::Pen);
        adapter.apply(pen_down, display, &mut surface, Tool::Pen);
        assert_eq!(surface.snapshot().get(50, 50), Some(Rgb::INK));
    }

    #[test]
    fn test_leave_and_cancel_end_the_stroke() {
        let mut surface = canvas();
        let adapter = PointerAdapter::default();
        let display = (200.0, 100.0);

        for kind in [PointerKind::Leave, PointerKind::Cancel] {
            let down = event(PointerKind::Down, 10.0, 10.0, DeviceClass::Touch);
            adapter.apply(down, display, &mut surface, Tool::Pen);
            let end = event(kind, 10.0, 10.0, DeviceClass::Touch);
            adapter.apply(end, display, &mut surface, Tool::Pen);
            assert!(!surface.is_drawing());
        }
    }
}
