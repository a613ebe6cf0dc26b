pub mod brush;
pub mod canvas;
pub mod input;
pub mod raster;

pub use brush::{BrushConfig, StrokeStyle, Tool};
pub use canvas::{DrawingSurface, StrokeCanvas};
pub use input::{
    display_to_raster, DeviceClass, InputFilter, PointerAdapter, PointerEvent, PointerKind,
};
pub use raster::{Point, Raster, RasterImage, ResizePolicy, Rgb};
