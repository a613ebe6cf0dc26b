use serde::{Deserialize, Serialize};

use super::raster::Rgb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    #[default]
    Pen,
    /// Overpaints with the background colour
    Eraser,
}

/// Width and colour a stroke is rendered with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub color: Rgb,
}

/// Per-tool stroke settings plus the canvas background
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    pub pen_width: f32,
    pub pen_color: Rgb,
    pub eraser_width: f32,
    pub background: Rgb,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            pen_width: 4.0,
            pen_color: Rgb::INK,
            eraser_width: 20.0,
            background: Rgb::WHITE,
        }
    }
}

impl BrushConfig {
    pub fn style(&self, tool: Tool) -> StrokeStyle {
        match tool {
            Tool::Pen => StrokeStyle {
                width: self.pen_width,
                color: self.pen_color,
            },
            Tool::Eraser => StrokeStyle {
                width: self.eraser_width,
                color: self.background,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_styles() {
        let brush = BrushConfig::default();

        let pen = brush.style(Tool::Pen);
        assert_eq!(pen.width, 4.0);
        assert_eq!(pen.color, Rgb::INK);

        let eraser = brush.style(Tool::Eraser);
        assert_eq!(eraser.width, 20.0);
        assert_eq!(eraser.color, Rgb::WHITE);
    }

    #[test]
    fn test_eraser_follows_background() {
        let brush = BrushConfig {
            background: Rgb::new(0xf5, 0xf5, 0xf4),
            ..BrushConfig::default()
        };
        assert_eq!(brush.style(Tool::Eraser).color, Rgb::new(0xf5, 0xf5, 0xf4));
    }
}
