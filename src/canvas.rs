//! Drawing seam between the effect pipeline and whatever puts pixels on
//! screen.
//!
//! The pipeline only talks to the [`Canvas`] trait. Two implementations
//! live here: [`Scene`], a retained list of [`DrawCommand`]s that can be
//! inspected or replayed, and [`PixelCanvas`], an immediate-mode
//! anti-aliased rasterizer over an RGBA8 framebuffer.

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::color::{Color, Rgba};
use crate::geom::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Source-over alpha blending.
    #[default]
    Normal,
    /// Source is scaled by its alpha and added to the destination.
    Additive,
}

/// Rendering primitives used by the effect pipeline.
pub trait Canvas {
    fn blend_mode(&self) -> BlendMode;

    fn set_blend_mode(&mut self, mode: BlendMode);

    /// Open stroked curve through `points`.
    fn polyline(&mut self, points: &[Point], width: f32, color: Rgba);

    /// Filled disc without outline.
    fn fill_circle(&mut self, center: Point, diameter: f32, color: Rgba);

    fn line(&mut self, from: Point, to: Point, width: f32, color: Rgba);
}

/// Run `draw` with `mode` active and put the previous blend mode back
/// afterwards.
pub fn with_blend<R>(
    canvas: &mut dyn Canvas,
    mode: BlendMode,
    draw: impl FnOnce(&mut dyn Canvas) -> R,
) -> R {
    let previous = canvas.blend_mode();
    canvas.set_blend_mode(mode);
    let result = draw(&mut *canvas);
    canvas.set_blend_mode(previous);
    result
}

// ============================================================================
// RETAINED MODE
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    SetBlend(BlendMode),
    Polyline {
        points: Vec<Point>,
        width: f32,
        color: Rgba,
    },
    Circle {
        center: Point,
        diameter: f32,
        color: Rgba,
    },
    Line {
        from: Point,
        to: Point,
        width: f32,
        color: Rgba,
    },
}

/// Records draw calls for one frame.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    commands: Vec<DrawCommand>,
    blend: BlendMode,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drop recorded commands and return to normal blending.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.blend = BlendMode::Normal;
    }

    /// Replay every recorded command onto `canvas`.
    pub fn render(&self, canvas: &mut dyn Canvas) {
        for command in &self.commands {
            match command {
                DrawCommand::SetBlend(mode) => canvas.set_blend_mode(*mode),
                DrawCommand::Polyline {
                    points,
                    width,
                    color,
                } => canvas.polyline(points, *width, *color),
                DrawCommand::Circle {
                    center,
                    diameter,
                    color,
                } => canvas.fill_circle(*center, *diameter, *color),
                DrawCommand::Line {
                    from,
                    to,
                    width,
                    color,
                } => canvas.line(*from, *to, *width, *color),
            }
        }
    }
}

impl Canvas for Scene {
    fn blend_mode(&self) -> BlendMode {
        self.blend
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend = mode;
        self.commands.push(DrawCommand::SetBlend(mode));
    }

    fn polyline(&mut self, points: &[Point], width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            width,
            color,
        });
    }

    fn fill_circle(&mut self, center: Point, diameter: f32, color: Rgba) {
        self.commands.push(DrawCommand::Circle {
            center,
            diameter,
            color,
        });
    }

    fn line(&mut self, from: Point, to: Point, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }
}

// ============================================================================
// IMMEDIATE MODE
// ============================================================================

/// Rasterizes straight into an RGBA8 frame (`width * height * 4` bytes).
pub struct PixelCanvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
    blend: BlendMode,
}

impl<'a> PixelCanvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        let height = height.min(frame.len() / (width.max(1) * 4));
        Self {
            frame,
            width,
            height,
            blend: BlendMode::Normal,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let mut out = [0; 4];
        out.copy_from_slice(&self.frame[idx..idx + 4]);
        Some(out)
    }

    /// Blend `color` into one pixel with extra `coverage` in `[0, 1]`.
    fn set_pixel(&mut self, x: i32, y: i32, color: Rgba, coverage: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let a = color.alpha_f32() * coverage.clamp(0.0, 1.0);
        let src = [color.r as f32, color.g as f32, color.b as f32];
        for (channel, s) in src.iter().enumerate() {
            let d = self.frame[idx + channel] as f32;
            let out = match self.blend {
                BlendMode::Normal => s * a + d * (1.0 - a),
                BlendMode::Additive => d + s * a,
            };
            self.frame[idx + channel] = out.round().clamp(0.0, 255.0) as u8;
        }
        self.frame[idx + 3] = 0xff;
    }

    /// Pixel bounds `[lo, hi]` of a box, clipped to the frame. `None` when
    /// the box is entirely off screen.
    fn clip(&self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Option<(i32, i32, i32, i32)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let lo_x = min_x.floor().max(0.0);
        let lo_y = min_y.floor().max(0.0);
        let hi_x = max_x.ceil().min(self.width as f32 - 1.0);
        let hi_y = max_y.ceil().min(self.height as f32 - 1.0);
        if !(lo_x <= hi_x && lo_y <= hi_y) {
            return None;
        }
        Some((lo_x as i32, lo_y as i32, hi_x as i32, hi_y as i32))
    }

    /// Stroke the open path through `points`. Every pixel takes its best
    /// coverage over all segments and is blended once, so overlapping
    /// segment ends do not add up.
    fn stroke(&mut self, points: &[Point], width: f32, color: Rgba) {
        let finite = |p: &Point| p.x.is_finite() && p.y.is_finite();
        if points.len() < 2 {
            return;
        }
        let half = width.max(0.0) / 2.0;
        let pad = half + 1.0;

        let (mut min_x, mut min_y) = (f32::INFINITY, f32::INFINITY);
        let (mut max_x, mut max_y) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
        for p in points {
            if !finite(p) {
                continue;
            }
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        let Some((lo_x, lo_y, hi_x, hi_y)) =
            self.clip(min_x - pad, min_y - pad, max_x + pad, max_y + pad)
        else {
            return;
        };
        let cols = (hi_x - lo_x + 1) as usize;
        let rows = (hi_y - lo_y + 1) as usize;
        let mut coverage = vec![0.0_f32; cols * rows];

        for pair in points.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if !(finite(&from) && finite(&to)) {
                continue;
            }
            let Some((sx0, sy0, sx1, sy1)) = self.clip(
                from.x.min(to.x) - pad,
                from.y.min(to.y) - pad,
                from.x.max(to.x) + pad,
                from.y.max(to.y) + pad,
            ) else {
                continue;
            };
            let dx = to.x - from.x;
            let dy = to.y - from.y;
            let len_sq = dx * dx + dy * dy;
            for y in sy0..=sy1 {
                for x in sx0..=sx1 {
                    let px = x as f32 - from.x;
                    let py = y as f32 - from.y;
                    let t = if len_sq > 0.0 {
                        ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0)
                    } else {
                        0.0
                    };
                    let lx = from.x + t * dx;
                    let ly = from.y + t * dy;
                    let dist = ((lx - x as f32).powi(2) + (ly - y as f32).powi(2)).sqrt();
                    let aa = (1.0 - (dist - half).clamp(0.0, 1.0)).clamp(0.0, 1.0);
                    let cell = &mut coverage[(y - lo_y) as usize * cols + (x - lo_x) as usize];
                    *cell = cell.max(aa);
                }
            }
        }

        for (i, &aa) in coverage.iter().enumerate() {
            if aa > 0.01 {
                let x = lo_x + (i % cols) as i32;
                let y = lo_y + (i / cols) as i32;
                self.set_pixel(x, y, color, aa);
            }
        }
    }

    /// Draw `text` with its top-left corner at (`x`, `y`).
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, font: &Font<'_>, size: f32, color: Color) {
        let scale = Scale::uniform(size);
        let v_metrics = font.v_metrics(scale);
        let glyphs: Vec<PositionedGlyph> = font
            .layout(text, scale, point(x as f32, y as f32 + v_metrics.ascent))
            .collect();
        let rgba = color.with_alpha(0xff);
        for glyph in glyphs {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    self.set_pixel(bb.min.x + gx as i32, bb.min.y + gy as i32, rgba, v);
                });
            }
        }
    }
}

impl Canvas for PixelCanvas<'_> {
    fn blend_mode(&self) -> BlendMode {
        self.blend
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend = mode;
    }

    fn polyline(&mut self, points: &[Point], width: f32, color: Rgba) {
        self.stroke(points, width, color);
    }

    fn fill_circle(&mut self, center: Point, diameter: f32, color: Rgba) {
        let radius = diameter.max(0.0) / 2.0;
        let Some((lo_x, lo_y, hi_x, hi_y)) = self.clip(
            center.x - radius - 1.0,
            center.y - radius - 1.0,
            center.x + radius + 1.0,
            center.y + radius + 1.0,
        ) else {
            return;
        };
        for y in lo_y..=hi_y {
            for x in lo_x..=hi_x {
                let dist = Point::new(x as f32, y as f32).distance(center);
                let aa = (radius + 0.5 - dist).clamp(0.0, 1.0);
                if aa > 0.0 {
                    self.set_pixel(x, y, color, aa);
                }
            }
        }
    }

    fn line(&mut self, from: Point, to: Point, width: f32, color: Rgba) {
        self.stroke(&[from, to], width, color);
    }
}
