use crate::canvas::{with_blend, BlendMode, Canvas};
use crate::color::Color;
use crate::config::TrailConfig;
use crate::geom::{remap, Point};

/// Draws one fingertip trail as a two-layer neon stroke with a glowing tip.
#[derive(Debug, Clone, Default)]
pub struct TrailRenderer {
    config: TrailConfig,
}

impl TrailRenderer {
    pub fn new(config: TrailConfig) -> Self {
        Self { config }
    }

    /// Outer stroke width at `speed`.
    pub fn outer_width(&self, speed: f32) -> f32 {
        let c = &self.config;
        let speed = if speed.is_nan() { 0.0 } else { speed.clamp(0.0, c.speed_ceiling) };
        remap(speed, 0.0, c.speed_ceiling, c.min_width, c.max_width)
    }

    pub fn inner_width(&self, outer: f32) -> f32 {
        (outer * self.config.inner_width_factor).max(self.config.inner_min_width)
    }

    /// Halo alpha for a disc of `diameter`: brightest at the smallest disc.
    fn halo_alpha(&self, diameter: f32) -> u8 {
        let [largest, _, smallest] = self.config.halo_diameters;
        let (bright, dim) = self.config.halo_alpha;
        if largest == smallest {
            return bright;
        }
        remap(diameter, smallest, largest, bright as f32, dim as f32)
            .round()
            .clamp(0.0, 255.0) as u8
    }

    pub fn render(&self, canvas: &mut dyn Canvas, trail: &[Point], color: Color, speed: f32) {
        let Some(&tip) = trail.last() else {
            return;
        };
        if trail.len() < 2 {
            return;
        }

        let outer = self.outer_width(speed);
        let inner = self.inner_width(outer);
        with_blend(canvas, BlendMode::Additive, |canvas| {
            canvas.polyline(trail, outer, color.with_alpha(self.config.outer_alpha));
            canvas.polyline(trail, inner, color.with_alpha(self.config.inner_alpha));
            for diameter in self.config.halo_diameters {
                canvas.fill_circle(tip, diameter, color.with_alpha(self.halo_alpha(diameter)));
            }
        });
    }
}
