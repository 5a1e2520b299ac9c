//! Tunables for the effect pipeline and the viewer window.
//!
//! Every struct derives a `bon` builder with a default on each field, so
//! callers only name what they change:
//!
//! ```
//! use neon_hands::config::{FxConfig, PinchConfig};
//!
//! let config = FxConfig::builder()
//!     .pinch(PinchConfig::builder().threshold(28.0).build())
//!     .build();
//! assert_eq!(config.pinch.threshold, 28.0);
//! ```

use std::path::PathBuf;

use bon::Builder;

use crate::color::{Color, Rgba};
use crate::error::FxError;
use crate::hands::{Fingertip, Handedness, HAND_CONNECTIONS};

/// Default theme palette, cycled by the control fingertip.
pub const DEFAULT_THEMES: [Color; 7] = [
    Color::new(0x60, 0xa5, 0xfa),
    Color::new(0xc0, 0x84, 0xfc),
    Color::new(0x22, 0xd3, 0xee),
    Color::new(0xa3, 0xe6, 0x35),
    Color::new(0xfb, 0x71, 0x85),
    Color::new(0xf5, 0x9e, 0x0b),
    Color::new(0x8b, 0x5c, 0xf6),
];

// ============================================================================
// THEME
// ============================================================================

#[derive(Debug, Clone, Builder)]
pub struct ThemeConfig {
    #[builder(default = DEFAULT_THEMES.to_vec())]
    pub palette: Vec<Color>,
    #[builder(default = 1)]
    pub initial_index: usize,
    /// Hand whose control fingertip steers the theme.
    #[builder(default = Handedness::Left)]
    pub control_hand: Handedness,
    #[builder(default = Fingertip::Index)]
    pub control_tip: Fingertip,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

// ============================================================================
// TRAIL
// ============================================================================

#[derive(Debug, Clone, Builder)]
pub struct TrailConfig {
    /// Fraction of the way a new trail point moves from the previous tip
    /// toward the raw observation.
    #[builder(default = 0.6)]
    pub smoothing: f32,
    /// Speeds (pixels/frame) above this are treated as this value.
    #[builder(default = 40.0)]
    pub speed_ceiling: f32,
    #[builder(default = 12)]
    pub min_len: usize,
    #[builder(default = 48)]
    pub max_len: usize,

    #[builder(default = 6.0)]
    pub min_width: f32,
    #[builder(default = 16.0)]
    pub max_width: f32,
    #[builder(default = 100)]
    pub outer_alpha: u8,
    #[builder(default = 220)]
    pub inner_alpha: u8,
    #[builder(default = 0.35)]
    pub inner_width_factor: f32,
    #[builder(default = 2.0)]
    pub inner_min_width: f32,

    /// Halo disc diameters at the trail tip, largest first.
    #[builder(default = [18.0, 12.0, 6.0])]
    pub halo_diameters: [f32; 3],
    /// Halo alpha at the smallest and at the largest diameter.
    #[builder(default = (220, 50))]
    pub halo_alpha: (u8, u8),
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl TrailConfig {
    pub fn validate(&self) -> Result<(), FxError> {
        finite("trail.smoothing", self.smoothing)?;
        if !(self.speed_ceiling.is_finite() && self.speed_ceiling > 0.0) {
            return Err(FxError::Config(format!(
                "trail.speed_ceiling must be positive, got {}",
                self.speed_ceiling
            )));
        }
        if self.min_len > self.max_len {
            return Err(FxError::Config(format!(
                "trail.min_len {} exceeds trail.max_len {}",
                self.min_len, self.max_len
            )));
        }
        finite("trail.min_width", self.min_width)?;
        finite("trail.max_width", self.max_width)?;
        finite("trail.inner_width_factor", self.inner_width_factor)?;
        finite("trail.inner_min_width", self.inner_min_width)?;
        for diameter in self.halo_diameters {
            finite("trail.halo_diameters", diameter)?;
        }
        Ok(())
    }
}

// ============================================================================
// PINCH
// ============================================================================

#[derive(Debug, Clone, Builder)]
pub struct PinchConfig {
    /// Fingertip the others are measured against.
    #[builder(default = Fingertip::Thumb)]
    pub anchor: Fingertip,
    /// Pinch when the distance is strictly below this many pixels.
    #[builder(default = 36.0)]
    pub threshold: f32,
}

impl Default for PinchConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl PinchConfig {
    pub fn validate(&self) -> Result<(), FxError> {
        finite("pinch.threshold", self.threshold)
    }
}

// ============================================================================
// PARTICLES
// ============================================================================

#[derive(Debug, Clone, Builder)]
pub struct ParticleConfig {
    #[builder(default = 20)]
    pub burst_count: usize,
    /// Each velocity component is drawn from `[-max_speed, max_speed]`.
    #[builder(default = 2.5)]
    pub max_speed: f32,
    /// Lifetime in frames.
    #[builder(default = 28)]
    pub life: i32,
    #[builder(default = (2.5, 6.0))]
    pub size_range: (f32, f32),
    #[builder(default = 0.96)]
    pub damping: f32,
    /// Alpha at full life; fades linearly to zero.
    #[builder(default = 220.0)]
    pub max_alpha: f32,
    /// Population cap; the oldest particles go first. `usize::MAX`
    /// disables the cap.
    #[builder(default = 4096)]
    pub max_particles: usize,
    /// Fixed RNG seed for reproducible bursts.
    pub seed: Option<u64>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ParticleConfig {
    pub fn validate(&self) -> Result<(), FxError> {
        finite("particles.max_speed", self.max_speed)?;
        finite("particles.size_range", self.size_range.0)?;
        finite("particles.size_range", self.size_range.1)?;
        finite("particles.damping", self.damping)?;
        finite("particles.max_alpha", self.max_alpha)
    }
}

// ============================================================================
// EFFECT STATE
// ============================================================================

#[derive(Debug, Clone, Builder)]
pub struct FxConfig {
    #[builder(default)]
    pub theme: ThemeConfig,
    #[builder(default)]
    pub trail: TrailConfig,
    #[builder(default)]
    pub pinch: PinchConfig,
    #[builder(default)]
    pub particles: ParticleConfig,
    #[builder(default = Rgba::new(255, 230, 120, 200))]
    pub tip_marker_color: Rgba,
    #[builder(default = 8.0)]
    pub tip_marker_diameter: f32,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl FxConfig {
    /// Reject values the per-frame pipeline cannot work with. The theme
    /// palette is checked when the registry is built.
    pub fn validate(&self) -> Result<(), FxError> {
        self.trail.validate()?;
        self.pinch.validate()?;
        self.particles.validate()?;
        finite("tip_marker_diameter", self.tip_marker_diameter)
    }
}

fn finite(name: &str, value: f32) -> Result<(), FxError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(FxError::Config(format!("{name} must be finite, got {value}")))
    }
}

/// Per-frame render switches passed explicitly by the host.
#[derive(Debug, Clone, Builder)]
pub struct RenderOptions {
    #[builder(default = false)]
    pub show_skeleton: bool,
    /// Landmark index pairs drawn by the skeleton overlay.
    #[builder(default = HAND_CONNECTIONS.to_vec())]
    pub connections: Vec<(usize, usize)>,
    #[builder(default = Rgba::new(255, 0, 0, 255))]
    pub skeleton_color: Rgba,
    #[builder(default = 2.0)]
    pub skeleton_width: f32,
    #[builder(default = true)]
    pub tip_markers: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

// ============================================================================
// VIEWER WINDOW
// ============================================================================

#[derive(Debug, Clone, Builder)]
pub struct AppConfig {
    #[builder(default = "Neon Hands".to_string())]
    pub title: String,
    #[builder(default = 960)]
    pub window_width: usize,
    #[builder(default = 720)]
    pub window_height: usize,
    #[builder(default = 60.0)]
    pub max_framerate: f64,
    #[builder(default = Color::new(0x08, 0x08, 0x0e))]
    pub background: Color,
    /// TrueType/OpenType font for the HUD; the HUD is hidden without one.
    pub font_path: Option<PathBuf>,
    #[builder(default = 18.0)]
    pub hud_font_size: f32,
    #[builder(default = Color::new(0xe5, 0xe7, 0xeb))]
    pub hud_color: Color,
    /// Read landmark frames from stdin instead of simulating a hand with
    /// the pointer.
    #[builder(default = false)]
    pub use_stdin: bool,
    #[builder(default)]
    pub render: RenderOptions,
    #[builder(default)]
    pub fx: FxConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
