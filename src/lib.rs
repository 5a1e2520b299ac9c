//! Glowing fingertip trails and pinch-triggered particle bursts driven by
//! per-frame hand landmarks.
//!
//! The pipeline is split the same way as the viewer uses it:
//!
//! * a [`HandSource`] yields zero to two [`HandDetection`]s per frame,
//! * [`HandFx::render_frame`] updates trails, pinch state, theme and
//!   particles and draws everything onto a [`Canvas`],
//! * the canvas is either a [`Scene`] (recorded commands, handy in tests)
//!   or a [`PixelCanvas`] over an RGBA8 framebuffer.
//!
//! ```
//! use neon_hands::{Fingertip, FxConfig, HandDetection, HandFx, Handedness, Point, RenderOptions, Scene};
//!
//! let mut fx = HandFx::new(FxConfig::default()).unwrap();
//! let hand = HandDetection::new(Handedness::Right).with_tip(Fingertip::Index, Point::new(100.0, 100.0));
//! let mut scene = Scene::new();
//! let report = fx.render_frame(&[hand], 720.0, &mut scene, &RenderOptions::default());
//! assert_eq!(report.hands, 1);
//! ```

pub mod app;
pub mod canvas;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod geom;
pub mod hands;
pub mod particles;
pub mod pinch;
pub mod source;
pub mod theme;
pub mod track;
pub mod trail;

pub use canvas::{BlendMode, Canvas, DrawCommand, PixelCanvas, Scene};
pub use color::{Color, Rgba};
pub use config::{AppConfig, FxConfig, ParticleConfig, PinchConfig, RenderOptions, ThemeConfig, TrailConfig};
pub use error::FxError;
pub use frame::{FrameReport, HandFx};
pub use geom::Point;
pub use hands::{parse_frame, Fingertip, HandDetection, HandSource, Handedness};
pub use particles::ParticleSystem;
pub use source::{PipeHands, PointerHands};
pub use theme::ThemeRegistry;
