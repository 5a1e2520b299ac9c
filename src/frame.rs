//! The per-frame pipeline.
//!
//! [`HandFx`] owns all effect state. The host builds it once at startup and
//! calls [`HandFx::render_frame`] exactly once per rendered frame with that
//! frame's detections.

use crate::canvas::Canvas;
use crate::config::{FxConfig, RenderOptions};
use crate::error::FxError;
use crate::hands::{Fingertip, HandDetection};
use crate::particles::ParticleSystem;
use crate::pinch::{rising_edge, PinchDetector, PinchReading};
use crate::theme::ThemeRegistry;
use crate::track::TrackStore;
use crate::trail::TrailRenderer;

/// What happened during one call to [`HandFx::render_frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub frame: u64,
    pub hands: usize,
    pub bursts: usize,
    pub particles: usize,
    pub theme_index: usize,
}

#[derive(Debug)]
pub struct HandFx {
    config: FxConfig,
    themes: ThemeRegistry,
    tracks: TrackStore,
    particles: ParticleSystem,
    pinch: PinchDetector,
    trail: TrailRenderer,
    frame: u64,
}

impl HandFx {
    pub fn new(config: FxConfig) -> Result<Self, FxError> {
        config.validate()?;
        let themes = ThemeRegistry::from_config(&config.theme)?;
        Ok(Self {
            themes,
            tracks: TrackStore::new(),
            particles: ParticleSystem::new(config.particles.clone()),
            pinch: PinchDetector::from_config(&config.pinch),
            trail: TrailRenderer::new(config.trail.clone()),
            frame: 0,
            config,
        })
    }

    pub fn themes(&self) -> &ThemeRegistry {
        &self.themes
    }

    pub fn tracks(&self) -> &TrackStore {
        &self.tracks
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    /// Forget all trails and particles. The theme selection is kept.
    pub fn reset(&mut self) {
        self.tracks.clear();
        self.particles.clear();
    }

    /// Update state from `hands` and draw the frame onto `canvas`.
    ///
    /// `view_height` is the height of the view in the same pixel space as
    /// the detections; it scales the theme control.
    pub fn render_frame(
        &mut self,
        hands: &[HandDetection],
        view_height: f32,
        canvas: &mut dyn Canvas,
        options: &RenderOptions,
    ) -> FrameReport {
        self.frame += 1;
        let mut observed = [[false; 5]; 2];
        let mut bursts = 0;

        for hand in hands {
            if options.show_skeleton {
                draw_skeleton(canvas, hand, options);
            }

            let theme = &self.config.theme;
            if hand.handedness == theme.control_hand {
                if let Some(control) = hand.tip(theme.control_tip) {
                    self.themes.advance(control.y, view_height);
                }
            }

            let anchor = hand.tip(self.pinch.anchor());
            for tip in Fingertip::ALL {
                let Some(point) = hand.tip(tip) else {
                    continue;
                };
                observed[hand.handedness.index()][tip.index()] = true;

                let state = self.tracks.get_or_create(hand.handedness, tip);
                let speed = state.update(point, &self.config.trail);

                let reading = self.pinch.read(anchor, tip, point);
                let color = self.themes.current();
                if rising_edge(&mut state.pinch_prev, reading) {
                    log::debug!("pinch {} {} at frame {}", hand.handedness, tip, self.frame);
                    self.particles.burst(point, color);
                    bursts += 1;
                }

                self.trail.render(canvas, &state.trail, color, speed);
                if options.tip_markers {
                    canvas.fill_circle(
                        point,
                        self.config.tip_marker_diameter,
                        self.config.tip_marker_color,
                    );
                }
            }
        }

        for (side, tip, state) in self.tracks.iter_mut() {
            if !observed[side.index()][tip.index()] {
                rising_edge(&mut state.pinch_prev, PinchReading::Held);
            }
        }

        self.particles.tick(canvas);

        let report = FrameReport {
            frame: self.frame,
            hands: hands.len(),
            bursts,
            particles: self.particles.len(),
            theme_index: self.themes.index(),
        };
        log::trace!("{report:?}");
        report
    }
}

/// Debug overlay: straight lines between connected landmarks of `hand`.
/// Pairs with a missing endpoint are skipped.
pub fn draw_skeleton(canvas: &mut dyn Canvas, hand: &HandDetection, options: &RenderOptions) {
    if hand.keypoints.is_empty() {
        return;
    }
    for &(a, b) in &options.connections {
        if let (Some(from), Some(to)) = (hand.keypoint(a), hand.keypoint(b)) {
            canvas.line(from, to, options.skeleton_width, options.skeleton_color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{BlendMode, DrawCommand, Scene};
    use crate::config::{ParticleConfig, ThemeConfig, TrailConfig};
    use crate::geom::Point;
    use crate::hands::Handedness;

    fn fx() -> HandFx {
        let config = FxConfig::builder()
            .particles(ParticleConfig::builder().seed(9).build())
            .build();
        HandFx::new(config).unwrap()
    }

    fn quiet() -> RenderOptions {
        RenderOptions::builder().tip_markers(false).build()
    }

    fn hand(side: Handedness, tips: &[(Fingertip, f32, f32)]) -> HandDetection {
        tips.iter().fold(HandDetection::new(side), |hand, &(tip, x, y)| {
            hand.with_tip(tip, Point::new(x, y))
        })
    }

    #[test]
    fn rejects_invalid_theme_config() {
        let config = FxConfig::builder()
            .theme(ThemeConfig::builder().palette(vec![]).build())
            .build();
        assert!(matches!(HandFx::new(config), Err(FxError::EmptyPalette)));
    }

    #[test]
    fn rejects_configs_that_cannot_render() {
        let inverted = FxConfig::builder()
            .trail(TrailConfig::builder().min_len(50).max_len(10).build())
            .build();
        assert!(matches!(HandFx::new(inverted), Err(FxError::Config(_))));

        for ceiling in [f32::NAN, -40.0] {
            let config = FxConfig::builder()
                .trail(TrailConfig::builder().speed_ceiling(ceiling).build())
                .build();
            assert!(matches!(HandFx::new(config), Err(FxError::Config(_))), "ceiling {ceiling}");
        }

        let speed = FxConfig::builder()
            .particles(ParticleConfig::builder().max_speed(f32::NAN).build())
            .build();
        assert!(matches!(HandFx::new(speed), Err(FxError::Config(_))));

        let size = FxConfig::builder()
            .particles(ParticleConfig::builder().size_range((2.5, f32::NAN)).build())
            .build();
        assert!(matches!(HandFx::new(size), Err(FxError::Config(_))));
    }

    #[test]
    fn no_hands_still_ticks_particles() {
        let mut fx = fx();
        let mut scene = Scene::new();
        fx.particles.burst(Point::new(1.0, 1.0), fx.themes.current());
        let report = fx.render_frame(&[], 480.0, &mut scene, &quiet());
        assert_eq!(report.hands, 0);
        assert_eq!(report.particles, 20);
        assert_eq!(fx.particles().particles()[0].life, 27);
        assert_eq!(scene.commands().len(), 20);
    }

    #[test]
    fn control_finger_sets_theme() {
        let mut fx = fx();
        let mut scene = Scene::new();
        let left = hand(Handedness::Left, &[(Fingertip::Index, 10.0, 0.0)]);
        fx.render_frame(&[left], 700.0, &mut scene, &quiet());
        assert_eq!(fx.themes().index(), 0);

        let right = hand(Handedness::Right, &[(Fingertip::Index, 10.0, 650.0)]);
        fx.render_frame(&[right], 700.0, &mut scene, &quiet());
        assert_eq!(fx.themes().index(), 0, "right hand must not steer the theme");

        let left_no_index = hand(Handedness::Left, &[(Fingertip::Thumb, 10.0, 650.0)]);
        fx.render_frame(&[left_no_index], 700.0, &mut scene, &quiet());
        assert_eq!(fx.themes().index(), 0);

        let left_low = hand(Handedness::Left, &[(Fingertip::Index, 10.0, 650.0)]);
        let report = fx.render_frame(&[left_low], 700.0, &mut scene, &quiet());
        assert_eq!(report.theme_index, 6);
    }

    #[test]
    fn pinch_bursts_once_per_closing() {
        let mut fx = fx();
        let mut scene = Scene::new();
        let open = hand(
            Handedness::Right,
            &[(Fingertip::Thumb, 100.0, 100.0), (Fingertip::Index, 200.0, 100.0)],
        );
        let closed = hand(
            Handedness::Right,
            &[(Fingertip::Thumb, 100.0, 100.0), (Fingertip::Index, 110.0, 100.0)],
        );

        let frames = [&open, &closed, &closed, &open, &closed];
        let bursts: Vec<usize> = frames
            .iter()
            .map(|h| fx.render_frame(std::slice::from_ref(*h), 480.0, &mut scene, &quiet()).bursts)
            .collect();
        assert_eq!(bursts, vec![0, 1, 0, 0, 1]);
    }

    #[test]
    fn thumb_alone_never_bursts() {
        let mut fx = fx();
        let mut scene = Scene::new();
        let thumb = hand(Handedness::Left, &[(Fingertip::Thumb, 50.0, 50.0)]);
        for _ in 0..4 {
            let report = fx.render_frame(std::slice::from_ref(&thumb), 480.0, &mut scene, &quiet());
            assert_eq!(report.bursts, 0);
        }
        assert!(fx.particles().is_empty());
    }

    #[test]
    fn vanished_finger_must_open_before_refiring() {
        let mut fx = fx();
        let mut scene = Scene::new();
        let closed = hand(
            Handedness::Right,
            &[(Fingertip::Thumb, 100.0, 100.0), (Fingertip::Middle, 105.0, 100.0)],
        );
        let thumb_only = hand(Handedness::Right, &[(Fingertip::Thumb, 100.0, 100.0)]);
        let open = hand(
            Handedness::Right,
            &[(Fingertip::Thumb, 100.0, 100.0), (Fingertip::Middle, 300.0, 100.0)],
        );

        let mut run = |h: &HandDetection| {
            fx.render_frame(std::slice::from_ref(h), 480.0, &mut scene, &quiet()).bursts
        };
        assert_eq!(run(&closed), 1);
        assert_eq!(run(&thumb_only), 0);
        assert_eq!(run(&closed), 0);
        assert_eq!(run(&open), 0);
        assert_eq!(run(&closed), 1);
    }

    #[test]
    fn missing_hand_keeps_trail_untouched() {
        let mut fx = fx();
        let mut scene = Scene::new();
        for x in [0.0, 10.0, 20.0] {
            let h = hand(Handedness::Left, &[(Fingertip::Ring, x, 300.0)]);
            fx.render_frame(&[h], 480.0, &mut scene, &quiet());
        }
        let before = fx.tracks().get(Handedness::Left, Fingertip::Ring).cloned().unwrap();

        for _ in 0..5 {
            fx.render_frame(&[], 480.0, &mut scene, &quiet());
        }
        let after = fx.tracks().get(Handedness::Left, Fingertip::Ring).unwrap();
        assert_eq!(after.trail, before.trail);
        assert_eq!(after.last, before.last);

        let h = hand(Handedness::Left, &[(Fingertip::Ring, 30.0, 300.0)]);
        fx.render_frame(&[h], 480.0, &mut scene, &quiet());
        let resumed = fx.tracks().get(Handedness::Left, Fingertip::Ring).unwrap();
        let old_tip = *before.trail.last().unwrap();
        let expected = old_tip.lerp(Point::new(30.0, 300.0), 0.6);
        assert_eq!(*resumed.trail.last().unwrap(), expected);
        assert_eq!(resumed.trail.len(), before.trail.len() + 1);
    }

    #[test]
    fn trail_rendering_restores_normal_blend() {
        let mut fx = fx();
        let mut scene = Scene::new();
        let h0 = hand(Handedness::Right, &[(Fingertip::Pinky, 0.0, 0.0)]);
        let h1 = hand(Handedness::Right, &[(Fingertip::Pinky, 10.0, 0.0)]);
        fx.render_frame(&[h0], 480.0, &mut scene, &RenderOptions::default());
        fx.render_frame(&[h1], 480.0, &mut scene, &RenderOptions::default());
        assert_eq!(scene.blend_mode(), BlendMode::Normal);
        assert!(scene
            .commands()
            .contains(&DrawCommand::SetBlend(BlendMode::Additive)));
        let markers = scene
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { diameter, .. } if *diameter == 8.0))
            .count();
        assert_eq!(markers, 2);
    }

    #[test]
    fn skeleton_skips_missing_endpoints() {
        let mut keypoints = vec![None; 21];
        keypoints[0] = Some(Point::new(0.0, 0.0));
        keypoints[1] = Some(Point::new(5.0, 5.0));
        keypoints[5] = Some(Point::new(9.0, 0.0));
        let detection = HandDetection::from_keypoints(Handedness::Left, keypoints);
        let options = RenderOptions::builder()
            .show_skeleton(true)
            .tip_markers(false)
            .build();

        let mut scene = Scene::new();
        draw_skeleton(&mut scene, &detection, &options);
        let lines = scene
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count();
        assert_eq!(lines, 2);

        let off = RenderOptions::builder().tip_markers(false).build();
        let mut fx = fx();
        let mut scene = Scene::new();
        fx.render_frame(std::slice::from_ref(&detection), 480.0, &mut scene, &off);
        assert!(scene.is_empty());
    }
}
