use neon_hands::canvas::{BlendMode, DrawCommand, PixelCanvas, Scene};
use neon_hands::config::{FxConfig, ParticleConfig, RenderOptions, ThemeConfig};
use neon_hands::{parse_frame, Color, Fingertip, HandFx, Handedness, Point};

fn seeded_fx() -> HandFx {
    let config = FxConfig::builder()
        .particles(ParticleConfig::builder().seed(2024).build())
        .build();
    HandFx::new(config).unwrap()
}

fn frame(fx: &mut HandFx, line: &str) -> Scene {
    let hands = parse_frame(line).unwrap();
    let mut scene = Scene::new();
    fx.render_frame(&hands, 720.0, &mut scene, &RenderOptions::default());
    scene
}

#[test]
fn test_pinch_burst_lifecycle() {
    let mut fx = seeded_fx();

    // Frame 1: open hand, no burst
    frame(&mut fx, "Right thumb_tip=100,100 index_finger_tip=200,100");
    assert!(fx.particles().is_empty());

    // Frame 2: index closes on the thumb
    frame(&mut fx, "Right thumb_tip=100,100 index_finger_tip=110,100");
    assert_eq!(fx.particles().len(), 20);

    // Frames 3..: pinch held, then released; no further bursts
    frame(&mut fx, "Right thumb_tip=100,100 index_finger_tip=112,100");
    frame(&mut fx, "Right thumb_tip=100,100 index_finger_tip=200,100");
    assert_eq!(fx.particles().len(), 20);

    // The burst was ticked once on spawn plus twice since; 25 frames left
    for _ in 0..24 {
        frame(&mut fx, "");
        assert_eq!(fx.particles().len(), 20);
    }
    frame(&mut fx, "");
    assert!(fx.particles().is_empty());
}

#[test]
fn test_two_hands_burst_independently() {
    let mut fx = seeded_fx();
    frame(
        &mut fx,
        "Left thumb_tip=0,0 ring_finger_tip=300,0 | Right thumb_tip=500,500 pinky_finger_tip=900,500",
    );
    let scene = frame(
        &mut fx,
        "Left thumb_tip=0,0 ring_finger_tip=10,0 | Right thumb_tip=500,500 pinky_finger_tip=510,500",
    );
    assert_eq!(fx.particles().len(), 40);
    let circles = scene
        .commands()
        .iter()
        .filter(|c| matches!(c, DrawCommand::Circle { .. }))
        .count();
    assert!(circles >= 40);
}

#[test]
fn test_sticky_trail_survives_gap() {
    let mut fx = seeded_fx();
    frame(&mut fx, "Left middle_finger_tip=0,0");
    frame(&mut fx, "Left middle_finger_tip=10,0");
    let before = fx.tracks().get(Handedness::Left, Fingertip::Middle).unwrap().clone();
    assert_eq!(before.trail.len(), 2);

    for _ in 0..5 {
        frame(&mut fx, "Right index_finger_tip=400,400");
    }
    let during = fx.tracks().get(Handedness::Left, Fingertip::Middle).unwrap();
    assert_eq!(during.trail, before.trail);

    frame(&mut fx, "Left middle_finger_tip=20,0");
    let after = fx.tracks().get(Handedness::Left, Fingertip::Middle).unwrap();
    assert_eq!(after.trail.len(), 3);
    assert_eq!(&after.trail[..2], &before.trail[..]);
    let tip = before.trail[1];
    assert_eq!(after.trail[2], tip.lerp(Point::new(20.0, 0.0), 0.6));
}

#[test]
fn test_theme_follows_left_index_height() {
    let palette = vec![Color::new(255, 0, 0), Color::new(0, 255, 0), Color::new(0, 0, 255)];
    let config = FxConfig::builder()
        .theme(ThemeConfig::builder().palette(palette.clone()).initial_index(0).build())
        .particles(ParticleConfig::builder().seed(1).build())
        .build();
    let mut fx = HandFx::new(config).unwrap();

    frame(&mut fx, "Left index_finger_tip=50,700");
    assert_eq!(fx.themes().current(), palette[2]);
    frame(&mut fx, "Left index_finger_tip=50,-300");
    assert_eq!(fx.themes().current(), palette[0]);
    frame(&mut fx, "Left index_finger_tip=50,360");
    assert_eq!(fx.themes().current(), palette[1]);
}

#[test]
fn test_every_frame_leaves_normal_blend() {
    let mut fx = seeded_fx();
    frame(&mut fx, "Right kp4=100,100 kp8=300,300 kp12=120,110");
    let scene = frame(&mut fx, "Right kp4=102,100 kp8=310,300 kp12=125,110");
    assert!(scene.commands().contains(&DrawCommand::SetBlend(BlendMode::Additive)));
    let last_blend = scene
        .commands()
        .iter()
        .rev()
        .find_map(|c| match c {
            DrawCommand::SetBlend(mode) => Some(*mode),
            _ => None,
        });
    assert_eq!(last_blend, Some(BlendMode::Normal));
}

#[test]
fn test_scene_replays_onto_pixels() {
    let mut fx = seeded_fx();
    frame(&mut fx, "Left index_finger_tip=20,20");
    let scene = frame(&mut fx, "Left index_finger_tip=40,20");

    let (width, height) = (64, 48);
    let mut buffer = vec![0u8; width * height * 4];
    let mut canvas = PixelCanvas::new(&mut buffer, width, height);
    canvas.clear(Color::new(0, 0, 0));
    scene.render(&mut canvas);

    let lit = buffer.chunks_exact(4).filter(|px| px[..3] != [0, 0, 0]).count();
    assert!(lit > 0, "trail and marker should light some pixels");
}
