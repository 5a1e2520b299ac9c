//! Viewer window: winit event loop, pixels framebuffer, HUD.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use pixels::{Pixels, SurfaceTexture};
use rusttype::Font;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

use crate::canvas::{PixelCanvas, Scene};
use crate::config::AppConfig;
use crate::error::FxError;
use crate::frame::{FrameReport, HandFx};
use crate::geom::Point;
use crate::hands::HandSource;
use crate::source::{PipeHands, PointerHands};

pub fn load_font(path: &Path) -> Result<Font<'static>, FxError> {
    let bytes = std::fs::read(path).map_err(|source| FxError::FontIo {
        path: path.display().to_string(),
        source,
    })?;
    Font::try_from_vec(bytes).ok_or_else(|| FxError::FontData(path.display().to_string()))
}

fn hud_line(report: &FrameReport, theme_count: usize, skeleton: bool, connected: bool) -> String {
    let mut line = format!(
        "theme {}/{}  hands {}  particles {}  skeleton {} [k]",
        report.theme_index + 1,
        theme_count,
        report.hands,
        report.particles,
        if skeleton { "on" } else { "off" },
    );
    if !connected {
        line.push_str("  input closed");
    }
    line
}

/// Open the viewer and run until the window is closed.
pub fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut fx = HandFx::new(config.fx.clone())?;
    let font = config.font_path.as_deref().map(load_font).transpose()?;
    let mut render = config.render.clone();

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title(&config.title)
        .with_inner_size(LogicalSize::new(
            config.window_width as f64,
            config.window_height as f64,
        ))
        .with_resizable(false)
        .build(&event_loop)
        .map_err(|err| FxError::Window(err.to_string()))?;
    let window = Arc::new(window);
    let window_clone = window.clone();

    let size = window.inner_size();
    let mut fb_width = size.width as usize;
    let mut fb_height = size.height as usize;
    let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
    let mut pixels = Pixels::new(size.width, size.height, surface_texture)
        .map_err(|err| FxError::Window(err.to_string()))?;

    let mut source: Box<dyn HandSource> = if config.use_stdin {
        log::info!("reading landmark frames from stdin");
        Box::new(PipeHands::stdin())
    } else {
        log::info!("pointer simulation: move to steer, hold the left button to pinch");
        Box::new(PointerHands::new(fb_width, fb_height))
    };

    let mut scene = Scene::new();
    let frame_duration = Duration::from_secs_f64(1.0 / config.max_framerate.max(1.0));
    let mut last_frame = Instant::now();
    let mut input_closed = false;
    log::info!("{}x{} framebuffer at {} fps", fb_width, fb_height, config.max_framerate);

    event_loop.run(move |event, window_target| {
        window_target.set_control_flow(ControlFlow::Poll);
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    fb_width = new_size.width as usize;
                    fb_height = new_size.height as usize;
                    let _ = pixels.resize_buffer(new_size.width, new_size.height);
                    let _ = pixels.resize_surface(new_size.width, new_size.height);
                    source.view_resized(fb_width, fb_height);
                }
                WindowEvent::CursorMoved { position, .. } => {
                    source.pointer_moved(Point::new(position.x as f32, position.y as f32));
                }
                WindowEvent::MouseInput {
                    state,
                    button: MouseButton::Left,
                    ..
                } => {
                    source.pointer_pressed(state == ElementState::Pressed);
                }
                WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                    match event.logical_key.as_ref() {
                        Key::Character("k") => {
                            render.show_skeleton = !render.show_skeleton;
                            log::info!("skeleton overlay {}", render.show_skeleton);
                        }
                        Key::Character("m") => render.tip_markers = !render.tip_markers,
                        Key::Character("r") => {
                            fx.reset();
                            log::info!("effect state reset");
                        }
                        Key::Named(NamedKey::Escape) => window_target.exit(),
                        _ => {}
                    }
                }
                WindowEvent::RedrawRequested => {
                    let hands = source.poll();
                    scene.clear();
                    let report = fx.render_frame(hands, fb_height as f32, &mut scene, &render);
                    if !input_closed && !source.is_connected() {
                        input_closed = true;
                        log::warn!("hand input ended; holding the last frame");
                    }

                    let mut canvas = PixelCanvas::new(pixels.frame_mut(), fb_width, fb_height);
                    canvas.clear(config.background);
                    scene.render(&mut canvas);
                    if let Some(font) = &font {
                        let text = hud_line(
                            &report,
                            fx.themes().count(),
                            render.show_skeleton,
                            !input_closed,
                        );
                        canvas.draw_text(12, 10, &text, font, config.hud_font_size, config.hud_color);
                    }

                    if let Err(err) = pixels.render() {
                        log::error!("present failed: {err}");
                        window_target.exit();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                if last_frame.elapsed() >= frame_duration {
                    window_clone.request_redraw();
                    last_frame = Instant::now();
                }
            }
            _ => {}
        }
    })?;

    Ok(())
}
