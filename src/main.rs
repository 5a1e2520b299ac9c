use std::env;
use std::error::Error;
use std::path::PathBuf;

use env_logger::Env;
use neon_hands::config::{AppConfig, FxConfig, ParticleConfig, RenderOptions, ThemeConfig};
use neon_hands::Color;

const USAGE: &str = "usage: neon_hands [--width W] [--height H] [--fps N] [--title T] [--font PATH] \
[--stdin] [--skeleton] [--seed N] [--themes HEX,HEX,...] [--max-particles N]";

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Option<T> {
    let value = value?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            log::warn!("ignoring {flag} {value:?}: not a valid value");
            None
        }
    }
}

fn parse_themes(list: &str) -> Result<Vec<Color>, Box<dyn Error>> {
    let themes = list
        .split(',')
        .map(str::trim)
        .filter(|hex| !hex.is_empty())
        .map(Color::from_hex)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(themes)
}

fn parse_args<I: Iterator<Item = String>>(args: I) -> Result<AppConfig, Box<dyn Error>> {
    let defaults = AppConfig::default();
    let mut width = defaults.window_width;
    let mut height = defaults.window_height;
    let mut fps = defaults.max_framerate;
    let mut title = defaults.title;
    let mut font_path: Option<PathBuf> = None;
    let mut use_stdin = false;
    let mut show_skeleton = false;
    let mut seed: Option<u64> = None;
    let mut themes: Option<Vec<Color>> = None;
    let mut max_particles = ParticleConfig::default().max_particles;

    let mut args = args.skip(1).peekable();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--width" => width = parse_value(&arg, args.next()).unwrap_or(width),
            "--height" => height = parse_value(&arg, args.next()).unwrap_or(height),
            "--fps" => fps = parse_value(&arg, args.next()).unwrap_or(fps),
            "--title" => {
                if let Some(value) = args.next() {
                    title = value;
                }
            }
            "--font" => font_path = args.next().map(PathBuf::from),
            "--stdin" => use_stdin = true,
            "--skeleton" => show_skeleton = true,
            "--seed" => seed = parse_value(&arg, args.next()).or(seed),
            "--themes" => {
                if let Some(list) = args.next() {
                    themes = Some(parse_themes(&list)?);
                }
            }
            "--max-particles" => max_particles = parse_value(&arg, args.next()).unwrap_or(max_particles),
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other => log::warn!("ignoring unknown argument {other:?}"),
        }
    }

    let theme = match themes {
        Some(palette) => ThemeConfig::builder().palette(palette).build(),
        None => ThemeConfig::default(),
    };
    let particles = ParticleConfig::builder()
        .max_particles(max_particles)
        .maybe_seed(seed)
        .build();
    let fx = FxConfig::builder().theme(theme).particles(particles).build();

    Ok(AppConfig::builder()
        .title(title)
        .window_width(width)
        .window_height(height)
        .max_framerate(fps)
        .maybe_font_path(font_path)
        .use_stdin(use_stdin)
        .render(RenderOptions::builder().show_skeleton(show_skeleton).build())
        .fx(fx)
        .build())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = parse_args(env::args())?;
    log::debug!("{config:?}");
    neon_hands::app::run(config)
}
