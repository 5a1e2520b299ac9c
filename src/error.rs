use thiserror::Error;

/// Errors raised at the fallible edges of the crate: configuration,
/// landmark input parsing and window/font setup. The per-frame pipeline
/// itself never fails.
#[derive(Debug, Error)]
pub enum FxError {
    #[error("theme palette is empty")]
    EmptyPalette,

    #[error("initial theme index {index} is out of range for {count} themes")]
    ThemeIndex { index: usize, count: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid hex color {0:?}")]
    HexColor(String),

    #[error("malformed landmark line: {0}")]
    Parse(String),

    #[error("could not read font file {path}: {source}")]
    FontIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("font file {0} is not a usable TrueType/OpenType font")]
    FontData(String),

    #[error("window setup failed: {0}")]
    Window(String),
}
