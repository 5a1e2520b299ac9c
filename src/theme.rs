use crate::color::Color;
use crate::config::ThemeConfig;
use crate::error::FxError;
use crate::geom::remap;

/// Ordered palette plus the index of the active color.
#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    themes: Vec<Color>,
    index: usize,
}

impl ThemeRegistry {
    pub fn new(themes: Vec<Color>, initial_index: usize) -> Result<Self, FxError> {
        if themes.is_empty() {
            return Err(FxError::EmptyPalette);
        }
        if initial_index >= themes.len() {
            return Err(FxError::ThemeIndex {
                index: initial_index,
                count: themes.len(),
            });
        }
        Ok(Self {
            themes,
            index: initial_index,
        })
    }

    pub fn from_config(config: &ThemeConfig) -> Result<Self, FxError> {
        Self::new(config.palette.clone(), config.initial_index)
    }

    pub fn current(&self) -> Color {
        self.themes[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of themes; never zero.
    pub fn count(&self) -> usize {
        self.themes.len()
    }

    /// Select the theme whose band of `[0, view_height]` contains
    /// `vertical`. Inputs outside the view are clamped to its edges.
    pub fn advance(&mut self, vertical: f32, view_height: f32) {
        if !vertical.is_finite() || !(view_height > 0.0) {
            return;
        }
        let count = self.themes.len();
        let y = vertical.clamp(0.0, view_height);
        let band = remap(y, 0.0, view_height, 0.0, count as f32).floor();
        let index = (band.max(0.0) as usize).min(count - 1);
        if index != self.index {
            log::debug!("theme {} -> {}", self.index, index);
            self.index = index;
        }
    }
}
