//! Colours for link map fills and strokes, keyed by change kind

use crate::chunk::ChangeKind;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ColorError {
    #[error("invalid hex color '{0}': expected 6 or 8 hex digits")]
    Length(String),
    #[error("invalid hex color '{0}': bad component")]
    Component(String),
}

/// RGBA colour, channels in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (leading `#` optional)
    pub fn parse_hex(s: &str) -> Result<Self, ColorError> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 && hex.len() != 8 {
            return Err(ColorError::Length(s.to_string()));
        }
        if !hex.is_ascii() {
            return Err(ColorError::Component(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map(|v| v as f64 / 255.0)
                .map_err(|_| ColorError::Component(s.to_string()))
        };
        let a = if hex.len() == 8 { channel(6)? } else { 1.0 };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, a))
    }

    /// 8-bit channels, alpha dropped
    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let c = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        (c(self.r), c(self.g), c(self.b))
    }

    /// Composite `self` over an opaque `below`
    pub fn over(self, below: Rgba) -> Rgba {
        let a = self.a.clamp(0.0, 1.0);
        let mix = |top: f64, bottom: f64| top * a + bottom * (1.0 - a);
        Rgba::new(mix(self.r, below.r), mix(self.g, below.g), mix(self.b, below.b), 1.0)
    }
}

/// Fill and stroke colours per change kind, plus the current-chunk overlay
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScheme {
    pub fill: FxHashMap<ChangeKind, Rgba>,
    pub line: FxHashMap<ChangeKind, Rgba>,
    pub current_chunk_highlight: Rgba,
}

impl ColorScheme {
    pub fn fill(&self, kind: ChangeKind) -> Rgba {
        self.fill.get(&kind).copied().unwrap_or(FALLBACK)
    }

    pub fn line(&self, kind: ChangeKind) -> Rgba {
        self.line.get(&kind).copied().unwrap_or(FALLBACK)
    }
}

const FALLBACK: Rgba = Rgba::new(0.5, 0.5, 0.5, 1.0);

impl Default for ColorScheme {
    fn default() -> Self {
        let fill = [
            (ChangeKind::Insert, Rgba::new(0.816, 1.0, 0.639, 1.0)),
            (ChangeKind::Delete, Rgba::new(0.816, 1.0, 0.639, 1.0)),
            (ChangeKind::Replace, Rgba::new(0.741, 0.867, 1.0, 1.0)),
            (ChangeKind::Conflict, Rgba::new(1.0, 0.647, 0.639, 1.0)),
        ];
        let line = [
            (ChangeKind::Insert, Rgba::new(0.647, 1.0, 0.298, 1.0)),
            (ChangeKind::Delete, Rgba::new(0.647, 1.0, 0.298, 1.0)),
            (ChangeKind::Replace, Rgba::new(0.545, 0.749, 0.953, 1.0)),
            (ChangeKind::Conflict, Rgba::new(1.0, 0.4, 0.4, 1.0)),
        ];
        Self {
            fill: fill.into_iter().collect(),
            line: line.into_iter().collect(),
            current_chunk_highlight: Rgba::new(1.0, 1.0, 0.0, 0.25),
        }
    }
}
