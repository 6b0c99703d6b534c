//! Session color palettes.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A CSS hex color (`#RRGGBB` or `#RGB`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    /// Wrap a CSS color string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The CSS representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode into RGB bytes, if this is a hex color.
    #[must_use]
    pub fn rgb(&self) -> Option<[u8; 3]> {
        let hex = self.0.strip_prefix('#')?;
        match hex.len() {
            6 => {
                let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
                let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
                let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
                Some([r, g, b])
            }
            3 => {
                let mut out = [0u8; 3];
                for (slot, digit) in out.iter_mut().zip(hex.chars()) {
                    let v = u8::try_from(digit.to_digit(16)?).ok()?;
                    *slot = v * 17;
                }
                Some(out)
            }
            _ => None,
        }
    }

    /// Opaque black.
    #[must_use]
    pub fn black() -> Self {
        Self::new("#000000")
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("#FFFFFF")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The predefined palettes a session can draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteKind {
    /// Coral, teal, sky and salmon.
    Warm,
    /// Pastel mint, lime, peach and rose.
    Soft,
    /// Indigo, violet, orchid and azure.
    Dreamy,
    /// Cyan through navy.
    Cool,
}

impl PaletteKind {
    /// All palettes, in selection order.
    pub const ALL: [PaletteKind; 4] = [Self::Warm, Self::Soft, Self::Dreamy, Self::Cool];

    /// Hex colors of this palette.
    #[must_use]
    pub const fn hex_colors(self) -> [&'static str; 4] {
        match self {
            Self::Warm => ["#FF6B6B", "#4ECDC4", "#45B7D1", "#FFA07A"],
            Self::Soft => ["#A8E6CF", "#DCEDC1", "#FFD3B6", "#FFAAA5"],
            Self::Dreamy => ["#667eea", "#764ba2", "#f093fb", "#4facfe"],
            Self::Cool => ["#00d2ff", "#3a7bd5", "#00b4db", "#1e3c72"],
        }
    }
}

/// The active color set for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    kind: Option<PaletteKind>,
    colors: Vec<Color>,
}

impl Palette {
    /// A custom palette. An empty list yields white particles.
    #[must_use]
    pub fn new(colors: Vec<Color>) -> Self {
        Self { kind: None, colors }
    }

    /// One of the predefined palettes.
    #[must_use]
    pub fn preset(kind: PaletteKind) -> Self {
        Self {
            kind: Some(kind),
            colors: kind.hex_colors().into_iter().map(Color::new).collect(),
        }
    }

    /// A predefined palette chosen uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let kind = PaletteKind::ALL
            .choose(rng)
            .copied()
            .unwrap_or(PaletteKind::Warm);
        Self::preset(kind)
    }

    /// Pick one color uniformly.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        self.colors.choose(rng).cloned().unwrap_or_default()
    }

    /// The preset this palette came from, if any.
    #[must_use]
    pub fn kind(&self) -> Option<PaletteKind> {
        self.kind
    }

    /// Colors in this palette.
    #[must_use]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::preset(PaletteKind::Warm)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn hex_colors_decode() {
        assert_eq!(Color::new("#FF6B6B").rgb(), Some([255, 107, 107]));
        assert_eq!(Color::new("#0f0").rgb(), Some([0, 255, 0]));
        assert_eq!(Color::new("teal").rgb(), None);
        assert_eq!(Color::new("#12345").rgb(), None);
    }

    #[test]
    fn presets_have_four_colors() {
        for kind in PaletteKind::ALL {
            let palette = Palette::preset(kind);
            assert_eq!(palette.colors().len(), 4);
            assert!(palette.colors().iter().all(|c| c.rgb().is_some()));
        }
    }

    #[test]
    fn pick_draws_from_palette() {
        let mut rng = StdRng::seed_from_u64(7);
        let palette = Palette::preset(PaletteKind::Dreamy);
        for _ in 0..32 {
            assert!(palette.colors().contains(&palette.pick(&mut rng)));
        }
    }

    #[test]
    fn empty_palette_picks_white() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(Palette::new(Vec::new()).pick(&mut rng), Color::default());
    }

    #[test]
    fn random_palette_is_a_preset() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(Palette::random(&mut rng).kind().is_some());
    }

    #[test]
    fn color_serializes_as_plain_string() {
        let json = serde_json::to_string(&Color::new("#4ECDC4")).expect("json");
        assert_eq!(json, "\"#4ECDC4\"");
    }
}
