use include_dir::{include_dir, Dir};
use ratatui::style::Color;
use serde::Deserialize;

static PALETTE_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/palette");

const PALETTE_FILE: &str = "palettes.json";
const FALLBACK_COLOR: (u8, u8, u8) = (255, 255, 255);

/// A named group of hex colours, indexed by position
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Palette {
    pub name: String,
    pub colors: Vec<String>,
}

impl Palette {
    /// Colour for wave layer `index`, cycling when the palette is short
    pub fn rgb(&self, index: usize) -> (u8, u8, u8) {
        if self.colors.is_empty() {
            return FALLBACK_COLOR;
        }
        parse_hex(&self.colors[index % self.colors.len()]).unwrap_or(FALLBACK_COLOR)
    }

    pub fn color(&self, index: usize) -> Color {
        let (r, g, b) = self.rgb(index);
        Color::Rgb(r, g, b)
    }
}

#[derive(Clone, Debug)]
pub struct PaletteSet {
    palettes: Vec<Palette>,
}

impl PaletteSet {
    pub fn builtin() -> Self {
        match read_palettes() {
            Ok(palettes) if !palettes.is_empty() => Self { palettes },
            Ok(_) => Self::fallback(),
            Err(e) => {
                tracing::error!("unable to load bundled palettes: {e}");
                Self::fallback()
            }
        }
    }

    pub fn new(palettes: Vec<Palette>) -> Self {
        if palettes.is_empty() {
            Self::fallback()
        } else {
            Self { palettes }
        }
    }

    fn fallback() -> Self {
        Self {
            palettes: vec![Palette {
                name: "Mono".to_string(),
                colors: vec!["#ffffff".to_string()],
            }],
        }
    }

    pub fn len(&self) -> usize {
        self.palettes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Palette> {
        self.palettes.iter()
    }

    /// Index that is safe to use, falling back to the first palette
    pub fn resolve_index(&self, index: usize) -> usize {
        if index < self.palettes.len() {
            index
        } else {
            0
        }
    }

    pub fn get(&self, index: usize) -> &Palette {
        &self.palettes[self.resolve_index(index)]
    }
}

fn read_palettes() -> Result<Vec<Palette>, Box<dyn std::error::Error>> {
    let file = PALETTE_DIR
        .get_file(PALETTE_FILE)
        .ok_or("palette file not found")?;
    let contents = file
        .contents_utf8()
        .ok_or("palette file is not valid utf-8")?;
    Ok(serde_json::from_str(contents)?)
}

/// Parse `#rgb` or `#rrggbb` (leading `#` optional)
pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let mut channels = hex
                .chars()
                .map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
            Some((channels.next()??, channels.next()??, channels.next()??))
        }
        6 => {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some((channel(0)?, channel(2)?, channel(4)?))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_palettes_load() {
        let set = PaletteSet::builtin();
        assert!(set.len() >= 2);
        for palette in set.iter() {
            assert!(!palette.name.is_empty());
            assert_eq!(palette.colors.len(), 3, "{}", palette.name);
            for color in &palette.colors {
                assert!(parse_hex(color).is_some(), "{color}");
            }
        }
    }

    #[test]
    fn test_out_of_range_index_falls_back() {
        let set = PaletteSet::builtin();
        assert_eq!(set.resolve_index(set.len()), 0);
        assert_eq!(set.get(999).name, set.get(0).name);
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#1b4965"), Some((0x1b, 0x49, 0x65)));
        assert_eq!(parse_hex("fff"), Some((255, 255, 255)));
        assert_eq!(parse_hex("#f0a"), Some((255, 0, 170)));
        assert_eq!(parse_hex("#12345"), None);
        assert_eq!(parse_hex("#gggggg"), None);
        assert_eq!(parse_hex("#ééé"), None);
    }

    #[test]
    fn test_short_palette_cycles() {
        let palette = Palette {
            name: "Duo".into(),
            colors: vec!["#000000".into(), "#ffffff".into()],
        };
        assert_eq!(palette.rgb(2), (0, 0, 0));
        assert_eq!(palette.rgb(3), (255, 255, 255));
    }

    #[test]
    fn test_empty_palette_uses_fallback_colour() {
        let palette = Palette {
            name: "Empty".into(),
            colors: vec![],
        };
        assert_eq!(palette.color(0), Color::Rgb(255, 255, 255));
        assert_eq!(PaletteSet::new(vec![]).len(), 1);
    }
}
