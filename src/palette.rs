use anyhow::{anyhow, Result};
use plotters::style::RGBColor;
use std::collections::HashMap;

/// Parse a color given as a known name or `#RRGGBB`/`#RGB` hex.
pub fn parse_color(s: &str) -> Result<RGBColor> {
    parse_named_color(s)
        .or_else(|| parse_hex_color(s))
        .ok_or_else(|| anyhow!("Unknown color '{}' (use a named color or #RRGGBB hex)", s))
}

fn parse_named_color(name: &str) -> Option<RGBColor> {
    match name.to_lowercase().as_str() {
        "white" => Some(RGBColor(255, 255, 255)),
        "black" => Some(RGBColor(0, 0, 0)),
        "red" => Some(RGBColor(255, 0, 0)),
        "green" => Some(RGBColor(0, 128, 0)),
        "blue" => Some(RGBColor(0, 0, 255)),
        "yellow" => Some(RGBColor(255, 255, 0)),
        "cyan" => Some(RGBColor(0, 255, 255)),
        "magenta" => Some(RGBColor(255, 0, 255)),
        "orange" => Some(RGBColor(255, 165, 0)),
        "purple" => Some(RGBColor(128, 0, 128)),
        "pink" => Some(RGBColor(255, 192, 203)),
        "brown" => Some(RGBColor(139, 69, 19)),
        "gray" | "grey" => Some(RGBColor(128, 128, 128)),
        "darkgray" | "darkgrey" => Some(RGBColor(64, 64, 64)),
        "lightgray" | "lightgrey" => Some(RGBColor(192, 192, 192)),
        _ => None,
    }
}

/// Parse hex color (#RRGGBB or #RGB)
fn parse_hex_color(hex: &str) -> Option<RGBColor> {
    let hex = hex.strip_prefix('#')?;
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(RGBColor(r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(RGBColor(r, g, b))
        }
        _ => None,
    }
}

/// Categorical color cycle for hue grouping.
pub struct ColorPalette {
    colors: Vec<RGBColor>,
}

impl ColorPalette {
    /// The tableau "category10" cycle.
    pub fn category10() -> Self {
        Self {
            colors: vec![
                RGBColor(31, 119, 180),
                RGBColor(255, 127, 14),
                RGBColor(44, 160, 44),
                RGBColor(214, 39, 40),
                RGBColor(148, 103, 189),
                RGBColor(140, 86, 75),
                RGBColor(227, 119, 194),
                RGBColor(127, 127, 127),
                RGBColor(188, 189, 34),
                RGBColor(23, 190, 207),
            ],
        }
    }

    /// Assign a stable color per key, cycling when keys outnumber colors.
    pub fn assign_colors(&self, keys: &[String]) -> HashMap<String, RGBColor> {
        keys.iter()
            .enumerate()
            .map(|(i, key)| (key.clone(), self.colors[i % self.colors.len()]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_color() {
        assert_eq!(parse_color("red").unwrap(), RGBColor(255, 0, 0));
        assert_eq!(parse_color("Orange").unwrap(), RGBColor(255, 165, 0));
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_color("#1f77b4").unwrap(), RGBColor(31, 119, 180));
        assert_eq!(parse_color("#fff").unwrap(), RGBColor(255, 255, 255));
    }

    #[test]
    fn test_parse_color_unknown() {
        let result = parse_color("chartreuse-ish");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Unknown color"));
    }

    #[test]
    fn test_assign_colors_stable_and_cycling() {
        let palette = ColorPalette::category10();
        let keys: Vec<String> = (0..12).map(|i| format!("k{}", i)).collect();
        let map = palette.assign_colors(&keys);
        assert_eq!(map.len(), 12);
        // 11th key wraps around to the first color
        assert_eq!(map["k10"], map["k0"]);
        assert_ne!(map["k0"], map["k1"]);
    }
}
