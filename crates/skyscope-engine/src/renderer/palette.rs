//! CSS color strings from snapshots → `VectorColor`.

use crate::systems::vector::VectorColor;

/// Parse `#rgb`, `#rrggbb`, `rgb(..)`, `rgba(..)` or a named color.
/// Unknown input yields `None`.
pub fn parse_css_color(text: &str) -> Option<VectorColor> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(args) = text
        .strip_prefix("rgba(")
        .or_else(|| text.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_rgb_args(args);
    }
    named(&text.to_ascii_lowercase())
}

/// Like `parse_css_color` but falls back to `fallback`.
pub fn css_or(text: &str, fallback: VectorColor) -> VectorColor {
    parse_css_color(text).unwrap_or(fallback)
}

fn parse_hex(hex: &str) -> Option<VectorColor> {
    let digit = |i: usize, len: usize| u8::from_str_radix(hex.get(i..i + len)?, 16).ok();
    match hex.len() {
        3 => {
            let (r, g, b) = (digit(0, 1)?, digit(1, 1)?, digit(2, 1)?);
            Some(VectorColor::rgba8(r * 17, g * 17, b * 17, 1.0))
        }
        6 => Some(VectorColor::rgba8(digit(0, 2)?, digit(2, 2)?, digit(4, 2)?, 1.0)),
        _ => None,
    }
}

fn parse_rgb_args(args: &str) -> Option<VectorColor> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let channel = |s: &str| s.parse::<f32>().ok().map(|v| v.clamp(0.0, 255.0) as u8);
    match parts.as_slice() {
        [r, g, b] => Some(VectorColor::rgba8(channel(r)?, channel(g)?, channel(b)?, 1.0)),
        [r, g, b, a] => {
            let alpha = a.parse::<f32>().ok()?.clamp(0.0, 1.0);
            Some(VectorColor::rgba8(channel(r)?, channel(g)?, channel(b)?, alpha))
        }
        _ => None,
    }
}

fn named(name: &str) -> Option<VectorColor> {
    let (r, g, b) = match name {
        "white" => (255, 255, 255),
        "black" => (0, 0, 0),
        "yellow" => (255, 255, 0),
        "orange" => (255, 165, 0),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "lightblue" => (173, 216, 230),
        "cyan" => (0, 255, 255),
        "purple" => (128, 0, 128),
        "brown" => (165, 42, 42),
        "tan" => (210, 180, 140),
        "grey" | "gray" => (128, 128, 128),
        _ => return None,
    };
    Some(VectorColor::rgba8(r, g, b, 1.0))
}

/// Fixed colors of the sky chrome.
pub mod sky {
    use crate::systems::vector::VectorColor;

    pub fn orbit() -> VectorColor {
        VectorColor::rgba8(128, 128, 128, 0.6)
    }
    pub fn spoke(selected: bool) -> VectorColor {
        if selected {
            VectorColor::rgba8(255, 255, 255, 0.8)
        } else {
            VectorColor::rgba8(105, 105, 105, 0.4)
        }
    }
    pub fn zodiac_ring() -> VectorColor {
        VectorColor::rgba8(255, 255, 255, 0.6)
    }
    pub fn zodiac_tick() -> VectorColor {
        VectorColor::rgba8(255, 215, 0, 0.6)
    }
    pub fn zodiac_label() -> VectorColor {
        VectorColor::rgba8(255, 215, 0, 0.8)
    }
    pub fn projection(selected: bool) -> VectorColor {
        VectorColor::WHITE.with_alpha(if selected { 0.8 } else { 0.3 })
    }
    pub fn spiral_arm() -> VectorColor {
        VectorColor::rgba8(100, 100, 255, 0.3)
    }
    pub fn spiral_arm_label() -> VectorColor {
        VectorColor::rgba8(150, 150, 255, 0.8)
    }
    pub fn star_outline(selected: bool) -> VectorColor {
        if selected {
            VectorColor::rgba8(0, 255, 255, 1.0)
        } else {
            VectorColor::WHITE.with_alpha(0.3)
        }
    }
    pub fn galaxy_fill() -> VectorColor {
        VectorColor::rgba8(200, 200, 255, 0.7)
    }
    pub fn home_galaxy_fill() -> VectorColor {
        VectorColor::rgba8(255, 255, 200, 0.8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: VectorColor, b: VectorColor) -> bool {
        (a.r - b.r).abs() < 1e-3 && (a.g - b.g).abs() < 1e-3 && (a.b - b.b).abs() < 1e-3 && (a.a - b.a).abs() < 1e-3
    }

    #[test]
    fn parses_hex_forms() {
        let c = parse_css_color("#ffcc6f").unwrap();
        assert!(approx(c, VectorColor::rgba8(255, 204, 111, 1.0)));
        assert!(approx(parse_css_color("#fff").unwrap(), VectorColor::WHITE));
        assert!(parse_css_color("#ff").is_none());
        assert!(parse_css_color("#gggggg").is_none());
    }

    #[test]
    fn parses_functional_forms() {
        let c = parse_css_color("rgba(128, 128, 128, 0.6)").unwrap();
        assert!(approx(c, VectorColor::rgba8(128, 128, 128, 0.6)));
        assert!(parse_css_color("rgb(1,2)").is_none());
    }

    #[test]
    fn names_and_fallback() {
        assert!(approx(parse_css_color("LightBlue").unwrap(), VectorColor::rgba8(173, 216, 230, 1.0)));
        assert_eq!(css_or("chartreuse-ish", VectorColor::WHITE), VectorColor::WHITE);
    }
}
