//! Legend colors and shape meanings.

use crate::geometry::ShapeKind;

/// Color used when a node or edge has none.
pub const DEFAULT_COLOR: &str = "#00FF00";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegendColor {
    pub name: &'static str,
    pub hex: &'static str,
    pub meaning: &'static str,
}

pub const LEGEND_COLORS: [LegendColor; 5] = [
    LegendColor {
        name: "green",
        hex: "#00FF00",
        meaning: "Personal Growth & Development",
    },
    LegendColor {
        name: "blue",
        hex: "#00FFFF",
        meaning: "Professional & Career",
    },
    LegendColor {
        name: "pink",
        hex: "#FF00FF",
        meaning: "Relationships & Social",
    },
    LegendColor {
        name: "yellow",
        hex: "#FFFF00",
        meaning: "Health & Wellbeing",
    },
    LegendColor {
        name: "red",
        hex: "#FF0000",
        meaning: "Challenges & Areas of Focus",
    },
];

pub fn shape_meaning(kind: ShapeKind) -> &'static str {
    match kind {
        ShapeKind::Circle => "Core aspects of life (e.g., Me, Family, Career)",
        ShapeKind::Rectangle => "Goals, Projects, or Specific Activities",
        ShapeKind::Cloud => "Ideas, Dreams, or Future Aspirations",
    }
}

/// Normalize a color to uppercase `#RRGGBB`.
///
/// Accepts `#rgb`, `#rrggbb` in any case, and the legend names
/// (`green`, `blue`, ...).
pub fn normalize_color(val: &str) -> Option<String> {
    let val = val.trim();
    if let Some(hex) = val.strip_prefix('#') {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        return match hex.len() {
            3 => Some(format!(
                "#{}",
                hex.chars()
                    .flat_map(|c| [c, c])
                    .collect::<String>()
                    .to_ascii_uppercase()
            )),
            6 => Some(format!("#{}", hex.to_ascii_uppercase())),
            _ => None,
        };
    }
    let lower = val.to_ascii_lowercase();
    LEGEND_COLORS
        .iter()
        .find(|c| c.name == lower)
        .map(|c| c.hex.to_string())
}

/// Legend entry for a color, if it is one of the five legend colors.
pub fn legend_entry(color: &str) -> Option<&'static LegendColor> {
    let hex = normalize_color(color)?;
    LEGEND_COLORS.iter().find(|c| c.hex == hex)
}
