//! Design-token theme consumed by the preset rules.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::EngineError;

const SHADES: [&str; 11] = [
    "50", "100", "200", "300", "400", "500", "600", "700", "800", "900", "950",
];

#[rustfmt::skip]
const PALETTES: &[(&str, [&str; 11])] = &[
    ("slate", ["#f8fafc", "#f1f5f9", "#e2e8f0", "#cbd5e1", "#94a3b8", "#64748b", "#475569", "#334155", "#1e293b", "#0f172a", "#020617"]),
    ("gray", ["#f9fafb", "#f3f4f6", "#e5e7eb", "#d1d5db", "#9ca3af", "#6b7280", "#4b5563", "#374151", "#1f2937", "#111827", "#030712"]),
    ("zinc", ["#fafafa", "#f4f4f5", "#e4e4e7", "#d4d4d8", "#a1a1aa", "#71717a", "#52525b", "#3f3f46", "#27272a", "#18181b", "#09090b"]),
    ("red", ["#fef2f2", "#fee2e2", "#fecaca", "#fca5a5", "#f87171", "#ef4444", "#dc2626", "#b91c1c", "#991b1b", "#7f1d1d", "#450a0a"]),
    ("orange", ["#fff7ed", "#ffedd5", "#fed7aa", "#fdba74", "#fb923c", "#f97316", "#ea580c", "#c2410c", "#9a3412", "#7c2d12", "#431407"]),
    ("amber", ["#fffbeb", "#fef3c7", "#fde68a", "#fcd34d", "#fbbf24", "#f59e0b", "#d97706", "#b45309", "#92400e", "#78350f", "#451a03"]),
    ("yellow", ["#fefce8", "#fef9c3", "#fef08a", "#fde047", "#facc15", "#eab308", "#ca8a04", "#a16207", "#854d0e", "#713f12", "#422006"]),
    ("green", ["#f0fdf4", "#dcfce7", "#bbf7d0", "#86efac", "#4ade80", "#22c55e", "#16a34a", "#15803d", "#166534", "#14532d", "#052e16"]),
    ("emerald", ["#ecfdf5", "#d1fae5", "#a7f3d0", "#6ee7b7", "#34d399", "#10b981", "#059669", "#047857", "#065f46", "#064e3b", "#022c22"]),
    ("teal", ["#f0fdfa", "#ccfbf1", "#99f6e4", "#5eead4", "#2dd4bf", "#14b8a6", "#0d9488", "#0f766e", "#115e59", "#134e4a", "#042f2e"]),
    ("cyan", ["#ecfeff", "#cffafe", "#a5f3fc", "#67e8f9", "#22d3ee", "#06b6d4", "#0891b2", "#0e7490", "#155e75", "#164e63", "#083344"]),
    ("sky", ["#f0f9ff", "#e0f2fe", "#bae6fd", "#7dd3fc", "#38bdf8", "#0ea5e9", "#0284c7", "#0369a1", "#075985", "#0c4a6e", "#082f49"]),
    ("blue", ["#eff6ff", "#dbeafe", "#bfdbfe", "#93c5fd", "#60a5fa", "#3b82f6", "#2563eb", "#1d4ed8", "#1e40af", "#1e3a8a", "#172554"]),
    ("indigo", ["#eef2ff", "#e0e7ff", "#c7d2fe", "#a5b4fc", "#818cf8", "#6366f1", "#4f46e5", "#4338ca", "#3730a3", "#312e81", "#1e1b4b"]),
    ("violet", ["#f5f3ff", "#ede9fe", "#ddd6fe", "#c4b5fd", "#a78bfa", "#8b5cf6", "#7c3aed", "#6d28d9", "#5b21b6", "#4c1d95", "#2e1065"]),
    ("purple", ["#faf5ff", "#f3e8ff", "#e9d5ff", "#d8b4fe", "#c084fc", "#a855f7", "#9333ea", "#7e22ce", "#6b21a8", "#581c87", "#3b0764"]),
    ("pink", ["#fdf2f8", "#fce7f3", "#fbcfe8", "#f9a8d4", "#f472b6", "#ec4899", "#db2777", "#be185d", "#9d174d", "#831843", "#500724"]),
    ("rose", ["#fff1f2", "#ffe4e6", "#fecdd3", "#fda4af", "#fb7185", "#f43f5e", "#e11d48", "#be123c", "#9f1239", "#881337", "#4c0519"]),
];

/// Semantic colours used by the component library, aliased onto palettes.
const SEMANTIC: &[(&str, &str)] = &[
    ("primary", "blue"),
    ("secondary", "gray"),
    ("success", "green"),
    ("warning", "amber"),
    ("danger", "red"),
];

const SINGLE_COLORS: &[(&str, &str)] = &[
    ("white", "#ffffff"),
    ("black", "#000000"),
    ("transparent", "transparent"),
    ("current", "currentColor"),
    ("inherit", "inherit"),
];

const COLOR_KEYWORDS: &[&str] = &["transparent", "currentColor", "inherit", "initial", "unset"];
const COLOR_FUNCTIONS: &[&str] = &["rgb(", "rgba(", "hsl(", "hsla(", "oklch(", "var("];

/// A theme colour: either one value or a shade scale (`50` to `950`, optional `DEFAULT`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    /// Single colour value such as `#0ea5e9`.
    Single(String),
    /// Shade name to colour value.
    Shades(BTreeMap<String, String>),
}

/// Partial theme supplied through configuration and merged over the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ThemeOverrides {
    /// Added or replaced colours.
    pub colors: BTreeMap<String, ColorValue>,
    /// Added or replaced breakpoints (`name = "width"`).
    pub breakpoints: BTreeMap<String, String>,
    /// Added or replaced border radii.
    pub border_radius: BTreeMap<String, String>,
    /// Added or replaced box shadows.
    pub box_shadow: BTreeMap<String, String>,
}

/// Resolved design tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    colors: BTreeMap<String, ColorValue>,
    breakpoints: Vec<(String, String)>,
    border_radius: BTreeMap<String, String>,
    box_shadow: BTreeMap<String, String>,
    font_size: BTreeMap<&'static str, (&'static str, &'static str)>,
    font_weight: BTreeMap<&'static str, &'static str>,
    max_width: BTreeMap<&'static str, &'static str>,
}

impl Default for Theme {
    fn default() -> Self {
        let mut colors = BTreeMap::new();
        for (name, values) in PALETTES {
            colors.insert(name.to_string(), ColorValue::Shades(shade_map(values, None)));
        }
        for (name, base) in SEMANTIC {
            let values = PALETTES
                .iter()
                .find(|(palette, _)| palette == base)
                .map(|(_, values)| values);
            if let Some(values) = values {
                colors.insert(
                    name.to_string(),
                    ColorValue::Shades(shade_map(values, Some(values[5]))),
                );
            }
        }
        for (name, value) in SINGLE_COLORS {
            colors.insert(name.to_string(), ColorValue::Single(value.to_string()));
        }

        Self {
            colors,
            breakpoints: [
                ("sm", "640px"),
                ("md", "768px"),
                ("lg", "1024px"),
                ("xl", "1280px"),
                ("2xl", "1536px"),
            ]
            .iter()
            .map(|(name, width)| (name.to_string(), width.to_string()))
            .collect(),
            border_radius: string_map(&[
                ("none", "0"),
                ("sm", "0.125rem"),
                ("DEFAULT", "0.25rem"),
                ("md", "0.375rem"),
                ("lg", "0.5rem"),
                ("xl", "0.75rem"),
                ("2xl", "1rem"),
                ("3xl", "1.5rem"),
                ("full", "9999px"),
            ]),
            box_shadow: string_map(&[
                ("sm", "0 1px 2px 0 rgb(0 0 0 / 0.05)"),
                (
                    "DEFAULT",
                    "0 1px 3px 0 rgb(0 0 0 / 0.1), 0 1px 2px -1px rgb(0 0 0 / 0.1)",
                ),
                (
                    "md",
                    "0 4px 6px -1px rgb(0 0 0 / 0.1), 0 2px 4px -2px rgb(0 0 0 / 0.1)",
                ),
                (
                    "lg",
                    "0 10px 15px -3px rgb(0 0 0 / 0.1), 0 4px 6px -4px rgb(0 0 0 / 0.1)",
                ),
                (
                    "xl",
                    "0 20px 25px -5px rgb(0 0 0 / 0.1), 0 8px 10px -6px rgb(0 0 0 / 0.1)",
                ),
                ("2xl", "0 25px 50px -12px rgb(0 0 0 / 0.25)"),
                ("inner", "inset 0 2px 4px 0 rgb(0 0 0 / 0.05)"),
                ("none", "0 0 rgb(0 0 0 / 0)"),
            ]),
            font_size: BTreeMap::from([
                ("xs", ("0.75rem", "1rem")),
                ("sm", ("0.875rem", "1.25rem")),
                ("base", ("1rem", "1.5rem")),
                ("lg", ("1.125rem", "1.75rem")),
                ("xl", ("1.25rem", "1.75rem")),
                ("2xl", ("1.5rem", "2rem")),
                ("3xl", ("1.875rem", "2.25rem")),
                ("4xl", ("2.25rem", "2.5rem")),
                ("5xl", ("3rem", "1")),
                ("6xl", ("3.75rem", "1")),
            ]),
            font_weight: BTreeMap::from([
                ("thin", "100"),
                ("extralight", "200"),
                ("light", "300"),
                ("normal", "400"),
                ("medium", "500"),
                ("semibold", "600"),
                ("bold", "700"),
                ("extrabold", "800"),
                ("black", "900"),
            ]),
            max_width: BTreeMap::from([
                ("xs", "20rem"),
                ("sm", "24rem"),
                ("md", "28rem"),
                ("lg", "32rem"),
                ("xl", "36rem"),
                ("2xl", "42rem"),
                ("3xl", "48rem"),
                ("4xl", "56rem"),
                ("5xl", "64rem"),
                ("6xl", "72rem"),
                ("7xl", "80rem"),
                ("prose", "65ch"),
                ("none", "none"),
            ]),
        }
    }
}

impl Theme {
    /// Applies configuration overrides on top of this theme after validating them.
    pub fn with_overrides(mut self, overrides: &ThemeOverrides) -> Result<Self, EngineError> {
        for (name, value) in &overrides.colors {
            match value {
                ColorValue::Single(raw) => validate_color(name, raw)?,
                ColorValue::Shades(shades) => {
                    for (shade, raw) in shades {
                        validate_color(&format!("{name}-{shade}"), raw)?;
                    }
                }
            }
            self.colors.insert(name.clone(), value.clone());
        }

        for (name, width) in &overrides.breakpoints {
            if length_in_px(width).is_none() {
                return Err(EngineError::InvalidBreakpoint {
                    name: name.clone(),
                    value: width.clone(),
                });
            }
            match self.breakpoints.iter_mut().find(|(existing, _)| existing == name) {
                Some(entry) => entry.1 = width.clone(),
                None => self.breakpoints.push((name.clone(), width.clone())),
            }
        }
        self.breakpoints.sort_by(|(_, a), (_, b)| {
            let a = length_in_px(a).unwrap_or_default();
            let b = length_in_px(b).unwrap_or_default();
            a.total_cmp(&b)
        });

        self.border_radius.extend(
            overrides
                .border_radius
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );
        self.box_shadow.extend(
            overrides
                .box_shadow
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );
        Ok(self)
    }

    /// Resolves a colour reference such as `red-500`, `primary` or `white`.
    pub fn color(&self, reference: &str) -> Option<&str> {
        match self.colors.get(reference) {
            Some(ColorValue::Single(value)) => return Some(value.as_str()),
            Some(ColorValue::Shades(shades)) => return shades.get("DEFAULT").map(String::as_str),
            None => {}
        }
        let (name, shade) = reference.rsplit_once('-')?;
        match self.colors.get(name)? {
            ColorValue::Shades(shades) => shades.get(shade).map(String::as_str),
            ColorValue::Single(_) => None,
        }
    }

    /// Breakpoint width and its rank in ascending width order.
    pub fn breakpoint(&self, name: &str) -> Option<(usize, &str)> {
        self.breakpoints
            .iter()
            .enumerate()
            .find(|(_, (candidate, _))| candidate == name)
            .map(|(rank, (_, width))| (rank, width.as_str()))
    }

    pub(crate) fn border_radius(&self, name: &str) -> Option<&str> {
        self.border_radius.get(name).map(String::as_str)
    }

    pub(crate) fn box_shadow(&self, name: &str) -> Option<&str> {
        self.box_shadow.get(name).map(String::as_str)
    }

    pub(crate) fn font_size(&self, name: &str) -> Option<(&str, &str)> {
        self.font_size.get(name).copied()
    }

    pub(crate) fn font_weight(&self, name: &str) -> Option<&str> {
        self.font_weight.get(name).copied()
    }

    pub(crate) fn max_width(&self, name: &str) -> Option<&str> {
        self.max_width.get(name).copied()
    }
}

/// Red, green, blue channels and optional alpha of a hex colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha in `0.0..=1.0`, when the literal carried one.
    pub alpha: Option<f64>,
}

impl Rgba {
    /// Parses `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
    pub fn parse_hex(raw: &str) -> Option<Self> {
        let hex = raw.strip_prefix('#')?;
        if !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return None;
        }
        let expanded: String = match hex.len() {
            3 | 4 => hex.chars().flat_map(|ch| [ch, ch]).collect(),
            6 | 8 => hex.to_string(),
            _ => return None,
        };
        let channel = |idx: usize| u8::from_str_radix(&expanded[idx..idx + 2], 16).ok();
        Some(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            alpha: if expanded.len() == 8 {
                Some(f64::from(channel(6)?) / 255.0)
            } else {
                None
            },
        })
    }

    /// Space-separated channel list, for example `59 130 246`.
    pub fn channels(&self) -> String {
        format!("{} {} {}", self.r, self.g, self.b)
    }
}

/// Returns a length in pixels for `px`, `rem` and `em` values (16px root).
pub fn length_in_px(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let (number, scale) = if let Some(number) = raw.strip_suffix("px") {
        (number, 1.0)
    } else if let Some(number) = raw.strip_suffix("rem") {
        (number, 16.0)
    } else if let Some(number) = raw.strip_suffix("em") {
        (number, 16.0)
    } else {
        return None;
    };
    number
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
        .map(|value| value * scale)
}

fn validate_color(name: &str, raw: &str) -> Result<(), EngineError> {
    let raw = raw.trim();
    let valid = Rgba::parse_hex(raw).is_some()
        || COLOR_KEYWORDS.contains(&raw)
        || (COLOR_FUNCTIONS.iter().any(|prefix| raw.starts_with(prefix)) && raw.ends_with(')'));
    if valid {
        Ok(())
    } else {
        Err(EngineError::InvalidColor {
            name: name.to_string(),
            value: raw.to_string(),
        })
    }
}

fn shade_map(values: &[&str; 11], default: Option<&str>) -> BTreeMap<String, String> {
    let mut shades: BTreeMap<String, String> = SHADES
        .iter()
        .zip(values.iter())
        .map(|(shade, value)| (shade.to_string(), value.to_string()))
        .collect();
    if let Some(default) = default {
        shades.insert("DEFAULT".into(), default.to_string());
    }
    shades
}

fn string_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_and_semantic_colors_resolve() {
        let theme = Theme::default();
        assert_eq!(theme.color("red-500"), Some("#ef4444"));
        assert_eq!(theme.color("primary"), Some("#3b82f6"));
        assert_eq!(theme.color("primary-700"), Some("#1d4ed8"));
        assert_eq!(theme.color("white"), Some("#ffffff"));
        assert_eq!(theme.color("red"), None);
        assert_eq!(theme.color("red-501"), None);
        assert_eq!(theme.color("nope-500"), None);
    }

    #[test]
    fn hex_parsing_expands_short_forms() {
        let short = Rgba::parse_hex("#0af").expect("short hex");
        assert_eq!(short.channels(), "0 170 255");
        let with_alpha = Rgba::parse_hex("#00000080").expect("alpha hex");
        assert!((with_alpha.alpha.expect("alpha") - 0.502).abs() < 0.01);
        assert!(Rgba::parse_hex("#12345").is_none());
        assert!(Rgba::parse_hex("red").is_none());
    }

    #[test]
    fn overrides_add_colors_and_reorder_breakpoints() {
        let overrides = ThemeOverrides {
            colors: BTreeMap::from([("brand".to_string(), ColorValue::Single("#ff6600".into()))]),
            breakpoints: BTreeMap::from([("xs".to_string(), "480px".to_string())]),
            ..ThemeOverrides::default()
        };
        let theme = Theme::default().with_overrides(&overrides).expect("valid overrides");
        assert_eq!(theme.color("brand"), Some("#ff6600"));
        assert_eq!(theme.breakpoint("xs"), Some((0, "480px")));
        assert_eq!(theme.breakpoint("sm"), Some((1, "640px")));
    }

    #[test]
    fn invalid_override_color_is_rejected() {
        let overrides = ThemeOverrides {
            colors: BTreeMap::from([("brand".to_string(), ColorValue::Single("orange-ish".into()))]),
            ..ThemeOverrides::default()
        };
        let err = Theme::default()
            .with_overrides(&overrides)
            .expect_err("invalid colour");
        assert!(err.to_string().contains("brand"));
    }

    #[test]
    fn invalid_breakpoint_is_rejected() {
        let overrides = ThemeOverrides {
            breakpoints: BTreeMap::from([("tablet".to_string(), "wide".to_string())]),
            ..ThemeOverrides::default()
        };
        assert!(Theme::default().with_overrides(&overrides).is_err());
    }

    #[test]
    fn lengths_convert_to_pixels() {
        assert_eq!(length_in_px("640px"), Some(640.0));
        assert_eq!(length_in_px("40rem"), Some(640.0));
        assert_eq!(length_in_px("auto"), None);
    }
}
