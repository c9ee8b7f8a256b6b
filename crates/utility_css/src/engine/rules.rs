//! Base preset: static and pattern rules mapping utility names to declarations.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::css::Declaration;
use super::theme::{length_in_px, Rgba, Theme};

const SPACE_BETWEEN_SUFFIX: &str = ">:not([hidden])~:not([hidden])";
const SHADOW_STACK: &str = "var(--un-ring-offset-shadow), var(--un-ring-shadow), var(--un-shadow)";
const TRANSITION_EASE: &str = "cubic-bezier(0.4, 0, 0.2, 1)";

type StaticEntry = (&'static str, &'static [(&'static str, &'static str)]);
type Handler = fn(&Captures<'_>, &Theme) -> Option<Resolved>;

/// Declarations produced for one utility body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Resolved {
    pub(crate) declarations: Vec<Declaration>,
    /// Selector text appended after the class (and its pseudo-classes).
    pub(crate) suffix: Option<&'static str>,
}

impl Resolved {
    fn new(declarations: Vec<Declaration>) -> Self {
        Self {
            declarations,
            suffix: None,
        }
    }
}

enum PresetRule {
    Static(&'static [(&'static str, &'static str)]),
    Pattern(Regex, Handler),
}

/// Ordered preset rules. A rule's position is its sort order in the output.
pub(crate) struct Preset {
    rules: Vec<PresetRule>,
    statics: HashMap<&'static str, usize>,
}

impl Preset {
    /// Number of rules, used to order custom rules after the preset.
    pub(crate) fn len(&self) -> usize {
        self.rules.len()
    }

    /// Resolves a utility body (variants already stripped) against the preset.
    pub(crate) fn resolve(&self, body: &str, theme: &Theme) -> Option<(usize, Resolved)> {
        if let Some(&order) = self.statics.get(body) {
            if let PresetRule::Static(declarations) = &self.rules[order] {
                let declarations = declarations
                    .iter()
                    .map(|(property, value)| Declaration::new(*property, *value))
                    .collect();
                return Some((order, Resolved::new(declarations)));
            }
        }

        self.rules
            .iter()
            .enumerate()
            .find_map(|(order, rule)| match rule {
                PresetRule::Pattern(pattern, handler) => pattern
                    .captures(body)
                    .and_then(|captures| handler(&captures, theme))
                    .map(|resolved| (order, resolved)),
                PresetRule::Static(_) => None,
            })
    }
}

#[derive(Default)]
struct PresetBuilder {
    rules: Vec<PresetRule>,
    statics: HashMap<&'static str, usize>,
}

impl PresetBuilder {
    fn statics(mut self, entries: &[StaticEntry]) -> Self {
        for &(name, declarations) in entries {
            self.statics.insert(name, self.rules.len());
            self.rules.push(PresetRule::Static(declarations));
        }
        self
    }

    fn rule(mut self, pattern: &str, handler: Handler) -> Self {
        let pattern = Regex::new(pattern).expect("preset pattern");
        self.rules.push(PresetRule::Pattern(pattern, handler));
        self
    }

    fn build(self) -> Preset {
        Preset {
            rules: self.rules,
            statics: self.statics,
        }
    }
}

/// The base preset shared by every generator.
pub(crate) static PRESET: LazyLock<Preset> = LazyLock::new(|| {
    PresetBuilder::default()
        .statics(LAYOUT)
        .statics(FLEX_AND_GRID)
        .statics(ALIGNMENT)
        .rule(r"^(-?)(inset-x|inset-y|inset|top|right|bottom|left)-(.+)$", inset)
        .rule(r"^z-(\d+|auto)$", z_index)
        .rule(r"^order-(\d+|first|last|none)$", order)
        .rule(r"^grid-(cols|rows)-(\d+|none)$", grid_template)
        .rule(r"^(col|row)-span-(\d+|full)$", grid_span)
        .rule(r"^basis-(.+)$", basis)
        .rule(r"^gap-(?:([xy])-)?(.+)$", gap)
        .rule(r"^space-([xy])-(.+)$", space_between)
        .rule(r"^(-?)m([xytrbl]?)-(.+)$", margin)
        .rule(r"^p([xytrbl]?)-(.+)$", padding)
        .rule(r"^(min-w|min-h|max-w|max-h|w|h)-(.+)$", sizing)
        .rule(r"^size-(.+)$", square_size)
        .rule(r"^aspect-(square|video|auto)$", aspect)
        .statics(TYPOGRAPHY)
        .rule(r"^text-(.+)$", font_size)
        .rule(r"^font-(.+)$", font_weight)
        .rule(r"^leading-(.+)$", line_height)
        .rule(r"^tracking-(.+)$", letter_spacing)
        .rule(r"^(bg|text|border|ring)-opacity-(\d+)$", color_opacity)
        .rule(r"^(bg|text|border|ring)-(.+)$", color)
        .statics(BORDERS)
        .rule(r"^border(?:-([xytrbl]))?(?:-(\d+|px))?$", border_width)
        .rule(r"^rounded(?:-(t|r|b|l|tl|tr|bl|br))?(?:-(.+))?$", border_radius)
        .statics(EFFECTS)
        .rule(r"^opacity-(\d+)$", opacity)
        .rule(r"^shadow(?:-(.+))?$", shadow)
        .rule(r"^ring(?:-(\d+))?$", ring_width)
        .rule(r"^ring-offset-(\d+)$", ring_offset)
        .rule(r"^(-?)translate-([xy])-(.+)$", translate)
        .rule(r"^rotate-(\d+)$", rotate)
        .rule(r"^scale-(\d+)$", scale)
        .statics(INTERACTIVITY)
        .rule(r"^(duration|delay)-(\d+)$", transition_timing)
        .build()
});

const LAYOUT: &[StaticEntry] = &[
    ("block", &[("display", "block")]),
    ("inline-block", &[("display", "inline-block")]),
    ("inline", &[("display", "inline")]),
    ("flex", &[("display", "flex")]),
    ("inline-flex", &[("display", "inline-flex")]),
    ("grid", &[("display", "grid")]),
    ("inline-grid", &[("display", "inline-grid")]),
    ("table", &[("display", "table")]),
    ("contents", &[("display", "contents")]),
    ("flow-root", &[("display", "flow-root")]),
    ("hidden", &[("display", "none")]),
    ("static", &[("position", "static")]),
    ("fixed", &[("position", "fixed")]),
    ("absolute", &[("position", "absolute")]),
    ("relative", &[("position", "relative")]),
    ("sticky", &[("position", "sticky")]),
    ("visible", &[("visibility", "visible")]),
    ("invisible", &[("visibility", "hidden")]),
    ("isolate", &[("isolation", "isolate")]),
    ("box-border", &[("box-sizing", "border-box")]),
    ("box-content", &[("box-sizing", "content-box")]),
    ("overflow-auto", &[("overflow", "auto")]),
    ("overflow-hidden", &[("overflow", "hidden")]),
    ("overflow-visible", &[("overflow", "visible")]),
    ("overflow-scroll", &[("overflow", "scroll")]),
    ("overflow-x-auto", &[("overflow-x", "auto")]),
    ("overflow-y-auto", &[("overflow-y", "auto")]),
    ("overflow-x-hidden", &[("overflow-x", "hidden")]),
    ("overflow-y-hidden", &[("overflow-y", "hidden")]),
    ("overflow-x-scroll", &[("overflow-x", "scroll")]),
    ("overflow-y-scroll", &[("overflow-y", "scroll")]),
    ("object-contain", &[("object-fit", "contain")]),
    ("object-cover", &[("object-fit", "cover")]),
    ("object-center", &[("object-position", "center")]),
];

const FLEX_AND_GRID: &[StaticEntry] = &[
    ("flex-row", &[("flex-direction", "row")]),
    ("flex-row-reverse", &[("flex-direction", "row-reverse")]),
    ("flex-col", &[("flex-direction", "column")]),
    ("flex-col-reverse", &[("flex-direction", "column-reverse")]),
    ("flex-wrap", &[("flex-wrap", "wrap")]),
    ("flex-wrap-reverse", &[("flex-wrap", "wrap-reverse")]),
    ("flex-nowrap", &[("flex-wrap", "nowrap")]),
    ("flex-1", &[("flex", "1 1 0%")]),
    ("flex-auto", &[("flex", "1 1 auto")]),
    ("flex-initial", &[("flex", "0 1 auto")]),
    ("flex-none", &[("flex", "none")]),
    ("grow", &[("flex-grow", "1")]),
    ("grow-0", &[("flex-grow", "0")]),
    ("shrink", &[("flex-shrink", "1")]),
    ("shrink-0", &[("flex-shrink", "0")]),
    ("grid-flow-row", &[("grid-auto-flow", "row")]),
    ("grid-flow-col", &[("grid-auto-flow", "column")]),
    ("grid-flow-dense", &[("grid-auto-flow", "dense")]),
];

const ALIGNMENT: &[StaticEntry] = &[
    ("items-start", &[("align-items", "flex-start")]),
    ("items-end", &[("align-items", "flex-end")]),
    ("items-center", &[("align-items", "center")]),
    ("items-baseline", &[("align-items", "baseline")]),
    ("items-stretch", &[("align-items", "stretch")]),
    ("justify-start", &[("justify-content", "flex-start")]),
    ("justify-end", &[("justify-content", "flex-end")]),
    ("justify-center", &[("justify-content", "center")]),
    ("justify-between", &[("justify-content", "space-between")]),
    ("justify-around", &[("justify-content", "space-around")]),
    ("justify-evenly", &[("justify-content", "space-evenly")]),
    ("self-auto", &[("align-self", "auto")]),
    ("self-start", &[("align-self", "flex-start")]),
    ("self-end", &[("align-self", "flex-end")]),
    ("self-center", &[("align-self", "center")]),
    ("self-stretch", &[("align-self", "stretch")]),
    ("self-baseline", &[("align-self", "baseline")]),
    ("content-start", &[("align-content", "flex-start")]),
    ("content-end", &[("align-content", "flex-end")]),
    ("content-center", &[("align-content", "center")]),
    ("content-between", &[("align-content", "space-between")]),
    ("content-around", &[("align-content", "space-around")]),
    ("content-evenly", &[("align-content", "space-evenly")]),
    ("place-items-center", &[("place-items", "center")]),
    ("place-content-center", &[("place-content", "center")]),
];

const TYPOGRAPHY: &[StaticEntry] = &[
    ("text-left", &[("text-align", "left")]),
    ("text-center", &[("text-align", "center")]),
    ("text-right", &[("text-align", "right")]),
    ("text-justify", &[("text-align", "justify")]),
    ("uppercase", &[("text-transform", "uppercase")]),
    ("lowercase", &[("text-transform", "lowercase")]),
    ("capitalize", &[("text-transform", "capitalize")]),
    ("normal-case", &[("text-transform", "none")]),
    ("italic", &[("font-style", "italic")]),
    ("not-italic", &[("font-style", "normal")]),
    ("underline", &[("text-decoration-line", "underline")]),
    ("line-through", &[("text-decoration-line", "line-through")]),
    ("no-underline", &[("text-decoration", "none")]),
    (
        "truncate",
        &[
            ("overflow", "hidden"),
            ("text-overflow", "ellipsis"),
            ("white-space", "nowrap"),
        ],
    ),
    ("whitespace-normal", &[("white-space", "normal")]),
    ("whitespace-nowrap", &[("white-space", "nowrap")]),
    ("whitespace-pre", &[("white-space", "pre")]),
    ("whitespace-pre-wrap", &[("white-space", "pre-wrap")]),
    ("break-words", &[("overflow-wrap", "break-word")]),
    ("break-all", &[("word-break", "break-all")]),
    (
        "antialiased",
        &[
            ("-webkit-font-smoothing", "antialiased"),
            ("-moz-osx-font-smoothing", "grayscale"),
        ],
    ),
    (
        "font-sans",
        &[(
            "font-family",
            "ui-sans-serif, system-ui, sans-serif, \"Apple Color Emoji\", \"Segoe UI Emoji\"",
        )],
    ),
    (
        "font-serif",
        &[(
            "font-family",
            "ui-serif, Georgia, Cambria, \"Times New Roman\", Times, serif",
        )],
    ),
    (
        "font-mono",
        &[(
            "font-family",
            "ui-monospace, SFMono-Regular, Menlo, Monaco, Consolas, \"Liberation Mono\", \"Courier New\", monospace",
        )],
    ),
    ("tabular-nums", &[("font-variant-numeric", "tabular-nums")]),
    ("list-none", &[("list-style-type", "none")]),
];

const BORDERS: &[StaticEntry] = &[
    ("border-solid", &[("border-style", "solid")]),
    ("border-dashed", &[("border-style", "dashed")]),
    ("border-dotted", &[("border-style", "dotted")]),
    ("border-double", &[("border-style", "double")]),
    ("border-none", &[("border-style", "none")]),
];

const EFFECTS: &[StaticEntry] = &[
    (
        "outline-none",
        &[("outline", "2px solid transparent"), ("outline-offset", "2px")],
    ),
    ("outline", &[("outline-style", "solid")]),
    (
        "transition",
        &[
            (
                "transition-property",
                "color, background-color, border-color, text-decoration-color, fill, stroke, opacity, box-shadow, transform, filter, backdrop-filter",
            ),
            ("transition-timing-function", TRANSITION_EASE),
            ("transition-duration", "150ms"),
        ],
    ),
    (
        "transition-colors",
        &[
            (
                "transition-property",
                "color, background-color, border-color, text-decoration-color, fill, stroke",
            ),
            ("transition-timing-function", TRANSITION_EASE),
            ("transition-duration", "150ms"),
        ],
    ),
    (
        "transition-opacity",
        &[
            ("transition-property", "opacity"),
            ("transition-timing-function", TRANSITION_EASE),
            ("transition-duration", "150ms"),
        ],
    ),
    (
        "transition-shadow",
        &[
            ("transition-property", "box-shadow"),
            ("transition-timing-function", TRANSITION_EASE),
            ("transition-duration", "150ms"),
        ],
    ),
    (
        "transition-transform",
        &[
            ("transition-property", "transform"),
            ("transition-timing-function", TRANSITION_EASE),
            ("transition-duration", "150ms"),
        ],
    ),
    (
        "transition-all",
        &[
            ("transition-property", "all"),
            ("transition-timing-function", TRANSITION_EASE),
            ("transition-duration", "150ms"),
        ],
    ),
    ("transition-none", &[("transition-property", "none")]),
    ("ease-linear", &[("transition-timing-function", "linear")]),
    (
        "ease-in",
        &[("transition-timing-function", "cubic-bezier(0.4, 0, 1, 1)")],
    ),
    (
        "ease-out",
        &[("transition-timing-function", "cubic-bezier(0, 0, 0.2, 1)")],
    ),
    ("ease-in-out", &[("transition-timing-function", TRANSITION_EASE)]),
];

const INTERACTIVITY: &[StaticEntry] = &[
    ("cursor-auto", &[("cursor", "auto")]),
    ("cursor-default", &[("cursor", "default")]),
    ("cursor-pointer", &[("cursor", "pointer")]),
    ("cursor-wait", &[("cursor", "wait")]),
    ("cursor-text", &[("cursor", "text")]),
    ("cursor-move", &[("cursor", "move")]),
    ("cursor-not-allowed", &[("cursor", "not-allowed")]),
    ("pointer-events-none", &[("pointer-events", "none")]),
    ("pointer-events-auto", &[("pointer-events", "auto")]),
    ("select-none", &[("user-select", "none")]),
    ("select-text", &[("user-select", "text")]),
    ("select-all", &[("user-select", "all")]),
    ("select-auto", &[("user-select", "auto")]),
    ("appearance-none", &[("appearance", "none")]),
    ("resize-none", &[("resize", "none")]),
    ("resize", &[("resize", "both")]),
    (
        "sr-only",
        &[
            ("position", "absolute"),
            ("width", "1px"),
            ("height", "1px"),
            ("padding", "0"),
            ("margin", "-1px"),
            ("overflow", "hidden"),
            ("clip", "rect(0, 0, 0, 0)"),
            ("white-space", "nowrap"),
            ("border-width", "0"),
        ],
    ),
    (
        "not-sr-only",
        &[
            ("position", "static"),
            ("width", "auto"),
            ("height", "auto"),
            ("padding", "0"),
            ("margin", "0"),
            ("overflow", "visible"),
            ("clip", "auto"),
            ("white-space", "normal"),
        ],
    ),
];

/// Formats a number with at most six decimals and no trailing zeros.
pub(crate) fn format_number(value: f64) -> String {
    let text = format!("{value:.6}");
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn parse_scale(raw: &str) -> Option<f64> {
    if raw.is_empty() || !raw.chars().all(|ch| ch.is_ascii_digit() || ch == '.') {
        return None;
    }
    raw.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Inner text of an arbitrary `[...]` value, with `_` standing for spaces.
fn arbitrary(raw: &str) -> Option<String> {
    let inner = raw.strip_prefix('[')?.strip_suffix(']')?;
    if inner.is_empty() {
        return None;
    }
    Some(inner.replace('_', " "))
}

fn spacing(raw: &str) -> Option<String> {
    match raw {
        "0" => Some("0".into()),
        "px" => Some("1px".into()),
        _ => arbitrary(raw).or_else(|| {
            parse_scale(raw).map(|value| format!("{}rem", format_number(value / 4.0)))
        }),
    }
}

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
    Both,
}

fn size(raw: &str, axis: Axis) -> Option<String> {
    let keyword = match raw {
        "auto" => Some("auto"),
        "full" => Some("100%"),
        "min" => Some("min-content"),
        "max" => Some("max-content"),
        "fit" => Some("fit-content"),
        "screen" => match axis {
            Axis::Horizontal => Some("100vw"),
            Axis::Vertical => Some("100vh"),
            Axis::Both => None,
        },
        _ => None,
    };
    if let Some(keyword) = keyword {
        return Some(keyword.to_string());
    }

    if let Some((numerator, denominator)) = raw.split_once('/') {
        let numerator = parse_scale(numerator)?;
        let denominator = parse_scale(denominator).filter(|value| *value > 0.0)?;
        return Some(format!("{}%", format_number(numerator / denominator * 100.0)));
    }

    spacing(raw)
}

fn negate(value: String) -> String {
    if value == "0" {
        value
    } else if let Some(inner) = value.strip_prefix('-') {
        inner.to_string()
    } else if value.starts_with("calc(") || value.starts_with("var(") {
        format!("calc({value} * -1)")
    } else {
        format!("-{value}")
    }
}

fn declare(properties: &[&str], value: &str) -> Option<Resolved> {
    Some(Resolved::new(
        properties
            .iter()
            .map(|property| Declaration::new(*property, value))
            .collect(),
    ))
}

fn side_properties(prefix: &str, side: &str) -> Vec<String> {
    let sides: &[&str] = match side {
        "" => return vec![prefix.to_string()],
        "x" => &["left", "right"],
        "y" => &["top", "bottom"],
        "t" => &["top"],
        "r" => &["right"],
        "b" => &["bottom"],
        "l" => &["left"],
        _ => &[],
    };
    sides
        .iter()
        .map(|side| format!("{prefix}-{side}"))
        .collect()
}

fn declare_owned(properties: Vec<String>, value: &str) -> Option<Resolved> {
    if properties.is_empty() {
        return None;
    }
    Some(Resolved::new(
        properties
            .into_iter()
            .map(|property| Declaration::new(property, value))
            .collect(),
    ))
}

fn inset(captures: &Captures<'_>, _theme: &Theme) -> Option<Resolved> {
    let mut value = size(&captures[3], Axis::Both)?;
    if &captures[1] == "-" {
        value = negate(value);
    }
    let properties: &[&str] = match &captures[2] {
        "inset" => &["inset"],
        "inset-x" => &["left", "right"],
        "inset-y" => &["top", "bottom"],
        "top" => &["top"],
        "right" => &["right"],
        "bottom" => &["bottom"],
        _ => &["left"],
    };
    declare(properties, &value)
}

fn z_index(captures: &Captures<'_>, _theme: &Theme) -> Option<Resolved> {
    declare(&["z-index"], &captures[1])
}

fn order(captures: &Captures<'_>, _theme: &Theme) -> Option<Resolved> {
    let value = match &captures[1] {
        "first" => "-9999",
        "last" => "9999",
        "none" => "0",
        number => number,
    };
    declare(&["order"], value)
}

fn grid_template(captures: &Captures<'_>, _theme: &Theme) -> Option<Resolved> {
    let property = if &captures[1] == "cols" {
        "grid-template-columns"
    } else {
        "grid-template-rows"
    };
    let value = match &captures[2] {
        "none" => "none".to_string(),
        count => format!("repeat({count}, minmax(0, 1fr))"),
    };
    declare(&[property], &value)
}

fn grid_span(captures: &Captures<'_>, _theme: &Theme) -> Option<Resolved> {
    let property = if &captures[1] == "col" {
        "grid-column"
    } else {
        "grid-row"
    };
    let value = match &captures[2] {
        "full" => "1 / -1".to_string(),
        count => format!("span {count} / span {count}"),
    };
    declare(&[property], &value)
}

fn basis(captures: &Captures<'_>, _theme: &Theme) -> Option<Resolved> {
    declare(&["flex-basis"], &size(&captures[1], Axis::Both)?)
}

fn gap(captures: &Captures<'_>, _theme: &Theme) -> Option<Resolved> {
    let value = spacing(&captures[2])?;
    let property = match captures.get(1).map(|axis| axis.as_str()) {
        Some("x") => "column-gap",
        Some("y") => "row-gap",
        _ => "gap",
    };
    declare(&[property], &value)
}

fn space_between(captures: &Captures<'_>, _theme: &Theme) -> Option<Resolved> {
    let value = spacing(&captures[2])?;
    let property = if &captures[1] == "x" {
        "margin-left"
    } else {
        "margin-top"
    };
    let mut resolved = declare(&[property], &value)?;
    resolved.suffix = Some(SPACE_BETWEEN_SUFFIX);
    Some(resolved)
}

fn margin(captures: &Captures<'_>, _theme: &Theme) -> Option<Resolved> {
    let negative = &captures[1] == "-";
    let value = match &captures[3] {
        "auto" if !negative => "auto".to_string(),
        raw => {
            let value = spacing(raw)?;
            if negative {
                negate(value)
            } else {
                value
            }
        }
    };
    declare_owned(side_properties("margin", &captures[2]), &value)
}

fn padding(captures: &Captures<'_>, _theme: &Theme) -> Option<Resolved> {
    let value = spacing(&captures[2])?;
    declare_owned(side_properties("padding", &captures[1]), &value)
}

fn sizing(captures: &Captures<'_>, theme: &Theme) -> Option<Resolved> {
    let (property, axis) = match &captures[1] {
        "w" => ("width", Axis::Horizontal),
        "h" => ("height", Axis::Vertical),
        "min-w" => ("min-width", Axis::Horizontal),
        "min-h" => ("min-height", Axis::Vertical),
        "max-w" => ("max-width", Axis::Horizontal),
        _ => ("max-height", Axis::Vertical),
    };
    let raw = &captures[2];
    let value = match theme.max_width(raw) {
        Some(named) if property == "max-width" => named.to_string(),
        _ => size(raw, axis)?,
    };
    declare(&[property], &value)
}

fn square_size(captures: &Captures<'_>, _theme: &Theme) -> Option<Resolved> {
    declare(&["width", "height"], &size(&captures[1], Axis::Both)?)
}

fn aspect(captures: &Captures<'_>, _theme: &Theme) -> Option<Resolved> {
    let value = match &captures[1] {
        "square" => "1 / 1",
        "video" => "16 / 9",
        _ => "auto",
    };
    declare(&["aspect-ratio"], value)
}

fn font_size(captures: &Captures<'_>, theme: &Theme) -> Option<Resolved> {
    let raw = &captures[1];
    if let Some((size, line_height)) = theme.font_size(raw) {
        return Some(Resolved::new(vec![
            Declaration::new("font-size", size),
            Declaration::new("line-height", line_height),
        ]));
    }
    let value = arbitrary(raw).filter(|value| length_in_px(value).is_some())?;
    declare(&["font-size"], &value)
}

fn font_weight(captures: &Captures<'_>, theme: &Theme) -> Option<Resolved> {
    let raw = &captures[1];
    let value = match theme.font_weight(raw) {
        Some(weight) => weight.to_string(),
        None => {
            let numeric = raw.parse::<u16>().ok().filter(|w| (1..=1000).contains(w))?;
            numeric.to_string()
        }
    };
    declare(&["font-weight"], &value)
}

fn line_height(captures: &Captures<'_>, _theme: &Theme) -> Option<Resolved> {
    let value = match &captures[1] {
        "none" => "1".to_string(),
        "tight" => "1.25".to_string(),
        "snug" => "1.375".to_string(),
        "normal" => "1.5".to_string(),
        "relaxed" => "1.625".to_string(),
        "loose" => "2".to_string(),
        raw => spacing(raw)?,
    };
    declare(&["line-height"], &value)
}

fn letter_spacing(captures: &Captures<'_>, _theme: &Theme) -> Option<Resolved> {
    let value = match &captures[1] {
        "tighter" => "-0.05em".to_string(),
        "tight" => "-0.025em".to_string(),
        "normal" => "0em".to_string(),
        "wide" => "0.025em".to_string(),
        "wider" => "0.05em".to_string(),
        "widest" => "0.1em".to_string(),
        raw => arbitrary(raw)?,
    };
    declare(&["letter-spacing"], &value)
}

fn color_property(kind: &str) -> &'static str {
    match kind {
        "bg" => "background-color",
        "text" => "color",
        "border" => "border-color",
        _ => "--un-ring-color",
    }
}

fn color_opacity(captures: &Captures<'_>, _theme: &Theme) -> Option<Resolved> {
    let percent = parse_scale(&captures[2])?;
    declare(
        &[format!("--un-{}-opacity", &captures[1]).as_str()],
        &format_number(percent / 100.0),
    )
}

fn color(captures: &Captures<'_>, theme: &Theme) -> Option<Resolved> {
    let kind = &captures[1];
    let rest = &captures[2];
    let property = color_property(kind);

    let (reference, opacity) = match rest.rsplit_once('/') {
        Some((reference, opacity)) if !rest.ends_with(']') => (reference, Some(opacity)),
        _ => (rest, None),
    };
    let opacity = match opacity {
        Some(raw) => Some(
            arbitrary(raw).or_else(|| parse_scale(raw).map(|value| format_number(value / 100.0)))?,
        ),
        None => None,
    };

    let value = match arbitrary(reference) {
        Some(value) => value,
        None => theme.color(reference)?.to_string(),
    };

    let Some(rgba) = Rgba::parse_hex(&value) else {
        if opacity.is_some() {
            return None;
        }
        return declare(&[property], &value);
    };

    let channels = rgba.channels();
    match (opacity, rgba.alpha) {
        (Some(opacity), _) => declare(&[property], &format!("rgb({channels} / {opacity})")),
        (None, Some(alpha)) => declare(
            &[property],
            &format!("rgb({channels} / {})", format_number(alpha)),
        ),
        (None, None) => {
            let variable = format!("--un-{kind}-opacity");
            Some(Resolved::new(vec![
                Declaration::new(variable.clone(), "1"),
                Declaration::new(property, format!("rgb({channels} / var({variable}))")),
            ]))
        }
    }
}

fn border_width(captures: &Captures<'_>, _theme: &Theme) -> Option<Resolved> {
    let width = match captures.get(2).map(|width| width.as_str()) {
        None => "1px".to_string(),
        Some("px") => "1px".to_string(),
        Some(number) => format!("{number}px"),
    };
    let side = captures.get(1).map_or("", |side| side.as_str());
    let properties = side_properties("border", side)
        .into_iter()
        .map(|property| format!("{property}-width"))
        .collect();
    declare_owned(properties, &width)
}

fn border_radius(captures: &Captures<'_>, theme: &Theme) -> Option<Resolved> {
    let name = captures.get(2).map_or("DEFAULT", |name| name.as_str());
    let value = match theme.border_radius(name) {
        Some(value) => value.to_string(),
        None => arbitrary(name)?,
    };
    let corners: &[&str] = match captures.get(1).map(|side| side.as_str()) {
        None => &["border-radius"],
        Some("t") => &["border-top-left-radius", "border-top-right-radius"],
        Some("r") => &["border-top-right-radius", "border-bottom-right-radius"],
        Some("b") => &["border-bottom-right-radius", "border-bottom-left-radius"],
        Some("l") => &["border-top-left-radius", "border-bottom-left-radius"],
        Some("tl") => &["border-top-left-radius"],
        Some("tr") => &["border-top-right-radius"],
        Some("bl") => &["border-bottom-left-radius"],
        Some(_) => &["border-bottom-right-radius"],
    };
    declare(corners, &value)
}

fn opacity(captures: &Captures<'_>, _theme: &Theme) -> Option<Resolved> {
    let percent = parse_scale(&captures[1])?;
    declare(&["opacity"], &format_number(percent / 100.0))
}

fn shadow(captures: &Captures<'_>, theme: &Theme) -> Option<Resolved> {
    let name = captures.get(1).map_or("DEFAULT", |name| name.as_str());
    let value = theme.box_shadow(name)?;
    Some(Resolved::new(vec![
        Declaration::new("--un-shadow", value),
        Declaration::new("box-shadow", SHADOW_STACK),
    ]))
}

fn ring_width(captures: &Captures<'_>, _theme: &Theme) -> Option<Resolved> {
    let width = captures.get(1).map_or("3", |width| width.as_str());
    Some(Resolved::new(vec![
        Declaration::new("--un-ring-width", format!("{width}px")),
        Declaration::new(
            "--un-ring-offset-shadow",
            "var(--un-ring-inset) 0 0 0 var(--un-ring-offset-width) var(--un-ring-offset-color)",
        ),
        Declaration::new(
            "--un-ring-shadow",
            "var(--un-ring-inset) 0 0 0 calc(var(--un-ring-width) + var(--un-ring-offset-width)) var(--un-ring-color)",
        ),
        Declaration::new("box-shadow", SHADOW_STACK),
    ]))
}

fn ring_offset(captures: &Captures<'_>, _theme: &Theme) -> Option<Resolved> {
    declare(&["--un-ring-offset-width"], &format!("{}px", &captures[1]))
}

fn translate(captures: &Captures<'_>, _theme: &Theme) -> Option<Resolved> {
    let mut value = size(&captures[3], Axis::Both)?;
    if &captures[1] == "-" {
        value = negate(value);
    }
    let function = if &captures[2] == "x" {
        "translateX"
    } else {
        "translateY"
    };
    declare(&["transform"], &format!("{function}({value})"))
}

fn rotate(captures: &Captures<'_>, _theme: &Theme) -> Option<Resolved> {
    declare(&["transform"], &format!("rotate({}deg)", &captures[1]))
}

fn scale(captures: &Captures<'_>, _theme: &Theme) -> Option<Resolved> {
    let percent = parse_scale(&captures[1])?;
    declare(
        &["transform"],
        &format!("scale({})", format_number(percent / 100.0)),
    )
}

fn transition_timing(captures: &Captures<'_>, _theme: &Theme) -> Option<Resolved> {
    let property = if &captures[1] == "duration" {
        "transition-duration"
    } else {
        "transition-delay"
    };
    declare(&[property], &format!("{}ms", &captures[2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn declarations(body: &str) -> Vec<(String, String)> {
        let theme = Theme::default();
        let (_, resolved) = PRESET
            .resolve(body, &theme)
            .unwrap_or_else(|| panic!("`{body}` should resolve"));
        resolved
            .declarations
            .into_iter()
            .map(|declaration| (declaration.property, declaration.value))
            .collect()
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(property, value)| (property.to_string(), value.to_string()))
            .collect()
    }

    fn unresolved(body: &str) -> bool {
        PRESET.resolve(body, &Theme::default()).is_none()
    }

    #[test]
    fn number_formatting_trims_trailing_zeros() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(0.125), "0.125");
        assert_eq!(format_number(100.0 / 3.0), "33.333333");
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn static_rules_resolve_exactly() {
        assert_eq!(declarations("flex"), pairs(&[("display", "flex")]));
        assert_eq!(
            declarations("items-center"),
            pairs(&[("align-items", "center")])
        );
        assert_eq!(declarations("hidden"), pairs(&[("display", "none")]));
    }

    #[test]
    fn spacing_uses_quarter_rem_scale() {
        assert_eq!(declarations("p-4"), pairs(&[("padding", "1rem")]));
        assert_eq!(
            declarations("px-2.5"),
            pairs(&[("padding-left", "0.625rem"), ("padding-right", "0.625rem")])
        );
        assert_eq!(declarations("mt-px"), pairs(&[("margin-top", "1px")]));
        assert_eq!(declarations("-mx-2").len(), 2);
        assert_eq!(declarations("-mt-2"), pairs(&[("margin-top", "-0.5rem")]));
        assert_eq!(
            declarations("mx-auto"),
            pairs(&[("margin-left", "auto"), ("margin-right", "auto")])
        );
        assert_eq!(declarations("gap-x-3"), pairs(&[("column-gap", "0.75rem")]));
        assert!(unresolved("p-auto"));
        assert!(unresolved("-m-auto"));
    }

    #[test]
    fn sizing_supports_keywords_fractions_and_arbitrary_values() {
        assert_eq!(declarations("w-full"), pairs(&[("width", "100%")]));
        assert_eq!(declarations("h-screen"), pairs(&[("height", "100vh")]));
        assert_eq!(declarations("w-1/3"), pairs(&[("width", "33.333333%")]));
        assert_eq!(declarations("w-[320px]"), pairs(&[("width", "320px")]));
        assert_eq!(declarations("max-w-md"), pairs(&[("max-width", "28rem")]));
        assert_eq!(declarations("min-h-0"), pairs(&[("min-height", "0")]));
        assert_eq!(
            declarations("size-10"),
            pairs(&[("width", "2.5rem"), ("height", "2.5rem")])
        );
        assert!(unresolved("w-1/0"));
        assert!(unresolved("w-huge"));
    }

    #[test]
    fn colors_resolve_through_the_theme() {
        assert_eq!(
            declarations("bg-primary"),
            pairs(&[
                ("--un-bg-opacity", "1"),
                ("background-color", "rgb(59 130 246 / var(--un-bg-opacity))"),
            ])
        );
        assert_eq!(
            declarations("text-red-500/50"),
            pairs(&[("color", "rgb(239 68 68 / 0.5)")])
        );
        assert_eq!(
            declarations("bg-transparent"),
            pairs(&[("background-color", "transparent")])
        );
        assert_eq!(
            declarations("border-[#ff0000]"),
            pairs(&[
                ("--un-border-opacity", "1"),
                ("border-color", "rgb(255 0 0 / var(--un-border-opacity))"),
            ])
        );
        assert_eq!(
            declarations("bg-opacity-40"),
            pairs(&[("--un-bg-opacity", "0.4")])
        );
        assert!(unresolved("bg-transparent/50"));
        assert!(unresolved("bg-unknown-500"));
    }

    #[test]
    fn text_prefers_font_size_then_color() {
        assert_eq!(
            declarations("text-sm"),
            pairs(&[("font-size", "0.875rem"), ("line-height", "1.25rem")])
        );
        assert_eq!(declarations("text-[13px]"), pairs(&[("font-size", "13px")]));
        assert_eq!(declarations("text-center"), pairs(&[("text-align", "center")]));
        assert_eq!(declarations("text-white").len(), 2);
    }

    #[test]
    fn borders_and_radii() {
        assert_eq!(declarations("border"), pairs(&[("border-width", "1px")]));
        assert_eq!(declarations("border-t-2"), pairs(&[("border-top-width", "2px")]));
        assert_eq!(
            declarations("rounded-full"),
            pairs(&[("border-radius", "9999px")])
        );
        assert_eq!(declarations("rounded"), pairs(&[("border-radius", "0.25rem")]));
        assert_eq!(
            declarations("rounded-t-lg"),
            pairs(&[
                ("border-top-left-radius", "0.5rem"),
                ("border-top-right-radius", "0.5rem"),
            ])
        );
        assert_eq!(
            declarations("rounded-br"),
            pairs(&[("border-bottom-right-radius", "0.25rem")])
        );
    }

    #[test]
    fn space_between_carries_a_child_selector_suffix() {
        let (_, resolved) = PRESET
            .resolve("space-y-4", &Theme::default())
            .expect("space-y resolves");
        assert_eq!(resolved.suffix, Some(SPACE_BETWEEN_SUFFIX));
    }

    #[test]
    fn unknown_utilities_do_not_resolve() {
        assert!(unresolved("rounded-enormous"));
        assert!(unresolved("font-heavyish"));
        assert!(unresolved("hello"));
    }

    #[test]
    fn preset_order_is_stable() {
        let theme = Theme::default();
        let (flex, _) = PRESET.resolve("flex", &theme).expect("flex");
        let (padding, _) = PRESET.resolve("p-4", &theme).expect("p-4");
        let (background, _) = PRESET.resolve("bg-primary", &theme).expect("bg");
        assert!(flex < padding);
        assert!(padding < background);
        assert!(background < PRESET.len());
    }
}
