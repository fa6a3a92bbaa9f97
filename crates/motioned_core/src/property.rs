//! Animatable property names
//!
//! Callers name properties the way they would in a style object
//! (`opacity`, `backgroundColor`, `x`, `rotateZ`). The style surface sees
//! either a kebab-cased CSS property or, for the transform shorthands, the
//! CSS custom property that the transform template composes.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Transform shorthands and the custom properties they animate
const TRANSFORM_SHORTHANDS: &[(&str, &str)] = &[
    ("x", "--x"),
    ("y", "--y"),
    ("z", "--z"),
    ("rotateX", "--rotate-x"),
    ("rotateY", "--rotate-y"),
    ("rotateZ", "--rotate-z"),
    ("scaleX", "--scale-x"),
    ("scaleY", "--scale-y"),
    ("skewX", "--skew-x"),
    ("skewY", "--skew-y"),
    ("matrix", "--matrix"),
];

/// Transform composed from the shorthand custom properties.
///
/// Every variable falls back to its identity value, so an element that never
/// animates a shorthand is not transformed by it.
pub const TRANSFORM_TEMPLATE: &str = "translateX(var(--x, 0px)) translateY(var(--y, 0px)) \
translateZ(var(--z, 0px)) rotateX(var(--rotate-x, 0deg)) rotateY(var(--rotate-y, 0deg)) \
rotateZ(var(--rotate-z, 0deg)) scaleX(var(--scale-x, 1)) scaleY(var(--scale-y, 1)) \
skewX(var(--skew-x, 0)) skewY(var(--skew-y, 0)) matrix(var(--matrix, 1, 0, 0, 1, 0, 0))";

/// Build the inline `transform` value, appending any caller transform
pub fn transform_template(extra: Option<&str>) -> String {
    match extra {
        Some(extra) if !extra.trim().is_empty() => format!("{} {}", TRANSFORM_TEMPLATE, extra),
        _ => TRANSFORM_TEMPLATE.to_string(),
    }
}

/// Name of an animatable property as written by the caller
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyName(String);

impl PropertyName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this property is one of the transform shorthands
    pub fn is_transform_shorthand(&self) -> bool {
        TRANSFORM_SHORTHANDS.iter().any(|(name, _)| *name == self.0)
    }

    /// Name of the property on the style surface
    ///
    /// Transform shorthands map to their custom property (`rotateX` ->
    /// `--rotate-x`), everything else is kebab-cased (`backgroundColor` ->
    /// `background-color`).
    pub fn style_name(&self) -> String {
        TRANSFORM_SHORTHANDS
            .iter()
            .find(|(name, _)| *name == self.0)
            .map(|(_, var)| (*var).to_string())
            .unwrap_or_else(|| kebabize(&self.0))
    }

    /// CSS unit appended to bare numeric values of this property
    pub fn unit(&self) -> &'static str {
        match self.0.as_str() {
            "x" | "y" | "z" | "width" | "height" | "minWidth" | "minHeight" | "maxWidth"
            | "maxHeight" | "top" | "right" | "bottom" | "left" | "borderRadius"
            | "borderWidth" | "outlineWidth" | "outlineOffset" | "padding" | "paddingTop"
            | "paddingRight" | "paddingBottom" | "paddingLeft" | "margin" | "marginTop"
            | "marginRight" | "marginBottom" | "marginLeft" | "gap" | "rowGap" | "columnGap"
            | "fontSize" | "letterSpacing" => "px",
            "rotate" | "rotateX" | "rotateY" | "rotateZ" | "skewX" | "skewY" => "deg",
            _ => "",
        }
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for PropertyName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PropertyName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for PropertyName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Convert a camelCase style name to its kebab-case CSS form.
///
/// Names that are already custom properties (`--foo`) are left alone.
pub fn kebabize(name: &str) -> String {
    if name.starts_with("--") {
        return name.to_string();
    }

    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// A typed CSS custom property backing a transform shorthand
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CustomProperty {
    /// Custom property name, including the leading `--`
    pub name: &'static str,
    /// `@property` syntax descriptor
    pub syntax: &'static str,
    pub inherits: bool,
    pub initial_value: &'static str,
}

impl CustomProperty {
    /// Render as an `@property` rule
    pub fn to_css_rule(&self) -> String {
        format!(
            "@property {} {{ syntax: '{}'; inherits: {}; initial-value: {}; }}",
            self.name, self.syntax, self.inherits, self.initial_value
        )
    }
}

/// Custom properties that must be typed for the surface to interpolate them
///
/// Untyped custom properties animate discretely, so each transform variable
/// is registered with a syntax before first use. `--matrix` has no single
/// value syntax and stays untyped.
pub const CUSTOM_PROPERTIES: &[CustomProperty] = &[
    CustomProperty {
        name: "--x",
        syntax: "<length-percentage>",
        inherits: false,
        initial_value: "0px",
    },
    CustomProperty {
        name: "--y",
        syntax: "<length-percentage>",
        inherits: false,
        initial_value: "0px",
    },
    CustomProperty {
        name: "--z",
        syntax: "<length>",
        inherits: false,
        initial_value: "0px",
    },
    CustomProperty {
        name: "--rotate-x",
        syntax: "<angle>",
        inherits: false,
        initial_value: "0deg",
    },
    CustomProperty {
        name: "--rotate-y",
        syntax: "<angle>",
        inherits: false,
        initial_value: "0deg",
    },
    CustomProperty {
        name: "--rotate-z",
        syntax: "<angle>",
        inherits: false,
        initial_value: "0deg",
    },
    CustomProperty {
        name: "--scale-x",
        syntax: "<number>",
        inherits: false,
        initial_value: "1",
    },
    CustomProperty {
        name: "--scale-y",
        syntax: "<number>",
        inherits: false,
        initial_value: "1",
    },
    CustomProperty {
        name: "--skew-x",
        syntax: "<angle>",
        inherits: false,
        initial_value: "0deg",
    },
    CustomProperty {
        name: "--skew-y",
        syntax: "<angle>",
        inherits: false,
        initial_value: "0deg",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_shorthands_map_to_custom_properties() {
        assert_eq!(PropertyName::new("x").style_name(), "--x");
        assert_eq!(PropertyName::new("rotateX").style_name(), "--rotate-x");
        assert_eq!(PropertyName::new("scaleY").style_name(), "--scale-y");
        assert!(PropertyName::new("skewX").is_transform_shorthand());
        assert!(!PropertyName::new("opacity").is_transform_shorthand());
    }

    #[test]
    fn test_plain_properties_are_kebabized() {
        assert_eq!(PropertyName::new("opacity").style_name(), "opacity");
        assert_eq!(
            PropertyName::new("backgroundColor").style_name(),
            "background-color"
        );
        assert_eq!(kebabize("--already-custom"), "--already-custom");
        assert_eq!(kebabize("borderTopLeftRadius"), "border-top-left-radius");
    }

    #[test]
    fn test_units() {
        assert_eq!(PropertyName::new("width").unit(), "px");
        assert_eq!(PropertyName::new("x").unit(), "px");
        assert_eq!(PropertyName::new("rotate").unit(), "deg");
        assert_eq!(PropertyName::new("opacity").unit(), "");
        assert_eq!(PropertyName::new("scale").unit(), "");
    }

    #[test]
    fn test_transform_template_appends_extra() {
        assert_eq!(transform_template(None), TRANSFORM_TEMPLATE);
        assert_eq!(transform_template(Some("  ")), TRANSFORM_TEMPLATE);
        let combined = transform_template(Some("rotate(45deg)"));
        assert!(combined.starts_with(TRANSFORM_TEMPLATE));
        assert!(combined.ends_with(" rotate(45deg)"));
    }

    #[test]
    fn test_custom_property_rule() {
        let rule = CUSTOM_PROPERTIES[0].to_css_rule();
        assert_eq!(
            rule,
            "@property --x { syntax: '<length-percentage>'; inherits: false; initial-value: 0px; }"
        );
    }
}
