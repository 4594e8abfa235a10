//! CSS declarations and class lookup
//!
//! Excel ships its cell formatting as a `<style>` block of class rules (`.xl65 {...}`)
//! referenced from each `<td class=...>`; other sources only use inline `style`
//! attributes. Both are reduced to declaration lists and then to cell attributes.

use ahash::AHashMap;
use cellgrid_core::attributes::{self, Attributes};
use lazy_regex::regex;

/// Ordered `property: value` pairs, property names lowercase
pub type Declarations = Vec<(String, String)>;

/// Parse the body of a `style` attribute or rule block
pub fn parse_declarations(text: &str) -> Declarations {
    text.split(';')
        .filter_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            let prop = prop.trim().to_ascii_lowercase();
            let value = value.trim().trim_end_matches("!important").trim();
            if prop.is_empty() || value.is_empty() {
                return None;
            }
            Some((prop, value.to_string()))
        })
        .collect()
}

/// Value of the last declaration of `prop`
pub fn declaration<'a>(decls: &'a Declarations, prop: &str) -> Option<&'a str> {
    decls
        .iter()
        .rev()
        .find(|(p, _)| p == prop)
        .map(|(_, v)| v.as_str())
}

/// Class and element rules of a stylesheet
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    classes: AHashMap<String, Declarations>,
    elements: AHashMap<String, Declarations>,
}

impl StyleSheet {
    /// Parse rules of the form `selector, selector {decls}`.
    ///
    /// Only `.class` and bare element selectors are kept; anything more specific
    /// (descendants, pseudo-classes, at-rules) is ignored.
    pub fn parse(css: &str) -> Self {
        let mut sheet = StyleSheet::default();

        for caps in regex!(r"([^{}]+)\{([^}]*)\}").captures_iter(css) {
            let decls = parse_declarations(&caps[2]);
            for selector in caps[1].split(',') {
                let selector = selector.trim();
                if let Some(class) = selector.strip_prefix('.') {
                    if is_simple_name(class) {
                        sheet
                            .classes
                            .entry(class.to_string())
                            .or_default()
                            .extend(decls.iter().cloned());
                    }
                } else if is_simple_name(selector) {
                    sheet
                        .elements
                        .entry(selector.to_ascii_lowercase())
                        .or_default()
                        .extend(decls.iter().cloned());
                }
            }
        }

        sheet
    }

    /// Number of class rules
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Declarations of one class
    pub fn class(&self, name: &str) -> Option<&Declarations> {
        self.classes.get(name)
    }

    /// Cascade for an element: element rule, then each class in order, then inline style
    pub fn resolve(&self, tag: &str, class_attr: Option<&str>, inline: Option<&str>) -> Declarations {
        let mut decls = Declarations::new();
        if let Some(rule) = self.elements.get(tag) {
            decls.extend(rule.iter().cloned());
        }
        for class in class_attr.unwrap_or("").split_whitespace() {
            if let Some(rule) = self.classes.get(class) {
                decls.extend(rule.iter().cloned());
            }
        }
        if let Some(inline) = inline {
            decls.extend(parse_declarations(inline));
        }
        decls
    }
}

fn is_simple_name(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Map declarations onto cell attributes: text style flags, alignment, borders and colors
pub fn declarations_to_attributes(decls: &Declarations) -> Attributes {
    let mut attrs = Attributes::new();

    for (prop, value) in decls {
        let lower = value.to_ascii_lowercase();
        match prop.as_str() {
            "font-weight" => flag(&mut attrs, attributes::BOLD, is_bold(&lower)),
            "font-style" => flag(
                &mut attrs,
                attributes::ITALIC,
                lower == "italic" || lower == "oblique",
            ),
            "text-decoration" | "text-decoration-line" => {
                flag(&mut attrs, attributes::UNDERLINE, lower.contains("underline"));
                flag(&mut attrs, attributes::STRIKETHROUGH, lower.contains("line-through"));
            }
            "text-align" => match lower.as_str() {
                "left" | "center" | "right" => {
                    attrs.insert(attributes::ALIGN.to_string(), lower.clone());
                }
                "centre" => {
                    attrs.insert(attributes::ALIGN.to_string(), "center".to_string());
                }
                _ => {}
            },
            "vertical-align" => match lower.as_str() {
                "top" | "middle" | "bottom" => {
                    attrs.insert(attributes::VERTICAL_ALIGN.to_string(), lower.clone());
                }
                "center" => {
                    attrs.insert(attributes::VERTICAL_ALIGN.to_string(), "middle".to_string());
                }
                _ => {}
            },
            "border" => {
                for key in attributes::BORDERS {
                    flag(&mut attrs, key, has_border(&lower));
                }
            }
            "border-top" => flag(&mut attrs, attributes::BORDER_TOP, has_border(&lower)),
            "border-right" => flag(&mut attrs, attributes::BORDER_RIGHT, has_border(&lower)),
            "border-bottom" => flag(&mut attrs, attributes::BORDER_BOTTOM, has_border(&lower)),
            "border-left" => flag(&mut attrs, attributes::BORDER_LEFT, has_border(&lower)),
            "background" | "background-color" => {
                if is_real_color(&lower) {
                    attrs.insert(attributes::BACKGROUND.to_string(), value.clone());
                }
            }
            "color" => {
                if is_real_color(&lower) {
                    attrs.insert(attributes::FONT_COLOR.to_string(), value.clone());
                }
            }
            "font-size" => {
                attrs.insert(attributes::FONT_SIZE.to_string(), value.clone());
            }
            _ => {}
        }
    }

    attrs
}

/// Inline style text for attributes, for pasting into other applications
pub fn attributes_to_style(attrs: &Attributes) -> String {
    let mut style = Vec::new();
    if let Some(align) = attrs.get(attributes::ALIGN) {
        style.push(format!("text-align:{}", align));
    }
    if let Some(align) = attrs.get(attributes::VERTICAL_ALIGN) {
        style.push(format!("vertical-align:{}", align));
    }
    if attributes::is_set(attrs, attributes::BOLD) {
        style.push("font-weight:bold".to_string());
    }
    if attributes::is_set(attrs, attributes::ITALIC) {
        style.push("font-style:italic".to_string());
    }
    let decorations: Vec<&str> = [
        (attributes::UNDERLINE, "underline"),
        (attributes::STRIKETHROUGH, "line-through"),
    ]
    .iter()
    .filter(|(key, _)| attributes::is_set(attrs, key))
    .map(|(_, css)| *css)
    .collect();
    if !decorations.is_empty() {
        style.push(format!("text-decoration:{}", decorations.join(" ")));
    }
    if let Some(color) = attrs.get(attributes::BACKGROUND) {
        style.push(format!("background-color:{}", color));
    }
    if let Some(color) = attrs.get(attributes::FONT_COLOR) {
        style.push(format!("color:{}", color));
    }
    if let Some(size) = attrs.get(attributes::FONT_SIZE) {
        style.push(format!("font-size:{}", size));
    }
    for (key, css) in attributes::BORDERS
        .iter()
        .zip(["border-top", "border-right", "border-bottom", "border-left"])
    {
        if attributes::is_set(attrs, key) {
            style.push(format!("{}:1px solid #000000", css));
        }
    }
    style.join(";")
}

/// Later declarations override earlier ones, so a cleared flag is removed
fn flag(attrs: &mut Attributes, key: &str, on: bool) {
    if on {
        attrs.insert(key.to_string(), attributes::TRUE.to_string());
    } else {
        attrs.remove(key);
    }
}

fn is_bold(value: &str) -> bool {
    match value {
        "bold" | "bolder" => true,
        _ => value.parse::<u32>().map_or(false, |w| w >= 600),
    }
}

fn has_border(value: &str) -> bool {
    !(value.is_empty()
        || value.starts_with("none")
        || value.starts_with("hidden")
        || value.starts_with("0 ")
        || value == "0"
        || value.starts_with("0px"))
}

fn is_real_color(value: &str) -> bool {
    !matches!(
        value,
        "transparent" | "none" | "initial" | "inherit" | "auto" | "windowtext"
    )
}
