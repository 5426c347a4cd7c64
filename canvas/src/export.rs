//! Static HTML/CSS export of the live page.
//!
//! Both formats share one declaration list per element so inline styles and
//! `.element-N` rules never drift apart. Elements are emitted in list order;
//! stacking is carried by the explicit `z-index` declaration.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use serde::{Deserialize, Serialize};

use crate::consts::TRIANGLE_CLIP_PATH;
use crate::doc::{Element, ElementKind, Link, LinkKind, Location, ShapeKind};
use crate::geometry::{format_number, polygon_clip_path};
use crate::scene::{CanvasSettings, Project};

/// Output flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// One inline-styled `<div>` tree.
    #[default]
    Html,
    /// A `.container` rule plus numbered `.element-N` rules.
    Css,
}

type Decl = (&'static str, String);

/// Export the live page of `project` in `format`.
#[must_use]
pub fn export(project: &Project, format: ExportFormat) -> String {
    match format {
        ExportFormat::Html => export_html(project),
        ExportFormat::Css => export_css(project),
    }
}

/// CSS-only export.
#[must_use]
pub fn export_css(project: &Project) -> String {
    let canvas = project.active_canvas();
    let mut css = String::from(".container {\n");
    for (prop, value) in container_declarations(&canvas) {
        css.push_str(&format!("  {prop}: {value};\n"));
    }
    css.push_str("}\n\n");

    for (i, el) in project.active_elements().iter().enumerate() {
        css.push_str(&format!(".element-{} {{\n", i + 1));
        for (prop, value) in element_declarations(el) {
            css.push_str(&format!("  {prop}: {value};\n"));
        }
        css.push_str("}\n\n");
    }
    css
}

/// HTML export with inline styles. Pagedolls follow the regular elements as
/// `<img>` tags.
#[must_use]
pub fn export_html(project: &Project) -> String {
    let canvas = project.active_canvas();
    let mut html = format!("<div style=\"{}\">\n", escape_html(&join_inline(&container_declarations(&canvas))));

    let (pagedolls, regular): (Vec<&Element>, Vec<&Element>) =
        project.active_elements().iter().partition(|el| el.kind == ElementKind::Pagedoll);

    for el in regular {
        write_element(&mut html, el);
    }
    for el in pagedolls {
        write_pagedoll(&mut html, el);
    }

    html.push_str("</div>");
    html
}

/// Inline `style` attribute value for one element.
#[must_use]
pub fn inline_style(el: &Element) -> String {
    join_inline(&element_declarations(el))
}

/// Escape text for use in element content or a double-quoted attribute.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Strip a CSS `url(...)` wrapper and its optional quotes.
#[must_use]
pub fn strip_css_url(value: &str) -> &str {
    let mut s = value;
    if let Some(rest) = s.strip_prefix("url(") {
        s = rest.strip_prefix(['"', '\'']).unwrap_or(rest);
        if let Some(rest) = s.strip_suffix(')') {
            s = rest.strip_suffix(['"', '\'']).unwrap_or(rest);
        }
    }
    s
}

fn join_inline(decls: &[Decl]) -> String {
    decls.iter().map(|(prop, value)| format!("{prop}: {value}")).collect::<Vec<_>>().join("; ")
}

fn container_declarations(canvas: &CanvasSettings) -> Vec<Decl> {
    vec![
        ("position", "relative".into()),
        ("width", format!("{}px", format_number(canvas.width))),
        ("min-height", format!("{}px", format_number(canvas.height))),
        ("background", canvas.background.clone()),
        ("overflow", "visible".into()),
    ]
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

fn px(value: f64) -> String {
    format!("{}px", format_number(value))
}

fn element_declarations(el: &Element) -> Vec<Decl> {
    let styles = &el.styles;
    let mut decls: Vec<Decl> = Vec::new();

    decls.push(("position", "absolute".into()));
    if el.kind == ElementKind::Pagedoll {
        decls.push(("right", px(el.x)));
        decls.push(("bottom", px(el.y)));
        decls.push(("max-height", px(el.height)));
    } else {
        decls.push(("left", px(el.x)));
        decls.push(("top", px(el.y)));
        decls.push(("width", px(el.width)));
        decls.push(("height", px(el.height)));
    }

    if el.rotation != 0.0 {
        decls.push(("transform", format!("rotate({}deg)", format_number(el.rotation))));
    }
    decls.push(("z-index", el.z_index.to_string()));

    if let Some(color) = non_empty(styles.background_color.as_ref()) {
        decls.push(("background-color", color.to_string()));
    }

    if el.is_shape(ShapeKind::Circle) {
        decls.push(("border-radius", "50%".into()));
    } else if let Some(radius) = styles.border_radius.as_ref().and_then(crate::doc::BorderRadius::to_css) {
        decls.push(("border-radius", radius));
    }

    if let Some(opacity) = styles.opacity.filter(|o| *o != 1.0) {
        decls.push(("opacity", format_number(opacity)));
    }
    if let Some(mode) = non_empty(styles.mix_blend_mode.as_ref()).filter(|m| *m != "normal") {
        decls.push(("mix-blend-mode", mode.to_string()));
    }

    let image = non_empty(styles.background_image.as_ref()).or_else(|| {
        if el.kind == ElementKind::World { non_empty(el.world_image.as_ref()) } else { None }
    });
    if let Some(image) = image {
        let image = if image.starts_with("url(") { image.to_string() } else { format!("url({image})") };
        decls.push(("background-image", image));
        decls.push(("background-size", non_empty(styles.background_size.as_ref()).unwrap_or("cover").to_string()));
        decls.push((
            "background-position",
            non_empty(styles.background_position.as_ref()).unwrap_or("center").to_string(),
        ));
        if let Some(repeat) = non_empty(styles.background_repeat.as_ref()) {
            decls.push(("background-repeat", repeat.to_string()));
        }
    }

    if el.is_shape(ShapeKind::Triangle) {
        decls.push(("clip-path", TRIANGLE_CLIP_PATH.into()));
    }
    if el.is_shape(ShapeKind::Polygon)
        && let Some(sides) = el.sides.filter(|s| *s > 0)
    {
        decls.push(("clip-path", polygon_clip_path(sides as usize)));
    }

    if el.kind == ElementKind::Text {
        if let Some(size) = el.font_size.filter(|s| *s != 0.0 && !s.is_nan()) {
            decls.push(("font-size", px(size)));
        }
        if let Some(color) = non_empty(el.font_color.as_ref()) {
            decls.push(("color", color.to_string()));
        }
        if let Some(family) = non_empty(el.font_family.as_ref()) {
            decls.push(("font-family", family.to_string()));
        }
        if let Some(align) = non_empty(el.text_align.as_ref()) {
            decls.push(("text-align", align.to_string()));
        }
        decls.push(("display", "flex".into()));
        decls.push(("align-items", "center".into()));
        decls.push(("justify-content", "center".into()));
    }

    if let Some(width) = styles.border_width.filter(|w| *w > 0.0) {
        let style = non_empty(styles.border_style.as_ref()).unwrap_or("solid");
        let color = non_empty(styles.border_color.as_ref()).unwrap_or("#000000");
        decls.push(("border", format!("{} {style} {color}", px(width))));
    }
    if !el.visible {
        decls.push(("display", "none".into()));
    }

    decls
}

fn link_attrs(link: &Link) -> String {
    let href = match link.kind {
        LinkKind::Url => link.target.clone(),
        LinkKind::Page => format!("#page-{}", link.target),
    };
    let mut attrs = format!(" href=\"{}\"", escape_html(&href));
    if link.open_in_new_tab {
        attrs.push_str(" target=\"_blank\" rel=\"noopener\"");
    }
    attrs
}

fn write_element(html: &mut String, el: &Element) {
    let (tag, attrs) = match el.link {
        Some(ref link) => ("a", link_attrs(link)),
        None => ("div", String::new()),
    };
    html.push_str(&format!("  <{tag}{attrs} style=\"{}\">", escape_html(&inline_style(el))));

    if el.kind == ElementKind::Text {
        let content = non_empty(el.content.as_ref()).unwrap_or("Text");
        html.push_str(&escape_html(content));
    }
    if el.kind == ElementKind::World && !el.locations.is_empty() {
        html.push('\n');
        for loc in &el.locations {
            write_location(html, loc);
        }
        html.push_str("  ");
    }

    html.push_str(&format!("</{tag}>\n"));
}

fn location_declarations(loc: &Location) -> Vec<Decl> {
    let bs = &loc.button_styles;
    let border_width = bs.border_width.filter(|w| *w != 0.0).unwrap_or(2.0);
    let border_color = non_empty(bs.border_color.as_ref()).unwrap_or("#ffffff");
    vec![
        ("position", "absolute".into()),
        ("left", format!("{}%", format_number(loc.x))),
        ("top", format!("{}%", format_number(loc.y))),
        ("transform", "translate(-50%, -50%)".into()),
        ("background-color", non_empty(bs.background_color.as_ref()).unwrap_or("#1a1a1a").to_string()),
        ("color", non_empty(bs.color.as_ref()).unwrap_or("#ffffff").to_string()),
        ("border", format!("{} solid {border_color}", px(border_width))),
        ("border-radius", px(bs.border_radius.unwrap_or(8.0))),
        ("padding", non_empty(bs.padding.as_ref()).unwrap_or("8px 14px").to_string()),
        ("font-size", non_empty(bs.font_size.as_ref()).unwrap_or("14px").to_string()),
        ("font-weight", non_empty(bs.font_weight.as_ref()).unwrap_or("bold").to_string()),
        ("white-space", "nowrap".into()),
    ]
}

fn write_location(html: &mut String, loc: &Location) {
    let (tag, attrs) = match loc.link {
        Some(ref link) => ("a", link_attrs(link)),
        None => ("div", String::new()),
    };
    html.push_str(&format!(
        "    <{tag}{attrs} style=\"{}\">{}</{tag}>\n",
        escape_html(&join_inline(&location_declarations(loc))),
        escape_html(&loc.name)
    ));
}

fn write_pagedoll(html: &mut String, el: &Element) {
    let src = el.styles.background_image.as_deref().map(strip_css_url).unwrap_or_default();
    html.push_str(&format!(
        "  <img src=\"{}\" style=\"max-height: {}; right: {}; bottom: {};\" class=\"page-doll fr-fil fr-dib\" width=\"{}\" height=\"{}\">\n",
        escape_html(src),
        px(el.height),
        px(el.x),
        px(el.y),
        format_number(el.width),
        format_number(el.height)
    ));
}
