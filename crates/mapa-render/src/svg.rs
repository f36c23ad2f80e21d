//! SVG serialization of a [`Scene`] seen through a viewport [`Transform`].

use crate::scene::{Card, Link, Scene};
use crate::theme::Theme;
use crate::viewport::{Transform, ViewportSize};
use std::fmt::Write as _;

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Root element id; also prefixes `<defs>` ids.
    pub diagram_id: String,
    /// Overrides the theme background.
    pub background: Option<String>,
    /// When false, the dot grid is omitted even if the theme defines one.
    pub include_grid: bool,
    pub title: Option<String>,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            diagram_id: "mapa".to_string(),
            background: None,
            include_grid: true,
            title: None,
        }
    }
}

pub fn render_svg(
    scene: &Scene,
    transform: &Transform,
    size: ViewportSize,
    theme: &Theme,
    options: &SvgRenderOptions,
) -> String {
    let w = size.width.max(0.0);
    let h = size.height.max(0.0);
    let id = escape_attr(&options.diagram_id);
    let background = options.background.as_deref().unwrap_or(&theme.background);
    let grid = theme
        .grid_color
        .as_deref()
        .filter(|_| options.include_grid && theme.grid_spacing > 0.0);
    let has_shadow = [&theme.root, &theme.category, &theme.item]
        .iter()
        .any(|c| c.shadow);

    let mut out = String::with_capacity(1024 + scene.cards.len() * 512);
    let _ = write!(
        &mut out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" id="{id}" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img" aria-roledescription="mindmap">"#,
        w = fmt(w),
        h = fmt(h),
    );
    if let Some(title) = options.title.as_deref() {
        let _ = write!(&mut out, "<title>{}</title>", escape_xml(title));
    }

    if grid.is_some() || has_shadow {
        out.push_str("<defs>");
        if let Some(color) = grid {
            let s = fmt(theme.grid_spacing);
            let _ = write!(
                &mut out,
                r#"<pattern id="{id}-grid" width="{s}" height="{s}" patternUnits="userSpaceOnUse"><circle cx="1" cy="1" r="1" fill="{}"/></pattern>"#,
                escape_attr(color)
            );
        }
        if has_shadow {
            let _ = write!(
                &mut out,
                r##"<filter id="{id}-shadow" x="-10%" y="-10%" width="120%" height="140%"><feDropShadow dx="0" dy="2" stdDeviation="3" flood-color="#0f172a" flood-opacity="0.12"/></filter>"##
            );
        }
        out.push_str("</defs>");
    }

    let _ = write!(
        &mut out,
        r#"<rect class="background" x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
        fmt(w),
        fmt(h),
        escape_attr(background)
    );
    if grid.is_some() {
        let _ = write!(
            &mut out,
            r#"<rect class="grid" x="0" y="0" width="{}" height="{}" fill="url(#{id}-grid)" opacity="{}" pointer-events="none"/>"#,
            fmt(w),
            fmt(h),
            fmt(theme.grid_opacity)
        );
    }

    let _ = write!(
        &mut out,
        r#"<g class="viewport" transform="{}">"#,
        transform.to_svg()
    );

    out.push_str(r#"<g class="links">"#);
    for link in &scene.links {
        render_link(&mut out, link, theme);
    }
    out.push_str("</g>");

    out.push_str(r#"<g class="nodes">"#);
    for card in &scene.cards {
        render_card(&mut out, card, theme, &id);
    }
    out.push_str("</g>");

    out.push_str("</g></svg>");
    out
}

fn render_link(out: &mut String, link: &Link, theme: &Theme) {
    let _ = write!(
        out,
        r#"<path class="link" data-source="{}" data-target="{}" d="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
        escape_attr(&link.source_id),
        escape_attr(&link.target_id),
        link_path(link),
        escape_attr(&theme.link_color),
        fmt(theme.link_width)
    );
}

/// `M x0,y0 C mx,y0 mx,y1 x1,y1`
pub fn link_path(link: &Link) -> String {
    let (c1, c2) = link.control_points();
    format!(
        "M{},{} C{},{} {},{} {},{}",
        fmt_path(link.from.x),
        fmt_path(link.from.y),
        fmt_path(c1.x),
        fmt_path(c1.y),
        fmt_path(c2.x),
        fmt_path(c2.y),
        fmt_path(link.to.x),
        fmt_path(link.to.y)
    )
}

fn render_card(out: &mut String, card: &Card, theme: &Theme, diagram_id: &str) {
    let style = theme.card(card.kind);
    let node_id = escape_attr(&card.id);
    let _ = write!(
        out,
        r#"<g class="node node-{}" data-node-id="{node_id}" transform="translate({},{})" cursor="pointer">"#,
        card.kind,
        fmt(card.x),
        fmt(card.y)
    );
    let filter = if style.shadow {
        format!(r#" filter="url(#{diagram_id}-shadow)""#)
    } else {
        String::new()
    };
    let _ = write!(
        out,
        r#"<rect width="{}" height="{}" rx="{r}" ry="{r}" fill="{}" stroke="{}" stroke-width="{}"{filter}/>"#,
        fmt(card.width),
        fmt(card.height),
        escape_attr(&style.fill),
        escape_attr(&style.stroke),
        fmt(theme.card_stroke_width),
        r = fmt(theme.card_radius),
    );

    let _ = write!(
        out,
        r#"<text text-anchor="middle" font-family="{}" font-size="{}""#,
        escape_attr(&theme.font_family),
        fmt(style.font_size)
    );
    if let Some(weight) = style.font_weight.as_deref() {
        let _ = write!(out, r#" font-weight="{}""#, escape_attr(weight));
    }
    let _ = write!(out, r#" fill="{}">"#, escape_attr(&style.text_color));
    let cx = card.width / 2.0;
    for (line, center) in card.lines.iter().zip(card.line_centers()) {
        let _ = write!(
            out,
            r#"<tspan x="{}" y="{}" dominant-baseline="central">{}</tspan>"#,
            fmt(cx),
            fmt(center - card.y),
            escape_xml(line)
        );
    }
    out.push_str("</text></g>");
}

pub(crate) fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }

    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    let s = v.to_string();
    if s == "-0" { "0".to_string() } else { s }
}

/// Three fractional digits, ties half-up, trailing zeros trimmed.
fn fmt_path(v: f64) -> String {
    if !v.is_finite() || v.abs() < 0.0005 {
        return "0".to_string();
    }

    let r = (v * 1000.0 + 0.5).floor() / 1000.0;
    let mut s = format!("{r:.3}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" { "0".to_string() } else { s }
}

/// Escapes character data (text nodes, `<title>`).
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escapes a double-quoted attribute value. Tabs and line breaks are written as character
/// references so attribute-value normalization keeps them.
fn escape_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapa_layout::Point;

    #[test]
    fn numbers_drop_float_noise() {
        assert_eq!(fmt(1.0), "1");
        assert_eq!(fmt(-0.0), "0");
        assert_eq!(fmt(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(fmt(2.0000000001), "2");
        assert_eq!(fmt(f64::NAN), "0");
        assert_eq!(fmt_path(1.23456), "1.235");
        assert_eq!(fmt_path(-0.0001), "0");
        assert_eq!(fmt_path(12.5), "12.5");
    }

    #[test]
    fn link_path_is_a_horizontal_cubic() {
        let link = Link {
            source_id: "a".to_string(),
            target_id: "b".to_string(),
            from: Point::new(240.0, 0.0),
            to: Point::new(340.0, -96.0),
        };
        assert_eq!(link_path(&link), "M240,0 C290,0 290,-96 340,-96");
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(escape_xml(r#"<a & "b">"#), r#"&lt;a &amp; "b"&gt;"#);
    }

    #[test]
    fn attributes_escape_quotes_and_keep_line_breaks() {
        assert_eq!(escape_attr(r#"a"b'c<d>&"#), "a&quot;b&#39;c&lt;d>&amp;");
        assert_eq!(escape_attr("one\ntwo\tthree"), "one&#10;two&#9;three");
    }
}
