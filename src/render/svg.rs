//! SVG rendering of a positioned Sankey diagram.
//!
//! Gradient definitions are written into `<defs>` ahead of the links that
//! reference them. Links are drawn first, nodes on top, labels last. Every
//! node and link element carries a `data-node-index` / `data-link-index`
//! attribute so callers can attach their own hover/click handlers.

use crate::color::Rgb;
use crate::layout::model::format_coord;
use crate::layout::{PositionedLink, PositionedNode, SankeyLayout};

/// Presentation options for [`render_svg`].
#[derive(Debug, Clone, PartialEq)]
pub struct SvgOptions {
    /// Opacity of link bands (default: 0.5).
    pub link_opacity: f64,
    /// Draw node names beside the bars (default: true).
    pub show_labels: bool,
    /// Label font size in pixels (default: 12).
    pub font_size: f64,
    /// Gap between a bar and its label (default: 6).
    pub label_gap: f64,
    /// Optional outline around node bars.
    pub node_stroke: Option<Rgb>,
    /// Add `<title>` tooltips to nodes and links (default: true).
    pub tooltips: bool,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            link_opacity: 0.5,
            show_labels: true,
            font_size: 12.0,
            label_gap: 6.0,
            node_stroke: None,
            tooltips: true,
        }
    }
}

/// Render `layout` as a standalone SVG document.
pub fn render_svg(layout: &SankeyLayout, options: &SvgOptions) -> String {
    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" class=\"sankey\">",
        w = format_coord(layout.width),
        h = format_coord(layout.height),
    ));

    if !layout.gradients.is_empty() {
        svg.push_str("<defs>");
        for gradient in &layout.gradients {
            svg.push_str(&format!(
                "<linearGradient id=\"{}\" gradientUnits=\"userSpaceOnUse\" x1=\"{}\" x2=\"{}\"><stop offset=\"0%\" stop-color=\"{}\"/><stop offset=\"100%\" stop-color=\"{}\"/></linearGradient>",
                escape_xml(&gradient.id),
                format_coord(gradient.x1),
                format_coord(gradient.x2),
                gradient.from,
                gradient.to,
            ));
        }
        svg.push_str("</defs>");
    }

    svg.push_str("<g class=\"sankey-links\" fill=\"none\">");
    for link in &layout.links {
        push_link(&mut svg, layout, link, options);
    }
    svg.push_str("</g>");

    svg.push_str("<g class=\"sankey-nodes\">");
    for node in &layout.nodes {
        push_node(&mut svg, node, options);
    }
    svg.push_str("</g>");

    if options.show_labels {
        svg.push_str(&format!(
            "<g class=\"sankey-labels\" font-size=\"{}\">",
            format_coord(options.font_size)
        ));
        for node in &layout.nodes {
            push_label(&mut svg, layout, node, options);
        }
        svg.push_str("</g>");
    }

    svg.push_str("</svg>");
    svg
}

fn push_link(svg: &mut String, layout: &SankeyLayout, link: &PositionedLink, options: &SvgOptions) {
    svg.push_str(&format!(
        "<path data-link-index=\"{}\" d=\"{}\" stroke=\"{}\" stroke-width=\"{}\" stroke-opacity=\"{}\">",
        link.index.raw(),
        link.d,
        escape_xml(&link.stroke.paint()),
        format_coord(link.stroke_width()),
        format_coord(options.link_opacity),
    ));
    if options.tooltips {
        if let Some(title) = layout.link_tooltip(link.index) {
            svg.push_str(&format!("<title>{}</title>", escape_xml(&title)));
        }
    }
    svg.push_str("</path>");
}

fn push_node(svg: &mut String, node: &PositionedNode, options: &SvgOptions) {
    let stroke = options
        .node_stroke
        .map(|color| format!(" stroke=\"{color}\""))
        .unwrap_or_default();
    svg.push_str(&format!(
        "<rect data-node-index=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"{stroke}>",
        node.index.raw(),
        format_coord(node.x0),
        format_coord(node.y0),
        format_coord(node.x1 - node.x0),
        format_coord(node.height()),
        node.color,
    ));
    if options.tooltips {
        svg.push_str(&format!(
            "<title>{}: {}</title>",
            escape_xml(&node.name),
            node.value()
        ));
    }
    svg.push_str("</rect>");
}

/// Labels go right of the bar, except in the last layer where they would
/// run off the drawing.
fn push_label(svg: &mut String, layout: &SankeyLayout, node: &PositionedNode, options: &SvgOptions) {
    let last_layer = layout.layer_count > 1 && node.layer + 1 == layout.layer_count;
    let (x, anchor) = if last_layer {
        (node.x0 - options.label_gap, "end")
    } else {
        (node.x1 + options.label_gap, "start")
    };
    svg.push_str(&format!(
        "<text data-node-index=\"{}\" x=\"{}\" y=\"{}\" dy=\"0.35em\" text-anchor=\"{anchor}\">{}</text>",
        node.index.raw(),
        format_coord(x),
        format_coord((node.y0 + node.y1) / 2.0),
        escape_xml(&node.name),
    ));
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeSpec;
    use crate::layout::{SankeyInput, compute_layout};

    fn layout() -> SankeyLayout {
        let input = SankeyInput::new(300.0, 100.0)
            .node(NodeSpec::named("Solar").with_color("#ffcc00"))
            .node(NodeSpec::named("Grid & <Storage>").with_color("#ffcc00"))
            .node(NodeSpec::named("Homes").with_color("#3366cc"))
            .link("Solar", "Grid & <Storage>", 8.0)
            .link("Grid & <Storage>", "Homes", 8.0);
        compute_layout(&input).unwrap()
    }

    #[test]
    fn test_document_shape() {
        let svg = render_svg(&layout(), &SvgOptions::default());
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"300\" height=\"100\""));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<rect ").count(), 3);
        assert_eq!(svg.matches("<path ").count(), 2);
        assert_eq!(svg.matches("<text ").count(), 3);
    }

    #[test]
    fn test_gradients_defined_before_use() {
        let svg = render_svg(&layout(), &SvgOptions::default());
        let defs = svg.find("<linearGradient id=\"sankey-gradient-1\"").unwrap();
        let usage = svg.find("url(#sankey-gradient-1)").unwrap();
        assert!(defs < usage);
        // Same-colored link is solid
        assert!(svg.contains("data-link-index=\"0\" d=\"M20,50C80,50 80,50 140,50\" stroke=\"#ffcc00\""));
        assert!(!svg.contains("sankey-gradient-0"));
    }

    #[test]
    fn test_no_defs_without_gradients() {
        let input = SankeyInput::new(100.0, 100.0)
            .node(NodeSpec::named("A").with_color("#000000"))
            .node(NodeSpec::named("B").with_color("#000000"))
            .link("A", "B", 1.0);
        let svg = render_svg(&compute_layout(&input).unwrap(), &SvgOptions::default());
        assert!(!svg.contains("<defs>"));
    }

    #[test]
    fn test_zero_value_link_drawn_at_min_width() {
        let input = SankeyInput::new(200.0, 100.0)
            .node(NodeSpec::named("A"))
            .node(NodeSpec::named("B"))
            .node(NodeSpec::named("C"))
            .link("A", "B", 10.0)
            .link("A", "C", 0.0);
        let layout = compute_layout(&input).unwrap();
        let svg = render_svg(&layout, &SvgOptions::default());
        let link = &layout.links[1];
        assert!(svg.contains(&format!(
            "data-link-index=\"1\" d=\"{}\" stroke=\"{}\" stroke-width=\"1\"",
            link.d,
            link.stroke.paint()
        )));
    }

    #[test]
    fn test_text_is_escaped() {
        let svg = render_svg(&layout(), &SvgOptions::default());
        assert!(svg.contains("Grid &amp; &lt;Storage&gt;"));
        assert!(!svg.contains("<Storage>"));
        assert!(svg.contains("<title>Solar → Grid &amp; &lt;Storage&gt;: 8</title>"));
    }

    #[test]
    fn test_label_sides() {
        let svg = render_svg(&layout(), &SvgOptions::default());
        assert!(svg.contains("<text data-node-index=\"0\" x=\"26\""));
        assert!(svg.contains("text-anchor=\"end\">Homes</text>"));
    }

    #[test]
    fn test_options_toggle_output() {
        let options = SvgOptions {
            show_labels: false,
            tooltips: false,
            node_stroke: Some(Rgb::new(0, 0, 0)),
            ..Default::default()
        };
        let svg = render_svg(&layout(), &options);
        assert!(!svg.contains("<text"));
        assert!(!svg.contains("<title>"));
        assert!(svg.contains("stroke=\"#000000\""));
    }
}
