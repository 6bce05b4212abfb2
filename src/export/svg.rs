//! Render a [`LifeMap`] as a standalone SVG document.
//!
//! Edges are straight segments between the anchor points found by
//! [`crate::routing`], so they touch each shape's outline. Clouds reuse the
//! outline drawn by the canvas app, stretched into the node box.

use crate::geometry::{Point, ShapeKind};
use crate::model::{LifeMap, MapNode};
use crate::palette;
use crate::routing;

/// Cloud outline in a 130x70 box.
const CLOUD_PATH: &str = "M 25,60 C 25,45 15,30 28,30 C 30,5 70,5 80,20 C 85,10 105,10 108,30 C 115,30 125,45 110,60 C 110,60 25,60 25,60 z";
const CLOUD_VIEW_WIDTH: f64 = 130.0;
const CLOUD_VIEW_HEIGHT: f64 = 70.0;

#[derive(Debug, Clone)]
pub struct SvgConfig {
    /// Space around the node boxes.
    pub padding: f64,
    /// Fill for a full-size background rect; `None` leaves it transparent.
    pub background: Option<String>,
    pub stroke_width: f64,
    pub font_family: String,
    pub font_size: f64,
    pub label_color: String,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            padding: 40.0,
            background: Some("#111111".into()),
            stroke_width: 2.0,
            font_family: "sans-serif".into(),
            font_size: 16.0,
            label_color: "#FFFFFF".into(),
        }
    }
}

/// Generate the SVG text for a map.
pub fn render_svg(map: &LifeMap, cfg: &SvgConfig) -> String {
    let (min, max) = content_bounds(map);
    let x0 = min.x - cfg.padding;
    let y0 = min.y - cfg.padding;
    let w = (max.x - min.x) + 2.0 * cfg.padding;
    let h = (max.y - min.y) + 2.0 * cfg.padding;

    let mut out = String::with_capacity(1024 + map.nodes.len() * 256);
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"{} {} {} {}\" width=\"{}\" height=\"{}\">\n",
        num(x0),
        num(y0),
        num(w),
        num(h),
        num(w),
        num(h)
    ));
    if let Some(bg) = &cfg.background {
        out.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>\n",
            num(x0),
            num(y0),
            num(w),
            num(h),
            attr(bg)
        ));
    }

    out.push_str("  <g class=\"edges\">\n");
    for route in routing::route_edges(map) {
        let stroke = map
            .edge(&route.edge_id)
            .and_then(|e| e.stroke())
            .or_else(|| map.node(&route.source).map(|n| n.color()))
            .unwrap_or(palette::DEFAULT_COLOR);
        let a = route.anchors.source_point;
        let b = route.anchors.target_point;
        out.push_str(&format!(
            "    <line data-edge=\"{}\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\"/>\n",
            attr(&route.edge_id),
            num(a.x),
            num(a.y),
            num(b.x),
            num(b.y),
            attr(stroke),
            num(cfg.stroke_width)
        ));
    }
    out.push_str("  </g>\n");

    out.push_str("  <g class=\"nodes\">\n");
    for node in &map.nodes {
        write_node(&mut out, node, cfg);
    }
    out.push_str("  </g>\n");
    out.push_str("</svg>\n");
    out
}

fn write_node(out: &mut String, node: &MapNode, cfg: &SvgConfig) {
    let shape = node.shape();
    let color = attr(node.color());
    let stroke_width = if node.selected {
        cfg.stroke_width + 1.0
    } else {
        cfg.stroke_width
    };
    let p = shape.position;
    let d = shape.dimensions;

    out.push_str(&format!(
        "    <g data-node=\"{}\" class=\"{}\">\n",
        attr(&node.id),
        shape.kind.as_str()
    ));
    match shape.kind {
        ShapeKind::Rectangle => {
            out.push_str(&format!(
                "      <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"8\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>\n",
                num(p.x),
                num(p.y),
                num(d.width),
                num(d.height),
                color,
                num(stroke_width)
            ));
        }
        ShapeKind::Circle => {
            let r = d.width / 2.0;
            out.push_str(&format!(
                "      <circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>\n",
                num(p.x + r),
                num(p.y + r),
                num(r),
                color,
                num(stroke_width)
            ));
        }
        ShapeKind::Cloud => {
            out.push_str(&format!(
                "      <path transform=\"translate({} {}) scale({} {})\" d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" vector-effect=\"non-scaling-stroke\"/>\n",
                num(p.x),
                num(p.y),
                num(d.width / CLOUD_VIEW_WIDTH),
                num(d.height / CLOUD_VIEW_HEIGHT),
                CLOUD_PATH,
                color,
                num(stroke_width)
            ));
        }
    }

    let (min, max) = shape.bounds();
    let c = min.midpoint(max);
    out.push_str(&format!(
        "      <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" dominant-baseline=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>\n",
        num(c.x),
        num(c.y),
        attr(&cfg.font_family),
        num(cfg.font_size),
        attr(&cfg.label_color),
        html_escape::encode_text(&node.data.label)
    ));
    out.push_str("    </g>\n");
}

/// Union of all node boxes; the origin when the map has no nodes.
fn content_bounds(map: &LifeMap) -> (Point, Point) {
    let mut boxes = map.nodes.iter().map(|n| n.shape().bounds());
    let Some(first) = boxes.next() else {
        return (Point::default(), Point::default());
    };
    boxes.fold(first, |(min, max), (a, b)| {
        (
            Point::new(min.x.min(a.x), min.y.min(a.y)),
            Point::new(max.x.max(b.x), max.y.max(b.y)),
        )
    })
}

fn attr(s: &str) -> String {
    html_escape::encode_double_quoted_attribute(s).into_owned()
}

/// Format a coordinate with at most two decimals and no trailing zeros.
fn num(v: f64) -> String {
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}
