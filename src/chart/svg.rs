// =============================================================================
// SVG Surface
// =============================================================================
//
// Draws a `ChartGeometry` as a standalone SVG document. No layout decisions
// are made here: every coordinate comes from the geometry engine.

use svg::node::element::{Group, Line, Rectangle, Text};
use svg::node::Text as TextNode;
use svg::Document;

use super::config::RenderConfig;
use super::geometry::{compute_geometry, ChartError, ChartGeometry};
use super::record::OhlcRecord;

/// Horizontal gap between a price label and the left edge of the plot area.
const LABEL_OFFSET_X: f64 = 10.0;
/// Baseline shift so labels sit centered on their grid line.
const LABEL_OFFSET_Y: f64 = 5.0;

fn document(width: f64, height: f64) -> Document {
    Document::new()
        .set("width", width)
        .set("height", height)
        .set("viewBox", format!("0 0 {width} {height}"))
}

fn label(content: &str) -> Text {
    Text::new().add(TextNode::new(content))
}

/// Build the SVG document for computed geometry.
pub fn chart_document(geo: &ChartGeometry) -> Document {
    let mut doc = document(geo.width, geo.height);

    for line in &geo.grid_lines {
        let mut group = Group::new().add(
            Line::new()
                .set("x1", line.x1)
                .set("y1", line.y)
                .set("x2", line.x2)
                .set("y2", line.y)
                .set("stroke", geo.grid_color.as_str())
                .set("stroke-opacity", geo.grid_opacity),
        );
        if let Some(text) = &line.label {
            group = group.add(
                label(text)
                    .set("x", geo.padding - LABEL_OFFSET_X)
                    .set("y", line.y + LABEL_OFFSET_Y)
                    .set("text-anchor", "end")
                    .set("font-size", 12)
                    .set("fill", "currentColor")
                    .set("opacity", 0.5),
            );
        }
        doc = doc.add(group);
    }

    for candle in &geo.candles {
        let color = candle.color.as_str();
        let wick = Line::new()
            .set("x1", candle.wick.x)
            .set("y1", candle.wick.y_high)
            .set("x2", candle.wick.x)
            .set("y2", candle.wick.y_low)
            .set("stroke", color)
            .set("stroke-width", 1);
        let body = Rectangle::new()
            .set("x", candle.body.x)
            .set("y", candle.body.y)
            .set("width", candle.body.width)
            .set("height", candle.body.height)
            .set("fill", color)
            .set("stroke", color)
            .set("stroke-width", 1);
        doc = doc.add(Group::new().add(wick).add(body));
    }

    doc
}

/// Render computed geometry to SVG markup.
pub fn render_svg(geo: &ChartGeometry) -> String {
    chart_document(geo).to_string()
}

/// Render the "nothing to draw" state in place of a chart.
pub fn render_placeholder(width: f64, height: f64, err: &ChartError) -> String {
    document(width, height)
        .add(
            label(err.placeholder_text())
                .set("x", width / 2.0)
                .set("y", height / 2.0)
                .set("text-anchor", "middle")
                .set("dominant-baseline", "middle")
                .set("font-size", 14)
                .set("fill", "currentColor")
                .set("opacity", 0.6),
        )
        .to_string()
}

/// Compute and draw in one step, falling back to the placeholder.
pub fn render_chart(records: &[OhlcRecord], config: &RenderConfig) -> String {
    match compute_geometry(records, config) {
        Ok(geo) => render_svg(&geo),
        Err(err) => render_placeholder(config.width, config.height, &err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<OhlcRecord> {
        vec![
            OhlcRecord::new("2024-01-01", 100.0, 105.0, 108.0, 98.0),
            OhlcRecord::new("2024-01-02", 105.0, 102.0, 107.0, 100.0),
        ]
    }

    #[test]
    fn renders_grid_and_candles() {
        let svg = render_chart(&sample(), &RenderConfig::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains(r#"viewBox="0 0 800 350""#));
        assert!(svg.contains(r#"xmlns="http://www.w3.org/2000/svg""#));
        assert_eq!(svg.matches("<rect").count(), 2);
        assert_eq!(svg.matches("<text").count(), 5);
        // 5 grid lines + 2 wicks.
        assert_eq!(svg.matches("<line").count(), 7);
        assert!(svg.contains("108.00"));
        assert!(svg.contains("98.00"));
        assert!(svg.contains("rgb(34, 197, 94)"));
        assert!(svg.contains("rgb(239, 68, 68)"));
    }

    #[test]
    fn document_follows_geometry() {
        let geo = compute_geometry(&sample(), &RenderConfig::default()).unwrap();
        let svg = render_svg(&geo);
        let first = &geo.candles[0];
        assert!(svg.contains(&format!(r#"x="{}""#, first.body.x)));
        assert!(svg.contains(&format!(r#"height="{}""#, first.body.height)));
        assert!(svg.contains(&format!(r#"stroke-opacity="{}""#, geo.grid_opacity)));
    }

    #[test]
    fn labels_hidden_when_disabled() {
        let cfg = RenderConfig {
            show_price_labels: false,
            ..RenderConfig::default()
        };
        let svg = render_chart(&sample(), &cfg);
        assert_eq!(svg.matches("<text").count(), 0);
        assert_eq!(svg.matches("<line").count(), 7);
    }

    #[test]
    fn empty_renders_placeholder() {
        let svg = render_chart(&[], &RenderConfig::default());
        assert!(svg.contains("No data"));
        assert!(!svg.contains("<rect"));
        assert_eq!(svg.matches("<text").count(), 1);

        let bad = vec![OhlcRecord::new("x", 0.0, 1.0, 1.0, 1.0)];
        let svg = render_chart(&bad, &RenderConfig::default());
        assert!(svg.contains("Invalid data"));
    }
}
