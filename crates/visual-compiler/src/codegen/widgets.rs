//! UI widget variants
//!
//! Every `ui` node renders as one of these. Each emitter matches on the
//! variant; unrecognised node types become a [`UiWidget::Placeholder`].

use serde_json::Value;
use visual_graph::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiWidget {
    Button,
    Input,
    Card,
    Text,
    Chart,
    Map,
    Placeholder,
}

impl UiWidget {
    pub fn for_node_type(node_type: &str) -> Self {
        match node_type {
            "button" => Self::Button,
            "input" => Self::Input,
            "card" => Self::Card,
            "text" => Self::Text,
            "chart" => Self::Chart,
            "map" => Self::Map,
            _ => Self::Placeholder,
        }
    }

    /// Component imported from the UI kit, if the widget uses one
    pub fn kit_component(self) -> Option<&'static str> {
        match self {
            Self::Button => Some("Button"),
            Self::Input => Some("Input"),
            Self::Card => Some("Card"),
            _ => None,
        }
    }
}

/// Tile server used by map widgets
pub const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

/// String property, falling back to `default` when missing or not a string
pub fn text_prop<'a>(node: &'a Node, key: &str, default: &'a str) -> &'a str {
    node.property_str(key).unwrap_or(default)
}

/// Numeric property rendered as a JavaScript number literal
///
/// Numeric strings are accepted; anything else falls back to `default`.
pub fn number_prop(node: &Node, key: &str, default: f64) -> String {
    let value = match node.properties.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    format_number(value.filter(|v| v.is_finite()).unwrap_or(default))
}

/// Format a float the way JavaScript prints it (`300`, `51.505`)
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use visual_graph::ProjectBuilder;

    #[test]
    fn test_widget_dispatch() {
        assert_eq!(UiWidget::for_node_type("button"), UiWidget::Button);
        assert_eq!(UiWidget::for_node_type("map"), UiWidget::Map);
        assert_eq!(UiWidget::for_node_type("hologram"), UiWidget::Placeholder);
        assert_eq!(UiWidget::Card.kit_component(), Some("Card"));
        assert_eq!(UiWidget::Chart.kit_component(), None);
    }

    #[test]
    fn test_property_helpers() {
        let project = ProjectBuilder::new("Props")
            .add_raw_node("n", "chart", (0.0, 0.0))
            .with_property("height", json!("240"))
            .with_property("zoom", json!(13))
            .with_property("lat", json!(51.505))
            .with_property("label", json!(7))
            .build();
        let node = &project.nodes[0];

        assert_eq!(number_prop(node, "height", 300.0), "240");
        assert_eq!(number_prop(node, "zoom", 1.0), "13");
        assert_eq!(number_prop(node, "lat", 0.0), "51.505");
        assert_eq!(number_prop(node, "missing", 2.5), "2.5");
        assert_eq!(text_prop(node, "label", "fallback"), "fallback");
    }
}
