//! Framework-neutral component model
//!
//! Built once per compile from the project snapshot. Emitters only read
//! it, so all three targets agree on names, ordering and bindings.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;
use visual_graph::{Node, NodeCategory, NodeRegistry, PortType, VisualProject};

use super::naming::{component_name, to_camel_case, to_pascal_case, IdentAllocator};
use super::widgets::UiWidget;
use crate::options::{CompileOptions, TargetFramework};

/// Names generated code binds itself, across all targets
const BOUND_NAMES: &[&str] = &[
    "React", "useState", "useEffect", "useCallback", "useMemo", "ref", "watch", "onMounted",
    "props", "styles", "state", "render", "init", "root", "mount", "Chart", "L", "toChartData",
    "detectEmotion", "currentEmotion", "generateResponse", "isLoading", "event",
    "useYYC3EmotionDetection", "useYYC3AI", "Button", "Input", "Card", "LineChart", "Line",
    "XAxis", "YAxis", "Tooltip", "ResponsiveContainer", "MapContainer", "TileLayer", "LMap",
    "LTileLayer", "EmotionSignal", "AIResponse", "Callback", "Payload", "AppState",
    "defineProps", "injectStyles", "bootstrap", "charts", "maps", "target",
    "runEmotionDetection", "runAI",
];

/// A component state variable declared by a `state_` property
#[derive(Debug, Clone, PartialEq)]
pub struct StateField {
    pub node_id: String,
    pub name: String,
    pub setter: String,
    pub default: Value,
}

impl StateField {
    /// TypeScript type of the stored default
    pub fn ts_type(&self) -> &'static str {
        match &self.default {
            Value::String(_) => "string",
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Array(_) => "unknown[]",
            Value::Object(_) => "Payload",
            Value::Null => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HandlerParam {
    pub name: String,
    /// `None` for the implicit `event` parameter
    pub port_type: Option<PortType>,
}

impl HandlerParam {
    pub fn ts_type(&self) -> &'static str {
        match self.port_type {
            None => "unknown",
            Some(t) => ts_type_for_port(t),
        }
    }
}

/// TypeScript type used for values arriving through a port
pub fn ts_type_for_port(port_type: PortType) -> &'static str {
    match port_type {
        PortType::String => "string",
        PortType::Number => "number",
        PortType::Boolean => "boolean",
        PortType::Object => "Payload",
        PortType::Array => "unknown[]",
        PortType::Function => "Callback",
        PortType::Emotion => "EmotionSignal",
        PortType::AiResponse => "AIResponse",
    }
}

/// A generated handler function for a `logic` node
#[derive(Debug, Clone, PartialEq)]
pub struct Handler {
    pub node_id: String,
    pub name: String,
    pub params: Vec<HandlerParam>,
    /// Labels of downstream nodes, in edge order
    pub targets: Vec<String>,
}

/// A state variable feeding a widget input
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub state: String,
    pub setter: String,
}

/// A `ui` node with its resolved event and state bindings
#[derive(Debug, Clone)]
pub struct WidgetView<'a> {
    pub node: &'a Node,
    pub kind: UiWidget,
    /// Output port id -> handler name
    pub events: BTreeMap<String, String>,
    /// Input port id -> state binding
    pub bindings: BTreeMap<String, Binding>,
}

impl WidgetView<'_> {
    pub fn event(&self, port_id: &str) -> Option<&str> {
        self.events.get(port_id).map(String::as_str)
    }

    pub fn binding(&self, port_id: &str) -> Option<&Binding> {
        self.bindings.get(port_id)
    }
}

#[derive(Debug, Clone)]
pub struct ComponentModel<'a> {
    pub project: &'a VisualProject,
    pub framework: TargetFramework,
    pub name: String,
    pub typescript: bool,
    /// Project has the emotion feature switched on
    pub emotion: bool,
    /// Project has the AI feature switched on
    pub ai: bool,
    pub state: Vec<StateField>,
    pub handlers: Vec<Handler>,
    /// `ui` nodes sorted by `(y, x)`
    pub widgets: Vec<WidgetView<'a>>,
    /// Import statements contributed by node definitions, deduplicated
    pub node_imports: Vec<String>,
}

impl<'a> ComponentModel<'a> {
    pub fn build(
        project: &'a VisualProject,
        registry: &NodeRegistry,
        options: &CompileOptions,
    ) -> Self {
        let name = component_name(&project.name);
        let mut idents = IdentAllocator::new();
        idents.reserve(BOUND_NAMES.iter().copied());
        idents.reserve([name.as_str()]);

        let emotion = project.metadata.emotion_enabled;
        let ai = project.metadata.ai_enabled;

        let state = collect_state(project, &mut idents);
        let handlers = collect_handlers(project, &mut idents);
        let widgets = collect_widgets(project, &state, &handlers);
        let node_imports = collect_imports(project, registry, options.framework, emotion, ai);

        Self {
            project,
            framework: options.framework,
            name,
            typescript: options.typescript,
            emotion,
            ai,
            state,
            handlers,
            widgets,
            node_imports,
        }
    }

    /// Whether any widget of `kind` is rendered
    pub fn uses(&self, kind: UiWidget) -> bool {
        self.widgets.iter().any(|w| w.kind == kind)
    }

    /// UI kit components used, in first-use order
    pub fn kit_components(&self) -> Vec<&'static str> {
        let mut components = Vec::new();
        for widget in &self.widgets {
            if let Some(component) = widget.kind.kit_component() {
                if !components.contains(&component) {
                    components.push(component);
                }
            }
        }
        components
    }

    /// Whether a handler parameter or state field needs a named TS type
    pub fn uses_ts_type(&self, ts_type: &str) -> bool {
        self.state.iter().any(|s| s.ts_type() == ts_type)
            || self
                .handlers
                .iter()
                .flat_map(|h| &h.params)
                .any(|p| p.ts_type() == ts_type)
    }
}

fn collect_state(project: &VisualProject, idents: &mut IdentAllocator) -> Vec<StateField> {
    let mut fields = Vec::new();
    for node in &project.nodes {
        for (key, value) in node.state_properties() {
            let name = idents.allocate(&to_camel_case(key));
            let setter = idents.allocate(&format!("set{}", to_pascal_case(&name)));
            fields.push(StateField {
                node_id: node.id.clone(),
                name,
                setter,
                default: value.clone(),
            });
        }
    }
    fields
}

fn collect_handlers(project: &VisualProject, idents: &mut IdentAllocator) -> Vec<Handler> {
    project
        .nodes_in(NodeCategory::Logic)
        .map(|node| {
            let name = idents.allocate(&format!("handle{}", to_pascal_case(&node.label)));

            let mut param_names = IdentAllocator::new();
            let mut params: Vec<HandlerParam> = project
                .incoming_edges(&node.id)
                .map(|edge| {
                    let port = project
                        .find_node(&edge.source_node_id)
                        .and_then(|source| source.output(&edge.source_port_id));
                    match port {
                        Some(port) => HandlerParam {
                            name: param_names.allocate(&non_empty(to_camel_case(&port.name), "data")),
                            port_type: Some(port.port_type),
                        },
                        None => HandlerParam {
                            name: param_names.allocate("data"),
                            port_type: None,
                        },
                    }
                })
                .collect();
            if params.is_empty() {
                params.push(HandlerParam {
                    name: "event".to_string(),
                    port_type: None,
                });
            }

            let targets = project
                .outgoing_edges(&node.id)
                .filter_map(|edge| project.find_node(&edge.target_node_id))
                .map(|target| target.label.clone())
                .collect();

            Handler {
                node_id: node.id.clone(),
                name,
                params,
                targets,
            }
        })
        .collect()
}

fn collect_widgets<'a>(
    project: &'a VisualProject,
    state: &[StateField],
    handlers: &[Handler],
) -> Vec<WidgetView<'a>> {
    let handler_by_node: HashMap<&str, &str> = handlers
        .iter()
        .map(|h| (h.node_id.as_str(), h.name.as_str()))
        .collect();
    let mut state_by_node: HashMap<&str, &StateField> = HashMap::new();
    for field in state {
        state_by_node.entry(field.node_id.as_str()).or_insert(field);
    }

    let mut ui: Vec<&Node> = project.nodes_in(NodeCategory::Ui).collect();
    ui.sort_by(|a, b| {
        a.position
            .y
            .total_cmp(&b.position.y)
            .then(a.position.x.total_cmp(&b.position.x))
    });

    ui.into_iter()
        .map(|node| {
            let mut events = BTreeMap::new();
            for edge in project.outgoing_edges(&node.id) {
                if let Some(handler) = handler_by_node.get(edge.target_node_id.as_str()) {
                    events
                        .entry(edge.source_port_id.clone())
                        .or_insert_with(|| handler.to_string());
                }
            }

            let mut bindings = BTreeMap::new();
            for edge in project.incoming_edges(&node.id) {
                if let Some(field) = state_by_node.get(edge.source_node_id.as_str()) {
                    bindings
                        .entry(edge.target_port_id.clone())
                        .or_insert_with(|| Binding {
                            state: field.name.clone(),
                            setter: field.setter.clone(),
                        });
                }
            }

            WidgetView {
                node,
                kind: UiWidget::for_node_type(&node.node_type),
                events,
                bindings,
            }
        })
        .collect()
}

fn collect_imports(
    project: &VisualProject,
    registry: &NodeRegistry,
    framework: TargetFramework,
    emotion: bool,
    ai: bool,
) -> Vec<String> {
    let mut imports: Vec<String> = Vec::new();
    for node in &project.nodes {
        let disabled = match node.category {
            NodeCategory::Emotion => !emotion,
            NodeCategory::Ai => !ai,
            _ => false,
        };
        if disabled {
            continue;
        }
        let Some(definition) = registry.get(&node.node_type) else {
            continue;
        };
        let statements = match framework {
            TargetFramework::React => &definition.imports.react,
            TargetFramework::Vue => &definition.imports.vue,
            TargetFramework::Vanilla => &definition.imports.vanilla,
        };
        for statement in statements {
            if !imports.contains(statement) {
                imports.push(statement.clone());
            }
        }
    }
    imports
}

fn non_empty(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use visual_graph::ProjectBuilder;

    fn registry() -> NodeRegistry {
        NodeRegistry::with_builtins()
    }

    #[test]
    fn test_widgets_sorted_by_position() {
        let registry = registry();
        let project = ProjectBuilder::new("Order")
            .add_node("low", registry.get("card").unwrap(), (0.0, 300.0))
            .add_node("right", registry.get("button").unwrap(), (200.0, 100.0))
            .add_node("left", registry.get("input").unwrap(), (0.0, 100.0))
            .build();

        let model = ComponentModel::build(&project, &registry, &CompileOptions::default());
        let order: Vec<&str> = model.widgets.iter().map(|w| w.node.id.as_str()).collect();
        assert_eq!(order, vec!["left", "right", "low"]);
        assert_eq!(model.kit_components(), vec!["Input", "Button", "Card"]);
    }

    #[test]
    fn test_handlers_and_bindings() {
        let registry = registry();
        let project = ProjectBuilder::new("Form")
            .add_node("btn", registry.get("button").unwrap(), (0.0, 0.0))
            .add_node("submit", registry.get("event-handler").unwrap(), (0.0, 100.0))
            .with_label("Submit Form")
            .add_node("name", registry.get("state").unwrap(), (0.0, 200.0))
            .with_property("state_value", json!("Ada"))
            .add_node("field", registry.get("input").unwrap(), (0.0, 300.0))
            .add_edge("btn", "click", "submit", "trigger")
            .add_edge("submit", "result", "name", "set")
            .add_edge("name", "value", "field", "value")
            .build();

        let model = ComponentModel::build(&project, &registry, &CompileOptions::default());

        let handler = &model.handlers[0];
        assert_eq!(handler.name, "handleSubmitForm");
        assert_eq!(handler.params[0].name, "clickEvent");
        assert_eq!(handler.params[0].port_type, Some(PortType::Function));
        assert_eq!(handler.targets, vec!["State".to_string()]);

        assert_eq!(model.state[0].name, "value");
        assert_eq!(model.state[0].setter, "setValue");

        let button = model.widgets.iter().find(|w| w.node.id == "btn").unwrap();
        assert_eq!(button.event("click"), Some("handleSubmitForm"));
        let field = model.widgets.iter().find(|w| w.node.id == "field").unwrap();
        assert_eq!(field.binding("value").unwrap().state, "value");
    }

    #[test]
    fn test_handler_without_inputs_takes_event() {
        let registry = registry();
        let project = ProjectBuilder::new("Lonely")
            .add_node("h", registry.get("condition").unwrap(), (0.0, 0.0))
            .build();
        let model = ComponentModel::build(&project, &registry, &CompileOptions::default());
        assert_eq!(model.handlers[0].name, "handleCondition");
        assert_eq!(model.handlers[0].params[0].name, "event");
        assert_eq!(model.handlers[0].params[0].port_type, None);
    }

    #[test]
    fn test_colliding_names_are_unique() {
        let registry = registry();
        let project = ProjectBuilder::new("Twins")
            .add_node("a", registry.get("state").unwrap(), (0.0, 0.0))
            .add_node("b", registry.get("state").unwrap(), (0.0, 0.0))
            .add_node("h1", registry.get("event-handler").unwrap(), (0.0, 0.0))
            .with_label("Save")
            .add_node("h2", registry.get("event-handler").unwrap(), (0.0, 0.0))
            .with_label("save")
            .build();
        let model = ComponentModel::build(&project, &registry, &CompileOptions::default());

        let names: Vec<&str> = model.state.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["value", "value2"]);
        assert_eq!(model.state[1].setter, "setValue2");
        assert_eq!(model.handlers[0].name, "handleSave");
        assert_eq!(model.handlers[1].name, "handleSave2");
    }

    #[test]
    fn test_features_follow_project_flags() {
        let registry = registry();
        let project = ProjectBuilder::new("Features")
            .emotion_enabled(false)
            .add_node("emo", registry.get("emotion-detector").unwrap(), (0.0, 0.0))
            .build();
        let model = ComponentModel::build(&project, &registry, &CompileOptions::default());
        assert!(!model.emotion);
        assert!(model.ai);
        assert!(model.node_imports.is_empty());

        let bare = ProjectBuilder::new("Bare").build();
        let model = ComponentModel::build(&bare, &registry, &CompileOptions::default());
        assert!(model.emotion);
        assert!(model.ai);
    }
}
