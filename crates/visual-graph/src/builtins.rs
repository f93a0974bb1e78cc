//! Builtin node definitions
//!
//! Each builtin is a plain function returning its definition, submitted to
//! the link-time collection that [`crate::NodeRegistry::with_builtins`] reads.

use serde_json::json;

use crate::definition::NodeDefinition;
use crate::registry::BuiltinNodeFn;
use crate::types::{NodeCategory, Port, PortType};

pub fn button() -> NodeDefinition {
    NodeDefinition::new("button", "Button", NodeCategory::Ui, "Clickable button")
        .with_documentation("Creates an interactive button; wire `click` to a logic node.")
        .with_examples(["Login button", "Submit button", "Cancel button"])
        .input(Port::required("text", "Button text", PortType::String).with_default(json!("Click me")))
        .output(Port::optional("click", "Click event", PortType::Function))
        .property("text", json!("Click me"))
        .property("variant", json!("primary"))
        .property("size", json!("medium"))
}

pub fn input() -> NodeDefinition {
    NodeDefinition::new("input", "Input", NodeCategory::Ui, "Text input field")
        .with_documentation("Creates a text input; bind `value` from a data node to make it controlled.")
        .with_examples(["Username field", "Password field", "Search box"])
        .input(Port::optional("placeholder", "Placeholder", PortType::String).with_default(json!("Enter text...")))
        .input(Port::optional("value", "Value", PortType::String).with_default(json!("")))
        .output(Port::optional("change", "Value changed", PortType::Function))
        .output(Port::optional("value", "Current value", PortType::String))
        .property("placeholder", json!("Enter text..."))
        .property("type", json!("text"))
}

pub fn card() -> NodeDefinition {
    NodeDefinition::new("card", "Card", NodeCategory::Ui, "Content card")
        .with_documentation("Displays a titled block of content.")
        .with_examples(["Profile card", "Summary card"])
        .input(Port::optional("content", "Content", PortType::String))
        .property("title", json!(""))
        .property("content", json!("Card content"))
}

pub fn text() -> NodeDefinition {
    NodeDefinition::new("text", "Text", NodeCategory::Ui, "Static or bound text")
        .input(Port::optional("text", "Text", PortType::String))
        .property("text", json!("Text"))
}

pub fn chart() -> NodeDefinition {
    NodeDefinition::new("chart", "Chart", NodeCategory::Ui, "Line chart over a data series")
        .with_documentation("Plots `dataKey` of each record in `data`.")
        .input(Port::required("data", "Data", PortType::Array).with_default(json!([])))
        .property("dataKey", json!("value"))
        .property("height", json!(300))
}

pub fn map() -> NodeDefinition {
    NodeDefinition::new("map", "Map", NodeCategory::Ui, "Interactive tile map")
        .input(Port::optional("center", "Center", PortType::Array))
        .input(Port::optional("zoom", "Zoom", PortType::Number))
        .property("latitude", json!(51.505))
        .property("longitude", json!(-0.09))
        .property("zoom", json!(13))
}

pub fn event_handler() -> NodeDefinition {
    NodeDefinition::new("event-handler", "Event Handler", NodeCategory::Logic, "Handles an event")
        .with_documentation("Generates a handler function; downstream nodes are triggered in order.")
        .input(Port::optional("trigger", "Trigger", PortType::Function))
        .input(Port::optional("payload", "Payload", PortType::Object))
        .output(Port::optional("then", "Then", PortType::Function))
        .output(Port::optional("result", "Result", PortType::Object))
}

pub fn condition() -> NodeDefinition {
    NodeDefinition::new("condition", "Condition", NodeCategory::Logic, "Branches on a boolean")
        .input(Port::required("value", "Condition", PortType::Boolean))
        .output(Port::optional("then", "When true", PortType::Function))
        .output(Port::optional("else", "When false", PortType::Function))
}

pub fn state() -> NodeDefinition {
    NodeDefinition::new("state", "State", NodeCategory::Data, "Component state variable")
        .with_documentation("Each `state_<name>` property becomes a state variable.")
        .input(Port::optional("set", "Set value", PortType::Object))
        .output(Port::optional("value", "Value", PortType::String))
        .property("state_value", json!(""))
}

pub fn api_source() -> NodeDefinition {
    NodeDefinition::new("api-source", "API Source", NodeCategory::Data, "Fetches records from an HTTP endpoint")
        .input(Port::required("url", "URL", PortType::String))
        .output(Port::optional("data", "Data", PortType::Array))
        .output(Port::optional("loading", "Loading", PortType::Boolean))
        .property("method", json!("GET"))
        .property("state_records", json!([]))
}

pub fn emotion_detector() -> NodeDefinition {
    NodeDefinition::new("emotion-detector", "Emotion Detector", NodeCategory::Emotion, "Detects user emotion")
        .with_documentation("Analyzes text or audio input for emotional state.")
        .with_examples(["Text sentiment", "Voice emotion"])
        .input(Port::optional("text", "Text", PortType::String))
        .input(Port::optional("audio", "Audio", PortType::Object))
        .output(Port::optional("emotion", "Emotion", PortType::Emotion))
        .output(Port::optional("confidence", "Confidence", PortType::Number))
        .property("mode", json!("text"))
        .property("sensitivity", json!(0.7))
        .react_import("import { useYYC3EmotionDetection } from '@/hooks/use-emotion-detection';")
        .vue_import("import { useYYC3EmotionDetection } from '@/hooks/use-emotion-detection';")
        .vanilla_import("import { detectEmotion } from '@yyc3/emotion-sound-platform';")
}

pub fn ai_assistant() -> NodeDefinition {
    NodeDefinition::new("ai-assistant", "AI Assistant", NodeCategory::Ai, "Conversational AI assistant")
        .with_documentation("Provides AI dialogue and smart responses.")
        .with_examples(["Support bot", "Study helper", "Code helper"])
        .input(Port::required("prompt", "Prompt", PortType::String))
        .input(Port::optional("context", "Context", PortType::Object))
        .output(Port::optional("response", "Response", PortType::AiResponse))
        .output(Port::optional("loading", "Loading", PortType::Boolean))
        .property("model", json!("gpt-4"))
        .property("maxTokens", json!(1000))
        .property("temperature", json!(0.7))
        .react_import("import { useYYC3AI } from '@/hooks/use-ai';")
        .vue_import("import { useYYC3AI } from '@/hooks/use-ai';")
        .vanilla_import("import { generateResponse } from '@/services/ai';")
}

inventory::submit!(BuiltinNodeFn(button));
inventory::submit!(BuiltinNodeFn(input));
inventory::submit!(BuiltinNodeFn(card));
inventory::submit!(BuiltinNodeFn(text));
inventory::submit!(BuiltinNodeFn(chart));
inventory::submit!(BuiltinNodeFn(map));
inventory::submit!(BuiltinNodeFn(event_handler));
inventory::submit!(BuiltinNodeFn(condition));
inventory::submit!(BuiltinNodeFn(state));
inventory::submit!(BuiltinNodeFn(api_source));
inventory::submit!(BuiltinNodeFn(emotion_detector));
inventory::submit!(BuiltinNodeFn(ai_assistant));
