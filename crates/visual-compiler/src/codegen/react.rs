//! React emitter
//!
//! Produces a function component in JSX (TSX when `typescript` is set).
//! The transformer lowers the JSX afterwards.

use super::model::{ComponentModel, Handler, WidgetView};
use super::naming::{comment_text, js_string};
use super::styles::{banner, APP_STYLES, ROOT_CLASS};
use super::widgets::{number_prop, text_prop, UiWidget, TILE_URL};
use super::writer::{emit, CodeWriter};
use super::Emitter;
use crate::error::CodegenResult;

pub const CORE_IMPORT: &str =
    "import React, { useState, useEffect, useCallback, useMemo } from 'react';";
const CHART_IMPORT: &str =
    "import { LineChart, Line, XAxis, YAxis, Tooltip, ResponsiveContainer } from 'recharts';";
const MAP_IMPORT: &str = "import { MapContainer, TileLayer } from 'react-leaflet';";
pub const EMOTION_IMPORT: &str =
    "import { useYYC3EmotionDetection } from '@/hooks/use-emotion-detection';";
pub const AI_IMPORT: &str = "import { useYYC3AI } from '@/hooks/use-ai';";

#[derive(Debug, Clone, Copy, Default)]
pub struct ReactEmitter;

impl Emitter for ReactEmitter {
    fn emit(&self, model: &ComponentModel<'_>, w: &mut CodeWriter) -> CodegenResult<()> {
        emit!(w, "// {}", banner(&model.project.name));
        imports(model, w)?;
        if model.typescript {
            emit!(w);
            super::write_type_declarations(model, w)?;
        }
        emit!(w);
        component(model, w)?;
        emit!(w);
        emit!(w, "export const styles = `");
        for line in APP_STYLES.lines() {
            w.raw(line)?;
        }
        emit!(w, "`;");
        Ok(())
    }
}

fn imports(model: &ComponentModel<'_>, w: &mut CodeWriter) -> CodegenResult<()> {
    let mut lines: Vec<String> = vec![CORE_IMPORT.to_string()];

    let kit = model.kit_components();
    if !kit.is_empty() {
        lines.push(format!("import {{ {} }} from '@/components/ui';", kit.join(", ")));
    }
    if model.uses(UiWidget::Chart) {
        lines.push(CHART_IMPORT.to_string());
    }
    if model.uses(UiWidget::Map) {
        lines.push(MAP_IMPORT.to_string());
    }
    if model.emotion {
        lines.push(EMOTION_IMPORT.to_string());
    }
    if model.ai {
        lines.push(AI_IMPORT.to_string());
    }
    for statement in &model.node_imports {
        if !lines.contains(statement) {
            lines.push(statement.clone());
        }
    }

    for line in lines {
        emit!(w, "{}", line);
    }
    Ok(())
}

fn component(model: &ComponentModel<'_>, w: &mut CodeWriter) -> CodegenResult<()> {
    let props = if model.typescript {
        format!("props: {}Props", model.name)
    } else {
        "props".to_string()
    };
    emit!(w, "export default function {}({}) {{", model.name, props);
    w.indent();

    for field in &model.state {
        w.for_node(&field.node_id, |w| {
            let generic = if model.typescript {
                format!("<{}>", field.ts_type())
            } else {
                String::new()
            };
            emit!(
                w,
                "const [{}, {}] = useState{}({});",
                field.name,
                field.setter,
                generic,
                serde_json::to_string(&field.default)?
            );
            Ok(())
        })?;
    }
    if model.emotion {
        emit!(w, "const {{ detectEmotion, currentEmotion }} = useYYC3EmotionDetection();");
    }
    if model.ai {
        emit!(w, "const {{ generateResponse, isLoading }} = useYYC3AI();");
    }
    if !model.state.is_empty() || model.emotion || model.ai {
        emit!(w);
    }

    emit!(w, "useEffect(() => {{");
    emit!(w, "  // Component initialization");
    emit!(w, "}}, []);");
    if model.emotion {
        emit!(w);
        emit!(w, "useEffect(() => {{");
        emit!(w, "  if (currentEmotion) {{");
        emit!(w, "    // Handle emotion changes");
        emit!(w, "  }}");
        emit!(w, "}}, [currentEmotion]);");
    }
    if model.ai {
        emit!(w);
        emit!(w, "useEffect(() => {{");
        emit!(w, "  if (!isLoading) {{");
        emit!(w, "    // AI response settled");
        emit!(w, "  }}");
        emit!(w, "}}, [isLoading]);");
    }

    for handler in &model.handlers {
        emit!(w);
        w.for_node(&handler.node_id, |w| handler_fn(model, handler, w))?;
    }

    emit!(w);
    emit!(w, "return (");
    w.indent();
    emit!(w, "<div className=\"{}\">", ROOT_CLASS);
    w.indent();
    for widget in &model.widgets {
        w.for_node(&widget.node.id, |w| widget_jsx(widget, w))?;
    }
    w.dedent();
    emit!(w, "</div>");
    w.dedent();
    emit!(w, ");");

    w.dedent();
    emit!(w, "}}");
    Ok(())
}

fn handler_fn(model: &ComponentModel<'_>, handler: &Handler, w: &mut CodeWriter) -> CodegenResult<()> {
    let params: Vec<String> = handler
        .params
        .iter()
        .map(|p| {
            if model.typescript {
                format!("{}: {}", p.name, p.ts_type())
            } else {
                p.name.clone()
            }
        })
        .collect();

    emit!(w, "const {} = useCallback(({}) => {{", handler.name, params.join(", "));
    emit!(w, "  // Handler implementation");
    for target in &handler.targets {
        emit!(w, "  // -> {}", comment_text(target));
    }
    emit!(w, "}}, []);");
    Ok(())
}

/// JSX attribute; values a JSX string cannot carry go in an expression
fn attr(name: &str, value: &str) -> String {
    if value.contains(['"', '\n', '&']) {
        format!("{}={{{}}}", name, js_string(value))
    } else {
        format!("{}=\"{}\"", name, value)
    }
}

/// JSX child rendering either a bound state value or a string literal
fn text_child(widget: &WidgetView<'_>, port: &str, key: &str, default: &str) -> String {
    match widget.binding(port) {
        Some(binding) => format!("{{{}}}", binding.state),
        None => format!("{{{}}}", js_string(text_prop(widget.node, key, default))),
    }
}

fn widget_jsx(widget: &WidgetView<'_>, w: &mut CodeWriter) -> CodegenResult<()> {
    let node = widget.node;
    match widget.kind {
        UiWidget::Button => {
            emit!(w, "<Button");
            emit!(w, "  onClick={{{}}}", widget.event("click").unwrap_or("() => {}"));
            emit!(w, "  {}", attr("variant", text_prop(node, "variant", "default")));
            emit!(w, "  {}", attr("size", text_prop(node, "size", "medium")));
            emit!(w, "  className=\"mb-4\"");
            emit!(w, ">");
            emit!(w, "  {}", text_child(widget, "text", "text", "Button"));
            emit!(w, "</Button>");
        }
        UiWidget::Input => {
            emit!(w, "<Input");
            emit!(w, "  {}", attr("placeholder", text_prop(node, "placeholder", "Enter text...")));
            emit!(w, "  {}", attr("type", text_prop(node, "type", "text")));
            let binding = widget.binding("value");
            if let Some(binding) = binding {
                emit!(w, "  value={{{}}}", binding.state);
            }
            match (binding, widget.event("change")) {
                (Some(binding), Some(handler)) => emit!(
                    w,
                    "  onChange={{(e) => {{ {}(e.target.value); {}(e); }}}}",
                    binding.setter,
                    handler
                ),
                (Some(binding), None) => {
                    emit!(w, "  onChange={{(e) => {}(e.target.value)}}", binding.setter)
                }
                (None, Some(handler)) => emit!(w, "  onChange={{{}}}", handler),
                (None, None) => {}
            }
            emit!(w, "  className=\"mb-4\"");
            emit!(w, "/>");
        }
        UiWidget::Card => {
            emit!(w, "<Card className=\"mb-4\">");
            let title = text_prop(node, "title", "");
            if !title.is_empty() {
                emit!(w, "  <h3 className=\"card-title\">{{{}}}</h3>", js_string(title));
            }
            emit!(w, "  <div className=\"p-4\">");
            emit!(w, "    {}", text_child(widget, "content", "content", "Card content"));
            emit!(w, "  </div>");
            emit!(w, "</Card>");
        }
        UiWidget::Text => {
            emit!(w, "<p className=\"mb-4\">{}</p>", text_child(widget, "text", "text", ""));
        }
        UiWidget::Chart => {
            let data = widget
                .binding("data")
                .map_or("[]", |binding| binding.state.as_str());
            emit!(w, "<div className=\"mb-4\">");
            emit!(
                w,
                "  <ResponsiveContainer width=\"100%\" height={{{}}}>",
                number_prop(node, "height", 300.0)
            );
            emit!(w, "    <LineChart data={{{}}}>", data);
            emit!(w, "      <XAxis />");
            emit!(w, "      <YAxis />");
            emit!(w, "      <Tooltip />");
            emit!(
                w,
                "      <Line type=\"monotone\" {} />",
                attr("dataKey", text_prop(node, "dataKey", "value"))
            );
            emit!(w, "    </LineChart>");
            emit!(w, "  </ResponsiveContainer>");
            emit!(w, "</div>");
        }
        UiWidget::Map => {
            let center = match widget.binding("center") {
                Some(binding) => binding.state.clone(),
                None => format!(
                    "[{}, {}]",
                    number_prop(node, "latitude", 51.505),
                    number_prop(node, "longitude", -0.09)
                ),
            };
            let zoom = match widget.binding("zoom") {
                Some(binding) => binding.state.clone(),
                None => number_prop(node, "zoom", 13.0),
            };
            emit!(
                w,
                "<MapContainer center={{{}}} zoom={{{}}} className=\"mb-4\">",
                center,
                zoom
            );
            emit!(w, "  <TileLayer url=\"{}\" />", TILE_URL);
            emit!(w, "</MapContainer>");
        }
        UiWidget::Placeholder => {
            emit!(w, "<div className=\"mb-4\" {}>", attr("data-node-type", &node.node_type));
            emit!(
                w,
                "  {{/* Unsupported node type: {} ({}) */}}",
                comment_text(&node.node_type),
                comment_text(&node.label)
            );
            emit!(w, "</div>");
        }
    }
    Ok(())
}
