//! Vanilla JavaScript emitter
//!
//! Produces an ES module that keeps state in a plain object and rebuilds
//! the DOM on every change. Types, when requested, are JSDoc annotations.

use super::model::{ComponentModel, Handler, WidgetView};
use super::naming::{comment_text, js_single_quoted, js_string};
use super::styles::{banner, APP_STYLES, ROOT_CLASS};
use super::widgets::{number_prop, text_prop, UiWidget, TILE_URL};
use super::writer::{emit, CodeWriter};
use super::Emitter;
use crate::constants::packages;
use crate::error::CodegenResult;

const STYLE_ELEMENT_ID: &str = "visual-app-styles";
const MOUNT_ELEMENT_ID: &str = "app";

#[derive(Debug, Clone, Copy, Default)]
pub struct VanillaEmitter;

impl Emitter for VanillaEmitter {
    fn emit(&self, model: &ComponentModel<'_>, w: &mut CodeWriter) -> CodegenResult<()> {
        emit!(w, "// {}", banner(&model.project.name));
        imports(model, w)?;
        if model.typescript {
            emit!(w);
            typedefs(model, w)?;
        }

        emit!(w);
        emit!(w, "const styles = `");
        for line in APP_STYLES.lines() {
            w.raw(line)?;
        }
        emit!(w, "`;");

        emit!(w);
        state(model, w)?;
        emit!(w, "let root = null;");
        if model.uses(UiWidget::Chart) {
            emit!(w, "const charts = [];");
        }
        if model.uses(UiWidget::Map) {
            emit!(w, "const maps = [];");
        }

        for field in &model.state {
            emit!(w);
            w.for_node(&field.node_id, |w| {
                if model.typescript {
                    emit!(w, "/** @param {{{}}} value */", field.ts_type());
                }
                emit!(w, "export function {}(value) {{", field.setter);
                emit!(w, "  state.{} = value;", field.name);
                emit!(w, "  render();");
                emit!(w, "}}");
                Ok(())
            })?;
        }

        for handler in &model.handlers {
            emit!(w);
            w.for_node(&handler.node_id, |w| handler_fn(model, handler, w))?;
        }

        features(model, w)?;

        emit!(w);
        emit!(w, "function init() {{");
        emit!(w, "  // Component initialization");
        emit!(w, "}}");

        emit!(w);
        emit!(w, "function injectStyles() {{");
        emit!(w, "  if (document.getElementById('{}')) {{", STYLE_ELEMENT_ID);
        emit!(w, "    return;");
        emit!(w, "  }}");
        emit!(w, "  const style = document.createElement('style');");
        emit!(w, "  style.id = '{}';", STYLE_ELEMENT_ID);
        emit!(w, "  style.textContent = styles;");
        emit!(w, "  document.head.appendChild(style);");
        emit!(w, "}}");

        emit!(w);
        render(model, w)?;

        emit!(w);
        emit!(w, "export function mount(target) {{");
        emit!(w, "  root = target;");
        emit!(w, "  injectStyles();");
        emit!(w, "  init();");
        emit!(w, "  render();");
        emit!(w, "  return state;");
        emit!(w, "}}");
        emit!(w);
        emit!(w, "export default mount;");
        emit!(w);
        emit!(w, "(function bootstrap() {{");
        emit!(w, "  const target = document.getElementById('{}');", MOUNT_ELEMENT_ID);
        emit!(w, "  if (target) {{");
        emit!(w, "    mount(target);");
        emit!(w, "  }}");
        emit!(w, "}})();");
        Ok(())
    }
}

fn imports(model: &ComponentModel<'_>, w: &mut CodeWriter) -> CodegenResult<()> {
    let mut lines: Vec<String> = Vec::new();
    if model.uses(UiWidget::Chart) {
        lines.push(format!("import Chart from '{}/auto';", packages::CHART_JS));
    }
    if model.uses(UiWidget::Map) {
        lines.push(format!("import L from '{}';", packages::LEAFLET));
    }
    if model.emotion {
        lines.push(format!(
            "import {{ detectEmotion }} from '{}';",
            packages::EMOTION_PLATFORM
        ));
    }
    if model.ai {
        lines.push(format!(
            "import {{ generateResponse }} from '{}';",
            packages::AI_SERVICE
        ));
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

fn typedefs(model: &ComponentModel<'_>, w: &mut CodeWriter) -> CodegenResult<()> {
    if model.uses_ts_type("Callback") {
        emit!(w, "/** @typedef {{(...args: unknown[]) => void}} Callback */");
    }
    if model.uses_ts_type("Payload") {
        emit!(w, "/** @typedef {{Record<string, unknown>}} Payload */");
    }
    if model.uses_ts_type("EmotionSignal") {
        emit!(w, "/** @typedef {{{{ emotion: string, confidence: number }}}} EmotionSignal */");
    }
    if model.uses_ts_type("AIResponse") {
        emit!(w, "/** @typedef {{{{ text: string }}}} AIResponse */");
    }
    if !model.state.is_empty() {
        emit!(w, "/**");
        emit!(w, " * @typedef {{Object}} AppState");
        for field in &model.state {
            emit!(w, " * @property {{{}}} {}", field.ts_type(), field.name);
        }
        emit!(w, " */");
    }
    Ok(())
}

fn state(model: &ComponentModel<'_>, w: &mut CodeWriter) -> CodegenResult<()> {
    if model.typescript && !model.state.is_empty() {
        emit!(w, "/** @type {{AppState}} */");
    }
    if model.state.is_empty() {
        emit!(w, "export const state = {{}};");
        return Ok(());
    }
    emit!(w, "export const state = {{");
    for field in &model.state {
        w.for_node(&field.node_id, |w| {
            emit!(
                w,
                "  {}: {},",
                field.name,
                serde_json::to_string(&field.default)?
            );
            Ok(())
        })?;
    }
    emit!(w, "}};");
    Ok(())
}

fn handler_fn(model: &ComponentModel<'_>, handler: &Handler, w: &mut CodeWriter) -> CodegenResult<()> {
    if model.typescript {
        emit!(w, "/**");
        for param in &handler.params {
            emit!(w, " * @param {{{}}} {}", param.ts_type(), param.name);
        }
        emit!(w, " */");
    }
    let params: Vec<&str> = handler.params.iter().map(|p| p.name.as_str()).collect();
    emit!(w, "export function {}({}) {{", handler.name, params.join(", "));
    emit!(w, "  // Handler implementation");
    for target in &handler.targets {
        emit!(w, "  // -> {}", comment_text(target));
    }
    emit!(w, "}}");
    Ok(())
}

fn features(model: &ComponentModel<'_>, w: &mut CodeWriter) -> CodegenResult<()> {
    if model.emotion {
        emit!(w);
        emit!(w, "export async function runEmotionDetection(input) {{");
        emit!(w, "  const emotion = await detectEmotion(input);");
        emit!(w, "  if (emotion) {{");
        emit!(w, "    // Handle emotion changes");
        emit!(w, "  }}");
        emit!(w, "  return emotion;");
        emit!(w, "}}");
    }
    if model.ai {
        emit!(w);
        emit!(w, "export async function runAI(prompt) {{");
        emit!(w, "  const response = await generateResponse(prompt);");
        emit!(w, "  // AI response settled");
        emit!(w, "  return response;");
        emit!(w, "}}");
    }
    Ok(())
}

fn render(model: &ComponentModel<'_>, w: &mut CodeWriter) -> CodegenResult<()> {
    let restores_focus = model.uses(UiWidget::Input);

    emit!(w, "function render() {{");
    w.indent();
    emit!(w, "if (!root) {{");
    emit!(w, "  return;");
    emit!(w, "}}");
    if restores_focus {
        emit!(w, "const focused = document.activeElement && document.activeElement.dataset");
        emit!(w, "  ? document.activeElement.dataset.nodeId");
        emit!(w, "  : undefined;");
    }
    if model.uses(UiWidget::Chart) {
        emit!(w, "charts.splice(0).forEach((chart) => chart.destroy());");
    }
    if model.uses(UiWidget::Map) {
        emit!(w, "maps.splice(0).forEach((map) => map.remove());");
    }
    emit!(w, "root.replaceChildren();");
    emit!(w, "root.classList.add('{}');", ROOT_CLASS);

    for widget in &model.widgets {
        w.for_node(&widget.node.id, |w| widget_dom(widget, w))?;
    }

    if restores_focus {
        emit!(w, "if (focused) {{");
        emit!(
            w,
            "  const next = root.querySelector(`[data-node-id=\"${{focused}}\"]`);"
        );
        emit!(w, "  if (next) {{");
        emit!(w, "    next.focus();");
        emit!(w, "  }}");
        emit!(w, "}}");
    }
    w.dedent();
    emit!(w, "}}");
    Ok(())
}

/// JavaScript expression for a bound state value or string literal
fn text_expr(widget: &WidgetView<'_>, port: &str, key: &str, default: &str) -> String {
    match widget.binding(port) {
        Some(binding) => format!("String(state.{})", binding.state),
        None => js_string(text_prop(widget.node, key, default)),
    }
}

fn widget_dom(widget: &WidgetView<'_>, w: &mut CodeWriter) -> CodegenResult<()> {
    let node = widget.node;
    emit!(w, "{{");
    w.indent();
    match widget.kind {
        UiWidget::Button => {
            let class = format!(
                "button button-{} button-{} mb-4",
                text_prop(node, "variant", "default"),
                text_prop(node, "size", "medium")
            );
            emit!(w, "const el = document.createElement('button');");
            emit!(w, "el.className = {};", js_string(&class));
            emit!(w, "el.textContent = {};", text_expr(widget, "text", "text", "Button"));
            if let Some(handler) = widget.event("click") {
                emit!(w, "el.addEventListener('click', {});", handler);
            }
        }
        UiWidget::Input => {
            emit!(w, "const el = document.createElement('input');");
            emit!(w, "el.className = 'input mb-4';");
            emit!(w, "el.type = {};", js_string(text_prop(node, "type", "text")));
            emit!(
                w,
                "el.placeholder = {};",
                js_string(text_prop(node, "placeholder", "Enter text..."))
            );
            emit!(w, "el.dataset.nodeId = {};", js_single_quoted(&node.id));
            if let Some(binding) = widget.binding("value") {
                emit!(w, "el.value = state.{};", binding.state);
                emit!(
                    w,
                    "el.addEventListener('input', (e) => {}(e.target.value));",
                    binding.setter
                );
            }
            if let Some(handler) = widget.event("change") {
                emit!(w, "el.addEventListener('input', {});", handler);
            }
        }
        UiWidget::Card => {
            emit!(w, "const el = document.createElement('div');");
            emit!(w, "el.className = 'card mb-4';");
            let title = text_prop(node, "title", "");
            if !title.is_empty() {
                emit!(w, "const title = document.createElement('h3');");
                emit!(w, "title.className = 'card-title';");
                emit!(w, "title.textContent = {};", js_string(title));
                emit!(w, "el.appendChild(title);");
            }
            emit!(w, "const body = document.createElement('div');");
            emit!(w, "body.className = 'p-4';");
            emit!(
                w,
                "body.textContent = {};",
                text_expr(widget, "content", "content", "Card content")
            );
            emit!(w, "el.appendChild(body);");
        }
        UiWidget::Text => {
            emit!(w, "const el = document.createElement('p');");
            emit!(w, "el.className = 'mb-4';");
            emit!(w, "el.textContent = {};", text_expr(widget, "text", "text", ""));
        }
        UiWidget::Chart => {
            let rows = widget
                .binding("data")
                .map_or_else(|| "[]".to_string(), |b| format!("state.{}", b.state));
            let key = js_string(text_prop(node, "dataKey", "value"));
            emit!(w, "const el = document.createElement('div');");
            emit!(w, "el.className = 'mb-4';");
            emit!(w, "el.style.height = '{}px';", number_prop(node, "height", 300.0));
            emit!(w, "const canvas = document.createElement('canvas');");
            emit!(w, "el.appendChild(canvas);");
            emit!(w, "root.appendChild(el);");
            emit!(w, "const rows = {};", rows);
            emit!(w, "charts.push(new Chart(canvas, {{");
            emit!(w, "  type: 'line',");
            emit!(w, "  data: {{");
            emit!(w, "    labels: rows.map((_, i) => String(i + 1)),");
            emit!(w, "    datasets: [{{ label: {}, data: rows.map((row) => row[{}]) }}],", key, key);
            emit!(w, "  }},");
            emit!(w, "  options: {{ responsive: true, maintainAspectRatio: false }},");
            emit!(w, "}}));");
        }
        UiWidget::Map => {
            let center = match widget.binding("center") {
                Some(binding) => format!("state.{}", binding.state),
                None => format!(
                    "[{}, {}]",
                    number_prop(node, "latitude", 51.505),
                    number_prop(node, "longitude", -0.09)
                ),
            };
            let zoom = match widget.binding("zoom") {
                Some(binding) => format!("state.{}", binding.state),
                None => number_prop(node, "zoom", 13.0),
            };
            emit!(w, "const el = document.createElement('div');");
            emit!(w, "el.className = 'mb-4';");
            emit!(w, "el.style.height = '300px';");
            emit!(w, "root.appendChild(el);");
            emit!(w, "const map = L.map(el).setView({}, {});", center, zoom);
            emit!(w, "L.tileLayer('{}').addTo(map);", TILE_URL);
            emit!(w, "maps.push(map);");
        }
        UiWidget::Placeholder => {
            let note = format!(
                " Unsupported node type: {} ({}) ",
                node.node_type, node.label
            );
            emit!(w, "const el = document.createElement('div');");
            emit!(w, "el.className = 'mb-4';");
            emit!(w, "el.dataset.nodeType = {};", js_string(&node.node_type));
            emit!(
                w,
                "el.appendChild(document.createComment({}));",
                js_string(&note.replace("--", "- -"))
            );
        }
    }
    // charts and maps attach themselves before their library initialises
    if !matches!(widget.kind, UiWidget::Chart | UiWidget::Map) {
        emit!(w, "root.appendChild(el);");
    }
    w.dedent();
    emit!(w, "}}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::generate;
    use crate::options::{CompileOptions, TargetFramework};
    use serde_json::json;
    use visual_graph::{NodeRegistry, ProjectBuilder};

    fn vanilla() -> CompileOptions {
        CompileOptions::default().with_framework(TargetFramework::Vanilla)
    }

    #[test]
    fn test_module_shape() {
        let registry = NodeRegistry::with_builtins();
        let project = ProjectBuilder::new("Counter")
            .emotion_enabled(false)
            .ai_enabled(false)
            .add_node("count", registry.get("state").unwrap(), (0.0, 0.0))
            .with_property("state_value", json!(0))
            .add_node("label", registry.get("text").unwrap(), (0.0, 100.0))
            .add_edge("count", "value", "label", "text")
            .build();

        let code = generate(&project, &registry, &vanilla()).unwrap().code;
        assert!(code.contains("export const state = {\n  value: 0,\n};"));
        assert!(code.contains("export function setValue(value) {\n  state.value = value;\n  render();\n}"));
        assert!(code.contains("el.textContent = String(state.value);"));
        assert!(code.contains("style.textContent = styles;"));
        assert!(code.contains("export function mount(target) {"));
        assert!(code.contains("(function bootstrap() {"));
        assert!(!code.contains("import "));
        assert!(!code.contains("React"));
    }

    #[test]
    fn test_jsdoc_when_typed() {
        let registry = NodeRegistry::with_builtins();
        let project = ProjectBuilder::new("Typed")
            .add_node("count", registry.get("state").unwrap(), (0.0, 0.0))
            .with_property("state_value", json!(0))
            .add_node("h", registry.get("event-handler").unwrap(), (0.0, 100.0))
            .add_edge("count", "value", "h", "payload")
            .build();

        let options = vanilla().with_typescript(true);
        let code = generate(&project, &registry, &options).unwrap().code;
        assert!(code.contains(" * @typedef {Object} AppState"));
        assert!(code.contains(" * @property {number} value"));
        assert!(code.contains("/** @type {AppState} */"));
        assert!(code.contains(" * @param {string} value"));
        assert!(!code.contains("interface "));
    }

    #[test]
    fn test_library_imports_and_features() {
        let registry = NodeRegistry::with_builtins();
        let project = ProjectBuilder::new("Board")
            .add_node("c", registry.get("chart").unwrap(), (0.0, 0.0))
            .add_node("m", registry.get("map").unwrap(), (0.0, 100.0))
            .add_node("emo", registry.get("emotion-detector").unwrap(), (0.0, 200.0))
            .build();

        let code = generate(&project, &registry, &vanilla()).unwrap().code;
        assert!(code.contains("import Chart from 'chart.js/auto';"));
        assert!(code.contains("import L from 'leaflet';"));
        assert_eq!(code.matches("import { detectEmotion }").count(), 1);
        assert!(code.contains("export async function runEmotionDetection(input) {"));
        assert!(code.contains("charts.splice(0).forEach((chart) => chart.destroy());"));
        assert!(code.contains("const map = L.map(el).setView([51.505, -0.09], 13);"));
    }
}
