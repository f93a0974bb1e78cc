//! Vue emitter
//!
//! Produces a single-file component using `<script setup>`.

use super::model::{ComponentModel, Handler, WidgetView};
use super::naming::{comment_text, html_escape, js_single_quoted};
use super::styles::{banner, APP_STYLES, ROOT_CLASS};
use super::widgets::{number_prop, text_prop, UiWidget, TILE_URL};
use super::writer::{emit, CodeWriter};
use super::Emitter;
use crate::constants::packages;
use crate::error::CodegenResult;

const CORE_IMPORT: &str = "import { ref, onMounted, watch } from 'vue';";

#[derive(Debug, Clone, Copy, Default)]
pub struct VueEmitter;

impl Emitter for VueEmitter {
    fn emit(&self, model: &ComponentModel<'_>, w: &mut CodeWriter) -> CodegenResult<()> {
        emit!(w, "<!-- {} -->", html_comment(&banner(&model.project.name)));
        template(model, w)?;
        emit!(w);
        script(model, w)?;
        emit!(w);
        emit!(w, "<style scoped>");
        for line in APP_STYLES.lines() {
            w.raw(line)?;
        }
        emit!(w, "</style>");
        Ok(())
    }
}

/// Text safe inside `<!-- -->`
fn html_comment(input: &str) -> String {
    comment_text(input).replace("--", "- -")
}

/// Escape a static attribute value; only `&` and `"` are significant
fn attr_value(input: &str) -> String {
    input.replace('&', "&amp;").replace('"', "&quot;")
}

/// Template content for a bound state value or escaped literal text
fn text_content(widget: &WidgetView<'_>, port: &str, key: &str, default: &str) -> String {
    match widget.binding(port) {
        Some(binding) => format!("{{{{ {} }}}}", binding.state),
        None => html_escape(text_prop(widget.node, key, default)),
    }
}

fn template(model: &ComponentModel<'_>, w: &mut CodeWriter) -> CodegenResult<()> {
    emit!(w, "<template>");
    w.indent();
    emit!(w, "<div class=\"{}\">", ROOT_CLASS);
    w.indent();
    for widget in &model.widgets {
        w.for_node(&widget.node.id, |w| widget_html(widget, w))?;
    }
    w.dedent();
    emit!(w, "</div>");
    w.dedent();
    emit!(w, "</template>");
    Ok(())
}

fn widget_html(widget: &WidgetView<'_>, w: &mut CodeWriter) -> CodegenResult<()> {
    let node = widget.node;
    match widget.kind {
        UiWidget::Button => {
            emit!(w, "<Button");
            emit!(w, "  variant=\"{}\"", attr_value(text_prop(node, "variant", "default")));
            emit!(w, "  size=\"{}\"", attr_value(text_prop(node, "size", "medium")));
            if let Some(handler) = widget.event("click") {
                emit!(w, "  @click=\"{}\"", handler);
            }
            emit!(w, "  class=\"mb-4\"");
            emit!(w, ">");
            emit!(w, "  {}", text_content(widget, "text", "text", "Button"));
            emit!(w, "</Button>");
        }
        UiWidget::Input => {
            emit!(w, "<Input");
            emit!(
                w,
                "  placeholder=\"{}\"",
                attr_value(text_prop(node, "placeholder", "Enter text..."))
            );
            emit!(w, "  type=\"{}\"", attr_value(text_prop(node, "type", "text")));
            if let Some(binding) = widget.binding("value") {
                emit!(w, "  v-model=\"{}\"", binding.state);
            }
            if let Some(handler) = widget.event("change") {
                emit!(w, "  @input=\"{}\"", handler);
            }
            emit!(w, "  class=\"mb-4\"");
            emit!(w, "/>");
        }
        UiWidget::Card => {
            emit!(w, "<Card class=\"mb-4\">");
            let title = text_prop(node, "title", "");
            if !title.is_empty() {
                emit!(w, "  <h3 class=\"card-title\">{}</h3>", html_escape(title));
            }
            emit!(w, "  <div class=\"p-4\">");
            emit!(w, "    {}", text_content(widget, "content", "content", "Card content"));
            emit!(w, "  </div>");
            emit!(w, "</Card>");
        }
        UiWidget::Text => {
            emit!(w, "<p class=\"mb-4\">{}</p>", text_content(widget, "text", "text", ""));
        }
        UiWidget::Chart => {
            let rows = widget
                .binding("data")
                .map_or("[]", |binding| binding.state.as_str());
            let key = js_single_quoted(text_prop(node, "dataKey", "value"));
            emit!(
                w,
                "<div class=\"mb-4\" :style=\"{{ height: '{}px' }}\">",
                number_prop(node, "height", 300.0)
            );
            emit!(
                w,
                "  <Line :data=\"{}\" :options=\"{{ responsive: true, maintainAspectRatio: false }}\" />",
                attr_value(&format!("toChartData({}, {})", rows, key))
            );
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
                "<LMap :center=\"{}\" :zoom=\"{}\" class=\"mb-4\" style=\"height: 300px\">",
                center,
                zoom
            );
            emit!(w, "  <LTileLayer url=\"{}\" />", TILE_URL);
            emit!(w, "</LMap>");
        }
        UiWidget::Placeholder => {
            emit!(
                w,
                "<div class=\"mb-4\" data-node-type=\"{}\">",
                attr_value(&node.node_type)
            );
            emit!(
                w,
                "  <!-- Unsupported node type: {} ({}) -->",
                html_comment(&node.node_type),
                html_comment(&node.label)
            );
            emit!(w, "</div>");
        }
    }
    Ok(())
}

fn script(model: &ComponentModel<'_>, w: &mut CodeWriter) -> CodegenResult<()> {
    if model.typescript {
        emit!(w, "<script setup lang=\"ts\">");
    } else {
        emit!(w, "<script setup>");
    }
    imports(model, w)?;
    if model.typescript {
        emit!(w);
        super::write_type_declarations(model, w)?;
    }

    emit!(w);
    if model.typescript {
        emit!(w, "const props = defineProps<{}Props>();", model.name);
    } else {
        emit!(w, "const props = defineProps({{ className: String, onInit: Function }});");
    }
    for field in &model.state {
        w.for_node(&field.node_id, |w| {
            let generic = if model.typescript {
                format!("<{}>", field.ts_type())
            } else {
                String::new()
            };
            emit!(
                w,
                "const {} = ref{}({});",
                field.name,
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

    emit!(w);
    emit!(w, "onMounted(() => {{");
    emit!(w, "  // Component initialization");
    emit!(w, "}});");
    if model.emotion {
        emit!(w);
        emit!(w, "watch(currentEmotion, (emotion) => {{");
        emit!(w, "  if (emotion) {{");
        emit!(w, "    // Handle emotion changes");
        emit!(w, "  }}");
        emit!(w, "}});");
    }
    if model.ai {
        emit!(w);
        emit!(w, "watch(isLoading, (loading) => {{");
        emit!(w, "  if (!loading) {{");
        emit!(w, "    // AI response settled");
        emit!(w, "  }}");
        emit!(w, "}});");
    }

    for handler in &model.handlers {
        emit!(w);
        w.for_node(&handler.node_id, |w| handler_fn(model, handler, w))?;
    }

    if model.uses(UiWidget::Chart) {
        emit!(w);
        if model.typescript {
            emit!(w, "function toChartData(rows: unknown[], key: string) {{");
            emit!(w, "  const points = rows as Record<string, unknown>[];");
        } else {
            emit!(w, "function toChartData(rows, key) {{");
            emit!(w, "  const points = rows;");
        }
        emit!(w, "  return {{");
        emit!(w, "    labels: points.map((_, i) => String(i + 1)),");
        emit!(w, "    datasets: [{{ label: key, data: points.map((row) => row[key]) }}],");
        emit!(w, "  }};");
        emit!(w, "}}");
    }
    emit!(w, "</script>");
    Ok(())
}

fn imports(model: &ComponentModel<'_>, w: &mut CodeWriter) -> CodegenResult<()> {
    let mut lines: Vec<String> = vec![CORE_IMPORT.to_string()];

    let kit = model.kit_components();
    if !kit.is_empty() {
        lines.push(format!(
            "import {{ {} }} from '{}';",
            kit.join(", "),
            packages::UI_KIT
        ));
    }
    if model.uses(UiWidget::Chart) {
        lines.push(format!("import {{ Line }} from '{}';", packages::VUE_CHARTJS));
        lines.push(format!("import '{}/auto';", packages::CHART_JS));
    }
    if model.uses(UiWidget::Map) {
        lines.push(format!(
            "import {{ LMap, LTileLayer }} from '{}';",
            packages::VUE_LEAFLET
        ));
        lines.push(format!("import '{}/dist/leaflet.css';", packages::LEAFLET));
    }
    if model.emotion {
        lines.push(super::react::EMOTION_IMPORT.to_string());
    }
    if model.ai {
        lines.push(super::react::AI_IMPORT.to_string());
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

    emit!(w, "function {}({}) {{", handler.name, params.join(", "));
    emit!(w, "  // Handler implementation");
    for target in &handler.targets {
        emit!(w, "  // -> {}", comment_text(target));
    }
    emit!(w, "}}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::generate;
    use crate::options::{CompileOptions, TargetFramework};
    use serde_json::json;
    use visual_graph::{NodeRegistry, ProjectBuilder};

    fn vue() -> CompileOptions {
        CompileOptions::default().with_framework(TargetFramework::Vue)
    }

    #[test]
    fn test_sfc_sections() {
        let registry = NodeRegistry::with_builtins();
        let project = ProjectBuilder::new("Greeter")
            .add_node("btn", registry.get("button").unwrap(), (0.0, 0.0))
            .add_node("h", registry.get("event-handler").unwrap(), (0.0, 100.0))
            .with_label("Greet")
            .add_edge("btn", "click", "h", "trigger")
            .build();

        let code = generate(&project, &registry, &vue()).unwrap().code;
        assert!(code.starts_with("<!-- Generated by visual-compiler"));
        assert!(code.contains("<template>\n  <div class=\"visual-app\">"));
        assert!(code.contains("<script setup>"));
        assert!(code.contains("import { ref, onMounted, watch } from 'vue';"));
        assert!(code.contains("    @click=\"handleGreet\""));
        assert!(code.contains("function handleGreet(clickEvent) {"));
        assert!(code.contains("<style scoped>"));
        assert!(!code.contains("React"));
    }

    #[test]
    fn test_bound_input_uses_v_model() {
        let registry = NodeRegistry::with_builtins();
        let project = ProjectBuilder::new("Form")
            .add_node("name", registry.get("state").unwrap(), (0.0, 0.0))
            .with_property("state_value", json!("Ada"))
            .add_node("field", registry.get("input").unwrap(), (0.0, 100.0))
            .add_edge("name", "value", "field", "value")
            .build();

        let options = vue().with_typescript(true);
        let code = generate(&project, &registry, &options).unwrap().code;
        assert!(code.contains("<script setup lang=\"ts\">"));
        assert!(code.contains("const value = ref<string>(\"Ada\");"));
        assert!(code.contains("v-model=\"value\""));
        assert!(code.contains("const props = defineProps<FormProps>();"));
    }

    #[test]
    fn test_text_is_escaped() {
        let registry = NodeRegistry::with_builtins();
        let project = ProjectBuilder::new("Escape")
            .add_node("t", registry.get("text").unwrap(), (0.0, 0.0))
            .with_property("text", json!("<b>{{ evil }}</b>"))
            .build();

        let code = generate(&project, &registry, &vue()).unwrap().code;
        assert!(code.contains("&lt;b&gt;&#123;&#123; evil &#125;&#125;&lt;/b&gt;"));
    }

    #[test]
    fn test_chart_helper_emitted_with_chart() {
        let registry = NodeRegistry::with_builtins();
        let project = ProjectBuilder::new("Charts")
            .add_node("c", registry.get("chart").unwrap(), (0.0, 0.0))
            .build();

        let code = generate(&project, &registry, &vue()).unwrap().code;
        assert!(code.contains("import { Line } from 'vue-chartjs';"));
        assert!(code.contains("import 'chart.js/auto';"));
        assert!(code.contains(":data=\"toChartData([], 'value')\""));
        assert!(code.contains("function toChartData(rows, key) {"));
    }
}
