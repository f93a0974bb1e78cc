//! Stylesheet shared by every target

/// Root class applied to the generated component
pub const ROOT_CLASS: &str = "visual-app";

/// CSS emitted alongside every generated component
pub const APP_STYLES: &str = "/* Generated styles */
.visual-app {
  min-height: 100vh;
  padding: 2rem;
  background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
}

.visual-app > * + * {
  margin-top: 1rem;
}

.visual-app .mb-4 {
  margin-bottom: 1rem;
}

.visual-app .p-4 {
  padding: 1rem;
}

.visual-app .card-title {
  margin: 0 0 0.5rem;
  font-weight: 600;
}";

/// Header comment text placed at the top of generated files
pub fn banner(project_name: &str) -> String {
    format!(
        "Generated by visual-compiler from \"{}\". Do not edit.",
        super::naming::comment_text(project_name)
    )
}
