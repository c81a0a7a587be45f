//! Editor View: a labelled textarea bound to one input of the session.

use crate::views::escape_html;

pub const DEFAULT_MIN_HEIGHT: &str = "200px";

#[derive(Debug, Clone)]
pub struct EditorView<'a> {
    /// Form field name the value is submitted under.
    pub name: &'a str,
    pub label: &'a str,
    pub value: &'a str,
    pub placeholder: Option<&'a str>,
    pub min_height: &'a str,
}

impl<'a> EditorView<'a> {
    pub fn new(name: &'a str, label: &'a str, value: &'a str) -> Self {
        Self {
            name,
            label,
            value,
            placeholder: None,
            min_height: DEFAULT_MIN_HEIGHT,
        }
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn min_height(mut self, min_height: &'a str) -> Self {
        self.min_height = min_height;
        self
    }

    pub fn render(&self) -> String {
        let placeholder = self
            .placeholder
            .map(|p| format!(r#" placeholder="{}""#, escape_html(p)))
            .unwrap_or_default();
        format!(
            r#"<div class="editor">
  <label for="{name}">{label}</label>
  <textarea id="{name}" name="{name}" form="refine-form" style="min-height: {min_height}"{placeholder}>
{value}</textarea>
</div>"#,
            name = escape_html(self.name),
            label = escape_html(self.label),
            min_height = escape_html(self.min_height),
            value = escape_html(self.value),
        )
    }
}
