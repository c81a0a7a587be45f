//! Page: header with the refine trigger, two editors on the left, and the
//! error banner / placeholder / loading indicator / result on the right.

use uuid::Uuid;

use crate::session::PromptState;
use crate::views::editor::EditorView;
use crate::views::escape_html;
use crate::views::result::render_result;

/// Seconds between automatic reloads while a refinement is loading.
const LOADING_REFRESH_SECS: u32 = 2;

const STYLE: &str = "
body { margin: 0; font-family: system-ui, sans-serif; background: #f8fafc; color: #334155; }
header { display: flex; justify-content: space-between; align-items: center; padding: 0 2rem; height: 4rem; background: #fff; border-bottom: 1px solid #e2e8f0; }
h1 { font-size: 1.25rem; color: #4f46e5; }
main { display: grid; grid-template-columns: 1fr 1fr; gap: 2rem; padding: 2rem; max-width: 80rem; margin: 0 auto; }
textarea, pre { width: 100%; box-sizing: border-box; font-family: ui-monospace, monospace; font-size: 0.875rem; white-space: pre-wrap; }
.card, .panel { background: #fff; border: 1px solid #e2e8f0; border-radius: 1rem; padding: 1.5rem; margin-bottom: 1.5rem; }
.panel-header { display: flex; justify-content: space-between; align-items: center; }
.editor label { display: block; font-size: 0.75rem; font-weight: bold; text-transform: uppercase; color: #94a3b8; }
.error { background: #fef2f2; border: 1px solid #fee2e2; color: #dc2626; border-radius: 0.75rem; padding: 1rem; margin-bottom: 1rem; }
.placeholder, .loading { text-align: center; padding: 3rem; color: #94a3b8; }
button[disabled] { cursor: not-allowed; opacity: 0.6; }
";

const SCRIPT: &str = "function copyText(id) { navigator.clipboard.writeText(document.getElementById(id).textContent); }";

pub fn render_page(session_id: Uuid, state: &PromptState) -> String {
    let refresh = if state.loading {
        format!(r#"<meta http-equiv="refresh" content="{LOADING_REFRESH_SECS}">"#)
    } else {
        String::new()
    };

    let trigger = if state.loading {
        r#"<button type="submit" form="refine-form" disabled>Analyzing...</button>"#
    } else {
        r#"<button type="submit" form="refine-form">Optimize Prompt</button>"#
    };

    let system_editor = EditorView::new("system_prompt", "System Template", &state.system_prompt)
        .placeholder("Enter system instruction template...")
        .render();
    let user_editor = EditorView::new("user_prompt", "Input Prompt", &state.user_prompt)
        .placeholder("Enter user prompt for analysis...")
        .min_height("400px")
        .render();

    let mut output = String::new();
    if let Some(error) = &state.error {
        output.push_str(&format!(
            r#"<div class="error" role="alert"><p>{}</p></div>"#,
            escape_html(error)
        ));
    }
    if state.result.is_none() && !state.loading {
        output.push_str(
            r#"<div class="placeholder"><h3>Ready to Refine</h3><p>Paste your prompts and click Optimize to generate structural refinements and logical improvements.</p></div>"#,
        );
    }
    if state.loading {
        output.push_str(
            r#"<div class="loading"><p>Consulting Gemini 3 Pro Intelligence...</p></div>"#,
        );
    }
    if let Some(result) = &state.result {
        output.push_str(&render_result(result));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Prompt Architect</title>
{refresh}
<style>{STYLE}</style>
<script>{SCRIPT}</script>
</head>
<body>
<header>
  <h1>Prompt Architect</h1>
  {trigger}
</header>
<form id="refine-form" method="post" action="/sessions/{session_id}/refine"></form>
<main>
  <section>
    <div class="card"><h2>System Configuration</h2>
{system_editor}
    </div>
    <div class="card"><h2>User Task Prompt</h2>
{user_editor}
    </div>
  </section>
  <section>
{output}
  </section>
</main>
</body>
</html>"#
    )
}
