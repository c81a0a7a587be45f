//! Result View: renders a `RefinementResult` as three panels.

use crate::refinement::RefinementResult;
use crate::views::escape_html;

pub const CONCISE_SYSTEM_PROMPT_ID: &str = "concise-system-prompt";
pub const REFINED_USER_PROMPT_ID: &str = "refined-user-prompt";

/// Copy buttons write to the clipboard and report nothing back.
fn copy_button(target_id: &str) -> String {
    format!(
        r#"<button type="button" class="copy" onclick="copyText('{target_id}')">Copy</button>"#
    )
}

pub fn render_result(result: &RefinementResult) -> String {
    let inaccuracies: String = result
        .inaccuracies
        .iter()
        .map(|item| format!("      <li>{}</li>\n", escape_html(item)))
        .collect();

    format!(
        r#"<div class="result">
  <div class="panel system">
    <div class="panel-header"><h3>Refined System Instructions</h3>{copy_system}</div>
    <pre id="{CONCISE_SYSTEM_PROMPT_ID}">{system}</pre>
  </div>
  <div class="panel inaccuracies">
    <div class="panel-header"><h3>Inaccuracies &amp; Shortcomings</h3></div>
    <ul>
{inaccuracies}    </ul>
  </div>
  <div class="panel user">
    <div class="panel-header"><h3>Refined Problem Prompt</h3>{copy_user}</div>
    <pre id="{REFINED_USER_PROMPT_ID}">{user}</pre>
  </div>
</div>"#,
        copy_system = copy_button(CONCISE_SYSTEM_PROMPT_ID),
        system = escape_html(&result.concise_system_prompt),
        copy_user = copy_button(REFINED_USER_PROMPT_ID),
        user = escape_html(&result.refined_user_prompt),
    )
}
