// All LLM prompt constants for the Refinement module.

/// System instruction for prompt refinement. Can be replaced at startup with
/// `REFINE_INSTRUCTION_PATH`; the response schema cannot.
pub const REFINE_SYSTEM: &str = "\
You are an expert Prompt Engineer. Your goal is to:
1. Refine a \"System Prompt\" template to be more concise and clear.
2. Analyze a \"User Prompt\" for logical gaps, inaccuracies, and structural weaknesses.
3. Generate a \"Refined User Prompt\" that adheres to the new system template.

The User Prompt involves a specific programming problem.

Potential inaccuracies to look for:
- Input size.
- Termination condition.
- Memory constraints.
- Ambiguity.";

/// Request payload template. Both inputs go into a single user turn.
pub const REFINE_PROMPT_TEMPLATE: &str = "\
System Template to Refine:
{system_prompt}

User Task Prompt to Analyze:
{user_prompt}";

/// Fills the request template. Inputs are inserted verbatim.
pub fn build_refine_prompt(system_prompt: &str, user_prompt: &str) -> String {
    // Split on the first placeholder so that a system prompt containing the literal
    // "{user_prompt}" is not substituted a second time.
    let (head, tail) = REFINE_PROMPT_TEMPLATE
        .split_once("{system_prompt}")
        .unwrap_or((REFINE_PROMPT_TEMPLATE, ""));
    format!(
        "{head}{system_prompt}{}",
        tail.replace("{user_prompt}", user_prompt)
    )
}
