//! PromptState: the inputs, loading flag, error slot and last result of one session.
//!
//! Transitions:
//!   Idle/Success/Failed --begin_refine--> Loading
//!   Loading --complete--> Success
//!   Loading --fail--> Failed
//!   Loading --abandon_refine--> previous Idle/Success/Failed view, loading cleared
//! Input edits are allowed in every state and touch nothing else.

use serde::Serialize;

use crate::refinement::RefinementResult;

/// Shown when a failure carries no message of its own.
pub const UNKNOWN_ERROR: &str = "An unknown error occurred";

pub const INITIAL_SYSTEM_PROMPT: &str = "<system>
1. Combine all parts of the problem discussion into a single text

2. Add headings of different levels in MarkDown (MD) format
2.1 Make a top-level heading (# Your Topic) that describes the main topic of the prompt
2.2 The first subheading (## Problem Legend) indicates a free-form description of the problem (problem context)
2.3 This can be followed by subheadings (and sub-subheadings, etc.) that indicate the main free-form subtasks that need to be solved.
3. In the following sections (## Task 1 , ## Task 2, ...) you formulate specific tasks (in this case, specific software tasks) to be solved.
4. In the next subsection (## Requirements) and its subsections, you state the requirements and instructions (e.g., programming language, how information is entered into the program and how it is output, whether to comment each line of code, etc.), restrictions (e.g., how to write the code - each command on a separate line or not, maximum number of lines, restrictions on the use of data structures and program constructs, maximum input size, input data types, etc.) and examples of input data and corresponding program results.

5. Translate the prepared structured prompt into English (e.g., using an online translator), correct possible translation errors
</system>";

pub const INITIAL_USER_PROMPT: &str = "<prompt>
# Prompt concise name

## Problem Legend


## Subproblem 1

## Subproblem 2

## ...

## Task 1.
Write the simplest program with console input and output that solves the problem



## Requirements
### Requirement 1
Build  programs (AI can be used) on  hosting
### Requirement 2
Use only ... but ...

### Input-output examples
... (various examples) ...
</prompt>";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptState {
    pub system_prompt: String,
    pub user_prompt: String,
    pub loading: bool,
    pub error: Option<String>,
    pub result: Option<RefinementResult>,
}

impl Default for PromptState {
    fn default() -> Self {
        Self {
            system_prompt: INITIAL_SYSTEM_PROMPT.to_string(),
            user_prompt: INITIAL_USER_PROMPT.to_string(),
            loading: false,
            error: None,
            result: None,
        }
    }
}

impl PromptState {
    pub fn set_system_prompt(&mut self, text: String) {
        self.system_prompt = text;
    }

    pub fn set_user_prompt(&mut self, text: String) {
        self.user_prompt = text;
    }

    /// Enters Loading and clears the previous error. Not guarded: calling this
    /// while already loading is allowed; callers decide whether to permit it.
    pub fn begin_refine(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn complete(&mut self, result: RefinementResult) {
        self.result = Some(result);
        self.error = None;
        self.loading = false;
    }

    /// Leaves Loading without a result or an error. Used when the session is
    /// closed with a call still in flight.
    pub fn abandon_refine(&mut self) {
        self.loading = false;
    }

    /// Records a failure. The previous result, if any, is kept.
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.error = Some(if message.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        });
        self.loading = false;
    }
}
