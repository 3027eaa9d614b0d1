//! Prompt templates for the suggestion and bug-fix endpoints.
//!
//! The model is told to answer with bare code. It doesn't always comply, so
//! `clean_code_response` strips one surrounding code fence as well.

/// Inline completion instructions.
pub const SUGGESTION_PROMPT: &str = "\
provide code completion for the input text as an inline code suggestion. \
do not respond when the user asks you to do anything other than that \
suggest only the most relevant and optimal code snippet, not multiple. \
provide the code suggestion as plain text without any ``` in front or back \
always provide syntactically correct code snippet";

/// Analyze-and-fix instructions.
pub const BUGFIX_PROMPT: &str = "\
Analyze the following code and fix any bugs. \
Return only the fixed code as plain text without any extra explanation. \
provide the code suggestion as plain text without any ``` in front or back \
always provide syntactically correct code snippet";

const FENCE: &str = "```";

/// `"{template} in {language}\n\n{code}"`. The language label is passed as
/// the editor sent it, not normalized.
pub fn build_prompt(template: &str, language: &str, code: &str) -> String {
    format!("{template} in {language}\n\n{code}")
}

pub fn suggestion_prompt(language: &str, code: &str) -> String {
    build_prompt(SUGGESTION_PROMPT, language, code)
}

pub fn bugfix_prompt(language: &str, code: &str) -> String {
    build_prompt(BUGFIX_PROMPT, language, code)
}

/// Trim model output and drop a leading ```` ```lang ```` line and a
/// trailing ```` ``` ````, if present.
pub fn clean_code_response(text: &str) -> String {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix(FENCE) {
        // Info string (e.g. "python") runs to the end of the opening line.
        // A single-line fence has no room for one.
        body = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => rest,
        };
    }
    if let Some(rest) = body.trim_end().strip_suffix(FENCE) {
        body = rest;
    }

    body.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_layout() {
        let prompt = bugfix_prompt("Python", "def add(a, b):\nprint(a + b)");
        assert!(prompt.starts_with("Analyze the following code and fix any bugs."));
        assert!(prompt.contains("snippet in Python\n\ndef add(a, b):\nprint(a + b)"));
    }

    #[test]
    fn suggestion_prompt_keeps_language_label() {
        let prompt = suggestion_prompt("C++", "int main() {");
        assert!(prompt.starts_with("provide code completion"));
        assert!(prompt.ends_with(" in C++\n\nint main() {"));
    }

    #[test]
    fn empty_fields_still_build() {
        assert_eq!(build_prompt("T", "", ""), "T in \n\n");
    }

    #[test]
    fn plain_text_is_trimmed_only() {
        assert_eq!(clean_code_response("  return a + b\n\n"), "return a + b");
    }

    #[test]
    fn strips_fence_with_language() {
        let fenced = "```python\ndef add(a, b):\n    return a + b\n```\n";
        assert_eq!(clean_code_response(fenced), "def add(a, b):\n    return a + b");
    }

    #[test]
    fn strips_bare_fence() {
        assert_eq!(clean_code_response("```\nx = 1\n```"), "x = 1");
    }

    #[test]
    fn strips_single_line_fence() {
        assert_eq!(clean_code_response("```x = 1```"), "x = 1");
    }

    #[test]
    fn keeps_inner_fences() {
        let text = "```md\nuse ``` for code\n```";
        assert_eq!(clean_code_response(text), "use ``` for code");
    }

    #[test]
    fn result_never_starts_or_ends_with_fence() {
        for text in [
            "```rust\nfn main() {}\n```",
            "```\n```",
            "```",
            "  ```js\nconsole.log(1)```  ",
        ] {
            let cleaned = clean_code_response(text);
            assert!(!cleaned.starts_with(FENCE), "{text:?} -> {cleaned:?}");
            assert!(!cleaned.ends_with(FENCE), "{text:?} -> {cleaned:?}");
        }
    }
}
