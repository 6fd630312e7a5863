//! Prompt template rendering and output text transforms.

use std::collections::HashMap;

/// Render a `{name}` placeholder template.
///
/// Placeholders are delimited by single braces and looked up verbatim in
/// `variables`. A missing variable renders as the empty string; an
/// unterminated `{` is emitted literally. There is no escape syntax.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
///
/// let vars = HashMap::from([("name".to_string(), "aok".to_string())]);
/// assert_eq!(aok::text::render_template("hi {name}{missing}!", &vars), "hi aok!");
/// ```
pub fn render_template(template: &str, variables: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        match rest[start + 1..].find('}') {
            Some(end) => {
                let key = &rest[start + 1..start + 1 + end];
                if let Some(value) = variables.get(key) {
                    out.push_str(value);
                }
                rest = &rest[start + end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}

const THINK_OPEN: &str = "<think>";
const THINK_CLOSE: &str = "</think>";

/// Remove `<think>...</think>` sections from model output.
///
/// An unterminated opening tag drops the remainder of the text. The
/// result is trimmed of surrounding whitespace.
pub fn strip_reasoning(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(THINK_OPEN) {
        out.push_str(&rest[..start]);
        match rest[start + THINK_OPEN.len()..].find(THINK_CLOSE) {
            Some(end) => {
                rest = &rest[start + THINK_OPEN.len() + end + THINK_CLOSE.len()..];
            }
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_substitutes() {
        let rendered = render_template(
            "You are {agent_name} working on {domain}.",
            &vars(&[("agent_name", "scout"), ("domain", "search")]),
        );
        assert_eq!(rendered, "You are scout working on search.");
    }

    #[test]
    fn test_render_missing_variable_is_empty() {
        assert_eq!(render_template("a{missing}b", &vars(&[])), "ab");
    }

    #[test]
    fn test_render_unterminated_brace_is_literal() {
        assert_eq!(
            render_template("start {open", &vars(&[("open", "x")])),
            "start {open"
        );
    }

    #[test]
    fn test_render_no_placeholders() {
        assert_eq!(render_template("plain text", &vars(&[])), "plain text");
    }

    #[test]
    fn test_strip_reasoning_removes_sections() {
        let text = "<think>internal monologue</think>The answer is 4.";
        assert_eq!(strip_reasoning(text), "The answer is 4.");
    }

    #[test]
    fn test_strip_reasoning_multiple_sections() {
        let text = "a <think>x</think>b <think>y</think>c";
        assert_eq!(strip_reasoning(text), "a b c");
    }

    #[test]
    fn test_strip_reasoning_unterminated_drops_tail() {
        let text = "visible <think>never closed";
        assert_eq!(strip_reasoning(text), "visible");
    }

    #[test]
    fn test_strip_reasoning_untouched_without_tags() {
        assert_eq!(strip_reasoning("no tags here"), "no tags here");
    }
}
