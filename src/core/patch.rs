//! Pattern engine — locate TextMeshProUGUI creation statements and render the
//! font call that belongs beneath each one.
//!
//! Text-level matching only. This is deliberately not a C# parser: the target
//! idiom is a single line, and the transformation never touches anything the
//! pattern does not match.

use regex::Regex;
use serde::Serialize;

/// The statement inserted after each match, parameterized by variable name.
pub const FONT_CALL: &str = "FontManager.ApplyDefaultKoreanFont";

/// Target pattern: indentation, typed assignment, object receiver, and the
/// AddComponent factory call ending in `;`.
const TARGET_PATTERN: &str =
    r"(\s+)(TextMeshProUGUI\s+\w+)\s*=\s*(\w+)\.AddComponent<TextMeshProUGUI>\(\);";

fn target() -> Regex {
    Regex::new(TARGET_PATTERN).unwrap()
}

/// One located occurrence of the target pattern.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchMatch {
    /// Leading whitespace run exactly as it appeared. May include the
    /// preceding newline; see `line_indent` for the line-local part.
    pub indent: String,
    /// Typed assignment text, e.g. "TextMeshProUGUI label".
    pub assignment: String,
    /// Object identifier the AddComponent call was invoked on.
    pub object: String,
    /// Full matched statement without the leading whitespace run.
    pub statement: String,
    /// Line number of the statement (1-indexed).
    pub line: usize,
}

impl PatchMatch {
    /// The bound variable name: last whitespace-separated token of the
    /// assignment text.
    pub fn variable_name(&self) -> &str {
        self.assignment
            .split_whitespace()
            .last()
            .unwrap_or(self.assignment.as_str())
    }

    /// Line-level indentation of the matched statement: the captured
    /// whitespace run after its last newline. This is what the inserted
    /// line shares, so no blank line ends up between the two statements.
    pub fn line_indent(&self) -> &str {
        self.indent
            .rsplit('\n')
            .next()
            .unwrap_or(self.indent.as_str())
    }
}

fn to_match(text: &str, caps: &regex::Captures) -> PatchMatch {
    let stmt_start = caps.get(2).map(|m| m.start()).unwrap_or(0);
    let end = caps.get(0).map(|m| m.end()).unwrap_or(stmt_start);
    PatchMatch {
        indent: caps[1].to_string(),
        assignment: caps[2].to_string(),
        object: caps[3].to_string(),
        statement: text[stmt_start..end].to_string(),
        line: text[..stmt_start].bytes().filter(|b| *b == b'\n').count() + 1,
    }
}

/// Find all non-overlapping occurrences of the target pattern.
pub fn find_matches(text: &str) -> Vec<PatchMatch> {
    target()
        .captures_iter(text)
        .map(|caps| to_match(text, &caps))
        .collect()
}

/// Render the follow-up line for a match: the match's own indentation
/// followed by the font call on the derived variable name.
pub fn render(m: &PatchMatch) -> String {
    format!("{}{}({});", m.line_indent(), FONT_CALL, m.variable_name())
}

/// Apply the transformation to a whole file's text in one global pass.
///
/// Every matched statement is kept verbatim and the rendered follow-up line
/// is appended directly beneath it. Matches already followed by their
/// follow-up line are left alone, so a second application is a no-op.
///
/// Returns the new text and the number of insertions made.
pub fn apply(text: &str) -> (String, usize) {
    let re = target();
    let mut out = String::with_capacity(text.len());
    let mut last_end = 0;
    let mut insertions = 0;

    for caps in re.captures_iter(text) {
        let full = match caps.get(0) {
            Some(m) => m,
            None => continue,
        };

        let m = to_match(text, &caps);
        let follow_up = format!("\n{}", render(&m));
        if text[full.end()..].starts_with(&follow_up) {
            continue;
        }

        out.push_str(&text[last_end..full.end()]);
        out.push_str(&follow_up);
        last_end = full.end();
        insertions += 1;
    }

    out.push_str(&text[last_end..]);
    (out, insertions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_indentation_of_matched_line() {
        let input = "    TextMeshProUGUI label = obj.AddComponent<TextMeshProUGUI>();\n";
        let (output, count) = apply(input);
        assert_eq!(count, 1);
        assert_eq!(
            output,
            "    TextMeshProUGUI label = obj.AddComponent<TextMeshProUGUI>();\n    FontManager.ApplyDefaultKoreanFont(label);\n"
        );
    }

    #[test]
    fn derives_variable_name_from_last_token() {
        let input = "    TextMeshProUGUI myLabel = go.AddComponent<TextMeshProUGUI>();\n";
        let matches = find_matches(input);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].variable_name(), "myLabel");
        assert_eq!(matches[0].object, "go");
    }

    #[test]
    fn second_application_is_a_no_op() {
        let input = "    TextMeshProUGUI label = obj.AddComponent<TextMeshProUGUI>();\n";
        let (once, first_count) = apply(input);
        assert_eq!(first_count, 1);

        let (twice, second_count) = apply(&once);
        assert_eq!(second_count, 0);
        assert_eq!(twice, once);
    }

    #[test]
    fn three_matches_each_get_their_own_insertion() {
        let input = "\
void A() {
    TextMeshProUGUI title = header.AddComponent<TextMeshProUGUI>();
}
void B() {
        TextMeshProUGUI body = panel.AddComponent<TextMeshProUGUI>();
}
void C() {
\tTextMeshProUGUI footer = root.AddComponent<TextMeshProUGUI>();
}
";
        let (output, count) = apply(input);
        assert_eq!(count, 3);
        assert!(output.contains("    FontManager.ApplyDefaultKoreanFont(title);"));
        assert!(output.contains("        FontManager.ApplyDefaultKoreanFont(body);"));
        assert!(output.contains("\tFontManager.ApplyDefaultKoreanFont(footer);"));

        // Each follow-up sits directly beneath its own statement
        assert!(output.contains(
            "    TextMeshProUGUI title = header.AddComponent<TextMeshProUGUI>();\n    FontManager.ApplyDefaultKoreanFont(title);\n"
        ));
        assert!(output.contains(
            "        TextMeshProUGUI body = panel.AddComponent<TextMeshProUGUI>();\n        FontManager.ApplyDefaultKoreanFont(body);\n"
        ));
    }

    #[test]
    fn non_matching_text_is_untouched() {
        let input = "void Start() {\n    var text = obj.GetComponent<TextMeshProUGUI>();\n}\n";
        let (output, count) = apply(input);
        assert_eq!(count, 0);
        assert_eq!(output, input);
    }

    #[test]
    fn find_matches_reports_line_numbers() {
        let input = "// header\n\n    TextMeshProUGUI label = obj.AddComponent<TextMeshProUGUI>();\n";
        let matches = find_matches(input);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].line, 3);
        assert_eq!(
            matches[0].statement,
            "TextMeshProUGUI label = obj.AddComponent<TextMeshProUGUI>();"
        );
    }

    #[test]
    fn render_uses_match_indentation() {
        let input = "        TextMeshProUGUI label = obj.AddComponent<TextMeshProUGUI>();\n";
        let matches = find_matches(input);
        assert_eq!(
            render(&matches[0]),
            "        FontManager.ApplyDefaultKoreanFont(label);"
        );
    }

    #[test]
    fn statement_internal_spacing_is_preserved() {
        let input = "    TextMeshProUGUI label  =  obj.AddComponent<TextMeshProUGUI>();\n";
        let (output, count) = apply(input);
        assert_eq!(count, 1);
        assert!(output.starts_with("    TextMeshProUGUI label  =  obj.AddComponent<TextMeshProUGUI>();\n"));
    }

    #[test]
    fn no_blank_line_when_statement_is_mid_file() {
        // The whitespace run before the statement spans the preceding
        // newline; the follow-up still lands directly beneath.
        let input = "GameObject obj = new GameObject(\"Label\");\n        TextMeshProUGUI label = obj.AddComponent<TextMeshProUGUI>();\n        label.text = \"x\";\n";
        let (output, count) = apply(input);
        assert_eq!(count, 1);
        assert_eq!(
            output,
            "GameObject obj = new GameObject(\"Label\");\n        TextMeshProUGUI label = obj.AddComponent<TextMeshProUGUI>();\n        FontManager.ApplyDefaultKoreanFont(label);\n        label.text = \"x\";\n"
        );
    }

    #[test]
    fn second_application_mid_file_is_a_no_op() {
        let input = "void Build() {\n    TextMeshProUGUI title = header.AddComponent<TextMeshProUGUI>();\n}\n";
        let (once, _) = apply(input);
        let (twice, count) = apply(&once);
        assert_eq!(count, 0);
        assert_eq!(twice, once);
    }

    #[test]
    fn inserted_line_does_not_match_the_pattern() {
        let input = "    TextMeshProUGUI label = obj.AddComponent<TextMeshProUGUI>();\n";
        let (once, _) = apply(input);
        let matches = find_matches(&once);
        // The original statement still matches; the inserted line adds none.
        assert_eq!(matches.len(), 1);
    }
}
