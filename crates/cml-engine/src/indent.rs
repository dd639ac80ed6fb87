use std::sync::OnceLock;

use regex::Regex;

/// Lines whose first non-whitespace token is a CML marker, open or
/// close, optionally comment-prefixed.
fn cml_line_regex() -> &'static Regex {
    static CML_LINE: OnceLock<Regex> = OnceLock::new();
    CML_LINE.get_or_init(|| {
        Regex::new(r"^\s*(#\s*\[\[/?cc\..*?\]\]|\[\[/?cc\..*?\]\])")
            .expect("Invalid CML line regex")
    })
}

/// Strip leading indentation from CML marker lines, including closing
/// tags; every other line passes through verbatim.
///
/// Tagged code is often re-indented by the surrounding source; markers
/// are only recognized at the start of a line, so this restores them to
/// column zero without touching the code itself.
pub fn remove_cml_indentation(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            if cml_line_regex().is_match(line) {
                line.trim_start()
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_indented_markers_move_to_column_zero() {
        let text = "\
    # [[cc.block.method.run]]
    def run(self):
        pass
    # [[/cc.block.method.run]]";

        assert_eq!(
            remove_cml_indentation(text),
            "\
# [[cc.block.method.run]]
    def run(self):
        pass
# [[/cc.block.method.run]]"
        );
    }

    #[test]
    fn test_uncommented_markers_are_also_unindented() {
        assert_eq!(
            remove_cml_indentation("  [[cc.out.a]]\n  x\n  [[/cc.out.a]]"),
            "[[cc.out.a]]\n  x\n[[/cc.out.a]]"
        );
    }

    #[test]
    fn test_non_marker_lines_are_untouched() {
        let text = "    indented code\n\tmore code";
        assert_eq!(remove_cml_indentation(text), text);
    }

    #[test]
    fn test_trailing_text_after_marker_is_preserved() {
        assert_eq!(
            remove_cml_indentation("   [[cc.out.a]]inline[[/cc.out.a]]"),
            "[[cc.out.a]]inline[[/cc.out.a]]"
        );
    }
}
