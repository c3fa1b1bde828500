//! Script-level text handling: line splitting and trailing comments.

use once_cell::sync::Lazy;
use regex::Regex;

/// Field delimiter.
pub const FIELD_SEPARATOR: char = '\t';
/// Shorthand accepted in place of a tab.
pub const FIELD_SEPARATOR_ALIAS: char = '|';
/// Line delimiter.
pub const LINE_SEPARATOR: char = '\n';
/// Shorthand accepted in place of a newline.
pub const LINE_SEPARATOR_ALIAS: &str = "||";

static TRAILING_COMMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*?)\s*/\*\s*(.*?)\s*\*/\s*$").expect("trailing comment pattern")
});

/// Split a script into raw lines.
///
/// `||` becomes a newline and `|` a tab before splitting, in that order, so
/// both shorthands can be mixed with real tabs and newlines. No line is
/// dropped: an empty script yields one empty line.
pub fn split_lines(script: &str) -> Vec<String> {
    let normalized = script
        .replace(LINE_SEPARATOR_ALIAS, "\n")
        .replace(FIELD_SEPARATOR_ALIAS, "\t");
    normalized
        .split(LINE_SEPARATOR)
        .map(str::to_owned)
        .collect()
}

/// Strip a trailing `/* ... */` from `line`.
///
/// Returns the remaining command text with trailing whitespace removed, and
/// the comment text if it is non-empty. Lines without a trailing comment come
/// back unchanged.
pub fn extract_comment(line: &str) -> (&str, Option<&str>) {
    match TRAILING_COMMENT.captures(line) {
        Some(c) => {
            let body = c.get(1).map_or("", |m| m.as_str());
            let comment = c.get(2).map(|m| m.as_str()).filter(|s| !s.is_empty());
            (body, comment)
        }
        None => (line, None),
    }
}

/// Split a comment-stripped command into its fields.
pub fn split_fields(command: &str) -> Vec<&str> {
    command.split(FIELD_SEPARATOR).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorthand_separators_are_folded() {
        assert_eq!(
            split_lines("CREATE||LAST|P31|Q5"),
            vec!["CREATE".to_owned(), "LAST\tP31\tQ5".to_owned()]
        );
    }

    #[test]
    fn empty_lines_are_kept() {
        assert_eq!(split_lines(""), vec![String::new()]);
        assert_eq!(
            split_lines("CREATE\n\nCREATE\n"),
            vec!["CREATE", "", "CREATE", ""]
        );
    }

    #[test]
    fn triple_pipe_is_newline_then_tab() {
        assert_eq!(split_lines("a|||b"), vec!["a", "\tb"]);
    }

    #[test]
    fn trailing_comment_is_extracted() {
        assert_eq!(extract_comment("CREATE /* note */"), ("CREATE", Some("note")));
        assert_eq!(
            extract_comment("Q1\tP31\tQ5\t/*  spaced   out */  "),
            ("Q1\tP31\tQ5", Some("spaced   out"))
        );
    }

    #[test]
    fn comment_must_end_the_line() {
        let line = "Q1\tP1\t\"a /* b */ c\"";
        assert_eq!(extract_comment(line), (line, None));
    }

    #[test]
    fn empty_comment_is_stripped_without_summary() {
        assert_eq!(extract_comment("CREATE /* */"), ("CREATE", None));
    }

    #[test]
    fn no_comment_leaves_line_untouched() {
        assert_eq!(extract_comment("CREATE  "), ("CREATE  ", None));
    }
}
