//! Plain text and JSON output

use redline_core::{LineRange, LinesDiff};

/// One `@@ -start,len +start,len @@` header per change block, followed by the
/// block's removed and added lines.
pub fn render_text<S: AsRef<str>>(diff: &LinesDiff, old_lines: &[S], new_lines: &[S]) -> String {
    let mut out = String::new();
    for change in &diff.changes {
        out.push_str(&format!(
            "@@ -{},{} +{},{} @@\n",
            change.original_range.start_line_number,
            change.original_range.len(),
            change.modified_range.start_line_number,
            change.modified_range.len(),
        ));
        push_lines(&mut out, '-', old_lines, change.original_range);
        push_lines(&mut out, '+', new_lines, change.modified_range);
    }
    out
}

fn push_lines<S: AsRef<str>>(out: &mut String, prefix: char, lines: &[S], range: LineRange) {
    let start = range.start_line_number - 1;
    let end = (range.end_line_number_exclusive - 1).min(lines.len());
    for line in lines.get(start..end).unwrap_or_default() {
        out.push(prefix);
        out.push_str(line.as_ref());
        out.push('\n');
    }
}

pub fn render_json(diff: &LinesDiff) -> serde_json::Result<String> {
    serde_json::to_string_pretty(diff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use redline_core::DiffEngine;

    #[test]
    fn test_render_no_changes() {
        let diff = DiffEngine::new().diff_strings("same", "same");
        let lines = ["same"];
        assert_eq!(render_text(&diff, &lines, &lines), "");
    }

    #[test]
    fn test_render_replacement() {
        let old = ["fn main() {", "    foo();", "}"];
        let new = ["fn main() {", "    bar();", "}"];
        let diff = DiffEngine::new().compute_diff(&old, &new);

        assert_eq!(
            render_text(&diff, &old, &new),
            "@@ -2,1 +2,1 @@\n-    foo();\n+    bar();\n"
        );
    }

    #[test]
    fn test_render_insertion() {
        let old = ["a", "b"];
        let new = ["a", "x", "y", "b"];
        let diff = DiffEngine::new().compute_diff(&old, &new);

        assert_eq!(render_text(&diff, &old, &new), "@@ -2,0 +2,2 @@\n+x\n+y\n");
    }

    #[test]
    fn test_render_multiple_blocks() {
        let old = ["a", "b", "c", "d", "e"];
        let new = ["A", "b", "c", "d"];
        let diff = DiffEngine::new().compute_diff(&old, &new);

        assert_eq!(
            render_text(&diff, &old, &new),
            "@@ -1,1 +1,1 @@\n-a\n+A\n@@ -5,1 +5,0 @@\n-e\n"
        );
    }

    #[test]
    fn test_render_json() {
        let diff = DiffEngine::new().diff_strings("a", "b");
        let json = render_json(&diff).expect("serializable");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["quit_early"], false);
        assert_eq!(value["changes"][0]["original_range"]["start_line_number"], 1);
        assert_eq!(value["changes"][0]["modified_range"]["end_line_number_exclusive"], 2);
    }
}
