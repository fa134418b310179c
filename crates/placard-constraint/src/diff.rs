//! Line diff of serialized scenes for `--output-diff`

use std::fmt::Write;

/// One line of a diff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLine<'a> {
    Same(&'a str),
    Added(&'a str),
    Removed(&'a str),
}

/// Longest-common-subsequence line diff.
///
/// Serialized scenes are a few hundred lines at most, so the quadratic table
/// is fine. Removals are emitted before additions at each change.
pub fn diff_lines<'a>(before: &'a str, after: &'a str) -> Vec<DiffLine<'a>> {
    let old: Vec<&str> = before.lines().collect();
    let new: Vec<&str> = after.lines().collect();

    // lcs[i][j] = LCS length of old[i..] and new[j..]
    let mut lcs = vec![vec![0usize; new.len() + 1]; old.len() + 1];
    for i in (0..old.len()).rev() {
        for j in (0..new.len()).rev() {
            lcs[i][j] = if old[i] == new[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut lines = Vec::with_capacity(old.len().max(new.len()));
    let (mut i, mut j) = (0, 0);
    while i < old.len() && j < new.len() {
        if old[i] == new[j] {
            lines.push(DiffLine::Same(old[i]));
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            lines.push(DiffLine::Removed(old[i]));
            i += 1;
        } else {
            lines.push(DiffLine::Added(new[j]));
            j += 1;
        }
    }
    lines.extend(old[i..].iter().copied().map(DiffLine::Removed));
    lines.extend(new[j..].iter().copied().map(DiffLine::Added));
    lines
}

/// Render a diff with `"  "`, `"+ "` and `"- "` prefixes
pub fn scene_diff(before: &str, after: &str) -> String {
    let mut out = String::new();
    for line in diff_lines(before, after) {
        let _ = match line {
            DiffLine::Same(l) => writeln!(out, "  {}", l),
            DiffLine::Added(l) => writeln!(out, "+ {}", l),
            DiffLine::Removed(l) => writeln!(out, "- {}", l),
        };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical() {
        let text = "{\n  \"id\": \"a\"\n}\n";
        assert!(diff_lines(text, text)
            .iter()
            .all(|l| matches!(l, DiffLine::Same(_))));
    }

    #[test]
    fn test_changed_value() {
        let before = "{\n  \"font_size\": 12.0,\n  \"text\": \"Hi\"\n}";
        let after = "{\n  \"font_size\": 48.0,\n  \"text\": \"Hi\"\n}";
        let diff = scene_diff(before, after);
        assert!(diff.contains("-   \"font_size\": 12.0,"));
        assert!(diff.contains("+   \"font_size\": 48.0,"));
        assert!(diff.contains("    \"text\": \"Hi\""));
    }

    #[test]
    fn test_appended_element() {
        let before = "a\nb\n";
        let after = "a\nb\nc\nd\n";
        assert_eq!(
            diff_lines(before, after),
            vec![
                DiffLine::Same("a"),
                DiffLine::Same("b"),
                DiffLine::Added("c"),
                DiffLine::Added("d"),
            ]
        );
    }

    #[test]
    fn test_removed_lines() {
        let diff = diff_lines("x\ny\nz", "x\nz");
        assert_eq!(diff[1], DiffLine::Removed("y"));
        assert_eq!(diff.len(), 3);
    }
}
