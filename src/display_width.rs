use unicode_width::UnicodeWidthStr;

/// Line-break tags accepted inside labels, longest first.
const BREAK_TAGS: [&str; 3] = ["<br />", "<br/>", "<br>"];

pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Split a label into its visual lines on `<br>`, `<br/>` and `<br />`,
/// matched case-insensitively.
pub fn label_lines(label: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < label.len() {
        let rest = &label.as_bytes()[i..];
        let tag = BREAK_TAGS.iter().find(|tag| {
            rest.len() >= tag.len() && rest[..tag.len()].eq_ignore_ascii_case(tag.as_bytes())
        });
        match tag {
            Some(tag) => {
                lines.push(&label[start..i]);
                i += tag.len();
                start = i;
            }
            None => i += 1,
        }
    }
    lines.push(&label[start..]);
    lines
}

/// Widest line of a label in display columns. CJK ideographs count as two.
pub fn label_columns(label: &str) -> usize {
    label_lines(label)
        .iter()
        .map(|line| display_width(line.trim()))
        .max()
        .unwrap_or(0)
}

pub fn label_line_count(label: &str) -> usize {
    label_lines(label).len()
}
