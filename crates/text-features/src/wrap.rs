/// Greedy wrap, one character at a time, so scripts without spaces still break.
///
/// `text` is split into paragraphs on newlines; blank paragraphs are dropped.
/// A line is committed as soon as the next character would push its measured
/// width past `max_width`, and whitespace at line ends is trimmed. A single
/// character wider than `max_width` still gets a line of its own.
pub fn wrap_text<F>(text: &str, max_width: f32, mut measure: F) -> Vec<String>
where
    F: FnMut(&str) -> f32,
{
    let mut lines = Vec::new();
    for paragraph in text.split('\n').filter(|p| !p.trim().is_empty()) {
        let mut line = String::new();
        for ch in paragraph.chars() {
            line.push(ch);
            if measure(&line) > max_width {
                line.pop();
                commit(&mut lines, &line);
                line.clear();
                line.push(ch);
            }
        }
        commit(&mut lines, &line);
    }
    lines
}

fn commit(lines: &mut Vec<String>, line: &str) {
    let trimmed = line.trim();
    if !trimmed.is_empty() {
        lines.push(trimmed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mono(s: &str) -> f32 { s.chars().count() as f32 * 10.0 }

    #[test]
    fn short_text_is_one_trimmed_line() {
        assert_eq!(wrap_text("  hello there  ", 1000.0, mono), ["hello there"]);
    }

    #[test]
    fn long_text_respects_width() {
        let text = "别回头，夜会替我们保守秘密。后来我才懂，最远的路是走向自己。";
        let lines = wrap_text(text, 55.0, mono);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| mono(l) <= 55.0));
        assert_eq!(lines.concat(), text);
    }

    #[test]
    fn whitespace_at_breaks_is_trimmed() {
        let lines = wrap_text("ab cd ef", 30.0, mono);
        assert_eq!(lines, ["ab", "cd", "ef"]);
        assert_eq!(lines.join(" "), "ab cd ef");
    }

    #[test]
    fn paragraphs_and_blank_lines() {
        assert_eq!(wrap_text("one\n\n\ntwo\n   \n", 1000.0, mono), ["one", "two"]);
        assert!(wrap_text(" \n\t\n", 1000.0, mono).is_empty());
        assert!(wrap_text("", 1000.0, mono).is_empty());
    }

    #[test]
    fn oversized_glyph_gets_its_own_line() {
        assert_eq!(wrap_text("abc", 5.0, mono), ["a", "b", "c"]);
    }
}
