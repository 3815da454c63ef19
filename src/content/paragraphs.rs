use super::normalize_line_endings;

/// Splits free text into paragraphs, in source order.
///
/// Consecutive ordinary lines accumulate into one paragraph (internal newlines kept,
/// the whole paragraph trimmed on flush). The current paragraph is closed by:
/// *   a blank line;
/// *   a rule of three or more `-`, `—` or `–`, which is dropped;
/// *   a `- ` bullet line, which then starts the next paragraph without its dash.
pub fn parse_paragraphs(raw: &str) -> Vec<String> {
    let normalized = normalize_line_endings(raw);
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in normalized.split('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() || is_hard_separator(trimmed) {
            flush(&mut current, &mut paragraphs);
            continue;
        }
        if let Some(rest) = strip_bullet(trimmed) {
            flush(&mut current, &mut paragraphs);
            current.push(rest);
            continue;
        }
        current.push(line);
    }
    flush(&mut current, &mut paragraphs);

    paragraphs
}

fn flush(current: &mut Vec<&str>, paragraphs: &mut Vec<String>) {
    let joined = current.join("\n");
    let joined = joined.trim();
    if !joined.is_empty() {
        paragraphs.push(joined.to_string());
    }
    current.clear();
}

/// Three or more of the same dash character and nothing else.
fn is_hard_separator(trimmed: &str) -> bool {
    ['-', '—', '–'].iter().any(|&dash| {
        trimmed.chars().count() >= 3 && trimmed.chars().all(|c| c == dash)
    })
}

/// The text after a leading `-` and at least one whitespace character.
fn strip_bullet(trimmed: &str) -> Option<&str> {
    let rest = trimmed.strip_prefix('-')?;
    if rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}
