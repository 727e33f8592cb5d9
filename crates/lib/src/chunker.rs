//! Reply chunking: split long text into transport-sized pieces.
//!
//! Cuts prefer the last newline in the window, then the last space, then a
//! hard cut at the limit. Limits count characters, not bytes, so every cut
//! lands on a char boundary.

use anyhow::Result;

/// Split `text` into chunks of at most `limit` characters.
///
/// A newline consumed at a cut is stripped from the remainder (a reply never
/// starts mid-blank-line); spaces are kept. A break character at position 0
/// of the window is not a valid cut, so each iteration consumes at least one
/// character and the loop always terminates.
pub fn split_message(text: &str, limit: usize) -> Result<Vec<String>> {
    anyhow::ensure!(limit > 0, "message split limit must be at least 1");
    if text.chars().count() <= limit {
        return Ok(vec![text.to_string()]);
    }

    let mut chunks = Vec::new();
    let mut rest = text;
    loop {
        if rest.chars().count() <= limit {
            chunks.push(rest.to_string());
            break;
        }
        // Byte offset just past the first `limit` characters.
        let window_end = rest
            .char_indices()
            .nth(limit)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let window = &rest[..window_end];
        let cut = window
            .rfind('\n')
            .filter(|&pos| pos > 0)
            .or_else(|| window.rfind(' ').filter(|&pos| pos > 0))
            .unwrap_or(window_end);
        chunks.push(rest[..cut].to_string());
        rest = rest[cut..].trim_start_matches('\n');
    }
    Ok(chunks)
}

/// Prefix of `text` at most `max` characters long, never splitting a char.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((i, _)) => &text[..i],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_unchanged_chunk() {
        let chunks = split_message("hello world", 2000).expect("split");
        assert_eq!(chunks, vec!["hello world".to_string()]);
    }

    #[test]
    fn exact_limit_is_one_chunk() {
        let text = "x".repeat(10);
        let chunks = split_message(&text, 10).expect("split");
        assert_eq!(chunks, vec![text]);
    }

    #[test]
    fn prefers_newline_over_space() {
        let text = format!("{}\n{} {}", "a".repeat(5), "b".repeat(3), "c".repeat(5));
        let chunks = split_message(&text, 10).expect("split");
        assert_eq!(chunks[0], "a".repeat(5));
        assert!(chunks[0].len() < 10);
    }

    #[test]
    fn falls_back_to_space() {
        let text = format!("{} {}", "a".repeat(6), "b".repeat(6));
        let chunks = split_message(&text, 10).expect("split");
        assert_eq!(chunks, vec!["a".repeat(6), format!(" {}", "b".repeat(6))]);
    }

    #[test]
    fn hard_splits_unbroken_text() {
        let text = "x".repeat(4500);
        let chunks = split_message(&text, 2000).expect("split");
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 2000);
        assert_eq!(chunks[1].chars().count(), 2000);
        assert_eq!(chunks[2].chars().count(), 500);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn no_chunk_exceeds_limit() {
        let text = format!(
            "{}\n{} {} {}\n\n{}",
            "a".repeat(30),
            "b".repeat(45),
            "c".repeat(12),
            "d".repeat(80),
            "e".repeat(7)
        );
        for chunk in split_message(&text, 50).expect("split") {
            assert!(chunk.chars().count() <= 50);
        }
    }

    #[test]
    fn newline_cuts_reconstruct_with_separator() {
        let text = format!("{}\n{}", "a".repeat(1000), "b".repeat(1500));
        let chunks = split_message(&text, 2000).expect("split");
        assert_eq!(chunks, vec!["a".repeat(1000), "b".repeat(1500)]);
        assert_eq!(chunks.join("\n"), text);
    }

    #[test]
    fn space_cuts_reconstruct_by_concatenation() {
        let text = format!("{} {}", "a".repeat(1500), "b".repeat(1000));
        let chunks = split_message(&text, 2000).expect("split");
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn leading_space_in_window_does_not_stall() {
        // A space at position 0 is not a cut; the chunker must hard-split.
        let text = format!(" {}", "x".repeat(25));
        let chunks = split_message(&text, 10).expect("split");
        assert!(chunks.len() >= 3);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn multibyte_text_splits_on_char_boundaries() {
        let text = "é".repeat(3000);
        let chunks = split_message(&text, 2000).expect("split");
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 2000);
        assert_eq!(chunks[1].chars().count(), 1000);
    }

    #[test]
    fn zero_limit_is_an_error() {
        assert!(split_message("anything", 0).is_err());
    }

    #[test]
    fn truncate_chars_is_char_safe() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("ééé", 2), "éé");
    }
}
