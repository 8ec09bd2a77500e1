//! HTML and text helper functions

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Count words in plain text
pub fn count_words(text: &str) -> usize {
    let mut count = 0;
    let mut in_word = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if !in_word {
                in_word = true;
                count += 1;
            }
        } else if c == '\'' || c == '-' {
            // contractions and hyphenated words stay one word
        } else {
            in_word = false;
        }
    }

    count
}

/// Estimated reading time in whole minutes, never less than one
pub fn reading_time(words: usize, words_per_minute: usize) -> usize {
    let words_per_minute = words_per_minute.max(1);
    words.div_ceil(words_per_minute).max(1)
}
