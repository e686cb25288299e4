/// Counts code points in the CJK Unified Ideographs range
/// (U+4E00..=U+9FA5). Everything else, including CJK punctuation, Latin
/// text and whitespace, contributes nothing.
pub fn zh_char_count(text: &str) -> u64 {
    text.chars()
        .filter(|c| ('\u{4e00}'..='\u{9fa5}').contains(c))
        .count() as u64
}
