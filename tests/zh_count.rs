use pretty_assertions::assert_eq;
use transtat::zh::zh_char_count;

#[test]
fn empty_text_counts_zero() {
    assert_eq!(zh_char_count(""), 0);
}

#[test]
fn latin_text_counts_zero() {
    assert_eq!(zh_char_count("hello"), 0);
    assert_eq!(zh_char_count("diff --git a/README.md b/README.md"), 0);
    assert_eq!(zh_char_count("  \t\n.,;!?"), 0);
}

#[test]
fn mixed_text_counts_only_ideographs() {
    assert_eq!(zh_char_count("你好world"), 2);
    assert_eq!(zh_char_count("+新增一行 translated text\n-旧行"), 6);
}

#[test]
fn cjk_punctuation_is_excluded() {
    // Fullwidth punctuation sits outside U+4E00..=U+9FA5.
    assert_eq!(zh_char_count("。，！？《》、：；"), 0);
    assert_eq!(zh_char_count("你好。"), 2);
}

#[test]
fn range_boundaries_are_inclusive() {
    assert_eq!(zh_char_count("\u{4e00}"), 1);
    assert_eq!(zh_char_count("\u{9fa5}"), 1);
    assert_eq!(zh_char_count("\u{4dff}"), 0);
    assert_eq!(zh_char_count("\u{9fa6}"), 0);
}

#[test]
fn count_is_per_code_point_not_per_byte() {
    let text = "汉".repeat(1000);
    assert_eq!(zh_char_count(&text), 1000);
}
