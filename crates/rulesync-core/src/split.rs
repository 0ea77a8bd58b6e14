//! Size-bounded chunking of rule content
//!
//! The assistant refuses rule files above a fixed size, so a combined body
//! that does not fit is split into `-partN` files. Sizes are counted in
//! characters (Unicode scalar values), not bytes.

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Characters left for content once the preamble and safety margin are
/// reserved. `None` when nothing is left.
pub fn chunk_budget(max_chars: usize, preamble: &str, safety_margin: usize) -> Option<usize> {
    max_chars
        .checked_sub(char_len(preamble))
        .and_then(|left| left.checked_sub(safety_margin))
        .filter(|&budget| budget > 0)
}

/// Split `text` into ordered chunks of at most `limit` characters.
///
/// While the remaining text is longer than `limit`, it is cut at the last
/// `\n` before the limit; the newline itself starts the next chunk. With no
/// usable newline the cut falls exactly on the limit. The remainder is the
/// last chunk, so empty input yields a single empty chunk and concatenating
/// the chunks gives back `text`.
///
/// A newline at the very start of the remaining text is not a usable cut:
/// it would produce an empty chunk without making progress.
pub fn split_content(text: &str, limit: usize) -> Vec<&str> {
    debug_assert!(limit > 0, "chunk limit must be positive");
    let limit = limit.max(1);

    let mut chunks = Vec::new();
    let mut rest = text;

    // `nth(limit)` only exists when more than `limit` characters remain.
    while let Some((limit_byte, _)) = rest.char_indices().nth(limit) {
        let cut = match rest[..limit_byte].rfind('\n') {
            Some(idx) if idx > 0 => idx,
            _ => limit_byte,
        };
        chunks.push(&rest[..cut]);
        rest = &rest[cut..];
    }

    chunks.push(rest);
    chunks
}

/// Split a rule name into the stem and the extension (dot included) that
/// `-part<N>` goes between.
fn stem_and_extension(rule_name: &str) -> (&str, &str) {
    match rule_name.rfind('.') {
        Some(dot) if dot > 0 => (&rule_name[..dot], &rule_name[dot..]),
        _ => (rule_name, ""),
    }
}

/// Output file name for chunk `index` (1-based) of `total`.
///
/// A single chunk keeps the rule name; otherwise `-part<index>` goes before
/// the extension: `llm-provider-docs.md` becomes `llm-provider-docs-part2.md`.
pub fn part_file_name(rule_name: &str, index: usize, total: usize) -> String {
    if total <= 1 {
        return rule_name.to_string();
    }
    let (stem, extension) = stem_and_extension(rule_name);
    format!("{}-part{}{}", stem, index, extension)
}

/// Whether `file_name` has the shape of a chunk file of `rule_name`,
/// `<stem>-part<digits><ext>`, for any part number.
pub fn is_part_file_name(rule_name: &str, file_name: &str) -> bool {
    let (stem, extension) = stem_and_extension(rule_name);
    file_name
        .strip_prefix(stem)
        .and_then(|rest| rest.strip_prefix("-part"))
        .and_then(|rest| rest.strip_suffix(extension))
        .is_some_and(|number| !number.is_empty() && number.bytes().all(|b| b.is_ascii_digit()))
}
