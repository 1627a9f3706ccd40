//! Slug helpers shared by pages, articles and form field names

/// 最大 slug 长度
pub const MAX_SLUG_LENGTH: usize = 120;

/// Convert free text into a URL slug (`[a-z0-9]` joined by single dashes)
pub fn slugify(input: &str) -> String {
    slugify_with(input, '-')
}

/// Same as [`slugify`] with a custom separator (form field names use `_`)
pub fn slugify_with(input: &str, separator: char) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_separator = false;

    for c in input.trim().chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push(separator);
            }
            pending_separator = false;
            out.push(c);
        } else {
            pending_separator = true;
        }
    }

    out.chars()
        .take(MAX_SLUG_LENGTH)
        .collect::<String>()
        .trim_end_matches(separator)
        .to_string()
}

/// Check that `slug` is already in canonical slug form
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= MAX_SLUG_LENGTH
        && slug.split('-').all(|part| {
            !part.is_empty() && part.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        })
}
