/// `ILIKE` pattern matching `term` anywhere, with LIKE metacharacters escaped.
pub fn contains_pattern(term: &str) -> String {
    let escaped = term
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Search terms that are empty after trimming are ignored.
pub fn search_term(search: &Option<String>) -> Option<String> {
    search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(contains_pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("ann"), "%ann%");
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
    }

    #[test]
    fn test_search_term_ignores_blank() {
        assert_eq!(search_term(&None), None);
        assert_eq!(search_term(&Some("  ".to_string())), None);
        assert_eq!(search_term(&Some(" Diallo ".to_string())), Some("%Diallo%".to_string()));
    }
}
