use mimicry_core::validation::compile_pattern;

const REGEX_MARKERS: &[char] = &['\\', '.', '*', '^', '$', '+', '?', '(', '[', '{', '|'];

/// Convert a field name to the snake_case form context data is keyed by.
///
/// `userId` becomes `user_id`, `HTTPServer` becomes `http_server` and every
/// run of other characters (dots, hyphens, spaces) folds into one underscore,
/// so `X-Request-ID` becomes `x_request_id`. A leading digit gets an `n_`
/// prefix.
pub fn to_snake_case(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 4);

    for (idx, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && idx > 0 {
            let prev = chars[idx - 1];
            let next_is_lower = chars.get(idx + 1).is_some_and(|next| next.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
        }
        for lower in ch.to_lowercase() {
            if lower.is_ascii_alphanumeric() {
                out.push(lower);
            } else if !out.ends_with('_') {
                out.push('_');
            }
        }
    }

    let snake = out.trim_matches('_');
    if snake.starts_with(|ch: char| ch.is_ascii_digit()) {
        format!("n_{snake}")
    } else {
        snake.to_string()
    }
}

/// Cheap check for context keys that should be treated as regular expressions.
pub fn maybe_regex_pattern(input: &str) -> bool {
    input.contains(REGEX_MARKERS)
}

/// Unanchored regex match; an uncompilable pattern never matches.
pub fn matches_pattern(value: &str, pattern: &str) -> bool {
    compile_pattern(pattern).is_some_and(|regex| regex.is_match(value))
}
