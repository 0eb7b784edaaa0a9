/// Upper bound for any single repeat count.
const MAX_REPEAT: usize = 10;

/// Builds a string for the common shapes of OpenAPI patterns: anchors,
/// literal runs, escapes, simple classes and counted repetition.
///
/// Negated classes such as `[^/]+` become a short run of digits. Anything
/// outside that subset (alternation, counted repeats of groups) degrades to the
/// pattern with its anchors removed.
pub fn create_string_from_pattern(pattern: &str) -> String {
    let body = strip_anchors(pattern);
    if body.is_empty() {
        return String::new();
    }

    let chars: Vec<char> = body.chars().collect();
    let mut out = String::new();
    let mut idx = 0;

    while idx < chars.len() {
        let (atom, next) = match chars[idx] {
            '\\' => match chars.get(idx + 1) {
                Some(&escaped) => (escape_atom(escaped), idx + 2),
                None => (Atom::Char('\\'), idx + 1),
            },
            '[' => match parse_class(&chars, idx + 1) {
                Some(parsed) => parsed,
                None => return body.to_string(),
            },
            '.' => (Atom::Char('a'), idx + 1),
            '(' => {
                let skip = if chars.get(idx + 1) == Some(&'?') && chars.get(idx + 2) == Some(&':') {
                    3
                } else {
                    1
                };
                idx += skip;
                continue;
            }
            ')' => {
                // The group body was emitted once, which satisfies `?`, `*`
                // and `+` but not a counted repeat.
                let (count, after) = parse_quantifier(&chars, idx + 1);
                if chars.get(idx + 1) == Some(&'{') && count != 1 {
                    return body.to_string();
                }
                idx = after;
                continue;
            }
            '|' => return body.to_string(),
            ch => (Atom::Char(ch), idx + 1),
        };

        let (count, after) = parse_quantifier(&chars, next);
        atom.emit(count, &mut out);
        idx = after;
    }

    out
}

enum Atom {
    Char(char),
    /// Placeholder digits for classes that exclude characters.
    Digits,
}

impl Atom {
    fn emit(&self, count: usize, out: &mut String) {
        for n in 0..count {
            match self {
                Self::Char(ch) => out.push(*ch),
                Self::Digits => out.push(char::from(b'0' + ((n + 1) % 10) as u8)),
            }
        }
    }
}

fn strip_anchors(pattern: &str) -> &str {
    let body = pattern.strip_prefix('^').unwrap_or(pattern);
    match body.strip_suffix('$') {
        Some(stripped) if !stripped.ends_with('\\') => stripped,
        _ => body,
    }
}

fn escape_atom(escaped: char) -> Atom {
    match escaped {
        'd' => Atom::Digits,
        'w' | 'D' | 'S' => Atom::Char('a'),
        's' => Atom::Char(' '),
        'W' => Atom::Char('-'),
        other => Atom::Char(other),
    }
}

/// Parses the class body starting after `[`; returns the atom and the index
/// after the closing `]`.
fn parse_class(chars: &[char], start: usize) -> Option<(Atom, usize)> {
    let mut idx = start;
    let negated = chars.get(idx) == Some(&'^');
    if negated {
        idx += 1;
    }
    let first = idx;
    // A leading `]` is a literal member.
    if chars.get(idx) == Some(&']') {
        idx += 1;
    }
    while idx < chars.len() && chars[idx] != ']' {
        idx += if chars[idx] == '\\' { 2 } else { 1 };
    }
    if idx >= chars.len() {
        return None;
    }

    let atom = if negated {
        Atom::Digits
    } else {
        match chars.get(first) {
            Some('\\') => chars.get(first + 1).map_or(Atom::Char('a'), |&ch| escape_atom(ch)),
            Some(&ch) if first < idx => Atom::Char(ch),
            _ => Atom::Char('a'),
        }
    };
    Some((atom, idx + 1))
}

/// Returns the repeat count, capped at `MAX_REPEAT`, and the index after the
/// quantifier.
fn parse_quantifier(chars: &[char], idx: usize) -> (usize, usize) {
    let (count, mut next) = match chars.get(idx) {
        Some('+') | Some('*') => (3, idx + 1),
        Some('?') => (1, idx + 1),
        Some('{') => match parse_braces(chars, idx + 1) {
            Some(parsed) => parsed,
            None => (1, idx),
        },
        _ => (1, idx),
    };
    // Lazy and possessive suffixes do not change the count.
    if next > idx && matches!(chars.get(next), Some('?' | '+')) {
        next += 1;
    }
    (count.min(MAX_REPEAT), next)
}

fn parse_braces(chars: &[char], start: usize) -> Option<(usize, usize)> {
    let end = start + chars[start..].iter().position(|&ch| ch == '}')?;
    let inner: String = chars[start..end].iter().collect();
    let count = match inner.split_once(',') {
        Some((min, max)) => {
            let min: usize = min.trim().parse().ok()?;
            let max = max.trim();
            if min == 0 && (max.is_empty() || max.parse::<usize>().ok()? > 0) {
                1
            } else {
                min
            }
        }
        None => inner.trim().parse().ok()?,
    };
    Some((count, end + 1))
}
