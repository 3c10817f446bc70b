//! Doublestar glob matching over `/`-separated keys.
//!
//! `**` spans zero or more whole segments; `*`, `?` and `[...]` stay inside one
//! segment; `{a,b}` alternates. Patterns are anchored at both ends.

const META: &[char] = &['*', '?', '[', '{'];

pub fn has_meta(s: &str) -> bool {
    s.contains(META)
}

/// Literal leading segments of `pattern`, joined with `/`.
///
/// A pattern without metacharacters is its own prefix.
pub fn literal_prefix(pattern: &str) -> String {
    pattern
        .split('/')
        .take_while(|segment| !has_meta(segment))
        .collect::<Vec<_>>()
        .join("/")
}

/// Compiled pattern; brace alternatives are expanded once up front.
#[derive(Debug, Clone)]
pub struct Glob {
    alternatives: Vec<Vec<String>>,
}

impl Glob {
    pub fn new(pattern: &str) -> Self {
        let alternatives = expand_braces(pattern)
            .into_iter()
            .map(|alt| alt.split('/').map(String::from).collect())
            .collect();
        Self { alternatives }
    }

    pub fn is_match(&self, key: &str) -> bool {
        let key: Vec<&str> = key.split('/').collect();
        self.alternatives.iter().any(|alt| {
            let pattern: Vec<&str> = alt.iter().map(String::as_str).collect();
            match_segments(&pattern, &key)
        })
    }
}

fn match_segments(pattern: &[&str], key: &[&str]) -> bool {
    match pattern.split_first() {
        None => key.is_empty(),
        Some((&"**", rest)) => {
            match_segments(rest, key) || (!key.is_empty() && match_segments(pattern, &key[1..]))
        }
        Some((segment, rest)) => match key.split_first() {
            Some((head, tail)) => match_segment(segment, head) && match_segments(rest, tail),
            None => false,
        },
    }
}

fn match_segment(pattern: &str, segment: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let s: Vec<char> = segment.chars().collect();
    match_chars(&p, &s)
}

fn match_chars(p: &[char], s: &[char]) -> bool {
    match p.first() {
        None => s.is_empty(),
        Some('*') => (0..=s.len()).any(|i| match_chars(&p[1..], &s[i..])),
        Some('?') => !s.is_empty() && match_chars(&p[1..], &s[1..]),
        Some('[') => match parse_class(&p[1..]) {
            Some((class, rest)) => match s.first() {
                Some(&c) => class.matches(c) && match_chars(rest, &s[1..]),
                None => false,
            },
            None => s.first() == Some(&'[') && match_chars(&p[1..], &s[1..]),
        },
        Some('\\') if p.len() > 1 => s.first() == Some(&p[1]) && match_chars(&p[2..], &s[1..]),
        Some(c) => s.first() == Some(c) && match_chars(&p[1..], &s[1..]),
    }
}

struct CharClass {
    negated: bool,
    ranges: Vec<(char, char)>,
}

impl CharClass {
    fn matches(&self, c: char) -> bool {
        let hit = self.ranges.iter().any(|&(lo, hi)| lo <= c && c <= hi);
        hit != self.negated
    }
}

/// Parses the body of a `[...]` class; `p` starts just after the `[`.
/// Returns `None` when the class is unterminated.
fn parse_class(p: &[char]) -> Option<(CharClass, &[char])> {
    let mut i = 0;
    let negated = matches!(p.first(), Some('!' | '^'));
    if negated {
        i += 1;
    }

    let mut ranges = Vec::new();
    let mut first = true;
    while i < p.len() {
        let c = p[i];
        if c == ']' && !first {
            return Some((CharClass { negated, ranges }, &p[i + 1..]));
        }
        first = false;
        if i + 2 < p.len() && p[i + 1] == '-' && p[i + 2] != ']' {
            ranges.push((c, p[i + 2]));
            i += 3;
        } else {
            ranges.push((c, c));
            i += 1;
        }
    }
    None
}

/// Expands `{a,b}` groups (nesting allowed) into every literal alternative.
fn expand_braces(pattern: &str) -> Vec<String> {
    let chars: Vec<char> = pattern.chars().collect();
    let Some(open) = chars.iter().position(|&c| c == '{') else {
        return vec![pattern.to_string()];
    };

    let mut depth = 0;
    let mut close = None;
    let mut commas = Vec::new();
    for (i, &c) in chars.iter().enumerate().skip(open) {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(i);
                    break;
                }
            }
            ',' if depth == 1 => commas.push(i),
            _ => {}
        }
    }
    let Some(close) = close else {
        return vec![pattern.to_string()];
    };

    let head: String = chars[..open].iter().collect();
    let tail: String = chars[close + 1..].iter().collect();
    let mut bounds = vec![open];
    bounds.extend(&commas);
    bounds.push(close);

    bounds
        .windows(2)
        .flat_map(|w| {
            let option: String = chars[w[0] + 1..w[1]].iter().collect();
            expand_braces(&format!("{head}{option}{tail}"))
        })
        .collect()
}
