//! String resource escaping
//!
//! Converts between the text an author writes inside `<string>` elements and
//! the text an app sees at runtime:
//!
//! - `\n`, `\t`, `\uXXXX` and `\<char>` escapes
//! - surrounding double quotes that preserve whitespace verbatim
//! - whitespace folding outside quotes
//! - optional decoding of XML entities (`&lt;`, `&#169;`, `&#xA9;`)

const ENTITIES: [(&str, char); 5] = [
    ("&lt;", '<'),
    ("&amp;", '&'),
    ("&quot;", '"'),
    ("&apos;", '\''),
    ("&gt;", '>'),
];

/// Whether the character at `index` is preceded by an odd number of
/// backslashes. Index `0` and `len` are never escaped.
pub fn is_escaped(s: &str, index: usize) -> bool {
    let chars: Vec<char> = s.chars().collect();
    is_escaped_chars(&chars, index)
}

fn is_escaped_chars(chars: &[char], index: usize) -> bool {
    if index == 0 || index >= chars.len() {
        return false;
    }
    let backslashes = chars[..index]
        .iter()
        .rev()
        .take_while(|&&c| c == '\\')
        .count();
    backslashes % 2 == 1
}

/// Resolve authored resource text.
///
/// `escape_entities` decodes XML entities left in the text; `trim` strips
/// surrounding whitespace and quotes and folds whitespace runs outside quotes.
pub fn unescape_resource_string(s: &str, escape_entities: bool, trim: bool) -> String {
    let chars: Vec<char> = s.chars().collect();
    let len = chars.len();
    let mut start = 0;
    let mut end = len;
    let mut quoted = false;

    if trim {
        while start < end && chars[start].is_whitespace() {
            start += 1;
        }
        end = trim_trailing(&chars, start, end, char::is_whitespace);

        let quote_end = end;
        while start < end && chars[start] == '"' {
            quoted = true;
            start += 1;
        }
        if quoted {
            end = trim_trailing(&chars, start, end, |c| c == '"');
        }
        if end == start {
            return String::new();
        }

        if !quoted {
            while start < end && chars[start].is_whitespace() {
                start += 1;
            }
            if end == quote_end {
                end = trim_trailing(&chars, start, end, char::is_whitespace);
            }
            if end == start {
                return String::new();
            }
        }
    }

    let mut fold_whitespace = false;
    if !quoted {
        let mut prev_space = false;
        let mut has_escape = false;
        for &c in &chars[start..end] {
            if c == '\\' || c == '&' {
                has_escape = true;
            }
            let is_space = c.is_whitespace();
            if (is_space && prev_space) || c == '\n' {
                fold_whitespace = true;
            }
            prev_space = is_space;
        }
        if !trim {
            fold_whitespace = false;
        }
        if !fold_whitespace && !has_escape && start == 0 && end == len {
            return s.to_string();
        }
    }

    let mut out = String::with_capacity(end - start);
    let mut prev_space = false;
    let mut i = start;
    while i < end {
        let c = chars[i];
        if c == '\\' && i + 1 < end {
            prev_space = false;
            let next = chars[i + 1];
            match next {
                'u' if i + 5 < end => {
                    let hex: String = chars[i + 2..i + 6].iter().collect();
                    match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                        Some(decoded) => {
                            out.push(decoded);
                            i += 6;
                        }
                        None => {
                            out.push(c);
                            i += 1;
                        }
                    }
                    continue;
                }
                'n' => out.push('\n'),
                't' => out.push('\t'),
                other => out.push(other),
            }
            i += 2;
            continue;
        }

        if c == '&' && escape_entities {
            prev_space = false;
            if let Some((entity, decoded)) = ENTITIES
                .iter()
                .find(|(entity, _)| region_matches_ignore_case(&chars, i, entity))
            {
                out.push(*decoded);
                i += entity.chars().count();
                continue;
            }
            if let Some((decoded, next)) = decode_numeric_entity(&chars, i, end) {
                out.push(decoded);
                i = next;
                continue;
            }
        }

        if fold_whitespace {
            let is_space = c.is_whitespace();
            if !is_space {
                out.push(c);
            } else if !prev_space {
                out.push(' ');
            }
            prev_space = is_space;
        } else {
            out.push(c);
        }
        i += 1;
    }
    out
}

/// Move `end` back over characters matching `strip`, keeping an escaped
/// character that was stripped.
fn trim_trailing(chars: &[char], start: usize, mut end: usize, strip: impl Fn(char) -> bool) -> usize {
    while end > start {
        if !strip(chars[end - 1]) {
            if end < chars.len() && is_escaped_chars(chars, end) {
                end += 1;
            }
            break;
        }
        end -= 1;
    }
    end
}

fn region_matches_ignore_case(chars: &[char], at: usize, needle: &str) -> bool {
    let mut index = at;
    for expected in needle.chars() {
        match chars.get(index) {
            Some(c) if c.eq_ignore_ascii_case(&expected) => index += 1,
            _ => return false,
        }
    }
    true
}

/// Decode `&#NNN;` or `&#xHH;` starting at `at`; returns the character and
/// the index after the `;`.
fn decode_numeric_entity(chars: &[char], at: usize, end: usize) -> Option<(char, usize)> {
    if at + 2 >= end || chars[at + 1] != '#' {
        return None;
    }
    let semicolon = (at + 1..chars.len()).find(|&j| chars[j] == ';')?;
    let hex = matches!(chars[at + 2], 'x' | 'X');
    let digits_start = at + if hex { 3 } else { 2 };
    if digits_start > semicolon {
        return None;
    }
    let digits: String = chars[digits_start..semicolon].iter().collect();
    let value = u32::from_str_radix(&digits, if hex { 16 } else { 10 }).ok()?;
    char::from_u32(value).map(|c| (c, semicolon + 1))
}

/// Whitespace that survives escaping literally (`\n` and `\t` are escaped).
fn is_literal_space(c: char) -> bool {
    c.is_whitespace() && c != '\n' && c != '\t'
}

/// Escape runtime text so it can be written inside a `<string>` element.
///
/// With `escape_xml`, `<` and `&` become entities; pass `false` when the text
/// goes through an XML writer that escapes on its own.
pub fn escape_resource_string(s: &str, escape_xml: bool) -> String {
    let chars: Vec<char> = s.chars().collect();
    let (Some(&first), Some(&last)) = (chars.first(), chars.last()) else {
        return String::new();
    };

    let quoted = is_literal_space(first)
        || is_literal_space(last)
        || chars
            .windows(2)
            .any(|pair| is_literal_space(pair[0]) && is_literal_space(pair[1]));

    let mut out = String::with_capacity(s.len() * 2);
    if quoted {
        out.push('"');
    } else if first == '@' || first == '?' {
        out.push('\\');
    }

    for &c in &chars {
        match c {
            '\'' => {
                if !quoted {
                    out.push('\\');
                }
                out.push(c);
            }
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '<' if escape_xml => out.push_str("&lt;"),
            '&' if escape_xml => out.push_str("&amp;"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }

    if quoted {
        out.push('"');
    }
    out
}
