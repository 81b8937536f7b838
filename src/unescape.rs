//! Decoding of JSON string escape sequences.

/// A fragment of an escaped string
#[derive(Debug, PartialEq)]
enum Fragment<'a> {
    /// A series of characters which weren't escaped in the input.
    NotEscaped(&'a str),
    /// A character which was escaped in the input.
    Escaped(char),
}

/// Failed to unescape a character due to an invalid escape sequence.
#[derive(Debug, PartialEq)]
pub(crate) struct InvalidEscape;

fn split_first_slice(s: &str, len: usize) -> Option<(&str, &str)> {
    Some((s.get(..len)?, s.get(len..)?))
}

/// Reads the four hex digits of a `\u` escape
fn code_unit(s: &str) -> Result<(u16, &str), InvalidEscape> {
    let (digits, rest) = split_first_slice(s, 4).ok_or(InvalidEscape)?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(InvalidEscape);
    }
    let unit = u16::from_str_radix(digits, 16).map_err(|_| InvalidEscape)?;
    Ok((unit, rest))
}

fn unescape_next_fragment(escaped_string: &str) -> Result<(Fragment<'_>, &str), InvalidEscape> {
    let rest = match escaped_string.strip_prefix('\\') {
        Some(rest) => rest,
        None => {
            let (fragment, rest) =
                escaped_string.split_at(escaped_string.find('\\').unwrap_or(escaped_string.len()));
            return Ok((Fragment::NotEscaped(fragment), rest));
        }
    };

    let mut chars = rest.chars();
    let unescaped = match chars.next() {
        Some('"') => '"',
        Some('\\') => '\\',
        Some('/') => '/',
        Some('b') => '\x08',
        Some('f') => '\x0C',
        Some('n') => '\n',
        Some('r') => '\r',
        Some('t') => '\t',
        Some('u') => {
            let (high, rest) = code_unit(chars.as_str())?;
            let (code_point, rest) = match high {
                0xD800..=0xDBFF => {
                    // a high surrogate must be followed by an escaped low surrogate
                    let rest = rest.strip_prefix("\\u").ok_or(InvalidEscape)?;
                    let (low, rest) = code_unit(rest)?;
                    if !(0xDC00..=0xDFFF).contains(&low) {
                        return Err(InvalidEscape);
                    }
                    let c = 0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                    (c, rest)
                }
                _ => (u32::from(high), rest),
            };
            chars = rest.chars();
            char::from_u32(code_point).ok_or(InvalidEscape)?
        }
        _ => return Err(InvalidEscape),
    };

    Ok((Fragment::Escaped(unescaped), chars.as_str()))
}

/// Decodes every escape sequence in the raw contents of a JSON string.
pub(crate) fn unescape(mut escaped_string: &str) -> Result<String, InvalidEscape> {
    let mut unescaped = String::with_capacity(escaped_string.len());

    while !escaped_string.is_empty() {
        let (fragment, rest) = unescape_next_fragment(escaped_string)?;
        match fragment {
            Fragment::NotEscaped(s) => unescaped.push_str(s),
            Fragment::Escaped(c) => unescaped.push(c),
        }
        escaped_string = rest;
    }

    Ok(unescaped)
}

#[cfg(test)]
mod tests {
    use super::{unescape, InvalidEscape};

    #[test]
    fn simple_escapes() {
        assert_eq!(
            unescape(r#"a\"b\\c\/d\be\ff\ng\rh\ti"#),
            Ok(String::from("a\"b\\c/d\x08e\x0Cf\ng\rh\ti"))
        );
    }

    #[test]
    fn unicode_escapes() {
        assert_eq!(unescape(r"Party\u0021"), Ok(String::from("Party!")));
        assert_eq!(unescape(r"\u2600 shines"), Ok(String::from("\u{2600} shines")));
        assert_eq!(unescape(r"\ud83d\ude00"), Ok(String::from("\u{1F600}")));
    }

    #[test]
    fn invalid_escapes() {
        assert_eq!(unescape(r"\x"), Err(InvalidEscape));
        assert_eq!(unescape(r"\u12"), Err(InvalidEscape));
        assert_eq!(unescape(r"\u+123"), Err(InvalidEscape));
        assert_eq!(unescape(r"\ud83d"), Err(InvalidEscape));
        assert_eq!(unescape(r"\ud83dA"), Err(InvalidEscape));
        assert_eq!(unescape(r"\ude00"), Err(InvalidEscape));
        assert_eq!(unescape("\\"), Err(InvalidEscape));
    }
}
