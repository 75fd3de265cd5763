use memchr::memchr;

/// Longest entity we try to decode, `&` and `;` included (`&#x10FFFF;`).
const MAX_ENTITY_LEN: usize = 10;

/// Decode the entities server templates actually emit.
///
/// Named: `&amp;`, `&lt;`, `&gt;`, `&quot;`, `&apos;`, `&nbsp;`. Numeric: `&#39;`,
/// `&#x27;`. Anything unknown, unterminated or out of range is kept verbatim.
pub(crate) fn decode_entities(s: &str) -> String {
    if memchr(b'&', s.as_bytes()).is_none() {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match decode_one(tail) {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_one(tail: &str) -> Option<(char, usize)> {
    let semi = tail
        .bytes()
        .take(MAX_ENTITY_LEN)
        .position(|b| b == b';')?;
    let body = &tail[1..semi];
    let ch = match body {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        _ => {
            let digits = body.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) if hex.bytes().all(|b| b.is_ascii_hexdigit()) => {
                    u32::from_str_radix(hex, 16).ok()?
                }
                Some(_) => return None,
                None if digits.bytes().all(|b| b.is_ascii_digit()) => digits.parse().ok()?,
                None => return None,
            };
            char::from_u32(code)?
        }
    };
    Some((ch, semi + 1))
}
