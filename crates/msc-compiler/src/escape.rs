//! C escape sequence decoding for string literals.

/// A malformed escape sequence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EscapeError {
    #[error("string ends with a lone backslash")]
    TrailingBackslash,

    #[error("hex escape needs two hex digits")]
    InvalidHex,

    #[error("unknown escape sequence `\\{0}`")]
    Unknown(char),
}

/// Decode `\n`-style escapes, three-digit octal `\ooo` and two-digit `\xhh`.
pub fn decode_escapes(raw: &str) -> Result<String, EscapeError> {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        i += 1;
        if c != '\\' {
            out.push(c);
            continue;
        }

        let Some(&next) = chars.get(i) else {
            return Err(EscapeError::TrailingBackslash);
        };

        if let Some(value) = octal(&chars[i..]) {
            out.push(value);
            i += 3;
            continue;
        }

        i += 1;
        let decoded = match next {
            '\\' => '\\',
            'n' => '\n',
            'a' => '\x07',
            'b' => '\x08',
            'f' => '\x0C',
            'r' => '\r',
            't' => '\t',
            'v' => '\x0B',
            '\'' => '\'',
            '"' => '"',
            '?' => '?',
            '0' => '\0',
            'x' => {
                let digits: String = chars.get(i..i + 2).ok_or(EscapeError::InvalidHex)?.iter().collect();
                let value = u8::from_str_radix(&digits, 16).map_err(|_| EscapeError::InvalidHex)?;
                i += 2;
                char::from(value)
            }
            other => return Err(EscapeError::Unknown(other)),
        };
        out.push(decoded);
    }

    Ok(out)
}

fn octal(rest: &[char]) -> Option<char> {
    let digits = rest.get(..3)?;
    if !digits.iter().all(|c| ('0'..='7').contains(c)) {
        return None;
    }
    let value = digits
        .iter()
        .fold(0u32, |acc, c| acc * 8 + c.to_digit(8).unwrap_or(0));
    char::from_u32(value)
}
