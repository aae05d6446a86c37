use crate::{Line, Reading, Readings};

/// Decodes one fragment of input.
///
/// Accepts `(Na|digits) [a] (Nb [b] | digits b)`, case insensitive, with
/// whitespace allowed around the whole line and either side of the
/// separator and terminator. The `b` of `Nb` ends the line by itself.
/// Anything else, including numbers that do not fit in an `i32`, is
/// [`Line::Malformed`].
pub fn decode(fragment: &[u8]) -> Line {
    let line = trim(fragment);

    match fields(line).or_else(|| split_digit_run(line)) {
        Some(readings) => Line::Readings(readings),
        None => Line::Malformed,
    }
}

fn fields(line: &[u8]) -> Option<Readings> {
    let (a, rest) = field(line, b'a')?;

    let rest = skip_space(rest);
    let rest = match rest.split_first() {
        Some((separator, tail)) if separator.eq_ignore_ascii_case(&b'a') => skip_space(tail),
        _ => rest,
    };

    let (b, rest) = field(rest, b'b')?;
    let ended = match b {
        Reading::Absent => skip_space(rest).is_empty() || is_terminator(rest),
        Reading::Present(_) => is_terminator(rest),
    };
    ended.then_some(Readings { a, b })
}

/// A digit run with no separator after it is shared between both fields,
/// with the final digit belonging to field B (`1234b` is `123` and `4`).
fn split_digit_run(line: &[u8]) -> Option<Readings> {
    let len = digit_run(line);
    if len < 2 || !is_terminator(&line[len..]) {
        return None;
    }

    let (a, b) = line[..len].split_at(len - 1);
    Some(Readings {
        a: Reading::Present(number(a)?),
        b: Reading::Present(number(b)?),
    })
}

fn field(input: &[u8], absent_suffix: u8) -> Option<(Reading, &[u8])> {
    match input {
        [n, suffix, rest @ ..]
            if n.eq_ignore_ascii_case(&b'n') && suffix.eq_ignore_ascii_case(&absent_suffix) =>
        {
            Some((Reading::Absent, rest))
        }
        _ => {
            let (digits, rest) = input.split_at(digit_run(input));
            Some((Reading::Present(number(digits)?), rest))
        }
    }
}

fn is_terminator(input: &[u8]) -> bool {
    matches!(skip_space(input), [b] if b.eq_ignore_ascii_case(&b'b'))
}

fn digit_run(input: &[u8]) -> usize {
    input.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn number(digits: &[u8]) -> Option<i32> {
    if digits.is_empty() {
        return None;
    }

    digits.iter().try_fold(0i32, |value, digit| {
        value.checked_mul(10)?.checked_add(i32::from(digit - b'0'))
    })
}

// ASCII whitespace plus vertical tab.
fn is_space(b: &u8) -> bool {
    b.is_ascii_whitespace() || *b == 0x0b
}

fn skip_space(input: &[u8]) -> &[u8] {
    let start = input.iter().position(|b| !is_space(b)).unwrap_or(input.len());
    &input[start..]
}

fn trim(input: &[u8]) -> &[u8] {
    let input = skip_space(input);
    let end = input.iter().rposition(|b| !is_space(b)).map_or(0, |i| i + 1);
    &input[..end]
}

#[cfg(test)]
mod test {
    use super::*;

    fn present(a: i32, b: i32) -> Line {
        Line::Readings(Readings {
            a: Reading::Present(a),
            b: Reading::Present(b),
        })
    }

    #[test]
    fn absent_tokens_any_case() {
        let absent_a = Line::Readings(Readings {
            a: Reading::Absent,
            b: Reading::Present(31),
        });

        assert_eq!(decode(b"Na31b"), absent_a);
        assert_eq!(decode(b"na31b"), absent_a);
        assert_eq!(decode(b"NA31B"), absent_a);
        assert_eq!(decode(b"nA31b"), absent_a);

        assert_eq!(
            decode(b"120ANB"),
            Line::Readings(Readings {
                a: Reading::Present(120),
                b: Reading::Absent,
            })
        );
        assert_eq!(
            decode(b"nanb"),
            Line::Readings(Readings {
                a: Reading::Absent,
                b: Reading::Absent,
            })
        );
    }

    #[test]
    fn absent_b_ends_the_line() {
        let absent_b = Line::Readings(Readings {
            a: Reading::Present(120),
            b: Reading::Absent,
        });
        let both_absent = Line::Readings(Readings {
            a: Reading::Absent,
            b: Reading::Absent,
        });

        assert_eq!(decode(b"120aNb"), absent_b);
        assert_eq!(decode(b"120 a Nb \r\n"), absent_b);
        assert_eq!(decode(b"120Nb"), absent_b);
        assert_eq!(decode(b"NaNb"), both_absent);
        assert_eq!(decode(b"NaNb\n"), both_absent);
        assert_eq!(decode(b"NaNbb"), both_absent);
        assert_eq!(decode(b"NaNb B"), both_absent);

        assert_eq!(decode(b"NaNbbb"), Line::Malformed);
        assert_eq!(decode(b"NaNb7"), Line::Malformed);
        assert_eq!(decode(b"120aNbx"), Line::Malformed);
        assert_eq!(decode(b"120aN"), Line::Malformed);
    }

    #[test]
    fn separator_is_optional() {
        assert_eq!(decode(b"12 34b"), present(12, 34));
        assert_eq!(decode(b"12\t34 b"), present(12, 34));
        assert_eq!(
            decode(b"Na a Nb b"),
            Line::Readings(Readings {
                a: Reading::Absent,
                b: Reading::Absent,
            })
        );
        assert_eq!(
            decode(b"Naa7b"),
            Line::Readings(Readings {
                a: Reading::Absent,
                b: Reading::Present(7),
            })
        );
    }

    #[test]
    fn unseparated_digits_give_last_digit_to_b() {
        assert_eq!(decode(b"1234b"), present(123, 4));
        assert_eq!(decode(b"12b"), present(1, 2));
        assert_eq!(decode(b"123 b"), present(12, 3));
        assert_eq!(decode(b"1b"), Line::Malformed);
        assert_eq!(decode(b"123a b"), Line::Malformed);
    }

    #[test]
    fn whitespace_inside_tokens_is_rejected() {
        assert_eq!(decode(b"1 23a456b"), Line::Malformed);
        assert_eq!(decode(b"N a31b"), Line::Malformed);
        assert_eq!(decode(b"123aN b"), Line::Malformed);
        assert_eq!(decode(b"123a4 56b"), Line::Malformed);
    }

    #[test]
    fn whitespace_around_line() {
        assert_eq!(decode(b"\x0b\x0c 5a6b \r\n"), present(5, 6));
        assert_eq!(decode(b"   "), Line::Malformed);
        assert_eq!(decode(b""), Line::Malformed);
    }

    #[test]
    fn no_partial_matches() {
        assert_eq!(decode(b"x123a456b"), Line::Malformed);
        assert_eq!(decode(b"123a456bx"), Line::Malformed);
        assert_eq!(decode(b"123a456bb"), Line::Malformed);
        assert_eq!(decode(b"123a456b 7"), Line::Malformed);
        assert_eq!(decode(b"123aa456b"), Line::Malformed);
        assert_eq!(decode(b"a456b"), Line::Malformed);
        assert_eq!(decode(b"123a"), Line::Malformed);
        assert_eq!(decode(b"Nab"), Line::Malformed);
        assert_eq!(decode(b"-1a5b"), Line::Malformed);
    }

    #[test]
    fn value_range() {
        assert_eq!(decode(b"0a2147483647b"), present(0, i32::MAX));
        assert_eq!(decode(b"007a010b"), present(7, 10));
        assert_eq!(decode(b"2147483648a1b"), Line::Malformed);
        assert_eq!(decode(b"1a99999999999999999999b"), Line::Malformed);
    }

    #[test]
    fn total_over_short_inputs() {
        for first in 0..=u8::MAX {
            for second in 0..=u8::MAX {
                let _ = decode(&[first, second]);
                let _ = decode(&[first, b'a', second, b'b']);
            }
        }
    }

    #[test]
    fn total_over_noise() {
        let mut state: u32 = 0x1234_5678;
        let mut noise = [0u8; 512];

        for _ in 0..256 {
            for byte in noise.iter_mut() {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                *byte = state as u8;
            }

            let len = (state as usize) % noise.len();
            let _ = decode(&noise[..len]);
        }
    }
}
