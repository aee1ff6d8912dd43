/// Read the leading decimal number of a user-entered value.
///
/// Leading whitespace is skipped and anything after the number is ignored,
/// so "85%" reads as 85, "3 credits" as 3 and "1,0" as 1. Only an optional
/// sign, digits, a fraction and an exponent are recognized; "NaN", "inf" and
/// hex spellings are not numbers.
pub fn parse_number(raw: &str) -> Option<f64> {
    let text = raw.trim_start();
    let bytes = text.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    // An exponent only counts when digits follow it
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    text[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// A reported grade, classified once by the shape of its text.
///
/// Anything that starts with a number is matched against numeric bands only,
/// even when a letter column happens to hold the same text.
#[derive(Debug, Clone, PartialEq)]
pub enum RawGrade {
    Numeric(f64),
    Symbolic(String),
}

impl RawGrade {
    pub fn parse(raw: &str) -> Self {
        match parse_number(raw) {
            Some(value) => RawGrade::Numeric(value),
            None => RawGrade::Symbolic(raw.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer() {
        assert_eq!(RawGrade::parse("85"), RawGrade::Numeric(85.0));
    }

    #[test]
    fn test_parse_decimal_with_whitespace() {
        assert_eq!(RawGrade::parse(" 3.75 "), RawGrade::Numeric(3.75));
    }

    #[test]
    fn test_parse_letter() {
        assert_eq!(RawGrade::parse("A-"), RawGrade::Symbolic("A-".to_string()));
    }

    #[test]
    fn test_parse_keeps_symbolic_text_verbatim() {
        assert_eq!(RawGrade::parse(" B "), RawGrade::Symbolic(" B ".to_string()));
    }

    #[test]
    fn test_parse_reads_leading_number() {
        assert_eq!(RawGrade::parse("85%"), RawGrade::Numeric(85.0));
        assert_eq!(RawGrade::parse("90-100"), RawGrade::Numeric(90.0));
        assert_eq!(RawGrade::parse("1,0"), RawGrade::Numeric(1.0));
    }

    #[test]
    fn test_parse_non_finite_is_symbolic() {
        assert_eq!(RawGrade::parse("NaN"), RawGrade::Symbolic("NaN".to_string()));
        assert_eq!(RawGrade::parse("inf"), RawGrade::Symbolic("inf".to_string()));
        assert_eq!(
            RawGrade::parse("Infinity"),
            RawGrade::Symbolic("Infinity".to_string())
        );
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("3"), Some(3.0));
        assert_eq!(parse_number("1.5"), Some(1.5));
        assert_eq!(parse_number("-1"), Some(-1.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("three"), None);
    }

    #[test]
    fn test_parse_number_ignores_trailing_text() {
        assert_eq!(parse_number("3 credits"), Some(3.0));
        assert_eq!(parse_number("3h"), Some(3.0));
        assert_eq!(parse_number("85%"), Some(85.0));
        assert_eq!(parse_number("1,0"), Some(1.0));
        assert_eq!(parse_number("  4.5 hrs"), Some(4.5));
        assert_eq!(parse_number("0x1F"), Some(0.0));
    }

    #[test]
    fn test_parse_number_fraction_and_exponent() {
        assert_eq!(parse_number(".5"), Some(0.5));
        assert_eq!(parse_number("5."), Some(5.0));
        assert_eq!(parse_number("+2"), Some(2.0));
        assert_eq!(parse_number("1e2"), Some(100.0));
        assert_eq!(parse_number("2E-1x"), Some(0.2));
        assert_eq!(parse_number("7e"), Some(7.0));
        assert_eq!(parse_number("7e+"), Some(7.0));
    }

    #[test]
    fn test_parse_number_rejects_bare_punctuation() {
        assert_eq!(parse_number("."), None);
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_number("-.e5"), None);
        assert_eq!(parse_number("%85"), None);
        assert_eq!(parse_number("1e400"), None);
    }
}
