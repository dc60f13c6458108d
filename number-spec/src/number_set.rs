use std::collections::BTreeSet;

use crate::error::InvalidSpecification;

/// Parses a number specification into the set of positive integers it
/// denotes.
///
/// Grammar: tokens separated by commas and/or whitespace; each token is
/// either a positive integer or an inclusive `start-end` range where both
/// bounds are positive integers and `start <= end`.
///
/// ```
/// use number_spec::parse_number_spec;
/// use std::collections::BTreeSet;
///
/// assert_eq!(parse_number_spec("1-3, 5").unwrap(), BTreeSet::from([1, 2, 3, 5]));
/// ```
pub fn parse(spec: &str) -> Result<BTreeSet<u64>, InvalidSpecification> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Err(InvalidSpecification::Empty);
    }

    let mut numbers = BTreeSet::new();
    for comma_part in spec.split(',') {
        for token in comma_part.split_whitespace() {
            numbers.extend(parse_token(token)?);
        }
    }

    if numbers.is_empty() {
        return Err(InvalidSpecification::Empty);
    }
    Ok(numbers)
}

fn parse_token(token: &str) -> Result<Vec<u64>, InvalidSpecification> {
    // A real range has exactly one interior '-': not a leading/trailing sign.
    if let Some(dash) = interior_dash(token) {
        let (start_str, end_str) = (&token[..dash], &token[dash + 1..]);
        if start_str.is_empty() || end_str.is_empty() {
            return Err(InvalidSpecification::MalformedRange(token.to_string()));
        }
        let start = parse_positive_integer(start_str)
            .map_err(|_| InvalidSpecification::MalformedRange(token.to_string()))?;
        let end = parse_positive_integer(end_str)
            .map_err(|_| InvalidSpecification::MalformedRange(token.to_string()))?;
        if start > end {
            return Err(InvalidSpecification::RangeStartAfterEnd(token.to_string()));
        }
        return Ok((start..=end).collect());
    }

    Ok(vec![parse_positive_integer(token)?])
}

/// Finds the position of a single interior `-` that splits `token` into a
/// `start-end` range, or `None` if `token` should be parsed as a bare
/// integer (including negative integers, which are rejected downstream with
/// a clearer "not a positive integer" error rather than a range error).
fn interior_dash(token: &str) -> Option<usize> {
    if token.starts_with('-') || token.ends_with('-') {
        return None;
    }
    let mut dashes = token.match_indices('-');
    let first = dashes.next()?;
    if dashes.next().is_some() {
        // More than one '-': not a simple range (e.g. "1--3").
        return None;
    }
    Some(first.0)
}

fn parse_positive_integer(s: &str) -> Result<u64, InvalidSpecification> {
    let n: i64 = s
        .parse()
        .map_err(|_| InvalidSpecification::NotAPositiveInteger(s.to_string()))?;
    if n <= 0 {
        return Err(InvalidSpecification::NotAPositiveInteger(s.to_string()));
    }
    Ok(n as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_number() {
        assert_eq!(parse("1").unwrap(), BTreeSet::from([1]));
    }

    #[test]
    fn list_with_commas_and_spaces() {
        assert_eq!(parse("1, 3 5").unwrap(), BTreeSet::from([1, 3, 5]));
    }

    #[test]
    fn range() {
        assert_eq!(parse("1-5").unwrap(), BTreeSet::from([1, 2, 3, 4, 5]));
    }

    #[test]
    fn degenerate_range() {
        assert_eq!(parse("1-1").unwrap(), BTreeSet::from([1]));
    }

    #[test]
    fn combined() {
        assert_eq!(parse("1-3, 5").unwrap(), BTreeSet::from([1, 2, 3, 5]));
    }

    #[test]
    fn rejects_invalid_forms() {
        for bad in ["0", "-1", "5-1", "1--3", "abc", ""] {
            assert!(parse(bad).is_err(), "expected '{bad}' to be invalid");
        }
    }
}
