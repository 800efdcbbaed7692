use anyhow::{Context, Result, bail};
use std::collections::HashSet;

const DEFAULT_SEED: u64 = 1337;
const MAX_RANGE_LEN: u64 = 10_000;

/// Resolve CLI seed tokens into a deduplicated, ordered seed list.
///
/// Supports literal integers (negative values use their magnitude) and
/// half-open ranges written `start..end`.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut pending: Vec<u64> = Vec::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        if let Some((start, end)) = token.split_once("..") {
            pending.extend(parse_range(start, end)?);
            continue;
        }

        if let Ok(value) = token.parse::<i64>() {
            pending.push(value.unsigned_abs());
            continue;
        }

        if let Ok(value) = token.parse::<u64>() {
            pending.push(value);
            continue;
        }

        bail!("Unrecognized seed token: {token}");
    }

    let mut seen = HashSet::new();
    pending.retain(|seed| seen.insert(*seed));

    if pending.is_empty() {
        pending.push(DEFAULT_SEED);
    }

    Ok(pending)
}

fn parse_range(start: &str, end: &str) -> Result<std::ops::Range<u64>> {
    let start: u64 = start
        .trim()
        .parse()
        .with_context(|| format!("invalid range start: {start}"))?;
    let end: u64 = end
        .trim()
        .parse()
        .with_context(|| format!("invalid range end: {end}"))?;
    if end <= start {
        bail!("empty seed range {start}..{end}");
    }
    if end - start > MAX_RANGE_LEN {
        bail!("seed range {start}..{end} exceeds {MAX_RANGE_LEN} seeds");
    }
    Ok(start..end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn resolves_numbers_and_ranges_in_order() {
        let seeds = resolve_seed_inputs(&tokens(&["42", "-7", "3..6", "4"])).unwrap();
        assert_eq!(seeds, vec![42, 7, 3, 4, 5]);
    }

    #[test]
    fn empty_input_falls_back_to_default() {
        assert_eq!(resolve_seed_inputs(&[]).unwrap(), vec![DEFAULT_SEED]);
    }

    #[test]
    fn rejects_garbage_and_bad_ranges() {
        assert!(resolve_seed_inputs(&tokens(&["banana"])).is_err());
        assert!(resolve_seed_inputs(&tokens(&["9..3"])).is_err());
        assert!(resolve_seed_inputs(&tokens(&["0..20000"])).is_err());
    }
}
