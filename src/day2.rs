use crate::util::{input_lines, read_input};
use anyhow::{anyhow, Result};
use ascii::AsciiChar;
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet};

const A_LOWER_ASCII: u8 = AsciiChar::a.as_byte();
const Z_LOWER_ASCII: u8 = AsciiChar::z.as_byte();

const ALPHABET_LEN: usize = 26;

type LetterCounts = [u32; ALPHABET_LEN];

fn letter_counts(id: &str) -> Result<LetterCounts> {
    let mut counts = [0u32; ALPHABET_LEN];
    for byte in id.bytes() {
        match byte {
            A_LOWER_ASCII..=Z_LOWER_ASCII => counts[(byte - A_LOWER_ASCII) as usize] += 1,
            _ => return Err(anyhow!("Invalid box id: '{}'", id)),
        }
    }
    Ok(counts)
}

// Each id counts at most once per repeat count, no matter how many letters
// share that count. The checksum multiplies the per-count tallies together.
fn checksum(ids: &[&str]) -> Result<u64> {
    let mut ids_per_repeat: BTreeMap<u32, u64> = BTreeMap::new();

    for id in ids {
        let repeats = letter_counts(id)?
            .iter()
            .copied()
            .filter(|count| *count > 1)
            .collect::<BTreeSet<_>>();

        for repeat in repeats {
            *ids_per_repeat.entry(repeat).or_insert(0) += 1;
        }
    }

    Ok(ids_per_repeat.values().product())
}

fn differs_by_one(a: &str, b: &str) -> bool {
    a.len() == b.len() && a.bytes().zip(b.bytes()).filter(|(x, y)| x != y).count() == 1
}

fn common_letters(ids: &[&str]) -> Option<String> {
    let (a, b) = ids
        .iter()
        .tuple_combinations()
        .find(|(a, b)| differs_by_one(a, b))?;

    let common = a
        .chars()
        .zip(b.chars())
        .filter(|(x, y)| x == y)
        .map(|(x, _)| x)
        .collect();
    Some(common)
}

pub fn run(args: &[&str]) -> Result<()> {
    let path = args.first().ok_or_else(|| anyhow!("missing input path"))?;
    let input = read_input(path)?;
    let ids = input_lines(&input).map(str::trim).collect::<Vec<_>>();

    dbg!(checksum(&ids)?);

    let common = time!(common_letters(&ids))
        .ok_or_else(|| anyhow!("No pair of ids differs by exactly one letter"))?;
    dbg!(common);

    Ok(())
}
