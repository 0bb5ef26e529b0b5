use crate::util::{input_lines, read_input};
use anyhow::{anyhow, Context, Result};
use std::{collections::HashSet, iter};

// Give up looking for a repeat after this many passes over the changes.
const MAX_PASSES: usize = 1000;

fn parse_changes(input: &str) -> Result<Vec<i64>> {
    let changes = input_lines(input)
        .map(|line| {
            line.trim()
                .parse::<i64>()
                .with_context(|| format!("Invalid frequency change: '{}'", line))
        })
        .collect::<Result<Vec<_>>>()?;

    if changes.is_empty() {
        Err(anyhow!("No frequency changes"))
    } else {
        Ok(changes)
    }
}

fn final_frequency(changes: &[i64]) -> i64 {
    changes.iter().sum()
}

fn first_repeated_frequency(changes: &[i64]) -> Option<i64> {
    let mut seen = HashSet::with_capacity(changes.len());
    let mut freq = 0;
    seen.insert(freq);

    let cycled = iter::repeat(changes).take(MAX_PASSES).flatten();
    for change in cycled {
        freq += change;
        if !seen.insert(freq) {
            return Some(freq);
        }
    }

    None
}

pub fn run(args: &[&str]) -> Result<()> {
    let path = args.first().ok_or_else(|| anyhow!("missing input path"))?;
    let input = read_input(path)?;
    let changes = parse_changes(&input)?;

    dbg!(final_frequency(&changes));

    let repeated = time!(first_repeated_frequency(&changes))
        .ok_or_else(|| anyhow!("No repeat within {} passes", MAX_PASSES))?;
    dbg!(repeated);

    Ok(())
}
