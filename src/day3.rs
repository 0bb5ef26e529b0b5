use crate::util::{input_lines, read_input};
use anyhow::{anyhow, Context, Result};
use ndarray::{s, Array2};
use regex::RegexBuilder;
use std::{fmt, ops::Range};

// Claims must fit on a square of fabric this many inches on a side.
const MAX_FABRIC_SIDE: usize = 4096;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct Claim {
    id: u32,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

impl Claim {
    fn xs(&self) -> Range<usize> {
        self.x..self.x + self.width
    }

    fn ys(&self) -> Range<usize> {
        self.y..self.y + self.height
    }
}

impl fmt::Display for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} @ {},{}: {}x{}",
            self.id, self.x, self.y, self.width, self.height
        )
    }
}

fn parse_claims(input: &str) -> Result<Vec<Claim>> {
    let re = RegexBuilder::new(r"^#([0-9]+) @ ([0-9]+),([0-9]+): ([0-9]+)x([0-9]+)$")
        .unicode(false)
        .build()
        .context("Failed to build regex")?;

    input_lines(input)
        .map(str::trim)
        .map(|line| -> Result<Claim> {
            let caps = re
                .captures(line)
                .ok_or_else(|| anyhow!("Invalid claim: '{}'", line))?;
            let num = |idx: usize| {
                caps[idx]
                    .parse::<usize>()
                    .with_context(|| format!("Invalid claim: '{}'", line))
            };

            let claim = Claim {
                id: caps[1]
                    .parse::<u32>()
                    .with_context(|| format!("Invalid claim: '{}'", line))?,
                x: num(2)?,
                y: num(3)?,
                width: num(4)?,
                height: num(5)?,
            };

            let fits = |start: usize, len: usize| {
                start
                    .checked_add(len)
                    .map_or(false, |end| end <= MAX_FABRIC_SIDE)
            };
            if fits(claim.x, claim.width) && fits(claim.y, claim.height) {
                Ok(claim)
            } else {
                Err(anyhow!(
                    "Invalid claim, extends past {} inches: '{}'",
                    MAX_FABRIC_SIDE,
                    line
                ))
            }
        })
        .collect()
}

/// Square inches of fabric, each counting how many claims cover it.
struct Fabric {
    claims: Vec<Claim>,
    coverage: Array2<u16>,
}

impl Fabric {
    fn from_claims(claims: Vec<Claim>) -> Self {
        let width = claims.iter().map(|claim| claim.xs().end).max().unwrap_or(0);
        let height = claims.iter().map(|claim| claim.ys().end).max().unwrap_or(0);

        let mut coverage = Array2::<u16>::zeros((width, height));
        for claim in &claims {
            coverage
                .slice_mut(s![claim.xs(), claim.ys()])
                .map_inplace(|count| *count += 1);
        }

        Self { claims, coverage }
    }

    fn count_overlaps(&self) -> usize {
        self.coverage.iter().filter(|count| **count > 1).count()
    }

    fn is_unconflicted(&self, claim: &Claim) -> bool {
        self.coverage
            .slice(s![claim.xs(), claim.ys()])
            .iter()
            .all(|count| *count == 1)
    }

    fn unconflicted_claims(&self) -> impl Iterator<Item = &Claim> + '_ {
        self.claims
            .iter()
            .filter(move |claim| self.is_unconflicted(claim))
    }
}

pub fn run(args: &[&str]) -> Result<()> {
    let path = args.first().ok_or_else(|| anyhow!("missing input path"))?;
    let input = read_input(path)?;

    let claims = parse_claims(&input)?;
    let fabric = time!("paint claims", Fabric::from_claims(claims));

    dbg!(fabric.count_overlaps());

    for claim in fabric.unconflicted_claims() {
        println!("unconflicted claim: {}", claim);
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    const EXAMPLE: &str = "\
        #1 @ 1,3: 4x4\n\
        #2 @ 3,1: 4x4\n\
        #3 @ 5,5: 2x2\n\
    ";

    #[test]
    fn test_parse_claims() {
        let claims = parse_claims("#123 @ 3,2: 5x4\r\n").unwrap();
        let expected = Claim {
            id: 123,
            x: 3,
            y: 2,
            width: 5,
            height: 4,
        };
        assert_eq!(claims, &[expected]);
        assert_eq!(expected.to_string(), "#123 @ 3,2: 5x4");

        assert!(parse_claims("#1 @ 1,3 4x4").is_err());
    }

    #[test]
    fn test_parse_claims_out_of_bounds() {
        assert!(parse_claims("#1 @ 18446744073709551615,0: 1x1").is_err());
        assert!(parse_claims("#1 @ 0,18446744073709551615: 1x1").is_err());
        assert!(parse_claims("#1 @ 99999999999999999999,0: 1x1").is_err());
        assert!(parse_claims("#1 @ 100000,100000: 1x1").is_err());
        assert!(parse_claims("#1 @ 4095,0: 2x1").is_err());

        let claims = parse_claims("#1 @ 4095,4094: 1x2").unwrap();
        let fabric = Fabric::from_claims(claims);
        assert_eq!(fabric.coverage.dim(), (4096, 4096));
        assert_eq!(fabric.unconflicted_claims().count(), 1);
    }

    #[test]
    fn test_fabric() {
        let fabric = Fabric::from_claims(parse_claims(EXAMPLE).unwrap());
        assert_eq!(fabric.coverage.dim(), (7, 7));
        assert_eq!(fabric.count_overlaps(), 4);
        let ids = fabric
            .unconflicted_claims()
            .map(|claim| claim.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, &[3]);
    }

    #[test]
    fn test_empty_fabric() {
        let fabric = Fabric::from_claims(Vec::new());
        assert_eq!(fabric.count_overlaps(), 0);
        assert_eq!(fabric.unconflicted_claims().count(), 0);
    }
}
