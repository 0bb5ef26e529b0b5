#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::shadow_unrelated)]
#![allow(clippy::must_use_candidate)]

use anyhow::{anyhow, Result};
use std::env;

#[macro_use]
mod timer;

mod day1;
mod day2;
mod day3;
mod day4;
mod util;

fn main() -> Result<()> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    println!("{:?}", args);

    let (command, rest_slice) = args
        .split_first()
        .ok_or_else(|| anyhow!("usage: aoc18 <day1|day2|day3|day4> <input-path>"))?;
    let rest_vec = rest_slice.iter().map(String::as_str).collect::<Vec<_>>();
    let rest = rest_vec.as_slice();

    time!("command", {
        match command.as_str() {
            "day1" => day1::run(rest),
            "day2" => day2::run(rest),
            "day3" => day3::run(rest),
            "day4" => day4::run(rest),
            _ => Err(anyhow!("unrecognized command: '{}'", command)),
        }
    })
}
