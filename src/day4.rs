use crate::util::{input_lines, read_input};
use anyhow::{anyhow, Context, Result};
use nom::{
    bytes::complete::take_while_m_n,
    character::complete::{char, space1},
    combinator::{map_opt, map_res},
    sequence::{delimited, separated_pair, terminated, tuple},
    Finish, IResult,
};
use std::{cmp::Reverse, collections::BTreeMap, fmt, str::FromStr};
use thiserror::Error;

type GuardId = u32;

const MINUTES_PER_HOUR: usize = 60;

// Field order matters: the derived `Ord` is chronological order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Timestamp {
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
}

fn fixed_digits<'a, T: FromStr>(len: usize) -> impl FnMut(&'a str) -> IResult<&'a str, T> {
    map_res(
        take_while_m_n(len, len, |c: char| c.is_ascii_digit()),
        str::parse::<T>,
    )
}

fn is_leap_year(year: u16) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

impl Timestamp {
    fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8) -> Option<Self> {
        let valid = (1..=12).contains(&month)
            && (1..=days_in_month(year, month)).contains(&day)
            && hour < 24
            && (minute as usize) < MINUTES_PER_HOUR;

        if valid {
            Some(Self {
                year,
                month,
                day,
                hour,
                minute,
            })
        } else {
            None
        }
    }

    /// Parse a bracketed timestamp, e.g. `[1518-11-01 00:05]`.
    fn parse(s: &str) -> IResult<&str, Self> {
        let date = tuple((
            fixed_digits::<u16>(4),
            char('-'),
            fixed_digits::<u8>(2),
            char('-'),
            fixed_digits::<u8>(2),
        ));
        let time = separated_pair(fixed_digits::<u8>(2), char(':'), fixed_digits::<u8>(2));

        map_opt(
            delimited(char('['), separated_pair(date, char(' '), time), char(']')),
            |((year, _, month, _, day), (hour, minute))| Self::new(year, month, day, hour, minute),
        )(s)
    }

    fn same_hour(self, other: Self) -> bool {
        (self.year, self.month, self.day, self.hour)
            == (other.year, other.month, other.day, other.hour)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute
        )
    }
}

#[derive(Debug, Error, Eq, PartialEq)]
enum LogError {
    #[error("malformed event ({reason}): '{line}'")]
    MalformedEvent { line: String, reason: &'static str },

    #[error("ambiguous event, expected exactly one of 'asleep' or 'wakes': '{line}'")]
    AmbiguousEvent { line: String, timestamp: Timestamp },

    #[error("sleep/wake event before any guard began a shift: '{line}'")]
    OrphanEvent { line: String, timestamp: Timestamp },

    #[error("new shift began while guard #{asleep} was asleep since {since}: '{line}'")]
    OverlappingShift {
        line: String,
        asleep: GuardId,
        since: Timestamp,
    },

    #[error("guard #{guard} fell asleep while already asleep since {since}: '{line}'")]
    DoubleSleep {
        line: String,
        guard: GuardId,
        since: Timestamp,
    },

    #[error("guard #{guard} woke up without falling asleep: '{line}'")]
    UnmatchedWake { line: String, guard: GuardId },

    #[error("guard #{guard} asleep since {since} did not wake up later that hour: '{line}'")]
    SleepCrossesHour {
        line: String,
        guard: GuardId,
        since: Timestamp,
    },

    #[error("guard #{guard} still asleep at the end of the log: '{line}'")]
    UnterminatedSleep { line: String, guard: GuardId },
}

impl LogError {
    fn malformed(line: &str, reason: &'static str) -> Self {
        Self::MalformedEvent {
            line: line.to_owned(),
            reason,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum EventKind {
    ShiftStart,
    FallAsleep,
    WakeUp,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct LogEvent<'a> {
    timestamp: Timestamp,
    kind: EventKind,
    // Only known up front for `ShiftStart`; filled in by `backfill_guards`.
    guard: Option<GuardId>,
    line: &'a str,
}

impl<'a> LogEvent<'a> {
    fn parse(line: &'a str) -> Result<Self, LogError> {
        let parsed: IResult<&str, Timestamp> = terminated(Timestamp::parse, space1)(line);
        let (description, timestamp) = parsed
            .finish()
            .map_err(|_| LogError::malformed(line, "invalid timestamp"))?;

        let (kind, guard) = Self::classify(line, timestamp, description)?;

        Ok(Self {
            timestamp,
            kind,
            guard,
            line,
        })
    }

    fn classify(
        line: &str,
        timestamp: Timestamp,
        description: &str,
    ) -> Result<(EventKind, Option<GuardId>), LogError> {
        let mut guard_token = None;
        let mut asleep = false;
        let mut wakes = false;

        for token in description.split_ascii_whitespace() {
            if let Some(digits) = token.strip_prefix('#') {
                guard_token.get_or_insert(digits);
                continue;
            }
            // "asleep." and "(wakes" still count as the bare word
            let word = token.trim_matches(|c: char| c.is_ascii_punctuation());
            if word.eq_ignore_ascii_case("asleep") {
                asleep = true;
            } else if word.eq_ignore_ascii_case("wakes") {
                wakes = true;
            }
        }

        if let Some(digits) = guard_token {
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(LogError::malformed(line, "guard id is not a number"));
            }
            let guard = digits
                .parse::<GuardId>()
                .map_err(|_| LogError::malformed(line, "guard id out of range"))?;
            if guard == 0 {
                return Err(LogError::malformed(line, "guard id must be positive"));
            }
            return Ok((EventKind::ShiftStart, Some(guard)));
        }

        match (asleep, wakes) {
            (true, false) => Ok((EventKind::FallAsleep, None)),
            (false, true) => Ok((EventKind::WakeUp, None)),
            _ => Err(LogError::AmbiguousEvent {
                line: line.to_owned(),
                timestamp,
            }),
        }
    }
}

fn parse_events<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<Vec<LogEvent<'a>>, LogError> {
    lines.into_iter().map(LogEvent::parse).collect()
}

/// Events sorted by timestamp. The sort is stable, so events logged in the
/// same minute keep their input order.
fn chronological<'a>(events: &[LogEvent<'a>]) -> Vec<LogEvent<'a>> {
    let mut sorted = events.to_vec();
    sorted.sort_by_key(|event| event.timestamp);
    sorted
}

/// Attribute every sleep/wake event to the guard whose shift most recently
/// started. `events` must already be in chronological order.
fn backfill_guards(events: &mut [LogEvent<'_>]) -> Result<(), LogError> {
    let mut on_duty = None;

    for event in events {
        match event.kind {
            EventKind::ShiftStart => on_duty = event.guard,
            EventKind::FallAsleep | EventKind::WakeUp => match on_duty {
                Some(guard) => event.guard = Some(guard),
                None => {
                    return Err(LogError::OrphanEvent {
                        line: event.line.to_owned(),
                        timestamp: event.timestamp,
                    })
                }
            },
        }
    }

    Ok(())
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct SleepProfile {
    guard: GuardId,
    total_minutes: u32,
    histogram: [u32; MINUTES_PER_HOUR],
}

impl SleepProfile {
    fn new(guard: GuardId) -> Self {
        Self {
            guard,
            total_minutes: 0,
            histogram: [0; MINUTES_PER_HOUR],
        }
    }

    // asleep on `asleep`, awake again on `awake`
    fn record_nap(&mut self, asleep: u8, awake: u8) {
        let minutes = asleep as usize..awake as usize;
        self.total_minutes += minutes.len() as u32;
        for count in &mut self.histogram[minutes] {
            *count += 1;
        }
    }

    /// The minute this guard was most often asleep on, and how often.
    /// Ties go to the earliest minute.
    fn sleepiest_minute(&self) -> (u8, u32) {
        self.histogram
            .iter()
            .enumerate()
            .max_by_key(|&(minute, count)| (*count, Reverse(minute)))
            .map(|(minute, count)| (minute as u8, *count))
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct SleepProfiles {
    by_guard: BTreeMap<GuardId, SleepProfile>,
}

impl SleepProfiles {
    fn get(&self, guard: GuardId) -> Option<&SleepProfile> {
        self.by_guard.get(&guard)
    }

    fn iter(&self) -> impl Iterator<Item = &SleepProfile> {
        self.by_guard.values()
    }

    // Strategy 1, part one: most minutes asleep overall.
    fn most_total_sleep(&self) -> Option<GuardId> {
        self.iter()
            .max_by_key(|profile| (profile.total_minutes, Reverse(profile.guard)))
            .map(|profile| profile.guard)
    }

    // Strategy 1, part two.
    fn most_frequent_minute(&self, guard: GuardId) -> Option<u8> {
        self.get(guard).map(|profile| profile.sleepiest_minute().0)
    }

    // Strategy 2: the single (guard, minute) slept through most often.
    fn most_frequent_minute_overall(&self) -> Option<(GuardId, u8)> {
        self.iter()
            .map(|profile| (profile.guard, profile.sleepiest_minute()))
            .max_by_key(|&(guard, (minute, count))| (count, Reverse(guard), Reverse(minute)))
            .map(|(guard, (minute, _))| (guard, minute))
    }
}

struct Nap<'a> {
    guard: GuardId,
    since: Timestamp,
    line: &'a str,
}

/// Replay back-filled chronological events, accumulating each guard's sleep.
fn aggregate(events: &[LogEvent<'_>]) -> Result<SleepProfiles, LogError> {
    let mut profiles = SleepProfiles::default();
    let mut nap: Option<Nap<'_>> = None;

    for event in events {
        let line = || event.line.to_owned();
        let guard = || {
            event.guard.ok_or_else(|| LogError::OrphanEvent {
                line: line(),
                timestamp: event.timestamp,
            })
        };

        match event.kind {
            EventKind::ShiftStart => {
                if let Some(nap) = &nap {
                    return Err(LogError::OverlappingShift {
                        line: line(),
                        asleep: nap.guard,
                        since: nap.since,
                    });
                }
            }
            EventKind::FallAsleep => {
                let guard = guard()?;
                if let Some(nap) = &nap {
                    return Err(LogError::DoubleSleep {
                        line: line(),
                        guard,
                        since: nap.since,
                    });
                }
                nap = Some(Nap {
                    guard,
                    since: event.timestamp,
                    line: event.line,
                });
            }
            EventKind::WakeUp => {
                let guard = guard()?;
                let since = match nap.take() {
                    Some(nap) => nap.since,
                    None => return Err(LogError::UnmatchedWake { line: line(), guard }),
                };
                if event.timestamp < since || !since.same_hour(event.timestamp) {
                    return Err(LogError::SleepCrossesHour {
                        line: line(),
                        guard,
                        since,
                    });
                }
                profiles
                    .by_guard
                    .entry(guard)
                    .or_insert_with(|| SleepProfile::new(guard))
                    .record_nap(since.minute, event.timestamp.minute);
            }
        }
    }

    match nap {
        Some(nap) => Err(LogError::UnterminatedSleep {
            line: nap.line.to_owned(),
            guard: nap.guard,
        }),
        None => Ok(profiles),
    }
}

fn reconstruct<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<SleepProfiles, LogError> {
    let events = parse_events(lines)?;
    let mut events = chronological(&events);
    backfill_guards(&mut events)?;
    aggregate(&events)
}

pub fn run(args: &[&str]) -> Result<()> {
    let path = args.first().ok_or_else(|| anyhow!("missing input path"))?;
    let input = read_input(path)?;

    let profiles = time!("reconstruct", reconstruct(input_lines(&input)))
        .context("Failed to reconstruct guard log")?;

    let guard = profiles
        .most_total_sleep()
        .ok_or_else(|| anyhow!("No guard ever fell asleep"))?;
    let minute = profiles
        .most_frequent_minute(guard)
        .ok_or_else(|| anyhow!("No sleep profile for guard #{}", guard))?;
    println!(
        "strategy 1: guard #{} * minute {} = {}",
        guard,
        minute,
        guard as u64 * minute as u64
    );

    let (guard, minute) = profiles
        .most_frequent_minute_overall()
        .ok_or_else(|| anyhow!("No guard ever fell asleep"))?;
    println!(
        "strategy 2: guard #{} * minute {} = {}",
        guard,
        minute,
        guard as u64 * minute as u64
    );

    Ok(())
}
