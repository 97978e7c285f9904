//! Interval model behind the `supported_api_levels` strings.
//!
//! The on-disk form is a comma-separated list such as `1-3,17-32,47+`:
//! closed intervals `a-b`, single releases `a`, and at most one trailing
//! open interval `a+`. Reconciliation edits the parsed intervals and only
//! renders text again when the ledger is serialized.

use crate::error::RangeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Continuous support from `start` through `end` inclusive; `None` means
/// still supported as of the latest reconciliation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interval {
    pub start: u32,
    pub end: Option<u32>,
}

impl Interval {
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            None => write!(f, "{}+", self.start),
            Some(end) if end == self.start => write!(f, "{}", self.start),
            Some(end) => write!(f, "{}-{}", self.start, end),
        }
    }
}

impl FromStr for Interval {
    type Err = RangeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let token = raw.trim();
        let level = |value: &str| {
            value
                .parse::<u32>()
                .map_err(|_| RangeError::Malformed(token.to_string()))
        };
        if let Some(start) = token.strip_suffix('+') {
            return Ok(Interval {
                start: level(start)?,
                end: None,
            });
        }
        let (start, end) = match token.split_once('-') {
            Some((start, end)) => (level(start)?, level(end)?),
            None => {
                let single = level(token)?;
                (single, single)
            }
        };
        if end < start {
            return Err(RangeError::Inverted(token.to_string()));
        }
        Ok(Interval {
            start,
            end: Some(end),
        })
    }
}

/// Ordered, non-overlapping support history for one algorithm.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SupportRange {
    intervals: Vec<Interval>,
}

impl SupportRange {
    /// A history that starts at `level` and is still open.
    pub fn open_from(level: u32) -> Self {
        Self {
            intervals: vec![Interval {
                start: level,
                end: None,
            }],
        }
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Whether the latest interval is still open.
    pub fn is_open(&self) -> bool {
        self.intervals.last().is_some_and(Interval::is_open)
    }

    /// Records that the algorithm is supported at `level`.
    ///
    /// An open history is left alone. A closed one gains a new open interval
    /// at `level`, so the releases in between stay visible as a gap.
    pub fn reopen(&mut self, level: u32) -> Result<(), RangeError> {
        let Some(last) = self.intervals.last() else {
            self.intervals.push(Interval {
                start: level,
                end: None,
            });
            return Ok(());
        };
        match last.end {
            None => Ok(()),
            Some(end) if level <= end => Err(RangeError::ReopenBeforeEnd { level, last: end }),
            Some(_) => {
                self.intervals.push(Interval {
                    start: level,
                    end: None,
                });
                Ok(())
            }
        }
    }

    /// Records that the algorithm is missing at `level`.
    ///
    /// An open interval is closed at `level - 1`; a closed history is left
    /// unchanged.
    pub fn close(&mut self, level: u32) -> Result<(), RangeError> {
        let last_supported = level.checked_sub(1).ok_or(RangeError::ZeroLevel)?;
        let Some(last) = self.intervals.last_mut() else {
            return Ok(());
        };
        if !last.is_open() {
            return Ok(());
        }
        if last.start > last_supported {
            return Err(RangeError::CloseBeforeStart {
                start: last.start,
                level,
            });
        }
        last.end = Some(last_supported);
        Ok(())
    }
}

impl fmt::Display for SupportRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, interval) in self.intervals.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{interval}")?;
        }
        Ok(())
    }
}

impl FromStr for SupportRange {
    type Err = RangeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.trim().is_empty() {
            return Err(RangeError::Empty);
        }
        let mut intervals: Vec<Interval> = Vec::new();
        for token in raw.split(',') {
            let interval: Interval = token.parse()?;
            if let Some(prev) = intervals.last() {
                match prev.end {
                    None => return Err(RangeError::OpenNotLast(raw.to_string())),
                    Some(end) if interval.start <= end => {
                        return Err(RangeError::OutOfOrder(token.trim().to_string()));
                    }
                    Some(_) => {}
                }
            }
            intervals.push(interval);
        }
        Ok(Self { intervals })
    }
}

impl Serialize for SupportRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SupportRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
