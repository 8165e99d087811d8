use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

pub const REST_SEGMENT_NAME: &str = "Rest";

/// Longest interval or rest a playlist may declare: one week.
pub const MAX_SEGMENT_SECS: u64 = 7 * 24 * 60 * 60;

/// One activity as written in a playlist, optionally followed by a rest.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    pub name: String,
    pub duration: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest: Option<u64>,
}

impl Interval {
    pub fn new(name: impl Into<String>, duration: u64) -> Self {
        Self {
            name: name.into(),
            duration,
            rest: None,
        }
    }

    pub fn with_rest(mut self, rest: u64) -> Self {
        self.rest = Some(rest);
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub id: String,
    pub intervals: Vec<Interval>,
}

impl Playlist {
    pub fn new(id: impl Into<String>, intervals: Vec<Interval>) -> Self {
        Self {
            id: id.into(),
            intervals,
        }
    }

    /// Rejects playlists the engine cannot play meaningfully. The engine
    /// itself accepts anything; this runs where playlists enter the program.
    pub fn validate(&self) -> Result<()> {
        if self.intervals.is_empty() {
            bail!("playlist '{}' has no intervals", self.id);
        }
        for (idx, interval) in self.intervals.iter().enumerate() {
            if interval.name.trim().is_empty() {
                bail!("interval #{} has an empty name", idx + 1);
            }
            if interval.duration == 0 {
                bail!("interval '{}' must last at least one second", interval.name);
            }
            if interval.duration > MAX_SEGMENT_SECS {
                bail!(
                    "interval '{}' lasts {}s, longer than the {}s limit",
                    interval.name,
                    interval.duration,
                    MAX_SEGMENT_SECS
                );
            }
            if interval.rest.is_some_and(|rest| rest > MAX_SEGMENT_SECS) {
                bail!(
                    "interval '{}' rests longer than the {}s limit",
                    interval.name,
                    MAX_SEGMENT_SECS
                );
            }
            if interval.rest == Some(0) {
                bail!(
                    "interval '{}' declares a rest of zero seconds; omit it instead",
                    interval.name
                );
            }
        }
        Ok(())
    }
}

/// A single countdown unit: either an activity or a rest period.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub name: String,
    pub duration: u64,
}

impl Segment {
    pub fn new(name: impl Into<String>, duration: u64) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }

    pub fn rest(duration: u64) -> Self {
        Self::new(REST_SEGMENT_NAME, duration)
    }

    pub fn is_rest(&self) -> bool {
        self.name == REST_SEGMENT_NAME
    }
}

impl From<&Interval> for Segment {
    fn from(interval: &Interval) -> Self {
        Self::new(interval.name.clone(), interval.duration)
    }
}
