//! Ternary directional label.

use serde::{Deserialize, Serialize};

/// Short-horizon direction label attached to each row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Target {
    Down,
    #[default]
    Neutral,
    Up,
}

impl Target {
    pub fn as_i8(self) -> i8 {
        match self {
            Target::Down => -1,
            Target::Neutral => 0,
            Target::Up => 1,
        }
    }

    pub fn as_f64(self) -> f64 {
        self.as_i8() as f64
    }

    /// Decode a label stored in a numeric table column.
    pub fn from_f64(value: f64) -> Option<Self> {
        if value == -1.0 {
            Some(Target::Down)
        } else if value == 0.0 {
            Some(Target::Neutral)
        } else if value == 1.0 {
            Some(Target::Up)
        } else {
            None
        }
    }
}

impl From<Target> for i8 {
    fn from(target: Target) -> Self {
        target.as_i8()
    }
}

impl TryFrom<i8> for Target {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Target::Down),
            0 => Ok(Target::Neutral),
            1 => Ok(Target::Up),
            other => Err(format!("target label must be -1, 0 or 1, got {other}")),
        }
    }
}
