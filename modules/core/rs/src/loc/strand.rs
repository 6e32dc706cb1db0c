use std::fmt::Display;
use std::str::FromStr;

use eyre::{eyre, Report};

/// Strand of a transcribed feature. Determines which end of a window is 5'.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[repr(i8)]
pub enum Strand {
    /// The forward strand, 5' end at the lowest coordinate.
    #[default]
    Forward = 1,
    /// The reverse strand, 5' end at the highest coordinate.
    Reverse = -1,
}

impl Strand {
    /// New strand that is the opposite of the current one.
    pub fn flipped(&self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }

    /// Get the symbolic representation of the strand.
    pub fn symbol(&self) -> char {
        match self {
            Self::Forward => '+',
            Self::Reverse => '-',
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl TryFrom<char> for Strand {
    type Error = Report;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '+' => Ok(Self::Forward),
            '-' => Ok(Self::Reverse),
            _ => Err(eyre!("Invalid strand symbol: {value:?}")),
        }
    }
}

impl FromStr for Strand {
    type Err = Report;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "+" => Ok(Self::Forward),
            "-" => Ok(Self::Reverse),
            other => Err(eyre!("Invalid strand: {other:?}")),
        }
    }
}
