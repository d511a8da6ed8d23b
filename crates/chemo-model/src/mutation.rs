//! Point mutation tokens such as `A23G`.

use std::fmt;
use std::str::FromStr;

use crate::ModelError;

/// Residue alphabet accepted in mutation tokens and sequences.
pub const AMINO_ACIDS: &str = "AGILPVFWYDERHKSTCMNQ";

pub fn is_amino_acid(residue: char) -> bool {
    AMINO_ACIDS.contains(residue)
}

/// `<from><1-based position><to>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MutationToken {
    pub from: char,
    pub position: usize,
    pub to: char,
}

impl MutationToken {
    pub fn new(from: char, position: usize, to: char) -> Self {
        Self { from, position, to }
    }

    /// Zero-based index into the sequence, `None` for position 0.
    pub fn index(&self) -> Option<usize> {
        self.position.checked_sub(1)
    }

    /// Parses an `_`-joined mutation field, keeping field order.
    pub fn parse_list(field: &str) -> Result<Vec<Self>, ModelError> {
        field.trim().split('_').map(str::parse).collect()
    }
}

impl FromStr for MutationToken {
    type Err = ModelError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ModelError::InvalidMutationToken {
            token: token.to_string(),
            reason: reason.to_string(),
        };
        let mut chars = token.chars();
        let from = chars.next().ok_or_else(|| invalid("empty token"))?;
        let to = chars.next_back().ok_or_else(|| invalid("too short"))?;
        let digits = chars.as_str();
        if !is_amino_acid(from) {
            return Err(invalid("unknown original residue"));
        }
        if !is_amino_acid(to) {
            return Err(invalid("unknown replacement residue"));
        }
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("position is not a number"));
        }
        let position = digits
            .parse::<usize>()
            .map_err(|_| invalid("position out of bounds"))?;
        Ok(Self { from, position, to })
    }
}

impl fmt::Display for MutationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.from, self.position, self.to)
    }
}
