use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Stimulus composition class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MixtureClass {
    #[serde(rename = "mono")]
    Mono,
    #[serde(rename = "mixture")]
    Mixture,
    #[serde(rename = "sum of isomers")]
    SumOfIsomers,
}

impl MixtureClass {
    pub const fn all() -> &'static [Self] {
        &[Self::Mono, Self::Mixture, Self::SumOfIsomers]
    }

    /// Label stored in the `Mixture` column.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Mono => "mono",
            Self::Mixture => "mixture",
            Self::SumOfIsomers => "sum of isomers",
        }
    }
}

impl FromStr for MixtureClass {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mono" => Ok(Self::Mono),
            "mixture" => Ok(Self::Mixture),
            "sum of isomers" => Ok(Self::SumOfIsomers),
            _ => Err(ModelError::UnknownMixtureClass(s.to_string())),
        }
    }
}

impl fmt::Display for MixtureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
