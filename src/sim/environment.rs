// environment.rs - Decorative particle themes

use std::fmt;
use std::str::FromStr;

use crate::error::ArenaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnvironmentType {
    #[default]
    Sakura,
    Snowflake,
    Thunder,
    RedThunder,
    Water,
}

impl EnvironmentType {
    pub const ALL: [EnvironmentType; 5] = [
        Self::Sakura,
        Self::Snowflake,
        Self::Thunder,
        Self::RedThunder,
        Self::Water,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Sakura => "sakura",
            Self::Snowflake => "snowflake",
            Self::Thunder => "thunder",
            Self::RedThunder => "red_thunder",
            Self::Water => "water",
        }
    }

    /// Uniform pick over every theme.
    pub fn random(rng: &mut fastrand::Rng) -> Self {
        Self::ALL[rng.usize(..Self::ALL.len())]
    }

    /// Parses `name`, falling back to sakura with a warning.
    pub fn parse_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|err: ArenaError| {
            log::warn!("{err}, using {}", Self::default());
            Self::default()
        })
    }
}

impl FromStr for EnvironmentType {
    type Err = ArenaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ArenaError::UnknownEnvironment(s.to_string()))
    }
}

impl fmt::Display for EnvironmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
