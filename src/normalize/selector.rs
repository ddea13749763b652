use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Named build aliases Jenkins resolves server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BuildSelector {
    Latest,
    LatestStable,
    LatestSuccessful,
    LatestFailed,
    LatestUnsuccessful,
    LatestCompleted,
}

impl BuildSelector {
    pub const ALL: [Self; 6] = [
        Self::Latest,
        Self::LatestStable,
        Self::LatestSuccessful,
        Self::LatestFailed,
        Self::LatestUnsuccessful,
        Self::LatestCompleted,
    ];

    /// Path segment of the alias in the Jenkins REST API.
    pub fn api_path(self) -> &'static str {
        match self {
            Self::Latest => "lastBuild",
            Self::LatestStable => "lastStableBuild",
            Self::LatestSuccessful => "lastSuccessfulBuild",
            Self::LatestFailed => "lastFailedBuild",
            Self::LatestUnsuccessful => "lastUnsuccessfulBuild",
            Self::LatestCompleted => "lastCompletedBuild",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Latest => "latest",
            Self::LatestStable => "latest-stable",
            Self::LatestSuccessful => "latest-successful",
            Self::LatestFailed => "latest-failed",
            Self::LatestUnsuccessful => "latest-unsuccessful",
            Self::LatestCompleted => "latest-completed",
        }
    }
}

impl fmt::Display for BuildSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A build addressed either by number or by alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildId {
    Number(u64),
    Selector(BuildSelector),
}

impl BuildId {
    pub fn api_path(self) -> String {
        match self {
            Self::Number(number) => number.to_string(),
            Self::Selector(selector) => selector.api_path().to_string(),
        }
    }
}

impl Default for BuildId {
    fn default() -> Self {
        Self::Selector(BuildSelector::Latest)
    }
}

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "#{number}"),
            Self::Selector(selector) => write!(f, "{selector}"),
        }
    }
}

impl FromStr for BuildId {
    type Err = String;

    /// Accepts a build number, a selector name (`latest-failed`) or the
    /// Jenkins alias itself (`lastFailedBuild`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(number) = s.parse::<u64>() {
            return Ok(Self::Number(number));
        }

        BuildSelector::ALL
            .into_iter()
            .find(|selector| selector.name() == s || selector.api_path() == s)
            .map(Self::Selector)
            .ok_or_else(|| format!("'{s}' is neither a build number nor a known build selector"))
    }
}
