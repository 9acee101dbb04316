use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

const MODE_NAME_COMBINE: &str = "combine";
const MODE_NAME_FAVOR: &str = "favor";
const MODE_NAME_MASK: &str = "mask";
const MODE_NAME_REPLACE: &str = "replace";
const MODE_NAME_SUM: &str = "sum";

/// Rule for placing an upper color on top of a lower one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    /// Per-channel maximum
    #[default]
    Combine,
    /// Weighted mix by the upper brightness, skipped when the upper color is empty
    Favor,
    /// Overwrite when the upper color has any effect
    Mask,
    /// Always overwrite
    Replace,
    /// Saturating per-channel add
    Sum,
}

impl BlendMode {
    pub const ALL: [BlendMode; 5] = [
        BlendMode::Combine,
        BlendMode::Favor,
        BlendMode::Mask,
        BlendMode::Replace,
        BlendMode::Sum,
    ];

    /// Overriding modes are composed after all additive ones
    pub const fn is_overriding(self) -> bool {
        matches!(self, BlendMode::Favor | BlendMode::Mask | BlendMode::Replace)
    }

    pub const fn name(self) -> &'static str {
        match self {
            BlendMode::Combine => MODE_NAME_COMBINE,
            BlendMode::Favor => MODE_NAME_FAVOR,
            BlendMode::Mask => MODE_NAME_MASK,
            BlendMode::Replace => MODE_NAME_REPLACE,
            BlendMode::Sum => MODE_NAME_SUM,
        }
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlendMode::Combine => "Combine",
            BlendMode::Favor => "Favor",
            BlendMode::Mask => "Mask",
            BlendMode::Replace => "Replace",
            BlendMode::Sum => "Sum",
        };
        f.write_str(name)
    }
}

impl FromStr for BlendMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        BlendMode::ALL
            .into_iter()
            .find(|mode| mode.name() == lowered)
            .ok_or_else(|| Error::UnknownBlendMode(s.to_string()))
    }
}
