use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Precious metals tracked by the service.
///
/// Declaration order is the canonical output order for normalized records,
/// regardless of arrival order in the scraped payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metal {
    Gold,
    Silver,
    Platinum,
    Rhodium,
    Palladium,
}

impl Metal {
    pub const ALL: [Metal; 5] = [
        Metal::Gold,
        Metal::Silver,
        Metal::Platinum,
        Metal::Rhodium,
        Metal::Palladium,
    ];

    /// Display name used in API responses and lookups.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gold => "Gold",
            Self::Silver => "Silver",
            Self::Platinum => "Platinum",
            Self::Rhodium => "Rhodium",
            Self::Palladium => "Palladium",
        }
    }

    /// Key under which the upstream payload stores this metal's series.
    pub const fn source_key(self) -> &'static str {
        match self {
            Self::Gold => "gold",
            Self::Silver => "silver",
            Self::Platinum => "platinum",
            Self::Rhodium => "rhodium",
            Self::Palladium => "palladium",
        }
    }
}

impl Display for Metal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
