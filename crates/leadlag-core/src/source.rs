use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Identifies where a run's series came from; echoed in output metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// Stooq daily CSV download.
    Stooq,
    /// Deterministic offline series.
    Synthetic,
    /// Caller-supplied series held in memory.
    Static,
    /// Results loaded from a local CSV export.
    File,
}

impl ProviderId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stooq => "stooq",
            Self::Synthetic => "synthetic",
            Self::Static => "static",
            Self::File => "file",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
