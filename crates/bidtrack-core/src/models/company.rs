use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two fixed tenant companies. Every job and estimator record is
/// tagged with exactly one company, and all queries and subscriptions are
/// scoped to a single company at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Company {
    Mhc,
    Hdd,
}

impl Company {
    pub const ALL: [Company; 2] = [Company::Mhc, Company::Hdd];

    /// Short code used in stored documents and config ("mhc" / "hdd").
    pub fn code(&self) -> &'static str {
        match self {
            Company::Mhc => "mhc",
            Company::Hdd => "hdd",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Company::Mhc => "MH Construction",
            Company::Hdd => "High Desert Drywall",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            Company::Mhc => "Professional Construction Services",
            Company::Hdd => "Precision Drywall Solutions",
        }
    }

    /// Parse a company code, case-insensitively. Unknown codes are an error
    /// rather than a fallback: company scoping is the tenant boundary.
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "mhc" => Some(Company::Mhc),
            "hdd" => Some(Company::Hdd),
            _ => None,
        }
    }
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
