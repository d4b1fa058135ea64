//! Fixed logical page keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::site::SiteError;

/// A page key maps one-to-one to a remote static-content record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKey {
    Home,
    About,
    Founder,
    Contact,
    Conferences,
    Articles,
    Experts,
}

impl PageKey {
    /// Every page key, in load and publish order.
    pub const ALL: [PageKey; 7] = [
        PageKey::Home,
        PageKey::About,
        PageKey::Founder,
        PageKey::Contact,
        PageKey::Conferences,
        PageKey::Articles,
        PageKey::Experts,
    ];

    /// Record title used by the remote store.
    pub fn as_str(self) -> &'static str {
        match self {
            PageKey::Home => "home",
            PageKey::About => "about",
            PageKey::Founder => "founder",
            PageKey::Contact => "contact",
            PageKey::Conferences => "conferences",
            PageKey::Articles => "articles",
            PageKey::Experts => "experts",
        }
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageKey {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PageKey::ALL
            .into_iter()
            .find(|page| page.as_str() == s)
            .ok_or_else(|| SiteError::UnknownPage(s.to_string()))
    }
}
