//! Command visibility scopes.
//!
//! A command is either visible everywhere ([`Scope::Global`]) or only in a
//! set of guilds ([`Scope::Guilds`]). Scopes declared on individual commands
//! are merged upward through the command tree, so merging has to be
//! commutative and [`Scope::Global`] absorbs everything.
//!
//! # Example
//!
//! ```
//! use slash_schema_core::Scope;
//!
//! let a = Scope::guilds([1]);
//! let b = Scope::guilds([2]);
//! assert_eq!(a.merge(&b), Scope::guilds([1, 2]));
//! assert_eq!(a.merge(&Scope::Global), Scope::Global);
//!
//! // `-1` stands for "every guild being registered".
//! assert!(Scope::all_guilds().overlaps(&Scope::guilds([42])));
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Visibility of a command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Visible in every guild and in direct messages.
    #[default]
    Global,
    /// Visible only in the listed guilds. [`Scope::ALL_GUILDS`] matches any
    /// guild.
    Guilds(BTreeSet<i64>),
}

/// Error returned when parsing a [`Scope`] from text fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid scope '{0}': expected 'global', 'all' or comma-separated guild ids")]
pub struct ParseScopeError(pub String);

impl Scope {
    /// Sentinel guild id meaning "all guilds, resolved per registration".
    pub const ALL_GUILDS: i64 = -1;

    pub fn global() -> Self {
        Scope::Global
    }

    /// Restricts visibility to the given guild ids.
    pub fn guilds(ids: impl IntoIterator<Item = i64>) -> Self {
        Scope::Guilds(ids.into_iter().collect())
    }

    /// Visible in whichever guild is being registered.
    pub fn all_guilds() -> Self {
        Scope::guilds([Self::ALL_GUILDS])
    }

    pub fn is_global(&self) -> bool {
        matches!(self, Scope::Global)
    }

    /// Returns a copy with `guild` added. Global scopes are returned as-is.
    pub fn with_guild(&self, guild: i64) -> Self {
        match self {
            Scope::Global => Scope::Global,
            Scope::Guilds(ids) => {
                let mut ids = ids.clone();
                ids.insert(guild);
                Scope::Guilds(ids)
            }
        }
    }

    /// Merges two scopes: global wins, guild sets are united.
    pub fn merge(&self, other: &Scope) -> Scope {
        match (self, other) {
            (Scope::Global, _) | (_, Scope::Global) => Scope::Global,
            (Scope::Guilds(a), Scope::Guilds(b)) => Scope::Guilds(a.union(b).copied().collect()),
        }
    }

    /// Returns true if a command with this scope belongs in a registration
    /// for `other`.
    ///
    /// Two global scopes overlap. Two guild scopes overlap when they share an
    /// id, or when either side holds [`Scope::ALL_GUILDS`] and the other side
    /// is not empty. Global and guild scopes never overlap.
    pub fn overlaps(&self, other: &Scope) -> bool {
        match (self, other) {
            (Scope::Global, Scope::Global) => true,
            (Scope::Guilds(a), Scope::Guilds(b)) => {
                if a.is_empty() || b.is_empty() {
                    return false;
                }
                a.contains(&Self::ALL_GUILDS)
                    || b.contains(&Self::ALL_GUILDS)
                    || !a.is_disjoint(b)
            }
            _ => false,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => f.write_str("global"),
            Scope::Guilds(ids) => {
                let ids: Vec<String> = ids
                    .iter()
                    .map(|id| {
                        if *id == Self::ALL_GUILDS {
                            "*".to_string()
                        } else {
                            id.to_string()
                        }
                    })
                    .collect();
                write!(f, "guilds({})", ids.join(", "))
            }
        }
    }
}

impl FromStr for Scope {
    type Err = ParseScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "global" => return Ok(Scope::Global),
            "all" | "all_guilds" | "*" => return Ok(Scope::all_guilds()),
            _ => {}
        }

        let ids = trimmed
            .split(',')
            .map(|part| part.trim().parse::<i64>())
            .collect::<Result<BTreeSet<_>, _>>()
            .map_err(|_| ParseScopeError(s.to_string()))?;
        Ok(Scope::Guilds(ids))
    }
}
