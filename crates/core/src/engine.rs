//! Supported database engines

use std::fmt;

use serde::{Deserialize, Serialize};

/// Database engine a rotation request targets.
///
/// The set is closed: adding an engine means adding a variant here, a driver
/// in `rotator-engine`, and a routing arm in its dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// MySQL and wire-compatible servers
    #[serde(rename = "mysql")]
    MySql,
    /// PostgreSQL
    Postgres,
}

impl Engine {
    /// Every supported engine, in routing order
    pub const ALL: [Self; 2] = [Self::MySql, Self::Postgres];

    /// Wire tag used in the request envelope's `type` field
    pub const fn tag(self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Postgres => "postgres",
        }
    }

    /// Resolve a wire tag. Matching is exact and case-sensitive.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|engine| engine.tag() == tag)
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("mysql", Some(Engine::MySql))]
    #[case("postgres", Some(Engine::Postgres))]
    #[case("MySQL", None)]
    #[case("postgresql", None)]
    #[case("oracle", None)]
    #[case("", None)]
    fn test_from_tag(#[case] tag: &str, #[case] expected: Option<Engine>) {
        assert_eq!(Engine::from_tag(tag), expected);
    }

    #[test]
    fn test_tag_round_trips_through_serde() {
        for engine in Engine::ALL {
            let json = serde_json::to_string(&engine).unwrap();
            assert_eq!(json, format!("\"{}\"", engine.tag()));
            assert_eq!(engine.to_string(), engine.tag());
        }
    }
}
