use std::fmt;

use crate::error::Error;

/// The three supported SQL dialects. Dialect variance in this crate is
/// confined to catalog query text and DDL capability sets, not to a full
/// parse/normalize/generate trait — so the dialect itself is just a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Postgres,
    Sqlite,
    Mysql,
}

impl Dialect {
    /// Parse a dialect tag as accepted on the command line or in config
    /// files. Accepts common aliases (`postgresql`, `sqlite3`).
    pub fn parse_tag(tag: &str) -> Result<Self, Error> {
        match tag.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            "mysql" => Ok(Dialect::Mysql),
            other => Err(Error::UnsupportedDialect {
                tag: other.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::Sqlite => "sqlite",
            Dialect::Mysql => "mysql",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
