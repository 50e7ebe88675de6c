use thiserror::Error;

/// The three error kinds the core surfaces. No error is retried at this
/// layer; retries belong to the connection handle. The differ and emitter
/// have no error surface of their own — only introspection and dialect
/// resolution can fail.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported dialect: {tag}")]
    UnsupportedDialect { tag: String },

    #[error("introspection query `{query}` failed: {source}")]
    IntrospectionFailed {
        query: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("malformed catalog row: {detail}")]
    MalformedCatalog { detail: String },
}

pub type Result<T> = std::result::Result<T, Error>;
