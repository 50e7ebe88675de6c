mod ddl;
mod handle;
mod queries;

pub use ddl::PostgresBackend;
pub use handle::{PostgresHandle, connect};
