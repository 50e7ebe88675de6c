mod ddl;
mod handle;
mod queries;

pub use ddl::SqliteBackend;
pub use handle::{SqliteHandle, connect};
