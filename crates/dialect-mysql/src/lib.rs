mod ddl;
mod handle;
mod queries;

pub use ddl::MysqlBackend;
pub use handle::{MysqlHandle, connect};
