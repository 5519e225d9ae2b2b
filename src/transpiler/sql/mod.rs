pub mod postgres;
pub mod sqlite;
pub mod sqlserver;

pub use postgres::PostgresGenerator;
pub use sqlite::SqliteGenerator;
pub use sqlserver::SqlServerGenerator;
