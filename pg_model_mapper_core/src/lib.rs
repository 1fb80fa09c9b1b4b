#![forbid(unsafe_code)]
//! Row conversion helpers for `pg_model_mapper`'s catalog reader
//!
//! Provides the [`TryFromRow`] trait which converts from a [`tokio_postgres::Row`].
//! Single text columns convert through the `String` implementation; structs
//! covering a whole select list derive it with `#[derive(TryFromRow)]`
//!
//! Reexports [`tokio_postgres::Error`] as SqlError (the Result::Err of the return
//! from [`TryFromRow::from_row`]) and [`tokio_postgres::Row`]
//!
//! [`tokio_postgres::Error`]: https://docs.rs/tokio-postgres/0.7/tokio_postgres/error/struct.Error.html
//! [`tokio_postgres::Row`]: https://docs.rs/tokio-postgres/0.7/tokio_postgres/row/struct.Row.html
//! [`TryFromRow::from_row`]: ./trait.TryFromRow.html#tymethod.from_row
//! [`TryFromRow`]: ./trait.TryFromRow.html

//reexports
pub use pg_model_mapper_derive::*;
pub use tokio_postgres::{row::Row, Error as SqlError};

/// Implementation of `TryFromRow` for various types
mod try_from_row;
pub use try_from_row::TryFromRow;
