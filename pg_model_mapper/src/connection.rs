//! Read-only access to the catalog, one prepared statement per query
//!
//! Pure data access: no filtering, mapping or constraint policy lives here.
//! Queries are issued on demand, per table and per column, accepting
//! O(tables x columns) round trips in exchange for keeping every lookup a
//! trivial single view query.

use super::schema_queries::*;
use log::debug;
use pg_model_mapper_core::*;
use postgres::{Client, Statement};

/// The schema metadata lookups the generator consumes
///
/// [`CatalogClient`] is the live implementation; the pipeline driver only
/// sees this trait, so tests can run it against canned rows
pub trait Catalog {
	/// All tables outside the system schemas, ordered by name
	fn get_tables(&mut self) -> Result<Vec<TableRow>, SqlError>;

	/// Columns of one table in ordinal order
	fn get_columns(&mut self, table: &str, schema: &str) -> Result<Vec<ColumnRow>, SqlError>;

	/// Names of the columns forming the table's primary key
	fn primary_keys(&mut self, table: &str, schema: &str) -> Result<Vec<String>, SqlError>;

	/// Column names of UNIQUE constraints touching (table, column); non-empty
	/// means the column is reported unique
	fn unique_columns(&mut self, table: &str, column: &str) -> Result<Vec<String>, SqlError>;

	/// Foreign key constraints where (table, column) is the referencing side
	fn referencing_constraints(
		&mut self,
		table: &str,
		schema: &str,
		column: &str,
	) -> Result<Vec<ReferencingRow>, SqlError>;

	/// All columns on the referenced side of one named constraint
	fn referenced_columns(
		&mut self,
		constraint_name: &str,
		constraint_schema: &str,
	) -> Result<Vec<ReferencedRow>, SqlError>;

	/// The column's comment, if one is recorded
	fn get_comment(&mut self, table: &str, column: &str) -> Result<Option<String>, SqlError>;
}

pub struct CatalogClient {
	client: Client,
	tables_stmt: Statement,
	columns_stmt: Statement,
	primary_keys_stmt: Statement,
	unique_stmt: Statement,
	referencing_stmt: Statement,
	referenced_stmt: Statement,
	comment_stmt: Statement,
}

impl CatalogClient {
	pub fn new(mut client: Client) -> Result<CatalogClient, SqlError> {
		Ok(CatalogClient {
			tables_stmt: client.prepare(GET_TABLES)?,
			columns_stmt: client.prepare(GET_COLUMNS)?,
			primary_keys_stmt: client.prepare(GET_PRIMARY_KEYS)?,
			unique_stmt: client.prepare(GET_UNIQUE)?,
			referencing_stmt: client.prepare(GET_REFERENCING)?,
			referenced_stmt: client.prepare(GET_REFERENCED)?,
			comment_stmt: client.prepare(GET_COMMENT)?,
			client,
		})
	}
}

impl Catalog for CatalogClient {
	fn get_tables(&mut self) -> Result<Vec<TableRow>, SqlError> {
		debug!("query: tables");
		self.client
			.query(&self.tables_stmt, &[])?
			.iter()
			.map(TryFromRow::from_row)
			.collect()
	}

	fn get_columns(&mut self, table: &str, schema: &str) -> Result<Vec<ColumnRow>, SqlError> {
		debug!("query: columns of {}.{}", schema, table);
		self.client
			.query(&self.columns_stmt, &[&table, &schema])?
			.iter()
			.map(TryFromRow::from_row)
			.collect()
	}

	fn primary_keys(&mut self, table: &str, schema: &str) -> Result<Vec<String>, SqlError> {
		debug!("query: primary keys of {}.{}", schema, table);
		self.client
			.query(&self.primary_keys_stmt, &[&table, &schema])?
			.iter()
			.map(TryFromRow::from_row)
			.collect()
	}

	fn unique_columns(&mut self, table: &str, column: &str) -> Result<Vec<String>, SqlError> {
		debug!("query: unique constraints on {}.{}", table, column);
		self.client
			.query(&self.unique_stmt, &[&table, &column])?
			.iter()
			.map(TryFromRow::from_row)
			.collect()
	}

	fn referencing_constraints(
		&mut self,
		table: &str,
		schema: &str,
		column: &str,
	) -> Result<Vec<ReferencingRow>, SqlError> {
		debug!("query: referencing constraints of {}.{}.{}", schema, table, column);
		self.client
			.query(&self.referencing_stmt, &[&table, &schema, &column])?
			.iter()
			.map(TryFromRow::from_row)
			.collect()
	}

	fn referenced_columns(
		&mut self,
		constraint_name: &str,
		constraint_schema: &str,
	) -> Result<Vec<ReferencedRow>, SqlError> {
		debug!("query: referenced columns of {}.{}", constraint_schema, constraint_name);
		self.client
			.query(&self.referenced_stmt, &[&constraint_name, &constraint_schema])?
			.iter()
			.map(TryFromRow::from_row)
			.collect()
	}

	fn get_comment(&mut self, table: &str, column: &str) -> Result<Option<String>, SqlError> {
		debug!("query: comment on {}.{}", table, column);
		self.client
			.query(&self.comment_stmt, &[&table, &column])?
			.first()
			.map(TryFromRow::from_row)
			.transpose()
	}
}
