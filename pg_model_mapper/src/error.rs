use pg_model_mapper_core::SqlError;
use thiserror::Error;

/// Fatal conditions that abort a generation run.
///
/// Every variant reflects a modeling limitation or broken catalog data rather
/// than a transient fault, so there is no retry path anywhere; a run either
/// prints a complete model or nothing.
#[derive(Debug, Error)]
pub enum Error {
	/// A column's declared SQL type has no web2py field type.
	#[error("data type not supported ({schema}.{table}.{column}): {data_type}")]
	UnsupportedType {
		schema: String,
		table: String,
		column: String,
		data_type: String,
	},
	/// A column takes part in more than one referential constraint.
	#[error("unsupported referential constraint: {0}")]
	UnsupportedReference(String),
	/// A column default that is neither a literal nor plain non-literal syntax.
	#[error("default unsupported '{0}'")]
	UnsupportedDefault(String),
	/// The referenced side of a foreign key came back in an impossible shape.
	#[error("inconsistent catalog data: {0}")]
	InconsistentCatalog(String),
	/// A generation rule carries a payload that does not fit the object kind.
	#[error("bad generation rule: {0}")]
	BadRule(String),
	#[error("bad rule pattern: {0}")]
	BadPattern(#[from] regex::Error),
	#[error("sql error: {0}")]
	Sql(#[from] SqlError),
}

pub type Result<T> = std::result::Result<T, Error>;
