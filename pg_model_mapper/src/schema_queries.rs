//! Select statements into the schema metadata views and corresponding row types
//!
//! Everything reads from ANSI `information_schema` views, except the column
//! comment lookup which has no standard home and goes to `pg_description`.
//! The views expose their columns through domain types (`sql_identifier`,
//! `cardinal_number`, ...), so each selected column is cast down to a plain
//! `text`/`int4` the row structs can hold.

use pg_model_mapper_core::*;


pub const GET_TABLES: &str = "SELECT table_schema::text, table_name::text
FROM information_schema.tables
WHERE table_schema NOT IN ('information_schema', 'pg_catalog')
ORDER BY table_name ASC";
#[derive(Debug, Clone, TryFromRow)]
pub struct TableRow {
	pub schema: String,
	pub name: String,
}

pub const GET_COLUMNS: &str = "SELECT table_schema::text,
	table_name::text,
	column_name::text,
	data_type::text,
	is_nullable::text,
	character_maximum_length::int4,
	numeric_precision::int4,
	numeric_scale::int4,
	column_default::text
FROM information_schema.columns
WHERE table_name = $1 AND table_schema = $2
ORDER BY ordinal_position ASC";
#[derive(Debug, Clone, TryFromRow)]
pub struct ColumnRow {
	pub schema: String,
	pub table: String,
	pub name: String,
	pub data_type: String,
	/// `YES` or `NO`
	pub is_nullable: String,
	pub max_length: Option<i32>,
	pub precision: Option<i32>,
	pub scale: Option<i32>,
	pub default: Option<String>,
}

pub const GET_PRIMARY_KEYS: &str = "SELECT ccu.column_name::text
FROM information_schema.table_constraints AS tc
NATURAL JOIN information_schema.constraint_column_usage AS ccu
WHERE tc.table_name = $1
	AND tc.table_schema = $2
	AND tc.constraint_type = 'PRIMARY KEY'";

pub const GET_UNIQUE: &str = "SELECT ccu.column_name::text
FROM information_schema.table_constraints AS tc
NATURAL JOIN information_schema.constraint_column_usage AS ccu
WHERE tc.table_name = $1
	AND ccu.column_name = $2
	AND tc.constraint_type = 'UNIQUE'";

pub const GET_REFERENCING: &str = "SELECT kcu.table_name::text,
	kcu.column_name::text,
	kcu.constraint_name::text,
	kcu.constraint_schema::text,
	rc.update_rule::text,
	rc.delete_rule::text,
	kcu.ordinal_position::int4
FROM information_schema.key_column_usage AS kcu
NATURAL JOIN information_schema.referential_constraints AS rc
NATURAL JOIN information_schema.table_constraints AS tc
WHERE kcu.table_name = $1
	AND kcu.table_schema = $2
	AND kcu.column_name = $3
	AND tc.constraint_type = 'FOREIGN KEY'";
/// The referencing side of one foreign key constraint
#[derive(Debug, Clone, TryFromRow)]
pub struct ReferencingRow {
	pub table: String,
	pub column: String,
	pub constraint_name: String,
	pub constraint_schema: String,
	pub update_rule: String,
	pub delete_rule: String,
	/// Position of the column within the constraint's key, 1 based
	pub ordinal_position: i32,
}

pub const GET_REFERENCED: &str = "SELECT table_schema::text,
	table_name::text,
	column_name::text
FROM information_schema.constraint_column_usage
WHERE constraint_name = $1 AND constraint_schema = $2";
/// One column on the referenced side of a foreign key constraint
#[derive(Debug, Clone, TryFromRow)]
pub struct ReferencedRow {
	pub schema: String,
	pub table: String,
	pub column: String,
}

/// Column comments live in `pg_description`, there is no information_schema
/// view for them. Looks the table up by bare relname, as the rest of the
/// comment machinery does not carry the schema
pub const GET_COMMENT: &str = "SELECT d.description
FROM pg_class c
JOIN pg_description d ON c.oid = d.objoid
JOIN pg_attribute a ON c.oid = a.attrelid
WHERE c.relname = $1 AND a.attname = $2
	AND a.attnum = d.objsubid";
