//! Drives the whole pipeline: tables through the filter, then constraints,
//! types and defaults per column, into the model tree
//!
//! Strictly sequential and fail fast: one table at a time, one column at a
//! time, and the first fatal condition aborts the run with no partial output.
//! Column queries are only ever issued for tables the filter kept, so an
//! excluded table costs nothing beyond its row in the table listing.

use crate::{
	connection::Catalog,
	error::{Error, Result},
	filter::{self, FieldInfo, GenerateInfo, GenerationRule, TableInfo},
	mapper,
	model::{FieldKwarg, FullModel, TableModel},
	resolve,
	schema_queries::{ColumnRow, TableRow},
	Opt,
};
use log::debug;

/// Builds the full model for the connected database
pub fn dump_db<C: Catalog>(catalog: &mut C, rules: &[GenerationRule], opt: &Opt) -> Result<FullModel> {
	let mut full_model = FullModel {
		database: opt.database.clone(),
		host: opt.host.clone(),
		port: opt.port,
		user: opt.user.clone(),
		password: opt.password.clone(),
		tables: Vec::new(),
	};

	for table in catalog.get_tables()? {
		let info = match table_info(rules, &table)? {
			Some(info) => info,
			None => {
				debug!("skipping table {}.{}", table.schema, table.name);
				continue;
			},
		};
		full_model.add_table(define_table(catalog, rules, &table, &info)?);
	}

	Ok(full_model)
}

fn table_info(rules: &[GenerationRule], table: &TableRow) -> Result<Option<TableInfo>> {
	match filter::resolve(rules, &[&table.schema, &table.name]) {
		None => Ok(None),
		Some(GenerateInfo::Table(info)) => Ok(Some(info.clone())),
		Some(GenerateInfo::Field(_)) => Err(Error::BadRule(format!(
			"table {}.{} matched a rule carrying field overrides",
			table.schema, table.name
		))),
	}
}

fn field_info(rules: &[GenerationRule], col: &ColumnRow) -> Result<Option<FieldInfo>> {
	match filter::resolve(rules, &[&col.schema, &col.table, &col.name]) {
		None => Ok(None),
		Some(GenerateInfo::Field(info)) => Ok(Some(info.clone())),
		Some(GenerateInfo::Table(_)) => Err(Error::BadRule(format!(
			"column {}.{}.{} matched a rule carrying table overrides",
			col.schema, col.table, col.name
		))),
	}
}

fn define_table<C: Catalog>(
	catalog: &mut C,
	rules: &[GenerationRule],
	table: &TableRow,
	info: &TableInfo,
) -> Result<TableModel> {
	debug!("processing table {}.{}", table.schema, table.name);
	let mut pks = catalog.primary_keys(&table.name, &table.schema)?;
	let mut fields = Vec::new();

	for col in catalog.get_columns(&table.name, &table.schema)? {
		let overrides = match field_info(rules, &col)? {
			Some(overrides) => overrides,
			None => {
				debug!("skipping column {}.{}.{}", col.schema, col.table, col.name);
				continue;
			},
		};

		let reference = resolve_reference(catalog, &col)?;
		let unique = !pks.iter().any(|pk| pk == &col.name)
			&& !catalog.unique_columns(&col.table, &col.name)?.is_empty();
		let comment = catalog.get_comment(&col.table, &col.name)?;

		let field = mapper::define_field(&col, &overrides, reference, &pks, unique, comment)?;
		if field.get(FieldKwarg::Type) == Some("'id'") {
			// the identity field subsumes the column's key membership
			pks.retain(|pk| pk != &col.name);
		}
		fields.push(field);
	}

	Ok(TableModel {
		prefix: info.prefix_or_schema(&table.schema),
		name: table.name.clone(),
		schema: table.schema.clone(),
		fields,
		primarykey: pks,
	})
}

fn resolve_reference<C: Catalog>(catalog: &mut C, col: &ColumnRow) -> Result<Option<resolve::Reference>> {
	let referencing = catalog.referencing_constraints(&col.table, &col.schema, &col.name)?;
	match resolve::single_constraint(&referencing)? {
		Some(constraint) => {
			let referenced =
				catalog.referenced_columns(&constraint.constraint_name, &constraint.constraint_schema)?;
			Ok(Some(resolve::reference_from_rows(constraint, &referenced)?))
		},
		None => Ok(None),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::schema_queries::{ReferencedRow, ReferencingRow};
	use pg_model_mapper_core::SqlError;
	use std::result::Result;

	/// Canned catalog that records which tables had their columns listed
	struct FakeCatalog {
		tables: Vec<TableRow>,
		columns: Vec<ColumnRow>,
		pks: Vec<String>,
		column_queries: Vec<String>,
	}

	impl FakeCatalog {
		fn new(tables: Vec<TableRow>, columns: Vec<ColumnRow>, pks: Vec<String>) -> FakeCatalog {
			FakeCatalog {
				tables,
				columns,
				pks,
				column_queries: Vec::new(),
			}
		}
	}

	impl Catalog for FakeCatalog {
		fn get_tables(&mut self) -> Result<Vec<TableRow>, SqlError> {
			Ok(self.tables.clone())
		}

		fn get_columns(&mut self, table: &str, schema: &str) -> Result<Vec<ColumnRow>, SqlError> {
			self.column_queries.push(format!("{}.{}", schema, table));
			Ok(self
				.columns
				.iter()
				.filter(|c| c.table == table && c.schema == schema)
				.cloned()
				.collect())
		}

		fn primary_keys(&mut self, _table: &str, _schema: &str) -> Result<Vec<String>, SqlError> {
			Ok(self.pks.clone())
		}

		fn unique_columns(&mut self, _table: &str, _column: &str) -> Result<Vec<String>, SqlError> {
			Ok(Vec::new())
		}

		fn referencing_constraints(
			&mut self,
			_table: &str,
			_schema: &str,
			_column: &str,
		) -> Result<Vec<ReferencingRow>, SqlError> {
			Ok(Vec::new())
		}

		fn referenced_columns(
			&mut self,
			_constraint_name: &str,
			_constraint_schema: &str,
		) -> Result<Vec<ReferencedRow>, SqlError> {
			Ok(Vec::new())
		}

		fn get_comment(&mut self, _table: &str, _column: &str) -> Result<Option<String>, SqlError> {
			Ok(None)
		}
	}

	fn table(name: &str) -> TableRow {
		TableRow {
			schema: "public".to_owned(),
			name: name.to_owned(),
		}
	}

	fn column(table: &str, name: &str, data_type: &str, default: Option<&str>) -> ColumnRow {
		ColumnRow {
			schema: "public".to_owned(),
			table: table.to_owned(),
			name: name.to_owned(),
			data_type: data_type.to_owned(),
			is_nullable: "YES".to_owned(),
			max_length: None,
			precision: None,
			scale: None,
			default: default.map(str::to_owned),
		}
	}

	fn opt() -> Opt {
		Opt {
			database: "pagila".to_owned(),
			host: "localhost".to_owned(),
			port: 5432,
			user: "reingart".to_owned(),
			password: "saraza".to_owned(),
		}
	}

	fn rules_excluding(table_pattern: &str) -> Vec<GenerationRule> {
		vec![
			GenerationRule::new(&["public", table_pattern], None).unwrap(),
			GenerationRule::new(
				&["public", ".*"],
				Some(GenerateInfo::Table(TableInfo::with_prefix(""))),
			)
			.unwrap(),
			GenerationRule::new(
				&[".*", ".*", ".*"],
				Some(GenerateInfo::Field(FieldInfo::default())),
			)
			.unwrap(),
		]
	}

	#[test]
	fn excluded_tables_issue_no_column_queries() {
		let mut catalog = FakeCatalog::new(
			vec![table("film"), table("actor")],
			vec![column("actor", "name", "text", None)],
			Vec::new(),
		);
		let model = dump_db(&mut catalog, &rules_excluding("film$"), &opt()).unwrap();

		// only the included table was ever asked for its columns
		assert_eq!(catalog.column_queries, vec!["public.actor".to_owned()]);
		assert_eq!(model.tables.len(), 1);
		assert_eq!(model.tables[0].name, "actor");
	}

	#[test]
	fn sequence_primary_key_leaves_no_residual_key() {
		let mut catalog = FakeCatalog::new(
			vec![table("customer")],
			vec![
				column(
					"customer",
					"customer_id",
					"integer",
					Some("nextval('customer_customer_id_seq'::regclass)"),
				),
				column("customer", "email", "text", None),
			],
			vec!["customer_id".to_owned()],
		);
		let model = dump_db(&mut catalog, &rules_excluding("film$"), &opt()).unwrap();

		let customer = &model.tables[0];
		assert_eq!(customer.fields[0].get(FieldKwarg::Type), Some("'id'"));
		assert!(customer.primarykey.is_empty());
	}

	#[test]
	fn identity_trim_keeps_other_key_members() {
		let mut catalog = FakeCatalog::new(
			vec![table("audit_log")],
			vec![
				column(
					"audit_log",
					"log_id",
					"integer",
					Some("nextval('audit_log_log_id_seq'::regclass)"),
				),
				column("audit_log", "day", "date", None),
			],
			vec!["log_id".to_owned(), "day".to_owned()],
		);
		let model = dump_db(&mut catalog, &rules_excluding("film$"), &opt()).unwrap();

		// only the identity column leaves the residual key, in original order
		assert_eq!(model.tables[0].primarykey, vec!["day".to_owned()]);
	}

	#[test]
	fn plain_primary_key_survives_untrimmed() {
		let mut catalog = FakeCatalog::new(
			vec![table("film_actor")],
			vec![
				column("film_actor", "actor_id", "integer", None),
				column("film_actor", "film_id", "integer", None),
			],
			vec!["actor_id".to_owned(), "film_id".to_owned()],
		);
		let model = dump_db(&mut catalog, &rules_excluding("nothing$"), &opt()).unwrap();

		assert_eq!(
			model.tables[0].primarykey,
			vec!["actor_id".to_owned(), "film_id".to_owned()]
		);
	}
}
