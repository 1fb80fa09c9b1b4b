//! A simple tree of the web2py model built from the catalog

/// The keyword arguments a `Field(...)` declaration may carry, in the one
/// canonical order they are emitted in.
///
/// Generated models are meant to be diffed across regenerations, so this
/// order is a contract, not cosmetics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKwarg {
	Type,
	Length,
	Default,
	Required,
	Ondelete,
	Notnull,
	Unique,
	Label,
	Comment,
}

impl FieldKwarg {
	pub const ALL: [FieldKwarg; 9] = [
		FieldKwarg::Type,
		FieldKwarg::Length,
		FieldKwarg::Default,
		FieldKwarg::Required,
		FieldKwarg::Ondelete,
		FieldKwarg::Notnull,
		FieldKwarg::Unique,
		FieldKwarg::Label,
		FieldKwarg::Comment,
	];

	pub fn name(self) -> &'static str {
		match self {
			FieldKwarg::Type => "type",
			FieldKwarg::Length => "length",
			FieldKwarg::Default => "default",
			FieldKwarg::Required => "required",
			FieldKwarg::Ondelete => "ondelete",
			FieldKwarg::Notnull => "notnull",
			FieldKwarg::Unique => "unique",
			FieldKwarg::Label => "label",
			FieldKwarg::Comment => "comment",
		}
	}

	fn index(self) -> usize {
		match self {
			FieldKwarg::Type => 0,
			FieldKwarg::Length => 1,
			FieldKwarg::Default => 2,
			FieldKwarg::Required => 3,
			FieldKwarg::Ondelete => 4,
			FieldKwarg::Notnull => 5,
			FieldKwarg::Unique => 6,
			FieldKwarg::Label => 7,
			FieldKwarg::Comment => 8,
		}
	}
}

/// One generated `Field(...)` declaration
///
/// Keyword values are stored as already rendered Python source text
/// (`'string'`, `255`, `True`, `request.now`). An empty string marks a column
/// whose type is known but deliberately left untagged
#[derive(Debug, Clone, PartialEq)]
pub struct FieldModel {
	pub name: String,
	kwargs: [Option<String>; 9],
}

impl FieldModel {
	pub fn new(name: &str) -> FieldModel {
		FieldModel {
			name: name.to_owned(),
			kwargs: Default::default(),
		}
	}

	pub fn set(&mut self, kwarg: FieldKwarg, value: String) {
		self.kwargs[kwarg.index()] = Some(value);
	}

	pub fn get(&self, kwarg: FieldKwarg) -> Option<&str> {
		self.kwargs[kwarg.index()].as_deref()
	}
}

/// One generated `db.define_table(...)` block
#[derive(Debug, Clone)]
pub struct TableModel {
	/// Naming prefix prepended to the table name in the model
	pub prefix: String,
	pub name: String,
	pub schema: String,
	/// Fields in catalog ordinal order
	pub fields: Vec<FieldModel>,
	/// Primary key columns not consumed by an identity field, original order
	pub primarykey: Vec<String>,
}

/// The root of the generated model: the DAL connection line plus one table
/// block per included table
#[derive(Debug, Clone)]
pub struct FullModel {
	pub database: String,
	pub host: String,
	pub port: u16,
	pub user: String,
	pub password: String,
	pub tables: Vec<TableModel>,
}

impl FullModel {
	pub fn add_table(&mut self, table: TableModel) {
		self.tables.push(table);
	}
}

/// Renders a string as a Python single-quoted literal, the way the generated
/// model quotes comments, ondelete rules and string defaults
pub fn py_str(s: &str) -> String {
	let mut ret = String::with_capacity(s.len() + 2);
	ret.push('\'');
	for c in s.chars() {
		match c {
			'\\' => ret.push_str("\\\\"),
			'\'' => ret.push_str("\\'"),
			'\n' => ret.push_str("\\n"),
			_ => ret.push(c),
		}
	}
	ret.push('\'');
	ret
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn kwarg_order_is_canonical() {
		let names: Vec<_> = FieldKwarg::ALL.iter().map(|k| k.name()).collect();
		assert_eq!(
			names,
			[
				"type", "length", "default", "required", "ondelete", "notnull", "unique", "label",
				"comment"
			]
		);
	}

	#[test]
	fn py_str_escapes_quotes() {
		assert_eq!(py_str("it's"), r"'it\'s'");
		assert_eq!(py_str(r"a\b"), r"'a\\b'");
		assert_eq!(py_str("plain"), "'plain'");
	}
}
