//! Maps one catalog column onto a web2py `Field(...)` specification
//!
//! Precedence: a foreign key reference always beats type inference, then the
//! sequence backed primary key (`'id'`) case, then the data type dispatch
//! table. Defaults, notnull, uniqueness and comments are layered on after.

use crate::{
	error::{Error, Result},
	filter::FieldInfo,
	model::{py_str, FieldKwarg, FieldModel},
	resolve::Reference,
	schema_queries::ColumnRow,
};

/// Builds the field specification for one column
///
/// `pks` is the table's primary key; when the result carries type `'id'` the
/// caller removes the column from the residual key list, a table cannot
/// declare the same column as both an identity field and a key member
pub fn define_field(
	col: &ColumnRow,
	overrides: &FieldInfo,
	reference: Option<Reference>,
	pks: &[String],
	unique: bool,
	comment: Option<String>,
) -> Result<FieldModel> {
	let mut f = FieldModel::new(&col.name);
	// each column gets its own copy of the rule's overrides
	for (kwarg, value) in overrides.definitions.iter().cloned() {
		f.set(kwarg, value);
	}

	if let Some(reference) = reference {
		f.set(FieldKwarg::Type, reference.type_tag());
		if let Some(ondelete) = reference.ondelete {
			f.set(FieldKwarg::Ondelete, ondelete);
		}
	} else if is_identity(col, pks) {
		// sequence backed (SERIAL) and primary key
		f.set(FieldKwarg::Type, "'id'".to_owned());
	} else {
		infer_type(col, &mut f)?;
	}

	if let Some(text) = &col.default {
		if let Some(default) = map_default(text)? {
			f.set(FieldKwarg::Default, default);
		}
	}

	if col.is_nullable == "NO" {
		f.set(FieldKwarg::Notnull, "True".to_owned());
	}

	if unique {
		f.set(FieldKwarg::Unique, "True".to_owned());
	}

	if let Some(comment) = comment {
		f.set(FieldKwarg::Comment, py_str(&comment));
	}

	Ok(f)
}

fn is_identity(col: &ColumnRow, pks: &[String]) -> bool {
	col.default
		.as_deref()
		.map(|d| d.starts_with("nextval"))
		.unwrap_or(false)
		&& pks.iter().any(|pk| pk == &col.name)
}

/// The dispatch table from catalog data type to web2py type tag
///
/// Geometric and user defined types get no type tag at all (the field is
/// still emitted); any type not listed here aborts the run
fn infer_type(col: &ColumnRow, f: &mut FieldModel) -> Result<()> {
	let data_type = col.data_type.as_str();
	if data_type.starts_with("character") {
		f.set(FieldKwarg::Type, "'string'".to_owned());
		if let Some(length) = col.max_length {
			f.set(FieldKwarg::Length, length.to_string());
		}
		return Ok(());
	}
	match data_type {
		"text" => f.set(FieldKwarg::Type, "'text'".to_owned()),
		"boolean" | "bit" => f.set(FieldKwarg::Type, "'boolean'".to_owned()),
		"integer" | "smallint" | "bigint" => f.set(FieldKwarg::Type, "'integer'".to_owned()),
		"double precision" | "real" => f.set(FieldKwarg::Type, "'double'".to_owned()),
		"timestamp" | "timestamp without time zone" | "timestamp with time zone" => {
			f.set(FieldKwarg::Type, "'datetime'".to_owned())
		},
		"date" => f.set(FieldKwarg::Type, "'date'".to_owned()),
		"time" | "time without time zone" => f.set(FieldKwarg::Type, "'time'".to_owned()),
		"numeric" | "currency" => {
			let precision = col.precision.unwrap_or(0);
			let scale = col.scale.unwrap_or(0);
			f.set(FieldKwarg::Type, format!("'decimal({},{})'", precision, scale));
		},
		"bytea" => f.set(FieldKwarg::Type, "'blob'".to_owned()),
		"point" | "lseg" | "polygon" | "unknown" | "USER-DEFINED" => {
			f.set(FieldKwarg::Type, String::new())
		},
		_ => {
			return Err(Error::UnsupportedType {
				schema: col.schema.clone(),
				table: col.table.clone(),
				column: col.name.clone(),
				data_type: col.data_type.clone(),
			})
		},
	}
	Ok(())
}

/// Translates a catalog default expression into a Python default value
///
/// A deliberately narrow literal parser: `now()`, booleans, numbers, quoted
/// strings and NULL. Anything that is not literal syntax (casts, operators)
/// carries no expressible static default and is dropped; a bare identifier
/// or function call is an unsupported default and fatal
pub fn map_default(text: &str) -> Result<Option<String>> {
	match text {
		"now()" => return Ok(Some("request.now".to_owned())),
		"true" => return Ok(Some("True".to_owned())),
		"false" => return Ok(Some("False".to_owned())),
		_ => {},
	}
	if text.eq_ignore_ascii_case("null") {
		return Ok(None);
	}
	if text.parse::<i64>().is_ok() {
		return Ok(Some(text.to_owned()));
	}
	// "inf" and "NaN" parse as f64 but are names, not numeric literals
	if let Ok(value) = text.parse::<f64>() {
		if value.is_finite() {
			return Ok(Some(text.to_owned()));
		}
	}
	if let Some(inner) = sql_string_literal(text) {
		return Ok(Some(py_str(&inner)));
	}
	if looks_like_call_or_name(text) {
		return Err(Error::UnsupportedDefault(text.to_owned()));
	}
	Ok(None)
}

/// The body of `'...'` with doubled quotes unescaped, if the whole text is
/// one SQL string literal
fn sql_string_literal(text: &str) -> Option<String> {
	if text.len() < 2 || !text.starts_with('\'') || !text.ends_with('\'') {
		return None;
	}
	let body = &text[1..text.len() - 1];
	let mut ret = String::with_capacity(body.len());
	let mut chars = body.chars().peekable();
	while let Some(c) = chars.next() {
		if c == '\'' {
			// only an escaped quote may appear inside the body
			if chars.peek() == Some(&'\'') {
				chars.next();
				ret.push('\'');
			} else {
				return None;
			}
		} else {
			ret.push(c);
		}
	}
	Some(ret)
}

/// True for a bare identifier or a simple call like `uuid_generate_v4()`,
/// the shapes a generic expression evaluator would have choked on loudly
fn looks_like_call_or_name(text: &str) -> bool {
	let (head, tail) = match text.find('(') {
		Some(i) => (&text[..i], &text[i..]),
		None => (text, ""),
	};
	let mut chars = head.chars();
	let starts_like_name = chars
		.next()
		.map(|c| c.is_ascii_alphabetic() || c == '_')
		.unwrap_or(false);
	starts_like_name
		&& chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
		&& (tail.is_empty() || (tail.ends_with(')') && !tail.contains("::")))
}
