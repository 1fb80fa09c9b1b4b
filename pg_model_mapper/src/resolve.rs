//! Foreign key resolution
//!
//! Works on already fetched constraint rows so the rules stay testable
//! without a live catalog; the driver in [`crate::generate`] supplies the
//! rows and stitches the two lookups together.

use crate::{
	error::{Error, Result},
	schema_queries::{ReferencedRow, ReferencingRow},
};
use std::convert::TryFrom;

/// Where a foreign key points
///
/// A single column target means the referenced table has a conventional
/// identity column and the reference needs no column name. A multi column
/// target must name the exact referenced column; web2py spells the two cases
/// differently, so the distinction is carried explicitly
#[derive(Debug, Clone, PartialEq)]
pub enum RefTarget {
	Unkeyed { schema: String, table: String },
	Keyed {
		schema: String,
		table: String,
		column: String,
	},
}

/// A resolved foreign key for one referencing column
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
	pub target: RefTarget,
	/// Delete rule of the constraint, carried only when it is not NO ACTION
	pub ondelete: Option<String>,
}

impl Reference {
	/// The web2py type tag for the reference
	pub fn type_tag(&self) -> String {
		match &self.target {
			RefTarget::Unkeyed { schema, table } => format!("'reference {}.{}'", schema, table),
			RefTarget::Keyed { schema, table, column } => {
				format!("'reference {}.{}.{}'", schema, table, column)
			},
		}
	}
}

/// Checks how many distinct referential constraints the column takes part in
///
/// Zero is no reference, one is resolvable; a column in two separate foreign
/// keys cannot be expressed as a web2py reference field and fails loudly
pub fn single_constraint(rows: &[ReferencingRow]) -> Result<Option<&ReferencingRow>> {
	match rows {
		[] => Ok(None),
		[one] => Ok(Some(one)),
		_ => Err(Error::UnsupportedReference(format!("{:?}", rows))),
	}
}

/// Builds the reference for one constraint from its referenced side columns
///
/// With several referenced columns the one at the referencing column's
/// ordinal position is named (keyed reference); with exactly one the target
/// is just the table (unkeyed). A referenced side with no rows at all, or too
/// few for the ordinal, is broken catalog data and fatal
pub fn reference_from_rows(referencing: &ReferencingRow, referenced: &[ReferencedRow]) -> Result<Reference> {
	let target = match referenced {
		[] => {
			return Err(Error::InconsistentCatalog(format!(
				"constraint {}.{} has a referencing column but no referenced columns",
				referencing.constraint_schema, referencing.constraint_name
			)))
		},
		[row] => RefTarget::Unkeyed {
			schema: row.schema.clone(),
			table: row.table.clone(),
		},
		rows => {
			// ordinals are 1 based; anything below 1 is as broken as one past the end
			let index = usize::try_from(referencing.ordinal_position)
				.ok()
				.and_then(|i| i.checked_sub(1));
			let row = index.and_then(|i| rows.get(i)).ok_or_else(|| {
				Error::InconsistentCatalog(format!(
					"constraint {}.{} has no referenced column at position {}",
					referencing.constraint_schema, referencing.constraint_name, referencing.ordinal_position
				))
			})?;
			RefTarget::Keyed {
				schema: row.schema.clone(),
				table: row.table.clone(),
				column: row.column.clone(),
			}
		},
	};

	let ondelete = if referencing.delete_rule != "NO ACTION" {
		Some(crate::model::py_str(&referencing.delete_rule))
	} else {
		None
	};

	Ok(Reference { target, ondelete })
}

#[cfg(test)]
mod tests {
	use super::*;

	fn referencing(ordinal: i32, delete_rule: &str) -> ReferencingRow {
		ReferencingRow {
			table: "rental".to_owned(),
			column: "customer_id".to_owned(),
			constraint_name: "rental_customer_id_fkey".to_owned(),
			constraint_schema: "public".to_owned(),
			update_rule: "NO ACTION".to_owned(),
			delete_rule: delete_rule.to_owned(),
			ordinal_position: ordinal,
		}
	}

	fn referenced(table: &str, column: &str) -> ReferencedRow {
		ReferencedRow {
			schema: "public".to_owned(),
			table: table.to_owned(),
			column: column.to_owned(),
		}
	}

	#[test]
	fn no_rows_is_no_reference() {
		assert!(single_constraint(&[]).unwrap().is_none());
	}

	#[test]
	fn two_constraints_fail_loudly() {
		let rows = [referencing(1, "NO ACTION"), referencing(1, "CASCADE")];
		match single_constraint(&rows) {
			Err(Error::UnsupportedReference(msg)) => assert!(msg.contains("rental_customer_id_fkey")),
			other => panic!("expected unsupported reference, got {:?}", other),
		}
	}

	#[test]
	fn single_referenced_column_is_unkeyed() {
		let r = reference_from_rows(&referencing(1, "NO ACTION"), &[referenced("customer", "customer_id")])
			.unwrap();
		assert_eq!(
			r.target,
			RefTarget::Unkeyed {
				schema: "public".to_owned(),
				table: "customer".to_owned(),
			}
		);
		assert_eq!(r.type_tag(), "'reference public.customer'");
		assert_eq!(r.ondelete, None);
	}

	#[test]
	fn multiple_referenced_columns_are_keyed_by_ordinal() {
		let rows = [referenced("customer", "store_id"), referenced("customer", "customer_id")];
		let r = reference_from_rows(&referencing(2, "NO ACTION"), &rows).unwrap();
		assert_eq!(
			r.target,
			RefTarget::Keyed {
				schema: "public".to_owned(),
				table: "customer".to_owned(),
				column: "customer_id".to_owned(),
			}
		);
		assert_eq!(r.type_tag(), "'reference public.customer.customer_id'");
	}

	#[test]
	fn empty_referenced_side_is_fatal() {
		match reference_from_rows(&referencing(1, "NO ACTION"), &[]) {
			Err(Error::InconsistentCatalog(msg)) => assert!(msg.contains("rental_customer_id_fkey")),
			other => panic!("expected inconsistent catalog, got {:?}", other),
		}
	}

	#[test]
	fn non_positive_ordinal_is_fatal() {
		let rows = [referenced("customer", "store_id"), referenced("customer", "customer_id")];
		for ordinal in [0, -1].iter() {
			assert!(matches!(
				reference_from_rows(&referencing(*ordinal, "NO ACTION"), &rows),
				Err(Error::InconsistentCatalog(_))
			));
		}
	}

	#[test]
	fn ordinal_past_the_referenced_side_is_fatal() {
		let rows = [referenced("customer", "store_id"), referenced("customer", "customer_id")];
		assert!(matches!(
			reference_from_rows(&referencing(3, "NO ACTION"), &rows),
			Err(Error::InconsistentCatalog(_))
		));
	}

	#[test]
	fn delete_rule_is_carried_when_not_no_action() {
		let r = reference_from_rows(&referencing(1, "CASCADE"), &[referenced("customer", "customer_id")])
			.unwrap();
		assert_eq!(r.ondelete.as_deref(), Some("'CASCADE'"));
	}
}
