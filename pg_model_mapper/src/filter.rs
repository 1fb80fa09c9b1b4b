//! Rule based inclusion/exclusion of catalog objects
//!
//! A rule list is an ordered chain: each entry pairs a pattern tuple with a
//! directive and the list is scanned top down, first structural and pattern
//! match wins. Two element patterns apply to (schema, table) subjects, three
//! element patterns to (schema, table, column) subjects; a rule of the wrong
//! arity is skipped, not an error. More specific exclusions therefore have to
//! come before more general inclusions, the engine does no specificity
//! reasoning of its own.

use crate::model::FieldKwarg;
use regex::Regex;

/// Overrides attached to an included table
#[derive(Debug, Clone, Default)]
pub struct TableInfo {
	/// Prefix prepended to the table name in the model; when absent the
	/// schema name is used
	pub prefix: Option<String>,
}

impl TableInfo {
	pub fn with_prefix(prefix: &str) -> TableInfo {
		TableInfo {
			prefix: Some(prefix.to_owned()),
		}
	}

	/// The effective naming prefix for a table in the given schema
	pub fn prefix_or_schema(&self, schema: &str) -> String {
		match &self.prefix {
			Some(p) => p.clone(),
			None => schema.to_owned(),
		}
	}
}

/// Overrides attached to an included column: keyword arguments the field
/// starts out with before type inference runs
///
/// Cloned into every field it applies to so that columns sharing one rule
/// never alias the same data
#[derive(Debug, Clone, Default)]
pub struct FieldInfo {
	pub definitions: Vec<(FieldKwarg, String)>,
}

/// What a matching rule does with its object: drop it, or generate it with
/// the attached overrides
#[derive(Debug, Clone)]
pub enum GenerateInfo {
	Table(TableInfo),
	Field(FieldInfo),
}

/// One pattern tuple plus its directive; `None` means the object (and
/// everything under it) is not generated
#[derive(Debug)]
pub struct GenerationRule {
	patterns: Vec<Regex>,
	directive: Option<GenerateInfo>,
}

impl GenerationRule {
	/// Compiles the pattern tuple. Patterns match anchored at the start of
	/// the subject element, like Python's `re.match`
	pub fn new(patterns: &[&str], directive: Option<GenerateInfo>) -> Result<GenerationRule, regex::Error> {
		let patterns = patterns
			.iter()
			.map(|p| Regex::new(&format!("^(?:{})", p)))
			.collect::<Result<Vec<_>, _>>()?;
		Ok(GenerationRule { patterns, directive })
	}

	fn is_match(&self, subject: &[&str]) -> bool {
		self.patterns
			.iter()
			.zip(subject.iter())
			.all(|(pattern, value)| pattern.is_match(value))
	}
}

/// Finds the directive for a catalog object, identified by its
/// (schema, table) or (schema, table, column) tuple
///
/// Returns `None` when no rule matches or the first matching rule excludes
/// the object; the two cases are treated identically
pub fn resolve<'a>(rules: &'a [GenerationRule], subject: &[&str]) -> Option<&'a GenerateInfo> {
	for rule in rules {
		if rule.patterns.len() == subject.len() && rule.is_match(subject) {
			return rule.directive.as_ref();
		}
	}
	None
}

/// The built-in rule list, fixed at build time for the whole run
///
/// Tuned for the pagila sample database: drops `public.film` (columns with
/// types the mapper refuses), keeps everything else in `public` with an
/// empty table prefix, and keeps all columns of included tables
pub fn default_rules() -> Result<Vec<GenerationRule>, regex::Error> {
	Ok(vec![
		GenerationRule::new(&["public", "film", "special_features"], None)?,
		GenerationRule::new(&["public", "film", "fulltext"], None)?,
		GenerationRule::new(&["public", "film"], None)?,
		GenerationRule::new(
			&["public", ".*"],
			Some(GenerateInfo::Table(TableInfo::with_prefix(""))),
		)?,
		GenerationRule::new(
			&[".*", ".*", ".*"],
			Some(GenerateInfo::Field(FieldInfo::default())),
		)?,
	])
}

#[cfg(test)]
mod tests {
	use super::*;

	fn include_table() -> Option<GenerateInfo> {
		Some(GenerateInfo::Table(TableInfo::default()))
	}

	fn include_field() -> Option<GenerateInfo> {
		Some(GenerateInfo::Field(FieldInfo::default()))
	}

	#[test]
	fn arity_mismatch_is_skipped() {
		// a table rule never decides a column subject, and vice versa
		let rules = vec![GenerationRule::new(&[".*", ".*"], include_table()).unwrap()];
		assert!(resolve(&rules, &["public", "actor", "actor_id"]).is_none());
		let rules = vec![GenerationRule::new(&[".*", ".*", ".*"], include_field()).unwrap()];
		assert!(resolve(&rules, &["public", "actor"]).is_none());
	}

	#[test]
	fn first_match_wins() {
		let rules = vec![
			GenerationRule::new(&["public", "actor"], None).unwrap(),
			GenerationRule::new(&["public", ".*"], include_table()).unwrap(),
		];
		assert!(resolve(&rules, &["public", "actor"]).is_none());
		assert!(resolve(&rules, &["public", "city"]).is_some());
	}

	#[test]
	fn order_is_load_bearing() {
		// the same rules in the other order stop excluding anything
		let rules = vec![
			GenerationRule::new(&["public", ".*"], include_table()).unwrap(),
			GenerationRule::new(&["public", "actor"], None).unwrap(),
		];
		assert!(resolve(&rules, &["public", "actor"]).is_some());
	}

	#[test]
	fn all_pattern_elements_must_match() {
		let rules = vec![GenerationRule::new(&["public", "actor"], include_table()).unwrap()];
		assert!(resolve(&rules, &["sales", "actor"]).is_none());
		assert!(resolve(&rules, &["public", "city"]).is_none());
		assert!(resolve(&rules, &["public", "actor"]).is_some());
	}

	#[test]
	fn patterns_match_from_the_start() {
		// like re.match: anchored at the start, free at the end
		let rules = vec![GenerationRule::new(&["public", "actor"], include_table()).unwrap()];
		assert!(resolve(&rules, &["public", "actor_info"]).is_some());
		assert!(resolve(&rules, &["public", "star_actor"]).is_none());
	}

	#[test]
	fn no_match_means_not_generated() {
		let rules = vec![GenerationRule::new(&["sales", ".*"], include_table()).unwrap()];
		assert!(resolve(&rules, &["public", "actor"]).is_none());
	}

	#[test]
	fn directive_payload_is_returned() {
		let rules = vec![GenerationRule::new(
			&["public", ".*"],
			Some(GenerateInfo::Table(TableInfo::with_prefix("legacy_"))),
		)
		.unwrap()];
		match resolve(&rules, &["public", "actor"]) {
			Some(GenerateInfo::Table(info)) => {
				assert_eq!(info.prefix_or_schema("public"), "legacy_")
			},
			other => panic!("expected table info, got {:?}", other),
		}
	}

	#[test]
	fn missing_prefix_falls_back_to_schema() {
		let info = TableInfo::default();
		assert_eq!(info.prefix_or_schema("sales"), "sales");
		let info = TableInfo::with_prefix("");
		assert_eq!(info.prefix_or_schema("sales"), "");
	}

	#[test]
	fn default_rules_exclude_film_before_the_catch_all() {
		let rules = default_rules().unwrap();
		assert!(resolve(&rules, &["public", "film"]).is_none());
		assert!(resolve(&rules, &["public", "film_actor"]).is_none());
		assert!(resolve(&rules, &["public", "actor"]).is_some());
		assert!(resolve(&rules, &["public", "actor", "actor_id"]).is_some());
	}
}
