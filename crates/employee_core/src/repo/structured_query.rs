//! Entity-level query translation.
//!
//! # Responsibility
//! - Accept `SELECT <alias> FROM <Entity> <alias> ...` query text written
//!   against entity field names.
//! - Rewrite it into native SQL against physical table and column names.
//!
//! # Invariants
//! - Parameter placeholders (`?1`, `:name`) pass through untouched, so the
//!   binding style chosen by the caller survives translation.
//! - Unknown entities, aliases or fields are rejected, never passed through.
//! - Single-quoted string literals are copied verbatim.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static SELECT_ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)^\s*SELECT\s+([A-Za-z_]\w*)\s+FROM\s+([A-Za-z_]\w*)\s+([A-Za-z_]\w*)\b(.*)$")
        .expect("valid select regex")
});
// A quoted literal is matched first so dotted text inside it is never rewritten.
static FIELD_PATH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"'(?:[^']|'')*'|\b([A-Za-z_]\w*)\.([A-Za-z_]\w*)\b").expect("valid path regex")
});

/// Maps one entity onto its physical table.
#[derive(Debug, Clone, Copy)]
pub struct EntityMapping {
    pub entity: &'static str,
    pub table: &'static str,
    /// `(field, column)` pairs in projection order.
    pub fields: &'static [(&'static str, &'static str)],
}

impl EntityMapping {
    fn column_for(&self, field: &str) -> Option<&'static str> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, column)| *column)
    }

    fn projection(&self) -> String {
        self.fields
            .iter()
            .map(|(_, column)| *column)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Reasons a structured query cannot be translated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuredQueryError {
    /// Text does not start with `SELECT <alias> FROM <Entity> <alias>`.
    Malformed,
    UnknownEntity(String),
    UnknownAlias(String),
    UnknownField {
        entity: &'static str,
        field: String,
    },
}

impl Display for StructuredQueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed => write!(
                f,
                "structured query must have the form `SELECT <alias> FROM <Entity> <alias> ...`"
            ),
            Self::UnknownEntity(name) => write!(f, "unknown entity `{name}`"),
            Self::UnknownAlias(alias) => write!(f, "unknown alias `{alias}`"),
            Self::UnknownField { entity, field } => {
                write!(f, "entity `{entity}` has no field `{field}`")
            }
        }
    }
}

impl Error for StructuredQueryError {}

/// Translates entity-level query text into SQLite SQL for `mapping`.
pub fn translate(query: &str, mapping: &EntityMapping) -> Result<String, StructuredQueryError> {
    let captures = SELECT_ENTITY_RE
        .captures(query)
        .ok_or(StructuredQueryError::Malformed)?;

    let projected_alias = &captures[1];
    let entity = &captures[2];
    let alias = &captures[3];
    let tail = captures.get(4).map_or("", |m| m.as_str());

    if entity != mapping.entity {
        return Err(StructuredQueryError::UnknownEntity(entity.to_string()));
    }
    if projected_alias != alias {
        return Err(StructuredQueryError::UnknownAlias(
            projected_alias.to_string(),
        ));
    }

    let mut sql = format!("SELECT {} FROM {}", mapping.projection(), mapping.table);
    let mut last = 0;
    for path in FIELD_PATH_RE.captures_iter(tail) {
        let (Some(whole), Some(path_alias), Some(field)) = (path.get(0), path.get(1), path.get(2))
        else {
            continue;
        };
        if path_alias.as_str() != alias {
            return Err(StructuredQueryError::UnknownAlias(
                path_alias.as_str().to_string(),
            ));
        }
        let column = mapping.column_for(field.as_str()).ok_or_else(|| {
            StructuredQueryError::UnknownField {
                entity: mapping.entity,
                field: field.as_str().to_string(),
            }
        })?;
        sql.push_str(&tail[last..whole.start()]);
        sql.push_str(column);
        last = whole.end();
    }
    sql.push_str(&tail[last..]);

    Ok(sql)
}

#[cfg(test)]
mod tests {
    use super::{translate, EntityMapping, StructuredQueryError};

    const PERSON: EntityMapping = EntityMapping {
        entity: "Person",
        table: "people",
        fields: &[("id", "id"), ("givenName", "given_name")],
    };

    #[test]
    fn translate_rewrites_entity_fields_and_keeps_placeholders() {
        let sql = translate(
            "select p from Person p where p.givenName = :givenName order by p.id",
            &PERSON,
        )
        .unwrap();
        assert_eq!(
            sql,
            "SELECT id, given_name FROM people where given_name = :givenName order by id"
        );
    }

    #[test]
    fn translate_accepts_query_without_predicate() {
        let sql = translate("SELECT p FROM Person p", &PERSON).unwrap();
        assert_eq!(sql, "SELECT id, given_name FROM people");
    }

    #[test]
    fn translate_rejects_unknown_field() {
        let err = translate("SELECT p FROM Person p WHERE p.age = ?1", &PERSON).unwrap_err();
        assert_eq!(
            err,
            StructuredQueryError::UnknownField {
                entity: "Person",
                field: "age".to_string()
            }
        );
    }

    #[test]
    fn translate_rejects_foreign_alias_and_entity() {
        let alias_err =
            translate("SELECT p FROM Person p WHERE q.id = ?1", &PERSON).unwrap_err();
        assert_eq!(alias_err, StructuredQueryError::UnknownAlias("q".to_string()));

        let entity_err = translate("SELECT p FROM Robot p", &PERSON).unwrap_err();
        assert_eq!(
            entity_err,
            StructuredQueryError::UnknownEntity("Robot".to_string())
        );
    }

    #[test]
    fn translate_leaves_quoted_literals_untouched() {
        let sql = translate(
            "SELECT p FROM Person p WHERE p.givenName = 'q.x' OR p.givenName = 'it''s a.b'",
            &PERSON,
        )
        .unwrap();
        assert_eq!(
            sql,
            "SELECT id, given_name FROM people WHERE given_name = 'q.x' OR given_name = 'it''s a.b'"
        );
    }

    #[test]
    fn translate_rejects_raw_sql() {
        let err = translate("SELECT * FROM people", &PERSON).unwrap_err();
        assert_eq!(err, StructuredQueryError::Malformed);
    }
}
