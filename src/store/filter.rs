//! Query filters
//!
//! AND-combined equality/range predicates compiled to a parameterized
//! `WHERE` clause. Field names are restricted to plain identifiers; values
//! always travel as query bindings.

use serde::Serialize;
use surrealdb::RecordId;

use super::{StoreError, StoreResult};

/// A bindable predicate value
#[derive(Debug, Clone)]
pub enum FilterValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Record reference. Reference fields are persisted in their string
    /// form (`table:key`), so the binding serializes the same way.
    Record(RecordId),
    /// Membership list for [`Op::In`]
    List(Vec<FilterValue>),
}

impl Serialize for FilterValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            FilterValue::Bool(v) => serializer.serialize_bool(*v),
            FilterValue::Int(v) => serializer.serialize_i64(*v),
            FilterValue::Float(v) => serializer.serialize_f64(*v),
            FilterValue::Str(v) => serializer.serialize_str(v),
            FilterValue::Record(v) => serializer.serialize_str(&v.to_string()),
            FilterValue::List(items) => serializer.collect_seq(items),
        }
    }
}

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        FilterValue::Bool(v)
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        FilterValue::Int(v)
    }
}

impl From<u8> for FilterValue {
    fn from(v: u8) -> Self {
        FilterValue::Int(v as i64)
    }
}

impl From<f64> for FilterValue {
    fn from(v: f64) -> Self {
        FilterValue::Float(v)
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        FilterValue::Str(v.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        FilterValue::Str(v)
    }
}

impl From<RecordId> for FilterValue {
    fn from(v: RecordId) -> Self {
        FilterValue::Record(v)
    }
}

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

impl Op {
    fn sql(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "!=",
            Op::Gt => ">",
            Op::Gte => ">=",
            Op::Lt => "<",
            Op::Lte => "<=",
            Op::In => "IN",
        }
    }
}

#[derive(Debug, Clone)]
struct Predicate {
    field: String,
    op: Op,
    value: FilterValue,
}

/// AND-combined predicate set
#[derive(Debug, Clone, Default)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a single equality predicate
    pub fn field_eq(field: &str, value: impl Into<FilterValue>) -> Self {
        Self::new().and(field, Op::Eq, value)
    }

    pub fn and(mut self, field: &str, op: Op, value: impl Into<FilterValue>) -> Self {
        self.predicates.push(Predicate {
            field: field.to_string(),
            op,
            value: value.into(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Compile to a `WHERE` clause plus its bindings
    ///
    /// Bind names are positional (`$w0`, `$w1`, ...) so a filter can be
    /// appended to queries that carry their own bindings.
    pub fn compile(&self) -> StoreResult<(String, Vec<(String, FilterValue)>)> {
        if self.predicates.is_empty() {
            return Ok((String::new(), Vec::new()));
        }

        let mut clauses = Vec::with_capacity(self.predicates.len());
        let mut binds = Vec::with_capacity(self.predicates.len());

        for (index, predicate) in self.predicates.iter().enumerate() {
            check_ident(&predicate.field)?;
            let param = format!("w{index}");
            clauses.push(format!("{} {} ${}", predicate.field, predicate.op.sql(), param));
            binds.push((param, predicate.value.clone()));
        }

        Ok((format!(" WHERE {}", clauses.join(" AND ")), binds))
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Single-field sort
#[derive(Debug, Clone)]
pub struct Sort {
    field: String,
    direction: Direction,
}

impl Sort {
    pub fn asc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: Direction::Desc,
        }
    }

    pub fn compile(&self) -> StoreResult<String> {
        check_ident(&self.field)?;
        let dir = match self.direction {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        };
        Ok(format!(" ORDER BY {} {}", self.field, dir))
    }
}

/// Reject anything that is not a plain snake_case identifier
///
/// Field and collection names are interpolated into query text, so they must
/// never carry user-controlled punctuation.
pub fn check_ident(name: &str) -> StoreResult<()> {
    let valid = !name.is_empty()
        && name.chars().next().is_some_and(|c| c.is_ascii_lowercase())
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidIdentifier(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_compiles_to_nothing() {
        let (clause, binds) = Filter::new().compile().unwrap();
        assert!(clause.is_empty());
        assert!(binds.is_empty());
    }

    #[test]
    fn test_predicates_are_and_combined() {
        let filter = Filter::field_eq("status", 1u8).and("price", Op::Lte, 25.0);
        let (clause, binds) = filter.compile().unwrap();
        assert_eq!(clause, " WHERE status = $w0 AND price <= $w1");
        assert_eq!(binds.len(), 2);
        assert_eq!(binds[0].0, "w0");
        assert_eq!(binds[1].0, "w1");
    }

    #[test]
    fn test_in_operator() {
        let filter = Filter::new().and(
            "status",
            Op::In,
            FilterValue::List(vec![FilterValue::Int(1), FilterValue::Int(2)]),
        );
        let (clause, _) = filter.compile().unwrap();
        assert_eq!(clause, " WHERE status IN $w0");
    }

    #[test]
    fn test_hostile_field_name_is_rejected() {
        let filter = Filter::field_eq("status = 1 OR 1", 1u8);
        assert!(filter.compile().is_err());
        assert!(check_ident("number_table").is_ok());
        assert!(check_ident("Drop Table").is_err());
        assert!(check_ident("").is_err());
    }

    #[test]
    fn test_sort_compile() {
        assert_eq!(Sort::asc("name").compile().unwrap(), " ORDER BY name ASC");
        assert_eq!(
            Sort::desc("created_date").compile().unwrap(),
            " ORDER BY created_date DESC"
        );
        assert!(Sort::asc("name; DELETE").compile().is_err());
    }
}
