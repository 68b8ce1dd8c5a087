//! Criterion, search, sort, and pagination fragments.
//!
//! Every function here is pure: it turns filter input into SQL text and the
//! values to bind, without touching the database.

use reelkeep_catalog::{
    CriterionModifier, FindFilter, IntCriterion, MultiCriterion, SortDirection, StringCriterion,
};
use rusqlite::types::Value;

use crate::sql::{Fragment, QueryError};

// ── Criteria ────────────────────────────────────────────────────────────────

/// `column <op> ?` for a single-valued criterion.
fn scalar_criterion(
    column: &str,
    modifier: CriterionModifier,
    value: Value,
) -> Result<Fragment, QueryError> {
    if modifier.is_set() {
        return Err(QueryError::invalid_criterion(format!(
            "{modifier} needs a list of values for {column}"
        )));
    }
    let (op, arity) = modifier.render(1);
    let args = if arity == 1 { vec![value] } else { Vec::new() };
    Ok(Fragment::new(format!("{column} {op}"), args))
}

pub fn int_criterion(column: &str, criterion: &IntCriterion) -> Result<Fragment, QueryError> {
    scalar_criterion(column, criterion.modifier, Value::Integer(criterion.value))
}

pub fn string_criterion(
    column: &str,
    criterion: &StringCriterion,
) -> Result<Fragment, QueryError> {
    scalar_criterion(column, criterion.modifier, Value::Text(criterion.value.clone()))
}

/// An aggregate comparison for a HAVING clause, e.g. `COUNT(DISTINCT scenes.id) > ?`.
///
/// Aggregates are never NULL, so the null modifiers are rejected.
pub fn count_criterion(expr: &str, criterion: &IntCriterion) -> Result<Fragment, QueryError> {
    if matches!(
        criterion.modifier,
        CriterionModifier::IsNull | CriterionModifier::NotNull
    ) {
        return Err(QueryError::invalid_criterion(format!(
            "{} does not apply to {expr}",
            criterion.modifier
        )));
    }
    int_criterion(expr, criterion)
}

/// Match a nullable id column against a set of ids.
///
/// EXCLUDES keeps rows where the column is NULL.
pub fn multi_criterion(column: &str, criterion: &MultiCriterion) -> Result<Fragment, QueryError> {
    let values = id_values(&criterion.value);
    match criterion.modifier {
        CriterionModifier::Includes => {
            let (op, _) = criterion.modifier.render(values.len());
            Ok(Fragment::new(format!("{column} {op}"), values))
        }
        CriterionModifier::Excludes => {
            let (op, _) = criterion.modifier.render(values.len());
            Ok(Fragment::new(
                format!("({column} IS NULL OR {column} {op})"),
                values,
            ))
        }
        CriterionModifier::IsNull | CriterionModifier::NotNull => {
            let (op, _) = criterion.modifier.render(0);
            Ok(Fragment::raw(format!("{column} {op}")))
        }
        other => Err(QueryError::invalid_criterion(format!(
            "{other} does not apply to a set of ids for {column}"
        ))),
    }
}

/// Match an entity by membership in a join table.
///
/// For scenes filtered by tag this renders
/// `scenes.id IN (SELECT scene_id FROM scenes_tags WHERE tag_id IN (?, ?))`,
/// so an entity is kept or dropped as a whole rather than per joined row.
pub fn relation_criterion(
    id_column: &str,
    join_table: &str,
    owner_column: &str,
    target_column: &str,
    criterion: &MultiCriterion,
) -> Result<Fragment, QueryError> {
    let outer = match criterion.modifier {
        CriterionModifier::Includes => "IN",
        CriterionModifier::Excludes => "NOT IN",
        other => {
            return Err(QueryError::invalid_criterion(format!(
                "{other} does not apply to {join_table}"
            )))
        }
    };
    let values = id_values(&criterion.value);
    let (inner, _) = CriterionModifier::Includes.render(values.len());
    Ok(Fragment::new(
        format!(
            "{id_column} {outer} (SELECT {owner_column} FROM {join_table} WHERE {target_column} {inner})"
        ),
        values,
    ))
}

fn id_values(ids: &[i64]) -> Vec<Value> {
    ids.iter().copied().map(Value::Integer).collect()
}

// ── Search ──────────────────────────────────────────────────────────────────

/// Free-text LIKE search over `columns`.
///
/// A query wrapped in double quotes is one exact phrase; otherwise every
/// whitespace-separated word is searched for on its own. Plain clauses are
/// OR'd (any word in any column). Negated clauses are AND'd (no column may
/// contain any word).
pub fn search_fragment(columns: &[&str], q: &str, negate: bool) -> Result<Fragment, QueryError> {
    let q = q.trim();
    let trimmed = q.trim_matches('"');
    let terms: Vec<&str> = if trimmed != q {
        vec![trimmed]
    } else {
        q.split_whitespace().collect()
    };

    if columns.is_empty() || terms.iter().all(|t| t.is_empty()) {
        return Err(QueryError::EmptySearch);
    }

    let (not, joiner) = if negate {
        (" NOT", " AND ")
    } else {
        ("", " OR ")
    };

    let mut clauses = Vec::new();
    let mut args = Vec::new();
    for term in terms.iter().filter(|t| !t.is_empty()) {
        for column in columns {
            clauses.push(format!("{column}{not} LIKE ?"));
            args.push(Value::Text(format!("%{term}%")));
        }
    }

    Ok(Fragment::new(format!("({})", clauses.join(joiner)), args))
}

// ── Sort ────────────────────────────────────────────────────────────────────

/// Settings for resolving sort keys.
///
/// The random seed drives the `random` sort. Create one config when the
/// process starts and reuse it, so paging through a random ordering stays
/// stable until restart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SortConfig {
    random_seed: f64,
}

impl SortConfig {
    pub fn with_seed(random_seed: f64) -> Self {
        Self { random_seed }
    }

    /// A config with a freshly drawn seed.
    pub fn random() -> Self {
        Self::with_seed(rand::random::<f64>())
    }

    pub fn random_seed(&self) -> f64 {
        self.random_seed
    }
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with(|c: char| c.is_ascii_digit())
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Deterministic secondary ordering for tables whose sort keys repeat often.
fn tie_break(table: &str) -> &'static str {
    match table {
        "scenes" => {
            ", scenes.bitrate DESC, scenes.framerate DESC, scenes.rating DESC, scenes.duration DESC"
        }
        _ => "",
    }
}

/// Resolve a sort key into an `ORDER BY` clause for `table`.
///
/// - `<relation>_count`: number of distinct joined `<relation>` rows
/// - `filesize`: `size` cast to an integer
/// - `random`: shuffle seeded by `config`
/// - `name`: case-insensitive
/// - anything else: the column of that name
pub fn sort_fragment(
    config: &SortConfig,
    sort: &str,
    direction: SortDirection,
    table: &str,
) -> Result<String, QueryError> {
    if !is_identifier(sort) {
        return Err(QueryError::InvalidSort(sort.to_string()));
    }
    let direction = direction.as_str();

    if sort.contains("_count") {
        let relation = sort.split('_').next().unwrap_or(sort);
        return Ok(format!(
            " ORDER BY COUNT(DISTINCT {relation}.id) {direction}"
        ));
    }

    let sql = match sort {
        "filesize" => format!(" ORDER BY CAST({table}.size AS INTEGER) {direction}"),
        "random" => {
            let column = format!("{table}.id");
            format!(
                " ORDER BY (substr({column} * {:.16}, length({column}) + 2)) {direction}",
                config.random_seed()
            )
        }
        "name" => format!(
            " ORDER BY {table}.name COLLATE NOCASE {direction}{}",
            tie_break(table)
        ),
        _ => format!(" ORDER BY {table}.{sort} {direction}{}", tie_break(table)),
    };
    Ok(sql)
}

// ── Pagination ──────────────────────────────────────────────────────────────

/// `LIMIT`/`OFFSET` for the filter's clamped page and page size.
pub fn pagination_fragment(find: &FindFilter) -> String {
    format!(" LIMIT {} OFFSET {}", find.per_page(), find.offset())
}
