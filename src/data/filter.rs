use super::model::Record;

// ---------------------------------------------------------------------------
// Category filter: ordered rule table
// ---------------------------------------------------------------------------

/// One entry of the category resolution table.
///
/// `applies` is tested against the normalised expression; the first rule
/// that applies decides, and its `matches` is evaluated per record with the
/// lower-cased category label.
pub struct CategoryRule {
    pub name: &'static str,
    pub applies: fn(expr: &str) -> bool,
    pub matches: fn(expr: &str, category: &str) -> bool,
}

/// Evaluated top to bottom. The last rule always applies.
pub const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        name: "all",
        applies: |expr| expr.is_empty() || expr == "all",
        matches: |_, _| true,
    },
    CategoryRule {
        name: "male-strict",
        applies: |expr| expr == "male" || expr == "m",
        matches: |_, category| category == "males",
    },
    CategoryRule {
        name: "male-any",
        applies: |expr| expr.starts_with("males") || expr.starts_with("male"),
        matches: |_, category| category.contains("males"),
    },
    CategoryRule {
        name: "female",
        applies: |expr| expr.starts_with("female") || expr.starts_with("fem"),
        matches: |_, category| category == "females",
    },
    CategoryRule {
        name: "exact",
        applies: |_| true,
        matches: |expr, category| category == expr,
    },
];

/// Trim and lower-case a user category expression.
pub fn normalize_expression(expression: &str) -> String {
    expression.trim().to_lowercase()
}

/// Pick the rule for an already normalised expression.
pub fn resolve_rule(expr: &str) -> &'static CategoryRule {
    CATEGORY_RULES
        .iter()
        .find(|rule| (rule.applies)(expr))
        .unwrap_or(&CATEGORY_RULES[CATEGORY_RULES.len() - 1])
}

/// Records whose category matches the user expression.
///
/// An expression that matches nothing yields an empty vector.
pub fn filter_category(records: &[Record], expression: &str) -> Vec<Record> {
    let expr = normalize_expression(expression);
    let rule = resolve_rule(&expr);
    log::debug!("Category expression {expr:?} resolved by rule '{}'", rule.name);
    records
        .iter()
        .filter(|r| (rule.matches)(&expr, &r.category.to_lowercase()))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Year-range filter
// ---------------------------------------------------------------------------

/// Records with `start_year <= year <= end_year`. An inverted range is empty.
pub fn filter_year_range(records: &[Record], start_year: i32, end_year: i32) -> Vec<Record> {
    records
        .iter()
        .filter(|r| (start_year..=end_year).contains(&r.year))
        .cloned()
        .collect()
}
