//! `filterByFormula` expressions for list queries.

use rooster_core::store::Filter;

/// Single-quoted formula string literal.
pub fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

/// `{Field Name}` reference.
pub fn field_ref(field: &str) -> String {
    format!("{{{field}}}")
}

pub fn filter_formula(filter: &Filter) -> String {
    match filter {
        Filter::FieldEquals {
            field,
            value,
            ignore_case: true,
        } => format!(
            "LOWER({}) = {}",
            field_ref(field),
            quote(&value.to_lowercase())
        ),
        Filter::FieldEquals { field, value, .. } => {
            format!("{} = {}", field_ref(field), quote(value))
        }
        Filter::IdIn(ids) if ids.is_empty() => "FALSE()".to_string(),
        Filter::IdIn(ids) => {
            let terms: Vec<String> = ids
                .iter()
                .map(|id| format!("RECORD_ID() = {}", quote(id)))
                .collect();
            format!("OR({})", terms.join(", "))
        }
    }
}
