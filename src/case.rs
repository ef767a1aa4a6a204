//! Case conversion for output property names: backing fields are usually
//! snake_case, schema documents usually want camelCase or PascalCase.

/// Convert a single identifier from snake_case to lowerCamelCase.
/// e.g. "customer_id" -> "customerId", "Id" -> "id"
pub fn to_lower_camel_case(s: &str) -> String {
    let camel = join_words(s);
    let mut chars = camel.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Convert a single identifier from snake_case to PascalCase.
/// e.g. "customer_id" -> "CustomerId", "id" -> "Id"
pub fn to_pascal_case(s: &str) -> String {
    let camel = join_words(s);
    let mut chars = camel.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// Drop underscores, capitalizing the character after each one.
fn join_words(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut capitalize_next = false;
    for c in s.chars() {
        if c == '_' {
            capitalize_next = !out.is_empty();
        } else if capitalize_next {
            out.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            out.push(c);
        }
    }
    out
}
