//! Default type and index names derived from a record's name.

/// Mapping type name for a record: `UserProfile` -> `user_profile`.
pub fn type_name(record_name: &str) -> String {
    to_snake_case(record_name)
}

/// Index name for a record: `UserProfile` -> `user_profiles`, `Category` -> `categories`.
pub fn index_name(record_name: &str) -> String {
    pluralize(&type_name(record_name))
}

/// Converts a PascalCase identifier to snake_case
fn to_snake_case(name: &str) -> String {
    let mut result = String::new();
    for (i, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.push(ch.to_ascii_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}

/// Simple pluralization rules
fn pluralize(word: &str) -> String {
    if word.ends_with('s') || word.ends_with('x') || word.ends_with("ch") || word.ends_with("sh") {
        format!("{word}es")
    } else if word.ends_with('y')
        && !word.ends_with("ay")
        && !word.ends_with("ey")
        && !word.ends_with("oy")
        && !word.ends_with("uy")
    {
        format!("{}ies", &word[..word.len() - 1])
    } else {
        format!("{word}s")
    }
}
