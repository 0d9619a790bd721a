//! Deterministic recipe identifiers.

/// Derive a recipe identifier from its name.
///
/// Lower-cases, turns each whitespace run into a single hyphen, drops every
/// character that is neither alphanumeric nor a hyphen, then collapses
/// repeated hyphens. Distinct recipes with the same name share an identifier.
pub fn slugify(name: &str) -> String {
    let mut spaced = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for c in name.trim().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                spaced.push('-');
            }
            in_whitespace = true;
        } else {
            in_whitespace = false;
            spaced.extend(c.to_lowercase());
        }
    }

    let mut slug = String::with_capacity(spaced.len());
    for c in spaced.chars() {
        if c == '-' {
            if !slug.ends_with('-') {
                slug.push('-');
            }
        } else if c.is_alphanumeric() {
            slug.push(c);
        }
    }
    slug
}
