//! Naming conventions that map tree identifiers onto library symbols.
//!
//! A node named `button` resolves to the class `JButton` (prefix plus title
//! case). A property `text` is assigned through `setText`, read through
//! `getText` and, for list values, appended through `addText`.

/// Upper-case the first character, leaving the rest untouched.
pub fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Simple class name looked up for a node.
pub fn lookup_name(prefix: char, node_name: &str) -> String {
    let mut out = String::with_capacity(node_name.len() + 1);
    out.push(prefix);
    out.push_str(&title_case(node_name));
    out
}

pub fn getter_name(key: &str) -> String {
    format!("get{}", title_case(key))
}

pub fn setter_name(key: &str) -> String {
    format!("set{}", title_case(key))
}

pub fn adder_name(key: &str) -> String {
    format!("add{}", title_case(key))
}

/// `parent$child`, the separator used in every qualified node and property name.
pub fn qualify(parent: &str, name: &str) -> String {
    format!("{parent}${name}")
}
