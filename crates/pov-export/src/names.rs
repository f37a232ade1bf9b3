//! Deriving POV-Ray identifiers from node labels.

/// Turn a label into a valid POV-Ray identifier.
///
/// Every character outside `[A-Za-z0-9_]` becomes `_`; a leading digit gets
/// an underscore prefix. An empty label maps to `_`.
pub fn sanitize(label: &str) -> String {
    let mut ident: String = label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

/// First character upper case, the rest lower case.
pub fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Identifier of the `mesh2` declared for a node.
pub fn mesh_ident(label: &str) -> String {
    format!("{}_mesh", sanitize(label))
}
