use crate::recipe::NameMode;
use regex::Regex;
use std::sync::LazyLock;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").expect("valid regex"));

/// Outcome of naming one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    /// The node's own name; `None` when the recipe declares no naming mode
    pub name: Option<String>,
    /// Prefix handed to the node's children
    pub child_prefix: String,
}

impl ResolvedName {
    fn named(name: String) -> Self {
        Self { child_prefix: name.clone(), name: Some(name) }
    }

    /// The name, if it is set and non-empty
    pub fn usable(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}

/// Lowercase and collapse runs of non-word characters into `_`
pub fn slugify(text: &str) -> String {
    NON_WORD.replace_all(&text.to_lowercase(), "_").into_owned()
}

/// Join a parent name and a segment with `.`; an empty parent adds nothing
pub fn join_name(parent: &str, segment: &str) -> String {
    if parent.is_empty() { segment.to_string() } else { format!("{}.{}", parent, segment) }
}

/// Compute the semantic name of a node
///
/// Deriving from empty text yields the empty name, and children then start
/// from an empty prefix: the naming chain is cut below such a node.
pub fn resolve_name(mode: &NameMode, parent: &str, text: &str, index: usize) -> ResolvedName {
    match mode {
        NameMode::None => ResolvedName { name: None, child_prefix: parent.to_string() },
        NameMode::Literal(literal) => ResolvedName::named(join_name(parent, literal)),
        NameMode::FromText if text.is_empty() => ResolvedName::named(String::new()),
        NameMode::FromText => ResolvedName::named(join_name(parent, &slugify(text))),
        NameMode::FromPosition => ResolvedName::named(join_name(parent, &index.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(name: &str) -> NameMode {
        NameMode::Literal(name.to_string())
    }

    #[test]
    fn test_literal_names() {
        assert_eq!(resolve_name(&literal("cart"), "", "", 0).name.as_deref(), Some("cart"));
        assert_eq!(resolve_name(&literal("checkout"), "cart", "", 0).name.as_deref(), Some("cart.checkout"));
    }

    #[test]
    fn test_from_text() {
        let resolved = resolve_name(&NameMode::FromText, "results", "Add to Cart!", 3);
        assert_eq!(resolved.name.as_deref(), Some("results.add_to_cart_"));
        assert_eq!(resolved.child_prefix, "results.add_to_cart_");
    }

    #[test]
    fn test_empty_text_cuts_chain() {
        let resolved = resolve_name(&NameMode::FromText, "results", "", 0);
        assert_eq!(resolved.name.as_deref(), Some(""));
        assert_eq!(resolved.child_prefix, "");
        assert_eq!(resolved.usable(), None);

        let child = resolve_name(&literal("price"), &resolved.child_prefix, "", 0);
        assert_eq!(child.name.as_deref(), Some("price"));
    }

    #[test]
    fn test_from_position() {
        assert_eq!(resolve_name(&NameMode::FromPosition, "results", "", 4).name.as_deref(), Some("results.4"));
        assert_eq!(resolve_name(&NameMode::FromPosition, "", "", 0).name.as_deref(), Some("0"));
    }

    #[test]
    fn test_unnamed_passes_parent_through() {
        let resolved = resolve_name(&NameMode::None, "cart", "ignored", 1);
        assert_eq!(resolved.name, None);
        assert_eq!(resolved.child_prefix, "cart");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World"), "hello_world");
        assert_eq!(slugify("4.5 out of 5 stars"), "4_5_out_of_5_stars");
        assert_eq!(slugify("Café crème"), "caf_cr_me");
        assert_eq!(slugify("snake_case"), "snake_case");
    }
}
