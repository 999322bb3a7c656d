//! Namespaced identifier keys

/// Namespace an unqualified identifier key implicitly belongs to.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Strip the implicit namespace prefix from an identifier key.
///
/// Keys qualified with the default namespace collapse to their local name,
/// so `minecraft:block.anvil` and `block.anvil` address the same entry.
/// Keys in any other namespace are returned unchanged.
pub fn strip_default_namespace(key: &str) -> &str {
    match key.split_once(':') {
        Some((namespace, local)) if namespace == DEFAULT_NAMESPACE => local,
        _ => key,
    }
}
