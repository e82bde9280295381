use crate::options::model::{ListKind, OptionEntry};

/// Options whose label contains `query`, ignoring case, in list order.
/// Format options also match on their value. An empty query keeps everything.
pub fn filter<'a>(kind: ListKind, options: &'a [OptionEntry], query: &str) -> Vec<&'a OptionEntry> {
    if query.is_empty() {
        return options.iter().collect();
    }

    let needle = query.to_lowercase();
    options
        .iter()
        .filter(|entry| {
            entry.label().to_lowercase().contains(&needle)
                || (kind.matches_value() && entry.value().to_lowercase().contains(&needle))
        })
        .collect()
}
