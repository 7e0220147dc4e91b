use crate::domain::model::{FilterOutcome, SalesTable};

/// Selects records whose category equals `category` exactly (case-sensitive).
///
/// `None` or an empty string means no filter was requested and yields
/// [`FilterOutcome::Skipped`]; a category with no rows yields [`FilterOutcome::Empty`].
pub fn filter_by_category(table: &SalesTable, category: Option<&str>) -> FilterOutcome {
    let Some(category) = category.filter(|c| !c.is_empty()) else {
        tracing::debug!("No category given, skipping filter");
        return FilterOutcome::Skipped;
    };

    let matches: Vec<_> = table
        .iter()
        .filter(|record| record.category == category)
        .cloned()
        .collect();

    tracing::debug!("Category '{}' matched {} records", category, matches.len());
    if matches.is_empty() {
        FilterOutcome::Empty
    } else {
        FilterOutcome::Matches(matches)
    }
}
