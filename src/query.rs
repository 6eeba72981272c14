// Order & query engine
// Pure functions over an in-memory snapshot. Nothing here touches the store.

use std::cmp::Ordering;

use crate::constants::ORDER_SENTINEL;
use crate::db::schema::AppRecord;

/// Case-insensitive substring match on name or filename. A blank query
/// matches everything.
pub fn visible<'a>(apps: &'a [AppRecord], query: &str) -> Vec<&'a AppRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return apps.iter().collect();
    }

    apps.iter()
        .filter(|app| {
            app.name.to_lowercase().contains(&needle)
                || app.filename.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Order first (missing order sorts last), then name ignoring case.
pub fn compare_apps(a: &AppRecord, b: &AppRecord) -> Ordering {
    let order_a = a.order.unwrap_or(ORDER_SENTINEL);
    let order_b = b.order.unwrap_or(ORDER_SENTINEL);

    order_a
        .cmp(&order_b)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

/// Stable sort by `compare_apps`.
pub fn sorted<'a, I>(apps: I) -> Vec<&'a AppRecord>
where
    I: IntoIterator<Item = &'a AppRecord>,
{
    let mut out: Vec<&AppRecord> = apps.into_iter().collect();
    out.sort_by(|a, b| compare_apps(a, b));
    out
}
