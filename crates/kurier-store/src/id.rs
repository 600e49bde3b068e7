//! Identifier allocation for the append-only collections.

/// Next unique ID for a collection: `max(existing) + 1`, or `1` when the
/// collection is empty.
///
/// Records are never deleted, so the result is strictly monotonic as long
/// as allocation and append happen under the same store lock.
pub fn next_id<I>(ids: I) -> i64
where
    I: IntoIterator<Item = i64>,
{
    ids.into_iter().max().unwrap_or(0) + 1
}
