use std::collections::BTreeMap;

/// Buckets rows under the key produced by `key`.
///
/// `Option` keys keep rows with an absent grouping value as their own
/// explicit bucket instead of dropping them. The ordered map gives every
/// caller a deterministic iteration order.
pub fn group_by<T, K, F>(rows: impl IntoIterator<Item = T>, key: F) -> BTreeMap<K, Vec<T>>
where
    K: Ord,
    F: Fn(&T) -> K
{
    let mut buckets: BTreeMap<K, Vec<T>> = BTreeMap::new();

    for row in rows {
        buckets.entry(key(&row)).or_default().push(row);
    }

    buckets
}

/// Sorts items by `metric` descending, breaking ties by `tie_break` ascending.
pub fn rank_desc<T, M, K>(mut items: Vec<T>, metric: impl Fn(&T) -> M, tie_break: impl Fn(&T) -> K) -> Vec<T>
where
    M: Ord,
    K: Ord
{
    items.sort_by(|left, right| {
        metric(right).cmp(&metric(left)).then_with(|| tie_break(left).cmp(&tie_break(right)))
    });

    items
}

/// Ranks items like [`rank_desc`] and keeps at most `limit` of them.
pub fn top_n<T, M, K>(items: Vec<T>, metric: impl Fn(&T) -> M, tie_break: impl Fn(&T) -> K, limit: usize) -> Vec<T>
where
    M: Ord,
    K: Ord
{
    let mut ranked = rank_desc(items, metric, tie_break);
    ranked.truncate(limit);
    ranked
}
