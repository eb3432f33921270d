//! Path bucketing for sinks: one bucket per output file

use super::group::try_group_by;

/// Order assigned to records that carry no explicit order key
pub const DEFAULT_ORDER: i64 = 0;

/// Records destined for one file, in write order
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket<T> {
    pub path: String,
    pub members: Vec<T>,
}

/// Group `records` by the path `path_fn` derives, then stable-sort each
/// bucket by `order_fn`. Missing orders sort as [`DEFAULT_ORDER`]; ties keep
/// input order.
pub fn bucket_by_path<I, T, E, PF, OF>(
    records: I,
    path_fn: PF,
    mut order_fn: OF,
) -> Result<Vec<Bucket<T>>, E>
where
    I: IntoIterator<Item = T>,
    PF: FnMut(&T) -> Result<String, E>,
    OF: FnMut(&T) -> Option<i64>,
{
    let grouped = try_group_by(records, path_fn)?;

    Ok(grouped
        .into_iter()
        .map(|group| {
            let mut members = group.members;
            members.sort_by_key(|record| order_fn(record).unwrap_or(DEFAULT_ORDER));
            Bucket {
                path: group.key,
                members,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[derive(Debug, Clone, PartialEq)]
    struct Doc {
        path: &'static str,
        index: Option<i64>,
        name: &'static str,
    }

    fn doc(path: &'static str, index: Option<i64>, name: &'static str) -> Doc {
        Doc { path, index, name }
    }

    fn names<T>(bucket: &Bucket<T>, f: impl Fn(&T) -> &'static str) -> Vec<&'static str> {
        bucket.members.iter().map(f).collect()
    }

    #[test]
    fn test_sorted_by_explicit_index() {
        let docs = vec![
            doc("a.yaml", Some(2), "two"),
            doc("a.yaml", Some(0), "zero"),
            doc("a.yaml", Some(1), "one"),
        ];
        let buckets =
            bucket_by_path(docs, |d| Ok::<_, Infallible>(d.path.to_string()), |d| d.index)
                .unwrap();
        assert_eq!(buckets.len(), 1);
        assert_eq!(names(&buckets[0], |d| d.name), vec!["zero", "one", "two"]);
    }

    #[test]
    fn test_missing_index_defaults_to_zero() {
        let docs = vec![
            doc("a.yaml", Some(1), "one"),
            doc("a.yaml", None, "unset"),
            doc("a.yaml", Some(-1), "negative"),
        ];
        let buckets =
            bucket_by_path(docs, |d| Ok::<_, Infallible>(d.path.to_string()), |d| d.index)
                .unwrap();
        assert_eq!(
            names(&buckets[0], |d| d.name),
            vec!["negative", "unset", "one"]
        );
    }

    #[test]
    fn test_ties_keep_input_order() {
        let docs = vec![
            doc("a.yaml", None, "first"),
            doc("b.yaml", Some(0), "other"),
            doc("a.yaml", Some(0), "second"),
            doc("a.yaml", None, "third"),
        ];
        let buckets =
            bucket_by_path(docs, |d| Ok::<_, Infallible>(d.path.to_string()), |d| d.index)
                .unwrap();
        assert_eq!(buckets[0].path, "a.yaml");
        assert_eq!(buckets[1].path, "b.yaml");
        assert_eq!(
            names(&buckets[0], |d| d.name),
            vec!["first", "second", "third"]
        );
    }

    #[test]
    fn test_path_error_propagates() {
        let docs = vec![doc("/etc/passwd", None, "bad")];
        let result = bucket_by_path(
            docs,
            |d| {
                if d.path.starts_with('/') {
                    Err("absolute path")
                } else {
                    Ok(d.path.to_string())
                }
            },
            |d| d.index,
        );
        assert_eq!(result.unwrap_err(), "absolute path");
    }
}
