//! The filename prefix rule shared by the files index and the rollback/restore normalizer (§4.3).

/// Strips the partition prefix off a file path to get the bare filename the
/// index keys records by.
///
/// `raw_partition` is the *unnormalized* partition string as reported by the
/// write stat (possibly empty) — the sentinel substitution (I1) happens at
/// the keying layer, not here, since the offset below is computed from the
/// original partition path length.
pub fn strip_partition_prefix(raw_partition: &str, path: &str) -> String {
    if raw_partition.is_empty() {
        return path.strip_prefix('/').unwrap_or(path).to_string();
    }
    let offset = raw_partition.len() + 1;
    match path.get(offset..) {
        Some(rest) => rest.to_string(),
        None => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_partitioned_strips_leading_slash() {
        assert_eq!(strip_partition_prefix("", "/f1.parquet"), "f1.parquet");
        assert_eq!(strip_partition_prefix("", "f1.parquet"), "f1.parquet");
    }

    #[test]
    fn partitioned_strips_partition_and_separator() {
        assert_eq!(strip_partition_prefix("P", "P/f1.parquet"), "f1.parquet");
        assert_eq!(
            strip_partition_prefix("year=2024/month=01", "year=2024/month=01/f1.parquet"),
            "f1.parquet"
        );
    }

    #[test]
    fn path_shorter_than_offset_is_returned_unchanged() {
        assert_eq!(strip_partition_prefix("P", "P"), "P");
    }
}
