//! The file-group routing hash (invariant I6).
//!
//! Bit-stable 32-bit polynomial hash over the UTF-8 bytes of a record key:
//! `h = 31*h + c`. This is deliberately not [`std::hash::Hash`] /
//! [`std::collections::hash_map::DefaultHasher`] — that hasher is explicitly
//! unspecified across Rust versions, which would break I6's cross-platform
//! stability guarantee.
pub fn stable_hash(key: &str) -> i32 {
    let mut h: i32 = 0;
    for byte in key.as_bytes() {
        h = h.wrapping_mul(31).wrapping_add(*byte as i32);
    }
    h
}

/// Folds a stable hash into `[0, num_groups)`. `num_groups` must be positive.
pub fn file_group_index(key: &str, num_groups: usize) -> usize {
    assert!(num_groups > 0, "num_groups must be positive");
    let h = stable_hash(key);
    (h.unsigned_abs() as usize) % num_groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_matches_java_string_hashcode_polynomial() {
        // String::hashCode() on "abc" is 96354 in any JVM; same recurrence here.
        assert_eq!(stable_hash("abc"), 96354);
    }

    #[test]
    fn route_is_stable_across_calls() {
        let key = "P\0x.parquet";
        let first = file_group_index(key, 4);
        let second = file_group_index(key, 4);
        assert_eq!(first, second);
    }

    #[test]
    fn fold_is_always_in_range() {
        for key in ["", "a", "partition\0file.parquet", "x".repeat(500).as_str()] {
            let idx = file_group_index(key, 7);
            assert!(idx < 7);
        }
    }
}
