// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shard naming.

/// Extract the suffix-bearing database name from a shard identifier.
///
/// Shard names look like `shards/<range>/<dbname>.<timestamp>`, where the
/// trailing `.<timestamp>` is the shard's creation-time discriminator. This
/// takes the final `/`-delimited path segment and strips that trailing
/// dotted component, leaving the database name the Supervisor matches
/// against its configured suffix (e.g. `suff` for
/// `shards/40000000-5fffffff/acct/suff.0123456789`).
///
/// A bare name with no path separator and no dot (e.g. a "system" database
/// whose name literally equals the configured suffix) is returned as-is.
pub fn suffix_of(name: &str) -> &str {
    let basename = name.rsplit('/').next().unwrap_or(name);
    match basename.rsplit_once('.') {
        Some((before, _timestamp)) => before,
        None => basename,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_path_and_trailing_timestamp() {
        assert_eq!(suffix_of("shards/40000000-5fffffff/acct/suff.0123456789"), "suff");
    }

    #[test]
    fn bare_name_with_no_dot_is_unchanged() {
        assert_eq!(suffix_of("suff"), "suff");
    }

    #[test]
    fn bare_name_with_dot_strips_trailing_component() {
        assert_eq!(suffix_of("mydb.1415966987"), "mydb");
    }
}
