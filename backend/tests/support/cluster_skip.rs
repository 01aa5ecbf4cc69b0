//! Opt-out for machines that cannot run embedded PostgreSQL.

/// Truthy values of `SKIP_TEST_CLUSTER`.
const TRUTHY: [&str; 4] = ["1", "true", "yes", "on"];

fn skip_requested() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .is_ok_and(|value| TRUTHY.contains(&value.trim().to_ascii_lowercase().as_str()))
}

/// Turn a cluster bootstrap failure into a skipped test (`None`) when
/// `SKIP_TEST_CLUSTER` is set. Without the flag the test panics, so a broken
/// CI database never passes silently.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    assert!(
        skip_requested(),
        "embedded PostgreSQL unavailable: {reason} (set SKIP_TEST_CLUSTER=1 to skip)"
    );
    eprintln!("SKIP-TEST-CLUSTER: {reason}");
    None
}
