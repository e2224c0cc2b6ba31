//! Scenario catalogs.
//!
//! Descriptions and assertion messages are the literal texts the storefront
//! team reports against; keep them verbatim.

pub mod admin;
pub mod user;

use crate::scenario::{Scenario, Suite};

/// Scenarios of one suite
#[must_use]
pub fn catalog(suite: Suite) -> Vec<Scenario> {
    match suite {
        Suite::User => user::catalog(),
        Suite::Admin => admin::catalog(),
    }
}

/// Every scenario of every suite
#[must_use]
pub fn all() -> Vec<Scenario> {
    Suite::ALL.into_iter().flat_map(catalog).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let scenarios = all();
        let ids: HashSet<_> = scenarios.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), scenarios.len());
    }

    #[test]
    fn test_suites_are_tagged() {
        assert!(catalog(Suite::User).iter().all(|s| s.suite == Suite::User));
        assert!(catalog(Suite::Admin).iter().all(|s| s.suite == Suite::Admin));
    }

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(catalog(Suite::User).len(), 31);
        assert_eq!(catalog(Suite::Admin).len(), 38);
    }
}
