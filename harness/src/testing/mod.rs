//! Assertion layer
//!
//! Response-shape checks applied inside scenario iterations.

mod assertions;

pub use assertions::{
    AssertionResult, all, assert_datasource_membership, assert_group_count, assert_group_limit,
    assert_some_groups, expected_group_count,
};
