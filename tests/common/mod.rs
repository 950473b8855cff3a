//! Common test utilities for tangle integration suites
//!
//! Builders for the reference scenarios and small helpers for inspecting
//! reports.

#![allow(dead_code, unused_imports)]

pub mod fixtures;

pub use fixtures::{
    account_names, cluster, low_veracity_community, rapid_url_shares, scattered_posts,
    star_edges, synchronized_copy_posts,
};
