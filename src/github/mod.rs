//! GitHub API mediation (spec §4.2 "API Mediator").
//!
//! Grounded in the teacher's `github/client.rs`: a thin `reqwest`-based
//! client with header configuration and rate-limit retry, extended here
//! with a read-cache and the jittered exponential backoff described in
//! `rate_limiter.py`. GraphQL access stays ad-hoc (`graphql_query`), the way
//! the teacher itself calls GraphQL outside its typed `cynic` queries, since
//! a full schema file for typed derives isn't available to this crate.

pub mod client;
pub mod graphql;
pub mod rest;

pub use client::GithubClient;
