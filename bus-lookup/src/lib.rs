//! Bus stop, route and depot lookup for Kerala state transport.
//!
//! Answers three questions for a rider: which stops are near me, which
//! buses run between two places, and where is the nearest depot. Every
//! answer comes from a live source when one is reachable, from a local
//! cache when it is fresh, and from a bundled dataset otherwise.

pub mod acquire;
pub mod cache;
pub mod config;
pub mod domain;
pub mod fallback;
pub mod geo;
pub mod location;
pub mod rate_limit;
pub mod retry;
pub mod sources;
pub mod status;
pub mod web;
