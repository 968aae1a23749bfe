//! Gateway to the RZD passenger timetable service.
//!
//! Wraps the service's challenge/response protocol and loosely-typed JSON
//! behind four typed searches (routes, round trips, carriages, stations),
//! and serves them as a small JSON API.

pub mod cache;
pub mod domain;
pub mod rzd;
pub mod web;
