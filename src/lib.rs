//! ThinkAlike - value-weighted compatibility matching.
//!
//! Users build value profiles from stated values, onboarding narrative and
//! consented external sources. Matches score the overlap of two profiles,
//! weighted by a central ethical weight table, and explain themselves
//! through key shared values and a traceability graph.

pub mod adapters;
pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod ports;
