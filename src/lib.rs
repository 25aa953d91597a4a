//! Disease and ingredient food guides
//!
//! [`compat_core`] aggregates catalog relations into ranked guides,
//! [`store`] reads the SQLite catalog, [`service`] validates and answers
//! queries, and [`http`] exposes them over axum.

pub mod compat_core;
pub mod config;
pub mod http;
pub mod service;
pub mod store;
