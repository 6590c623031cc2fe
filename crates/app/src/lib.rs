//! # tpfoyer-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `BlocRepository` — CRUD and derived queries for blocs
//! - Define **driving/inbound ports** as use-case structs:
//!   - `BlocService` — list, filter by capacity, get, add, modify, remove, search
//! - Orchestrate domain objects without knowing *how* persistence works
//!
//! ## Dependency rule
//! Depends on `tpfoyer-domain` only (plus `tracing` for instrumentation).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
