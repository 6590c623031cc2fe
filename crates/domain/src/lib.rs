//! # tpfoyer-domain
//!
//! Pure domain model for the tpfoyer dormitory manager.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions
//! - Define **Blocs** (dormitory buildings with a name and a capacity)
//! - Define **Chambres** (rooms owned by a bloc)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;

pub mod bloc;
pub mod chambre;
