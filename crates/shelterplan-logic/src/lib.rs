//! Pure planning logic for ShelterPlan.
//!
//! This crate contains the evacuation planning core, independent of any
//! storage, transport, or UI. Functions take plain data and return results,
//! making them unit-testable and cheap enough to re-run on every scenario
//! change.
//!
//! A planning run has two stages: the demand predictor turns zones and a
//! disaster scenario into per-zone evacuation demand, and the allocator
//! assigns that demand to shelters with a greedy cheapest-edge-first walk.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`allocate`] | Greedy capacitated assignment of demand to shelters |
//! | [`catalog`] | JSON loading and the built-in demo zone/shelter catalog |
//! | [`cost`] | Haversine distance, modeled travel time, edge cost |
//! | [`demand`] | Vulnerability/hazard scoring and evacuation demand |
//! | [`error`] | Error type for lookup failures and catalog parsing |
//! | [`pipeline`] | Predict → allocate for one scenario run |
//! | [`scenario`] | Disaster type, time of day, scenario parameters |
//! | [`shelter`] | Shelter records, availability, occupancy scoring |
//! | [`zone`] | Zone records |

pub mod allocate;
pub mod catalog;
pub mod cost;
pub mod demand;
pub mod error;
pub mod pipeline;
pub mod scenario;
pub mod shelter;
pub mod zone;

pub use error::PlanError;
