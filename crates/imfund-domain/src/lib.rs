//! Domain types shared between the imfund crates
//!
//! This crate provides the canonical models for random award discovery:
//! - AwardRecord: one record from the award registry, as served
//! - AwardStatus, SampleRequest: which subpopulation to sample from
//! - ParsedCitation: structured fields recovered from a raw citation string

pub mod award;
pub mod citation;

pub use award::*;
pub use citation::*;
