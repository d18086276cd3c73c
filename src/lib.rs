// src/lib.rs

//! jobdigest Library
//!
//! A batch aggregator for DevOps/SRE job postings: fetches listings from
//! multiple job platforms, suppresses previously notified postings, and
//! renders an HTML email digest.

pub mod adapters;
pub mod error;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod render;
pub mod store;
pub mod utils;
