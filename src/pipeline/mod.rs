//! Pipeline stages for a digest run.
//!
//! - `collect`: fetch postings from all sources with failure isolation
//! - `dedupe`: suppress postings already recorded in the seen store
//! - `extract`: annotate survivors with keywords and skills
//! - `run`: orchestrate a full run end to end

pub mod collect;
pub mod dedupe;
pub mod extract;
pub mod run;

pub use collect::{CollectOutcome, collect_postings};
pub use dedupe::filter_new;
pub use extract::{annotate, extract_keywords, extract_skills};
pub use run::{RunOptions, run_digest};
