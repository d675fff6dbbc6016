//! Synthetic issuance generation.
//!
//! [`corpus`] drives [`emission`] year by year to rebuild the 2010-2023
//! history; [`window`] produces the flat 2015-2026 data set. Both take an
//! explicit RNG or a seed so runs can be pinned for tests.

pub mod corpus;
pub mod emission;
pub mod sampler;
pub mod window;

pub use corpus::{generate_corpus, generate_records, Corpus, CorpusConfig, CorpusSummary};
pub use emission::{AmountMenus, EmissionSynthesizer};
pub use sampler::DiscreteSampler;
pub use window::{generate_window, WindowConfig};
