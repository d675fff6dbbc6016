//! Legacy data-module migration: pull hand-written records out of the
//! dashboard's JS data file and splice them behind a generated corpus.

pub mod extract;
pub mod merge;
pub mod source;

pub use extract::{
    extract, locate_block, split_fragments, BlockDeclaration, BlockKind, BraceCountingExtractor,
    FragmentExtractor,
};
pub use merge::{merge, render_record_literal, MergeLayout};
pub use source::{AuxiliaryBlock, LegacyBlockNames, LegacySource};
