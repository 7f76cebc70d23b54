pub mod tree;

pub use tree::{BranchSegment, TreeGenerator, TreeLayout, TreeParams, sort_for_reveal};
