//! Rich-document model and its conversions to and from the syntax tree

pub mod from_mdast;
pub mod nodes;
pub mod normalize;
pub mod to_mdast;

pub use from_mdast::mdast_to_slate;
pub use nodes::*;
pub use to_mdast::slate_to_mdast;
