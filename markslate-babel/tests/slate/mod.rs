//! Rich-document tests: JSON shape and mark canonicalization.

mod json;
mod marks;
