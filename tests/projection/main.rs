//! Read-side tests: the merged inventory view and the statistics map.

mod merge;
