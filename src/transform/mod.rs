//! The data-transformation core: decoding, grouping, summarizing,
//! formatting and ranking of per-student discipline records.

pub mod builder;
pub mod decoder;
pub mod formatter;
pub mod grouper;
pub mod pipeline;
pub mod ranker;
pub mod summarizer;
