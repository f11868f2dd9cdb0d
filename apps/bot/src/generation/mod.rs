// Content generation: topics, the provider adapter, response parsing,
// near-duplicate detection, and the novelty-bounded retry loop.

pub mod generator;
pub mod novelty;
pub mod similarity;
pub mod template;
pub mod topic;
