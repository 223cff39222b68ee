//! Host load aggregation and ranking.

pub mod aggregate;
pub mod rank;
pub mod service;


pub use aggregate::aggregate;
pub use rank::{rank, rank_entries};
pub use service::LoadRanker;
