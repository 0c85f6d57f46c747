pub mod grouping;
pub mod neighbors;
pub mod output;
pub mod search;
pub mod spatial;
