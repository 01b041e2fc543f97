pub mod dates;
pub mod error;
pub mod output;
pub mod profiles;
pub mod ratings;
pub mod shard;
