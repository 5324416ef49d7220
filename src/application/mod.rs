//! Application services layer.

pub mod blog;
pub mod clock;
pub mod error;
pub mod raffle;
pub mod repos;
