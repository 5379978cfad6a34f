pub mod compile;
pub mod dump;
