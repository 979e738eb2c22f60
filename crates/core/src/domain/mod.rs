pub mod error;
pub mod possibility;
pub mod week;
