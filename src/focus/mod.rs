pub mod calculator;
pub mod hints;
pub mod radar;
pub mod types;
