pub mod admission;
pub mod booking;
pub mod schedule;
pub mod settings;
