pub mod admission;
pub mod bookings;
pub mod email;
pub mod metrics;
pub mod schedule;
pub mod settings;
