pub mod calculator;
pub mod payment;
pub mod schedule;

pub use payment::{compute_monthly_payment, effective_monthly_payment};
pub use schedule::generate_schedule;
