pub mod amortization;
pub mod history;
