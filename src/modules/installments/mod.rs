//! Monetary allocation: penny-exact equal splits with the rounding residual
//! carried by the last installment.

pub mod models;
pub mod services;

pub use models::{Installment, InstallmentStatus};
pub use services::InstallmentCalculator;
