use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

/// Installment status, serialized with the wire vocabulary used by the
/// payables tables (`a_vencer` / `paga`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallmentStatus {
    /// Not yet due or not yet paid
    #[serde(rename = "a_vencer")]
    Pending,
    /// Payment registered
    #[serde(rename = "paga")]
    Paid,
}

impl InstallmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "a_vencer",
            Self::Paid => "paga",
        }
    }
}

impl std::fmt::Display for InstallmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for InstallmentStatus {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "a_vencer" => Ok(Self::Pending),
            "paga" => Ok(Self::Paid),
            _ => Err(format!("Invalid installment status: {}", value)),
        }
    }
}

/// One scheduled partial payment (parcela) of a larger total
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Installment {
    /// Sequential number, 1-based
    pub number: u32,
    /// Payment due date
    pub due_date: NaiveDate,
    /// Amount in BRL, two decimal places
    pub amount: Decimal,
    pub status: InstallmentStatus,
    /// Present iff status is Paid
    pub paid_on: Option<NaiveDate>,
}

impl Installment {
    pub fn pending(number: u32, due_date: NaiveDate, amount: Decimal) -> Self {
        Self { number, due_date, amount, status: InstallmentStatus::Pending, paid_on: None }
    }

    pub fn is_paid(&self) -> bool {
        self.status == InstallmentStatus::Paid
    }

    /// Registers payment of this installment.
    ///
    /// Paying an already-paid installment is rejected; the external "mark as
    /// paid" action mutates status and paid date only, never the amount.
    pub fn mark_as_paid(&mut self, paid_on: NaiveDate) -> Result<()> {
        if self.is_paid() {
            return Err(AppError::validation(format!(
                "Installment {} is already paid",
                self.number
            )));
        }
        self.status = InstallmentStatus::Paid;
        self.paid_on = Some(paid_on);
        Ok(())
    }
}
