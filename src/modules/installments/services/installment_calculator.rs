use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::core::money::{floor_centavos, round_centavos};
use crate::core::{AppError, Result};
use crate::modules::installments::models::Installment;

/// Calculator for equal-split installment schedules.
///
/// Splits a total into N ordered installments of near-equal value. The first
/// N-1 installments receive the total divided by N truncated to the centavo;
/// the last installment absorbs the entire residual, so the schedule sums to
/// the total exactly. Due dates advance by calendar months from the first due
/// date, with the day-of-month clamped when the target month is shorter.
pub struct InstallmentCalculator;

impl InstallmentCalculator {
    /// Generate a schedule of `count` installments for `total`.
    ///
    /// `total` is normalized to whole centavos before the split; a total of
    /// zero produces `count` zero-amount rows. When `settled` is set every
    /// installment comes out Paid with `paid_on` equal to its due date.
    ///
    /// A `count` of zero is rejected rather than clamped to 1.
    pub fn generate(
        total: Decimal,
        count: u32,
        first_due_date: NaiveDate,
        settled: bool,
    ) -> Result<Vec<Installment>> {
        if count == 0 {
            return Err(AppError::validation("Installment count must be at least 1"));
        }
        if total < Decimal::ZERO {
            return Err(AppError::validation("Total amount cannot be negative"));
        }

        let total = round_centavos(total);
        let base = floor_centavos(total / Decimal::from(count));

        let mut installments = Vec::with_capacity(count as usize);
        let mut distributed = Decimal::ZERO;

        for i in 0..count {
            let due_date = first_due_date
                .checked_add_months(Months::new(i))
                .ok_or_else(|| AppError::validation("Due date out of calendar range"))?;

            let amount = if i == count - 1 {
                // Last installment absorbs the rounding residual
                total - distributed
            } else {
                base
            };
            distributed += amount;

            let mut installment = Installment::pending(i + 1, due_date, amount);
            if settled {
                installment.mark_as_paid(due_date)?;
            }
            installments.push(installment);
        }

        let sum: Decimal = installments.iter().map(|p| p.amount).sum();
        if sum != total {
            warn!("Installment sum mismatch: distributed {} vs total {}", sum, total);
            return Err(AppError::internal(format!(
                "Installment amounts ({}) do not sum to total ({})",
                sum, total
            )));
        }

        info!(
            "Generated {} installment(s) of base {} totaling {} starting {}",
            count, base, total, first_due_date
        );
        Ok(installments)
    }
}
