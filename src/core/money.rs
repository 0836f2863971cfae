use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places for BRL amounts (centavos)
pub const CENT_SCALE: u32 = 2;

/// Rounds an amount to whole centavos, half away from zero.
pub fn round_centavos(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CENT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Truncates an amount to whole centavos.
///
/// Used for the per-installment base of an equal split, so the residual
/// carried to the last installment is never negative for non-negative totals.
pub fn floor_centavos(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CENT_SCALE, RoundingStrategy::ToZero)
}

/// Formats an amount in the pt-BR convention: `1.234,56`.
pub fn format_brl(amount: Decimal) -> String {
    let normalized = round_centavos(amount);
    let text = format!("{:.2}", normalized);
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        let remaining = int_part.len() - i;
        if i > 0 && remaining % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    format!("R$ {}{},{}", sign, grouped, frac_part)
}
