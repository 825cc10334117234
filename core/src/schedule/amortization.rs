use chrono::NaiveDate;
use rust_decimal::Decimal;

use lendr_common::loan::product::{AmortizationType, LoanTerms};
use lendr_common::money::MoneyPrecision;

use super::interest::InterestCalculator;

/// Interval covered by one installment.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Period {
    pub from: NaiveDate,
    pub due: NaiveDate,
}

/// Amounts due for one period and the balance left afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Allocation {
    pub principal: Decimal,
    pub interest: Decimal,
    pub balance: Decimal,
}

/// An amount of the schedule does not fit in a `Decimal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Overflow;

/// Splits `principal` and its interest across `periods`.
///
/// The first `principal_grace_periods` carry no principal and the first
/// `interest_grace_periods` carry no interest. Interest accrued during the interest grace is
/// spread over the remaining installments. The final installment always pays the whole
/// remaining balance, so principal components sum to `principal` exactly.
///
/// Fails with [`Overflow`] when the payment, an interest amount or the schedule total is
/// out of range, so every total of the returned allocations can be summed safely.
///
/// Callers guarantee both grace counts are smaller than `periods.len()`.
pub(crate) fn allocate(
    terms: &LoanTerms,
    principal: Decimal,
    periods: &[Period],
    interest: &InterestCalculator,
    precision: &MoneyPrecision,
) -> Result<Vec<Allocation>, Overflow> {
    let count: usize = periods.len();
    let principal_grace: usize = terms.principal_grace_periods as usize;
    let interest_grace: usize = terms.interest_grace_periods as usize;
    let amortizing: usize = count - principal_grace;

    let level: Decimal = match terms.amortization {
        AmortizationType::EqualInstallments => {
            let rate: Decimal = interest.nominal_period_rate().ok_or(Overflow)?;
            precision.round(annuity_payment(principal, rate, amortizing).ok_or(Overflow)?)
        }
        AmortizationType::EqualPrincipalPayments => {
            precision.round(principal / Decimal::from(amortizing))
        }
    };

    let mut balance: Decimal = principal;
    let mut deferred: Decimal = Decimal::ZERO;
    let mut total: Decimal = principal;
    let mut allocations: Vec<Allocation> = Vec::with_capacity(count);

    for (index, period) in periods.iter().enumerate() {
        let accrued: Decimal = interest
            .interest_for(balance, period.from, period.due)
            .map(|amount| precision.round(amount))
            .ok_or(Overflow)?;
        total = total.checked_add(accrued).ok_or(Overflow)?;

        let principal_due: Decimal = if index < principal_grace {
            Decimal::ZERO
        } else if index + 1 == count {
            balance
        } else {
            let share: Decimal = match terms.amortization {
                AmortizationType::EqualInstallments => level - accrued,
                AmortizationType::EqualPrincipalPayments => level,
            };
            share.max(Decimal::ZERO).min(balance)
        };

        let interest_due: Decimal = if index < interest_grace {
            deferred += accrued;
            Decimal::ZERO
        } else {
            accrued
        };

        balance -= principal_due;
        allocations.push(Allocation {
            principal: principal_due,
            interest: interest_due,
            balance,
        });
    }

    redistribute(&mut allocations[interest_grace..], deferred, precision);
    Ok(allocations)
}

/// Level payment repaying `principal` over `periods` at `rate` per period.
fn annuity_payment(principal: Decimal, rate: Decimal, periods: usize) -> Option<Decimal> {
    let periods_dec: Decimal = Decimal::from(periods);
    if rate.is_zero() {
        return Some(principal / periods_dec);
    }

    let growth: Decimal = compound(rate, periods)?;
    principal
        .checked_mul(rate)?
        .checked_mul(growth)?
        .checked_div(growth - Decimal::ONE)
}

/// `(1 + rate)^periods`, `None` once it leaves the `Decimal` range.
fn compound(rate: Decimal, periods: usize) -> Option<Decimal> {
    let factor: Decimal = Decimal::ONE.checked_add(rate)?;
    (0..periods).try_fold(Decimal::ONE, |acc, _| acc.checked_mul(factor))
}

/// Adds `deferred` interest evenly to `allocations`, the last one taking the remainder.
fn redistribute(allocations: &mut [Allocation], deferred: Decimal, precision: &MoneyPrecision) {
    if deferred.is_zero() || allocations.is_empty() {
        return;
    }

    let share: Decimal = precision.truncate(deferred / Decimal::from(allocations.len()));
    let last: usize = allocations.len() - 1;
    for allocation in allocations[..last].iter_mut() {
        allocation.interest += share;
    }
    allocations[last].interest += deferred - share * Decimal::from(last);
}
