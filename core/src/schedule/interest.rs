use chrono::NaiveDate;
use rust_decimal::Decimal;

use lendr_common::loan::product::{
    InterestCalculationPeriod, InterestRateFrequency, LoanTerms, RepaymentFrequency,
};

const WEEKS_PER_YEAR: u32 = 52;
const MONTHS_PER_YEAR: u32 = 12;

/// Turns the nominal rate of a product into interest owed over a period.
///
/// Results are unrounded; callers round to the currency precision. Every product is
/// checked, so an out-of-range rate surfaces as `None` instead of a panic.
#[derive(Debug, Clone)]
pub(crate) struct InterestCalculator {
    /// Nominal annual rate as a fraction (18% is `0.18`).
    annual_rate: Decimal,
    repayment_every: Decimal,
    periods_per_year: Decimal,
    days_in_year: Decimal,
    period_type: InterestCalculationPeriod,
}

impl InterestCalculator {
    /// `None` when the annual rate cannot be represented.
    pub(crate) fn new(terms: &LoanTerms, days_in_year: u32) -> Option<Self> {
        let days_in_year = Decimal::from(days_in_year);
        let hundred = Decimal::ONE_HUNDRED;
        let rate = terms.interest_rate_per_period;

        let annual_rate = match terms.interest_rate_frequency {
            InterestRateFrequency::Daily => rate.checked_mul(days_in_year)? / hundred,
            InterestRateFrequency::Monthly => {
                rate.checked_mul(Decimal::from(MONTHS_PER_YEAR))? / hundred
            }
            InterestRateFrequency::Yearly => rate / hundred,
        };

        let periods_per_year = match terms.repayment_frequency {
            RepaymentFrequency::Days => days_in_year,
            RepaymentFrequency::Weeks => Decimal::from(WEEKS_PER_YEAR),
            RepaymentFrequency::Months => Decimal::from(MONTHS_PER_YEAR),
        };

        Some(Self {
            annual_rate,
            repayment_every: Decimal::from(terms.repayment_every),
            periods_per_year,
            days_in_year,
            period_type: terms.interest_calculation_period,
        })
    }

    /// Rate of one uniform repayment period.
    pub(crate) fn nominal_period_rate(&self) -> Option<Decimal> {
        self.annual_rate
            .checked_mul(self.repayment_every)?
            .checked_div(self.periods_per_year)
    }

    /// Interest accrued on `balance` between `from` and `to`, `None` on overflow.
    pub(crate) fn interest_for(&self, balance: Decimal, from: NaiveDate, to: NaiveDate) -> Option<Decimal> {
        match self.period_type {
            InterestCalculationPeriod::Daily => {
                let days = Decimal::from((to - from).num_days().max(0));
                balance
                    .checked_mul(self.annual_rate)?
                    .checked_mul(days)?
                    .checked_div(self.days_in_year)
            }
            InterestCalculationPeriod::SameAsRepaymentPeriod => {
                balance
                    .checked_mul(self.annual_rate)?
                    .checked_mul(self.repayment_every)?
                    .checked_div(self.periods_per_year)
            }
        }
    }
}
