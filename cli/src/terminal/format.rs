use colored::*;
use rust_decimal::Decimal;

use lendr_common::error::LoanError;
use lendr_common::loan::schedule::{Installment, RepaymentSchedule};

use crate::terminal::{colors, print};

const ROW_HEADER: [&str; 6] = ["#", "due", "principal", "interest", "total", "balance"];
const COLUMN_WIDTHS: [usize; 6] = [3, 10, 12, 10, 12, 12];

pub fn amount(value: Decimal) -> ColoredString {
    value.to_string().color(colors::AMOUNT)
}

/// Prints `schedule` as a fixed-width table followed by its totals.
pub fn schedule_table(schedule: &RepaymentSchedule) {
    print::print(&format!("{}", row(&ROW_HEADER.map(String::from)).bold()));
    for installment in &schedule.installments {
        print::print(&installment_row(installment));
    }
    print::fat_separator();

    let totals: Vec<(String, ColoredString)> = vec![
        (String::from("principal"), amount(schedule.total_principal())),
        (String::from("interest"), amount(schedule.total_interest())),
        (String::from("total"), amount(schedule.total_due())),
    ];
    print::as_tree_one_level(&totals);
}

fn installment_row(installment: &Installment) -> String {
    row(&[
        installment.number.to_string(),
        installment.due_date.to_string(),
        installment.principal_due.to_string(),
        installment.interest_due.to_string(),
        installment.total_due().to_string(),
        installment.outstanding_balance.to_string(),
    ])
}

fn row(cells: &[String; 6]) -> String {
    cells
        .iter()
        .zip(COLUMN_WIDTHS)
        .map(|(cell, width)| format!("{cell:>width$}"))
        .collect::<Vec<String>>()
        .join("  ")
}

/// Prints the outcome class and every `{code, message}` entry of `err`.
pub fn loan_error(err: &LoanError) {
    let outcome = err.outcome();
    print::tree_head(
        usize::from(outcome.status_code()),
        &format!("{outcome:?}"),
    );
    let entries: Vec<(String, ColoredString)> = err
        .payload()
        .into_iter()
        .map(|entry| (entry.code, entry.message.red()))
        .collect();
    print::as_tree_one_level(&entries);
}
