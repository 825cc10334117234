use std::path::Path;
use std::sync::Arc;

use colored::*;

use lendr_common::config::Config;
use lendr_common::ids::ProductId;
use lendr_common::loan::application::LoanSubmission;
use lendr_common::loan::schedule::RepaymentSchedule;
use lendr_core::LoanService;
use lendr_core::calendar::InMemoryCalendarService;

use crate::scenario::{self, Scenario};
use crate::terminal::{colors, format, print};

pub async fn schedule(path: &Path, cfg: &Config) -> anyhow::Result<()> {
    let scenario: Scenario = scenario::load(path)?;
    let (service, submission) = prepare(scenario, cfg).await?;

    match service.preview_schedule(&submission).await {
        Ok(schedule) => print_schedule(&schedule),
        Err(err) => {
            print::header("application rejected");
            format::loan_error(&err);
        }
    }
    Ok(())
}

/// Registers the scenario's product and calendar with a fresh service.
pub(crate) async fn prepare(
    scenario: Scenario,
    cfg: &Config,
) -> anyhow::Result<(LoanService, LoanSubmission)> {
    let calendars: Arc<InMemoryCalendarService> = Arc::new(InMemoryCalendarService::new());
    if let Some(record) = scenario.calendar {
        calendars.attach(record.into_calendar()?).await;
    }

    let service: LoanService = LoanService::new(cfg, calendars);
    let product_id: ProductId = service
        .create_loan_product(scenario.product)
        .await
        .map_err(|err| anyhow::anyhow!("product refused: {err}"))?;

    let mut submission: LoanSubmission = scenario.application;
    submission.product_id = product_id;
    Ok((service, submission))
}

pub(crate) fn print_schedule(schedule: &RepaymentSchedule) {
    print::header("repayment schedule");
    print::aligned_line("principal", 12, format::amount(schedule.principal));
    print::aligned_line("installments", 12, schedule.len().to_string());
    if let (Some(first), Some(last)) = (schedule.first_due_date(), schedule.last_due_date()) {
        let span: ColoredString = format!("{first} .. {last}").color(colors::DATE);
        print::aligned_line("due", 12, span);
    }
    print::fat_separator();
    format::schedule_table(schedule);
}
