use std::path::Path;

use colored::*;

use lendr_common::config::Config;
use lendr_common::error::LoanError;
use lendr_common::ids::LoanId;
use lendr_common::loan::application::LoanApplication;
use lendr_core::LoanService;

use crate::commands::schedule::{prepare, print_schedule};
use crate::scenario::{self, Scenario};
use crate::terminal::{colors, format, print};

pub async fn simulate(path: &Path, cfg: &Config) -> anyhow::Result<()> {
    let scenario: Scenario = scenario::load(path)?;
    let approve_on = scenario.approve_on;
    let disburse_on = scenario.disburse_on;
    let (service, submission) = prepare(scenario, cfg).await?;

    print::header("submission");
    let id: LoanId = match service.create_loan_application(submission).await {
        Ok(id) => id,
        Err(err) => {
            format::loan_error(&err);
            return Ok(());
        }
    };
    step(&service, id, "created", Ok(())).await?;

    if let Some(date) = approve_on {
        print::header("approval");
        let result = service.approve_loan(id, date).await.map(|_| ());
        if !step(&service, id, &format!("approved on {date}"), result).await? {
            return Ok(());
        }
    }

    if let Some(date) = disburse_on {
        print::header("disbursal");
        let result = service.disburse_loan(id, date).await.map(|_| ());
        if !step(&service, id, &format!("disbursed on {date}"), result).await? {
            return Ok(());
        }
    }

    crate::lprint!();
    let loan: LoanApplication = service.get_loan(id).await?;
    print_schedule(&loan.schedule);
    print::end_of_program();
    Ok(())
}

/// Reports one lifecycle step. Returns `false` once the loan can go no further.
async fn step(
    service: &LoanService,
    id: LoanId,
    label: &str,
    result: Result<(), LoanError>,
) -> anyhow::Result<bool> {
    if let Err(err) = result {
        format::loan_error(&err);
        return Ok(false);
    }

    let loan: LoanApplication = service.get_loan(id).await?;
    print::tree_head(loan.id.get() as usize, label);
    print::as_tree_one_level(&[
        (String::from("status"), loan.status.to_string().color(colors::PRIMARY)),
        (String::from("version"), loan.version.to_string().normal()),
        (
            String::from("changed"),
            loan.status_changed_at.to_rfc3339().color(colors::DATE),
        ),
    ]);
    Ok(true)
}
