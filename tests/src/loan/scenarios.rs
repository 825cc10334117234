#![cfg(test)]
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use lendr_common::error::{Entity, LoanError, Outcome};
use lendr_common::ids::LoanId;
use lendr_common::loan::product::{InterestCalculationPeriod, RepaymentFrequency};
use lendr_common::loan::status::{LoanStatus, Transition};

use crate::fixtures::{MINIMUM_GAP_CODE, application, date, service_with_product};

/// A seven day gap meets the product minimum, so the loan goes all the way to Active.
#[tokio::test]
async fn accepted_application_becomes_active() -> anyhow::Result<()> {
    let (service, product) = service_with_product().await;

    let id: LoanId = service
        .create_loan_application(application(product, date(2014, 9, 4), date(2014, 9, 11)))
        .await?;
    assert_eq!(service.get_loan_status(id).await?, LoanStatus::Pending);

    assert_eq!(service.approve_loan(id, date(2014, 9, 4)).await?, LoanStatus::Approved);
    assert_eq!(service.disburse_loan(id, date(2014, 9, 4)).await?, LoanStatus::Active);

    let loan = service.get_loan(id).await?;
    assert_eq!(loan.schedule.len(), 12);
    assert_eq!(loan.schedule.first_due_date(), Some(date(2014, 9, 11)));
    assert_eq!(loan.schedule.total_principal(), dec!(100000.00));
    assert_eq!(loan.collaterals.len(), 1);
    Ok(())
}

/// A one day gap is refused before any loan exists.
#[tokio::test]
async fn short_gap_is_rejected_without_a_loan() {
    let (service, product) = service_with_product().await;

    let err = service
        .create_loan_application(application(product, date(2014, 9, 4), date(2014, 9, 5)))
        .await
        .unwrap_err();

    assert_eq!(err.outcome(), Outcome::Rejected);
    assert_eq!(err.outcome().status_code(), 403);
    let payload = err.payload();
    assert_eq!(payload.len(), 1);
    assert_eq!(payload[0].code, MINIMUM_GAP_CODE);

    assert_eq!(
        service.get_loan(LoanId(1)).await.unwrap_err(),
        LoanError::NotFound {
            entity: Entity::Loan,
            id: 1
        }
    );
}

#[tokio::test]
async fn minimum_gap_bound_is_inclusive() {
    let (service, product) = service_with_product().await;
    let disbursal: NaiveDate = date(2014, 9, 4);

    for (first_repayment, accepted) in [
        (date(2014, 9, 10), false),
        (date(2014, 9, 11), true),
        (date(2014, 9, 12), true),
    ] {
        let result = service
            .create_loan_application(application(product, disbursal, first_repayment))
            .await;
        assert_eq!(result.is_ok(), accepted, "first repayment on {first_repayment}");
    }
}

#[tokio::test]
async fn transitions_only_from_their_source_state() -> anyhow::Result<()> {
    let (service, product) = service_with_product().await;
    let id: LoanId = service
        .create_loan_application(application(product, date(2014, 9, 4), date(2014, 9, 11)))
        .await?;

    let err = service.disburse_loan(id, date(2014, 9, 4)).await.unwrap_err();
    assert_eq!(
        err,
        LoanError::InvalidTransition {
            loan_id: id,
            action: Transition::Disburse,
            from: LoanStatus::Pending
        }
    );
    assert_eq!(err.payload()[0].code, "error.msg.loan.invalid.transition");
    assert_eq!(service.get_loan_status(id).await?, LoanStatus::Pending);

    service.approve_loan(id, date(2014, 9, 4)).await?;
    assert!(service.approve_loan(id, date(2014, 9, 4)).await.is_err());
    assert!(service.reject_loan(id).await.is_err());
    assert!(service.withdraw_loan(id).await.is_err());
    assert_eq!(service.get_loan_status(id).await?, LoanStatus::Approved);
    Ok(())
}

#[tokio::test]
async fn late_disbursal_keeps_the_loan_approved() -> anyhow::Result<()> {
    let (service, product) = service_with_product().await;
    let id: LoanId = service
        .create_loan_application(application(product, date(2014, 9, 4), date(2014, 9, 11)))
        .await?;
    service.approve_loan(id, date(2014, 9, 4)).await?;

    let err = service.disburse_loan(id, date(2014, 9, 6)).await.unwrap_err();
    assert_eq!(err.payload()[0].code, MINIMUM_GAP_CODE);

    let loan = service.get_loan(id).await?;
    assert_eq!(loan.status, LoanStatus::Approved);
    assert_eq!(loan.disbursed_on, None);
    Ok(())
}

#[tokio::test]
async fn pending_loans_can_be_rejected_or_withdrawn() -> anyhow::Result<()> {
    let (service, product) = service_with_product().await;
    let first: LoanId = service
        .create_loan_application(application(product, date(2014, 9, 4), date(2014, 9, 11)))
        .await?;
    let second: LoanId = service
        .create_loan_application(application(product, date(2014, 9, 4), date(2014, 9, 11)))
        .await?;

    assert_eq!(service.reject_loan(first).await?, LoanStatus::Rejected);
    assert_eq!(service.withdraw_loan(second).await?, LoanStatus::Withdrawn);
    assert!(service.approve_loan(first, date(2014, 9, 4)).await.is_err());
    Ok(())
}

#[tokio::test]
async fn grace_periods_defer_principal_and_interest() -> anyhow::Result<()> {
    let (service, product) = service_with_product().await;
    let schedule = service
        .preview_schedule(&application(product, date(2014, 9, 4), date(2014, 9, 11)))
        .await?;

    for installment in &schedule.installments[..2] {
        assert_eq!(installment.principal_due, Decimal::ZERO);
        assert_eq!(installment.interest_due, Decimal::ZERO);
    }
    assert!(schedule.installments[2..]
        .iter()
        .all(|installment| installment.interest_due > Decimal::ZERO));
    assert_eq!(schedule.total_principal(), dec!(100000.00));
    Ok(())
}

/// 1000% a year over 120 monthly installments compounds past any representable amount.
#[tokio::test]
async fn unrepresentable_schedule_is_rejected() -> anyhow::Result<()> {
    let (service, product) = service_with_product().await;
    let mut submission = application(product, date(2024, 1, 1), date(2024, 2, 1));
    submission.submitted_on = date(2024, 1, 1);
    submission.principal = dec!(1000);
    submission.terms.number_of_repayments = Some(120);
    submission.terms.repayment_frequency = Some(RepaymentFrequency::Months);
    submission.terms.interest_rate_per_period = Some(dec!(1000));
    submission.terms.interest_calculation_period =
        Some(InterestCalculationPeriod::SameAsRepaymentPeriod);
    submission.terms.principal_grace_periods = Some(0);
    submission.terms.interest_grace_periods = Some(0);

    let err = service.create_loan_application(submission).await.unwrap_err();
    assert_eq!(err.outcome(), Outcome::Rejected);
    assert_eq!(
        err.payload()[0].code,
        "error.msg.loan.schedule.amount.out.of.range"
    );
    assert!(matches!(
        service.get_loan(LoanId(1)).await,
        Err(LoanError::NotFound { entity: Entity::Loan, .. })
    ));
    Ok(())
}
