//! # Loan Service
//!
//! The logical operations exposed to the surrounding system: product creation, loan
//! submission and the lifecycle transitions.
//!
//! Every transition follows the same read / compute / commit cycle:
//! 1. take a snapshot of the aggregate,
//! 2. compute the next state with the pure [`lifecycle`] functions,
//! 3. commit with a compare-and-set on the snapshot's version.
//!
//! Two racing writers on one loan therefore cannot both win: the loser gets
//! [`LoanError::ConcurrencyConflict`] and may re-read and retry.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use lendr_common::calendar::CalendarService;
use lendr_common::config::Config;
use lendr_common::error::LoanError;
use lendr_common::ids::{LoanId, ProductId};
use lendr_common::loan::application::{LoanApplication, LoanSubmission};
use lendr_common::loan::product::LoanProductConfig;
use lendr_common::loan::schedule::RepaymentSchedule;
use lendr_common::loan::status::{LoanStatus, Transition};

use crate::lifecycle;
use crate::products::ProductRegistry;
use crate::schedule::ScheduleGenerator;
use crate::store::LoanStore;
use crate::validation::{ValidatedApplication, ValidationEngine};

pub struct LoanService {
    products: ProductRegistry,
    loans: LoanStore,
    engine: ValidationEngine,
}

impl LoanService {
    pub fn new(config: &Config, calendars: Arc<dyn CalendarService>) -> Self {
        Self {
            products: ProductRegistry::new(),
            loans: LoanStore::new(),
            engine: ValidationEngine::new(ScheduleGenerator::from_config(config), calendars),
        }
    }

    pub async fn create_loan_product(&self, config: LoanProductConfig) -> Result<ProductId, LoanError> {
        let name: String = config.name.clone();
        match self.products.create(config).await {
            Ok(id) => {
                info!("Created loan product {} ({})", id, name);
                Ok(id)
            }
            Err(err) => {
                warn!("Refused loan product {}: {}", name, err);
                Err(err)
            }
        }
    }

    /// Validates `submission` and, only if it passes, stores it as a `Pending` loan.
    pub async fn create_loan_application(&self, submission: LoanSubmission) -> Result<LoanId, LoanError> {
        let validated: ValidatedApplication = self.validate(&submission).await?;

        let id: LoanId = self.loans.next_id();
        self.loans
            .insert(lifecycle::open(id, &submission, validated))
            .await;

        info!(
            "Created loan {} for client {} (product {})",
            id, submission.client_id, submission.product_id
        );
        Ok(id)
    }

    /// Runs the full validation of `submission` and returns its schedule without
    /// creating a loan.
    pub async fn preview_schedule(&self, submission: &LoanSubmission) -> Result<RepaymentSchedule, LoanError> {
        self.validate(submission)
            .await
            .map(|validated| validated.schedule)
    }

    pub async fn approve_loan(&self, id: LoanId, date: NaiveDate) -> Result<LoanStatus, LoanError> {
        let loan: LoanApplication = self.loans.snapshot(id).await?;
        let next = lifecycle::approve(&loan, date);
        self.commit(&loan, Transition::Approve, next).await
    }

    pub async fn disburse_loan(&self, id: LoanId, date: NaiveDate) -> Result<LoanStatus, LoanError> {
        let loan: LoanApplication = self.loans.snapshot(id).await?;
        let product: Arc<LoanProductConfig> = self.products.get(loan.product_id).await?;
        let next = lifecycle::disburse(&loan, &product, date);
        self.commit(&loan, Transition::Disburse, next).await
    }

    pub async fn reject_loan(&self, id: LoanId) -> Result<LoanStatus, LoanError> {
        let loan: LoanApplication = self.loans.snapshot(id).await?;
        let next = lifecycle::reject(&loan);
        self.commit(&loan, Transition::Reject, next).await
    }

    pub async fn withdraw_loan(&self, id: LoanId) -> Result<LoanStatus, LoanError> {
        let loan: LoanApplication = self.loans.snapshot(id).await?;
        let next = lifecycle::withdraw(&loan);
        self.commit(&loan, Transition::Withdraw, next).await
    }

    pub async fn get_loan_status(&self, id: LoanId) -> Result<LoanStatus, LoanError> {
        Ok(self.loans.snapshot(id).await?.status)
    }

    pub async fn get_loan(&self, id: LoanId) -> Result<LoanApplication, LoanError> {
        self.loans.snapshot(id).await
    }

    async fn validate(&self, submission: &LoanSubmission) -> Result<ValidatedApplication, LoanError> {
        let product: Arc<LoanProductConfig> = self.products.get(submission.product_id).await?;
        self.engine
            .validate(submission, &product)
            .await
            .inspect_err(|err| {
                warn!(
                    "Rejected application of client {}: {}",
                    submission.client_id, err
                )
            })
    }

    async fn commit(
        &self,
        loan: &LoanApplication,
        transition: Transition,
        next: Result<LoanApplication, LoanError>,
    ) -> Result<LoanStatus, LoanError> {
        let result: Result<LoanApplication, LoanError> = match next {
            Ok(next) => self.loans.compare_and_set(next, loan.version).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(committed) => {
                info!("Loan {} is now {}", committed.id, committed.status);
                Ok(committed.status)
            }
            Err(err) => {
                warn!("Could not {} loan {}: {}", transition, loan.id, err);
                Err(err)
            }
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::InMemoryCalendarService;
    use lendr_common::error::{Entity, ErrorCode};
    use lendr_common::ids::ClientId;
    use lendr_common::loan::product::TermOverrides;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn service() -> LoanService {
        LoanService::new(&Config::default(), Arc::new(InMemoryCalendarService::new()))
    }

    fn submission(product_id: ProductId, first_repayment: NaiveDate) -> LoanSubmission {
        LoanSubmission {
            client_id: ClientId(1),
            group_id: None,
            product_id,
            principal: dec!(5000),
            submitted_on: date(2014, 9, 1),
            expected_disbursement_date: date(2014, 9, 4),
            first_repayment_date: first_repayment,
            loan_term: None,
            terms: TermOverrides::default(),
            collaterals: Vec::new(),
        }
    }

    async fn product(service: &LoanService) -> ProductId {
        service
            .create_loan_product(LoanProductConfig {
                minimum_days_between_disbursal_and_first_repayment: 7,
                ..LoanProductConfig::default()
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn loan_runs_through_its_lifecycle() {
        let service = service();
        let product = product(&service).await;

        let id = service
            .create_loan_application(submission(product, date(2014, 9, 11)))
            .await
            .unwrap();
        assert_eq!(service.get_loan_status(id).await.unwrap(), LoanStatus::Pending);
        assert_eq!(
            service.approve_loan(id, date(2014, 9, 2)).await.unwrap(),
            LoanStatus::Approved
        );
        assert_eq!(
            service.disburse_loan(id, date(2014, 9, 4)).await.unwrap(),
            LoanStatus::Active
        );

        let loan = service.get_loan(id).await.unwrap();
        assert_eq!(loan.version, 3);
        assert_eq!(loan.disbursed_on, Some(date(2014, 9, 4)));
    }

    #[tokio::test]
    async fn rejected_submission_leaves_no_loan() {
        let service = service();
        let product = product(&service).await;

        let err = service
            .create_loan_application(submission(product, date(2014, 9, 5)))
            .await
            .unwrap_err();
        assert_eq!(
            err.validation_errors()[0].code,
            ErrorCode::MinimumDaysBetweenDisbursalAndFirstRepayment
        );
        assert!(service.loans.is_empty().await);
    }

    #[tokio::test]
    async fn preview_creates_nothing() {
        let service = service();
        let product = product(&service).await;

        let schedule = service
            .preview_schedule(&submission(product, date(2014, 9, 11)))
            .await
            .unwrap();
        assert_eq!(schedule.total_principal(), dec!(5000));
        assert!(service.loans.is_empty().await);
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let service = service();
        let err = service
            .create_loan_application(submission(ProductId(77), date(2014, 9, 11)))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            LoanError::NotFound {
                entity: Entity::Product,
                id: 77
            }
        );
        assert!(matches!(
            service.approve_loan(LoanId(3), date(2014, 9, 2)).await,
            Err(LoanError::NotFound { entity: Entity::Loan, .. })
        ));
    }

    #[tokio::test]
    async fn stale_snapshot_loses_the_race() {
        let service = service();
        let product = product(&service).await;
        let id = service
            .create_loan_application(submission(product, date(2014, 9, 11)))
            .await
            .unwrap();

        let stale: LoanApplication = service.get_loan(id).await.unwrap();
        service.withdraw_loan(id).await.unwrap();

        let err = service
            .commit(&stale, Transition::Approve, lifecycle::approve(&stale, date(2014, 9, 2)))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            LoanError::ConcurrencyConflict {
                loan_id: id,
                expected: 1,
                found: 2
            }
        );
        assert_eq!(service.get_loan_status(id).await.unwrap(), LoanStatus::Withdrawn);
    }
}
