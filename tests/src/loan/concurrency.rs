#![cfg(test)]
use std::sync::Arc;

use lendr_common::error::LoanError;
use lendr_common::ids::LoanId;
use lendr_common::loan::status::LoanStatus;
use lendr_core::LoanService;

use crate::fixtures::{application, date, service_with_product};

/// Two disbursals racing on the same loan: exactly one may win.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_disbursals_have_one_winner() {
    let (service, product) = service_with_product().await;
    let service: Arc<LoanService> = Arc::new(service);

    for _ in 0..25 {
        let id: LoanId = service
            .create_loan_application(application(product, date(2014, 9, 4), date(2014, 9, 11)))
            .await
            .unwrap();
        service.approve_loan(id, date(2014, 9, 4)).await.unwrap();

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.disburse_loan(id, date(2014, 9, 4)).await })
            })
            .collect();

        let mut winners: usize = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(status) => {
                    assert_eq!(status, LoanStatus::Active);
                    winners += 1;
                }
                Err(LoanError::ConcurrencyConflict { .. } | LoanError::InvalidTransition { .. }) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(winners, 1);
        let loan = service.get_loan(id).await.unwrap();
        assert_eq!(loan.status, LoanStatus::Active);
        assert_eq!(loan.version, 3);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn distinct_loans_progress_in_parallel() {
    let (service, product) = service_with_product().await;
    let service: Arc<LoanService> = Arc::new(service);

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                let id = service
                    .create_loan_application(application(
                        product,
                        date(2014, 9, 4),
                        date(2014, 9, 11),
                    ))
                    .await?;
                service.approve_loan(id, date(2014, 9, 4)).await?;
                service.disburse_loan(id, date(2014, 9, 4)).await
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), Ok(LoanStatus::Active));
    }
}
