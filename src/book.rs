use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use parking_lot::{Mutex, RwLock};

use crate::anchor::resolve_anchor;
use crate::dates;
use crate::decimal::Money;
use crate::errors::{LoanError, Result};
use crate::events::{EventStore, LoanEvent};
use crate::ledger::{Payment, PaymentLedger};
use crate::loan::{Loan, LoanTerms};
use crate::payments::{
    edit_payment, post_payment, reverse_payment, EditRequest, PostRequest,
};
use crate::reconcile::rebuild_aggregate;
use crate::schedule::project;
use crate::types::{InstallmentProjection, LoanId, PaymentId};

/// a loan with its ledger and pending events, guarded as one unit
#[derive(Debug)]
struct LoanAccount {
    loan: Loan,
    ledger: PaymentLedger,
    events: EventStore,
}

/// in-process loan store and the operation surface of the engine
///
/// Mutations against one loan serialize on that loan's mutex: a posting
/// reads and writes the aggregate under the same lock the ledger change
/// commits under, so two concurrent postings can never both observe the
/// same paid count. Projection takes the lock only long enough to read.
#[derive(Default)]
pub struct LoanBook {
    accounts: RwLock<HashMap<LoanId, Arc<Mutex<LoanAccount>>>>,
    payment_index: RwLock<HashMap<PaymentId, LoanId>>,
}

impl LoanBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// open a new loan and start tracking it
    pub fn open_loan(&self, terms: LoanTerms) -> Result<Loan> {
        let loan = Loan::open(terms)?;

        let mut events = EventStore::new();
        events.emit(LoanEvent::LoanOpened {
            loan_id: loan.id,
            principal: loan.principal,
            total_payable: loan.total_payable,
            installment_count: loan.installment_count,
            first_due_date: loan.next_due_date,
        });

        let account = LoanAccount {
            loan: loan.clone(),
            ledger: PaymentLedger::new(),
            events,
        };
        self.accounts
            .write()
            .insert(loan.id, Arc::new(Mutex::new(account)));

        Ok(loan)
    }

    fn account(&self, loan_id: LoanId) -> Result<Arc<Mutex<LoanAccount>>> {
        self.accounts
            .read()
            .get(&loan_id)
            .cloned()
            .ok_or(LoanError::LoanNotFound { id: loan_id })
    }

    fn loan_of_payment(&self, payment_id: PaymentId) -> Result<LoanId> {
        self.payment_index
            .read()
            .get(&payment_id)
            .copied()
            .ok_or(LoanError::PaymentNotFound { id: payment_id })
    }

    /// current snapshot of a loan
    pub fn get_loan(&self, loan_id: LoanId) -> Result<Loan> {
        Ok(self.account(loan_id)?.lock().loan.clone())
    }

    /// payments of a loan in creation order
    pub fn payments(&self, loan_id: LoanId) -> Result<Vec<Payment>> {
        Ok(self.account(loan_id)?.lock().ledger.iter().cloned().collect())
    }

    /// post a payment; the date defaults to the provider's today
    pub fn post_payment(
        &self,
        loan_id: LoanId,
        amount: Money,
        date: Option<NaiveDate>,
        time_provider: &SafeTimeProvider,
    ) -> Result<Payment> {
        let account = self.account(loan_id)?;
        let mut guard = account.lock();
        let account = &mut *guard;

        let payment = post_payment(
            &mut account.loan,
            &mut account.ledger,
            &mut account.events,
            PostRequest {
                amount,
                payment_date: date.unwrap_or_else(|| dates::today(time_provider)),
                installment_number: None,
            },
        )?;

        self.payment_index.write().insert(payment.id, loan_id);
        Ok(payment)
    }

    /// post a payment dated today by the system clock
    pub fn post_payment_now(&self, loan_id: LoanId, amount: Money) -> Result<Payment> {
        let time = SafeTimeProvider::new(hourglass_rs::TimeSource::System);
        self.post_payment(loan_id, amount, None, &time)
    }

    /// amend a posted payment's amount and/or date
    pub fn edit_payment(
        &self,
        payment_id: PaymentId,
        amount: Option<Money>,
        date: Option<NaiveDate>,
    ) -> Result<Payment> {
        let loan_id = self.loan_of_payment(payment_id)?;
        let account = self.account(loan_id)?;
        let mut guard = account.lock();
        let account = &mut *guard;

        edit_payment(
            &mut account.loan,
            &mut account.ledger,
            &mut account.events,
            payment_id,
            EditRequest { amount, date },
        )
    }

    /// delete a posted payment, restoring the loan aggregate
    ///
    /// Returns false when the payment does not exist.
    pub fn delete_payment(&self, payment_id: PaymentId) -> Result<bool> {
        let loan_id = match self.payment_index.read().get(&payment_id) {
            Some(id) => *id,
            None => return Ok(false),
        };
        let account = self.account(loan_id)?;
        let mut guard = account.lock();
        let account = &mut *guard;

        reverse_payment(
            &mut account.loan,
            &mut account.ledger,
            &mut account.events,
            payment_id,
        )?;
        self.payment_index.write().remove(&payment_id);
        Ok(true)
    }

    /// project the installment schedule, optionally from a transient anchor
    pub fn project_schedule(
        &self,
        loan_id: LoanId,
        override_anchor: Option<NaiveDate>,
    ) -> Result<Vec<InstallmentProjection>> {
        let account = self.account(loan_id)?;
        let guard = account.lock();
        let anchor = resolve_anchor(&guard.loan, override_anchor);
        Ok(project(&guard.loan, anchor, &guard.ledger))
    }

    /// persist a custom first-installment date and/or blank the schedule
    pub fn set_custom_anchor(
        &self,
        loan_id: LoanId,
        date: Option<NaiveDate>,
        suppress: bool,
    ) -> Result<()> {
        let account = self.account(loan_id)?;
        let mut guard = account.lock();
        let account = &mut *guard;

        account.loan.custom_first_installment_date = date;
        account.events.emit(LoanEvent::AnchorChanged {
            loan_id,
            custom_date: date,
        });
        if account.loan.schedule_suppressed != suppress {
            account.events.emit(LoanEvent::ScheduleSuppressed {
                loan_id,
                suppressed: suppress,
            });
        }
        account.loan.schedule_suppressed = suppress;
        Ok(())
    }

    /// rebuild the loan aggregate from its ledger and store the result
    pub fn reconcile(&self, loan_id: LoanId) -> Result<Loan> {
        let account = self.account(loan_id)?;
        let mut guard = account.lock();
        let rebuilt = rebuild_aggregate(&guard.loan, &guard.ledger);
        guard.loan = rebuilt.clone();
        Ok(rebuilt)
    }

    /// drain the audit events recorded for a loan
    pub fn take_events(&self, loan_id: LoanId) -> Result<Vec<LoanEvent>> {
        Ok(self.account(loan_id)?.lock().events.take_events())
    }
}
