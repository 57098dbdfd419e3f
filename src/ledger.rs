use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::types::{LoanId, PaymentId, Timeliness};

/// one posted payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub loan_id: LoanId,
    /// creation order within the loan's ledger; resolves duplicate
    /// installment numbers explicitly instead of by map-insertion accident
    pub seq: u64,
    pub amount_paid: Money,
    pub payment_date: NaiveDate,
    pub installment_number: u32,
    pub timeliness: Timeliness,
    pub mora_amount: Money,
    pub is_partial: bool,
    pub remaining_amount: Money,
}

/// append-mostly collection of payments for one loan, in creation order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentLedger {
    payments: Vec<Payment>,
    next_seq: u64,
}

impl PaymentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// append a payment, stamping it with the next sequence number
    pub fn append(&mut self, mut payment: Payment) -> &Payment {
        payment.seq = self.next_seq;
        self.next_seq += 1;
        let idx = self.payments.len();
        self.payments.push(payment);
        &self.payments[idx]
    }

    pub fn get(&self, id: PaymentId) -> Option<&Payment> {
        self.payments.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: PaymentId) -> Option<&mut Payment> {
        self.payments.iter_mut().find(|p| p.id == id)
    }

    /// remove a payment, returning it if present
    pub fn remove(&mut self, id: PaymentId) -> Option<Payment> {
        let idx = self.payments.iter().position(|p| p.id == id)?;
        Some(self.payments.remove(idx))
    }

    /// sum of all amounts paid
    pub fn total_paid(&self) -> Money {
        self.payments
            .iter()
            .map(|p| p.amount_paid)
            .fold(Money::ZERO, |acc, x| acc + x)
    }

    /// the payment covering `installment_number`; when several carry the
    /// same number (repeated partials), the most recently created wins
    pub fn latest_for_installment(&self, installment_number: u32) -> Option<&Payment> {
        self.payments
            .iter()
            .filter(|p| p.installment_number == installment_number)
            .max_by_key(|p| p.seq)
    }

    /// payments in creation order
    pub fn iter(&self) -> impl Iterator<Item = &Payment> {
        self.payments.iter()
    }

    pub fn len(&self) -> usize {
        self.payments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }
}
