use thiserror::Error;

use crate::decimal::Money;
use crate::types::{LoanId, PaymentId};

#[derive(Error, Debug)]
pub enum LoanError {
    #[error("loan not found: {id}")]
    LoanNotFound {
        id: LoanId,
    },

    #[error("payment not found: {id}")]
    PaymentNotFound {
        id: PaymentId,
    },

    #[error("loan already settled: {id}")]
    AlreadySettled {
        id: LoanId,
    },

    #[error("invalid payment amount: {amount}")]
    InvalidAmount {
        amount: Money,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("invalid loan terms: {message}")]
    InvalidTerms {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, LoanError>;
