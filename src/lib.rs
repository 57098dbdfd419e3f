pub mod anchor;
pub mod book;
pub mod dates;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod loan;
pub mod payments;
pub mod reconcile;
pub mod schedule;
pub mod terms;
pub mod types;

// re-export key types
pub use book::LoanBook;
pub use decimal::{Money, Rate};
pub use errors::{LoanError, Result};
pub use events::{EventStore, LoanEvent};
pub use ledger::{Payment, PaymentLedger};
pub use loan::{Loan, LoanTerms};
pub use payments::{EditRequest, PostRequest};
pub use terms::quote_terms;
pub use types::{
    InstallmentProjection, InstallmentStatus, LoanId, LoanStatus, PaymentId, TermsQuote,
    Timeliness,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
