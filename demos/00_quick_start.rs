/// quick start - open a loan, post a payment, print the schedule
use chrono::NaiveDate;
use microloan_rs::{LoanBook, LoanTerms, Money, Rate, SafeTimeProvider, TimeSource};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let book = LoanBook::new();

    // a 5,000 loan at 10% repaid over 12 weeks
    let loan = book.open_loan(LoanTerms {
        principal: Money::from_major(5_000),
        rate_percent: Rate::from_percent(dec!(10)),
        mora_rate_percent: Rate::from_percent(dec!(5)),
        loan_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        installment_count: 12,
        payment_weekday: None,
    })?;

    println!(
        "loan {}: {} payable in {} weekly installments of {}",
        loan.id, loan.total_payable, loan.installment_count, loan.installment_amount
    );

    // post the first installment, dated today
    let time = SafeTimeProvider::new(TimeSource::System);
    let payment = book.post_payment(loan.id, loan.installment_amount, None, &time)?;
    println!(
        "posted payment {} for installment {}",
        payment.id, payment.installment_number
    );

    for row in book.project_schedule(loan.id, None)? {
        println!(
            "  #{:>2}  {}  {}  {:?}",
            row.number, row.scheduled_date, row.scheduled_amount, row.status
        );
    }

    // print current state
    println!("{}", serde_json::to_string_pretty(&book.get_loan(loan.id)?)?);

    Ok(())
}
