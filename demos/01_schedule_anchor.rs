/// schedule anchoring - custom first-installment dates and suppression
use chrono::NaiveDate;
use microloan_rs::{LoanBook, LoanTerms, Money, Rate};
use rust_decimal_macros::dec;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let book = LoanBook::new();

    let loan = book.open_loan(LoanTerms {
        principal: Money::from_major(3_000),
        rate_percent: Rate::from_percent(dec!(15)),
        mora_rate_percent: Rate::from_percent(dec!(5)),
        loan_date: d(2024, 3, 1),
        installment_count: 8,
        payment_weekday: Some(0),
    })?;

    // default anchor: one week after the loan date
    let rows = book.project_schedule(loan.id, None)?;
    println!("default first installment: {}", rows[0].scheduled_date);

    // the collector agreed to start collections in april
    book.set_custom_anchor(loan.id, Some(d(2024, 4, 1)), false)?;
    let rows = book.project_schedule(loan.id, None)?;
    println!("custom first installment:  {}", rows[0].scheduled_date);

    // a transient override previews a different start without persisting it
    let preview = book.project_schedule(loan.id, Some(d(2024, 5, 6)))?;
    println!("previewed first:           {}", preview[0].scheduled_date);
    let persisted = book.get_loan(loan.id)?;
    println!(
        "persisted custom date:     {:?}",
        persisted.custom_first_installment_date
    );

    // blank the schedule until a new anchor is chosen
    book.set_custom_anchor(loan.id, None, true)?;
    println!(
        "suppressed schedule rows:  {}",
        book.project_schedule(loan.id, None)?.len()
    );

    Ok(())
}
