use chrono::NaiveDate;
use subtrack_core::{
    init, summarize_by_period, upcoming_payments, BillingCycle, Payment, Subscription,
    SummaryPeriod,
};

#[test]
fn billing_smoke() {
    init();

    let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let sub = Subscription::new("Streaming", 12.0, BillingCycle::Monthly)
        .with_last_billed(NaiveDate::from_ymd_opt(2024, 12, 3).unwrap());

    let events = upcoming_payments(std::slice::from_ref(&sub), 30, today).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].next_date, NaiveDate::from_ymd_opt(2025, 1, 3).unwrap());
    assert_eq!(events[0].display_amount, "$12.00");

    let payments = vec![Payment::new(&sub, 12.0, events[0].next_date)];
    let summaries = summarize_by_period(&payments, SummaryPeriod::Yearly);
    assert_eq!(summaries[0].period_key, "2025");
}
