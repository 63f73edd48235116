use chrono::NaiveDate;
use subtrack_core::billing::{upcoming_payments_with, BillingCycle, UpcomingOptions};
use subtrack_core::config::Settings;
use subtrack_core::currency::{AmountFormatter, CurrencyCode};
use subtrack_core::subscription::Subscription;

struct CodeSuffix;

impl AmountFormatter for CodeSuffix {
    fn format_amount(&self, amount: f64, currency: &CurrencyCode) -> String {
        format!("{amount:.2} {currency}")
    }
}

fn subscriptions() -> Vec<Subscription> {
    let next = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
    vec![
        Subscription::new("Cloud", 1234.5, BillingCycle::Annually)
            .with_next_billing(next)
            .with_currency(CurrencyCode::new("eur")),
        Subscription::new("Music", 9.99, BillingCycle::Monthly).with_next_billing(next),
    ]
}

#[test]
fn settings_locale_drives_display_amounts() {
    let settings = Settings {
        locale: "de-DE".into(),
        ..Settings::default()
    };
    let formatter = settings.formatter();
    let options = UpcomingOptions {
        formatter: &formatter,
        ..UpcomingOptions::default()
    };
    let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

    let events = upcoming_payments_with(&subscriptions(), today, &options).unwrap();
    let shown: Vec<&str> = events.iter().map(|e| e.display_amount.as_str()).collect();
    assert_eq!(shown, vec!["€1.234,50", "$9,99"]);
}

#[test]
fn custom_formatter_is_injected() {
    let options = UpcomingOptions {
        formatter: &CodeSuffix,
        ..UpcomingOptions::default()
    };
    let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

    let events = upcoming_payments_with(&subscriptions(), today, &options).unwrap();
    assert_eq!(events[0].display_amount, "1234.50 EUR");
    assert_eq!(events[0].amount, 1234.5);
    assert_eq!(events[1].display_amount, "9.99 USD");
}
