use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use subtrack_core::billing::{
    summarize_by_period, upcoming_payments, BillingCycle, BillingSchedule, SummaryPeriod,
};
use subtrack_core::subscription::{Payment, Subscription, SubscriptionStatus};
use subtrack_core::utils::persistence::{load_subscriptions, save_records};
use tempfile::tempdir;

fn build_subscriptions(count: usize) -> Vec<Subscription> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    (0..count)
        .map(|idx| {
            let cycle = BillingCycle::ALL[idx % BillingCycle::ALL.len()];
            let mut sub = Subscription::new(format!("Sub {idx}"), 5.0 + (idx % 50) as f64, cycle)
                .with_last_billed(start - Duration::days((idx % 120) as i64));
            if cycle == BillingCycle::Custom {
                sub = sub.with_custom_days(10 + (idx % 80) as u32);
            }
            if idx % 7 == 0 {
                sub = sub.with_status(SubscriptionStatus::Paused);
            }
            sub
        })
        .collect()
}

fn bench_upcoming(c: &mut Criterion) {
    let subs = build_subscriptions(black_box(10_000));
    let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();

    c.bench_function("upcoming_payments_10k", |b| {
        b.iter(|| {
            let events = upcoming_payments(&subs, 30, today).expect("upcoming");
            black_box(events);
        })
    });

    c.bench_function("schedule_expansion_10k", |b| {
        b.iter(|| {
            let total: usize = subs
                .iter()
                .map(|sub| {
                    sub.schedule()
                        .map(|schedule: BillingSchedule| schedule.occurrences().count())
                        .unwrap_or(0)
                })
                .sum();
            black_box(total);
        })
    });
}

fn bench_summaries_and_io(c: &mut Criterion) {
    let subs = build_subscriptions(1_000);
    let payments: Vec<Payment> = subs
        .iter()
        .flat_map(|sub| {
            let schedule = sub.schedule().expect("schedule");
            schedule
                .occurrences()
                .map(|date| Payment::new(sub, sub.amount, date))
                .collect::<Vec<_>>()
        })
        .collect();

    for period in [SummaryPeriod::Weekly, SummaryPeriod::Monthly] {
        c.bench_function(&format!("summarize_{period}_{}", payments.len()), |b| {
            b.iter(|| black_box(summarize_by_period(&payments, period)))
        });
    }

    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("subscriptions.json");
    save_records(&subs, &path).expect("seed");

    c.bench_function("subscriptions_load_1k", |b| {
        b.iter(|| black_box(load_subscriptions(&path).expect("load")))
    });
}

criterion_group!(benches, bench_upcoming, bench_summaries_and_io);
criterion_main!(benches);
