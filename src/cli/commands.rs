use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use tracing::info;

use super::context::ShellContext;
use super::output;
use super::registry::{CommandEntry, CommandRegistry};
use super::{CliError, CommandResult, LoopControl};
use crate::billing::{
    next_billing_date, spending_overview, summarize_by_period, trials_ending,
    upcoming_payments_with, BillingCycle, SummaryPeriod, UpcomingOptions,
};
use crate::calendar;
use crate::currency::{AmountFormatter, CurrencyCode};
use crate::subscription::Payment;
use crate::utils::{build_info, persistence};

pub fn register_all(registry: &mut CommandRegistry) {
    registry.register(CommandEntry::new(
        "help",
        "Show available commands",
        "help",
        cmd_help,
    ));
    registry.register(CommandEntry::new(
        "version",
        "Show build information",
        "version",
        cmd_version,
    ));
    registry.register(CommandEntry::new(
        "load",
        "Load subscriptions from a JSON file",
        "load <file>",
        cmd_load,
    ));
    registry.register(CommandEntry::new(
        "list",
        "List loaded subscriptions",
        "list",
        cmd_list,
    ));
    registry.register(CommandEntry::new(
        "next",
        "Compute the billing date after a charge",
        "next <date> <cycle> [days]",
        cmd_next,
    ));
    registry.register(CommandEntry::new(
        "upcoming",
        "Show payments due within a window",
        "upcoming [days]",
        cmd_upcoming,
    ));
    registry.register(CommandEntry::new(
        "calendar",
        "Show charges falling in a month",
        "calendar <yyyy-mm>",
        cmd_calendar,
    ));
    registry.register(CommandEntry::new(
        "summary",
        "Summarize payments by period",
        "summary <payments-file> [daily|weekly|monthly|quarterly|yearly]",
        cmd_summary,
    ));
    registry.register(CommandEntry::new(
        "spending",
        "Show monthly and yearly spending",
        "spending",
        cmd_spending,
    ));
    registry.register(CommandEntry::new("exit", "Leave the shell", "exit", cmd_exit));
    registry.register(CommandEntry::new("quit", "Alias for exit", "quit", cmd_exit));
}

fn usage(context: &ShellContext, command: &str) -> CliError {
    let usage = context
        .registry
        .get(command)
        .map(|entry| entry.usage)
        .unwrap_or(command);
    CliError::Usage(format!("Usage: {usage}"))
}

fn cmd_help(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Commands");
    for entry in context.registry.list() {
        output::info(format!("  {:<66} {}", entry.usage, entry.description));
    }
    Ok(LoopControl::Continue)
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::info(build_info::current().summary());
    Ok(LoopControl::Continue)
}

fn cmd_load(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [path] = args else {
        return Err(usage(context, "load"));
    };
    let path = PathBuf::from(*path);
    let subscriptions = persistence::load_subscriptions(&path)?;
    info!(path = %path.display(), count = subscriptions.len(), "subscriptions loaded");
    output::success(format!(
        "Loaded {} subscriptions from {}",
        subscriptions.len(),
        path.display()
    ));
    context.subscriptions = subscriptions;
    context.source = Some(path);
    Ok(LoopControl::Continue)
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let formatter = context.settings.formatter();
    let subscriptions = context.require_subscriptions()?;
    if subscriptions.is_empty() {
        output::info("No subscriptions loaded.");
        return Ok(LoopControl::Continue);
    }
    output::section("Subscriptions");
    for sub in subscriptions {
        let next = match sub.resolve_next_billing_date() {
            Ok(date) => date.to_string(),
            Err(err) => format!("invalid ({err})"),
        };
        output::info(format!(
            "  {:<24} {:<16} {:>12}  {:<9}  next {}",
            sub.name,
            sub.billing_cycle.label(sub.custom_interval_days),
            formatter.format_amount(sub.amount, &sub.currency),
            format!("{:?}", sub.status).to_lowercase(),
            next
        ));
    }
    Ok(LoopControl::Continue)
}

fn cmd_next(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (date, cycle, days) = match args {
        [date, cycle] => (*date, *cycle, None),
        [date, cycle, days] => (*date, *cycle, Some(parse_number::<u32>(days, "days")?)),
        _ => return Err(usage(context, "next")),
    };
    let last = calendar::parse_date(date)?;
    let cycle: BillingCycle = cycle.parse()?;
    let next = next_billing_date(last, cycle, days)?;
    output::info(format!(
        "Next {} charge after {last}: {next}",
        cycle.label(days).to_lowercase()
    ));
    Ok(LoopControl::Continue)
}

fn cmd_upcoming(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let window_days = match args {
        [] => context.settings.upcoming_window_days,
        [days] => parse_number::<i64>(days, "days")?,
        _ => return Err(usage(context, "upcoming")),
    };
    let formatter = context.settings.formatter();
    let options = UpcomingOptions {
        window_days,
        due_soon_days: context.settings.due_soon_threshold_days,
        formatter: &formatter,
    };
    let today = context.today();
    let events = upcoming_payments_with(context.require_subscriptions()?, today, &options)?;

    if events.is_empty() {
        output::info(format!("No payments due in the next {window_days} days."));
        return Ok(LoopControl::Continue);
    }
    output::section(format!("Upcoming payments (next {window_days} days)"));
    for event in &events {
        output::info(format!(
            "  {}  {:<24} {:>12}  {} ({})",
            event.next_date,
            event.name,
            event.display_amount,
            output::status_badge(event.status),
            describe_offset(event.days_until)
        ));
    }
    Ok(LoopControl::Continue)
}

fn cmd_calendar(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [month] = args else {
        return Err(usage(context, "calendar"));
    };
    let first = calendar::parse_date(&format!("{month}-01"))?;
    let formatter = context.settings.formatter();
    let cap = context.settings.expansion_cap;

    let mut charges: Vec<(NaiveDate, &str, String)> = Vec::new();
    for sub in context
        .require_subscriptions()?
        .iter()
        .filter(|sub| sub.is_active())
    {
        let schedule = sub.schedule()?.with_cap(cap);
        for date in schedule.occurrences_in_month(first.year(), first.month())? {
            charges.push((
                date,
                sub.name.as_str(),
                formatter.format_amount(sub.amount, &sub.currency),
            ));
        }
    }
    charges.sort();

    let title = first.format("%B %Y");
    if charges.is_empty() {
        output::info(format!("No charges in {title}."));
        return Ok(LoopControl::Continue);
    }
    output::section(format!("Charges in {title}"));
    for (date, name, amount) in charges {
        output::info(format!("  {date}  {name:<24} {amount:>12}"));
    }
    Ok(LoopControl::Continue)
}

fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (path, period) = match args {
        [path] => (*path, context.settings.summary_period),
        [path, period] => (
            *path,
            period.parse::<SummaryPeriod>().map_err(CliError::Usage)?,
        ),
        _ => return Err(usage(context, "summary")),
    };
    let payments = persistence::load_payments(&PathBuf::from(path))?;
    if payments.is_empty() {
        output::info("No payments to summarize.");
        return Ok(LoopControl::Continue);
    }

    // Payments carry no currency; take it from the loaded subscription.
    let mut by_currency: BTreeMap<CurrencyCode, Vec<Payment>> = BTreeMap::new();
    for payment in payments {
        let currency = context
            .subscriptions
            .iter()
            .find(|sub| sub.id == payment.subscription_id)
            .map(|sub| sub.currency.clone())
            .unwrap_or_else(|| context.settings.currency.clone());
        by_currency.entry(currency).or_default().push(payment);
    }

    let formatter = context.settings.formatter();
    for (currency, payments) in &by_currency {
        output::section(format!("Payments by {period} period ({currency})"));
        for summary in summarize_by_period(payments, period) {
            let names: Vec<&str> = summary.subscriptions.iter().map(String::as_str).collect();
            output::info(format!(
                "  {:<10} total {:>12}  count {:>3}  avg {:>12}  [{}]",
                summary.period_key,
                formatter.format_amount(summary.total, currency),
                summary.count,
                formatter.format_amount(summary.average, currency),
                names.join(", ")
            ));
        }
    }
    Ok(LoopControl::Continue)
}

fn cmd_spending(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let formatter = context.settings.formatter();
    let today = context.today();
    let window = context.settings.upcoming_window_days;
    let subscriptions = context.require_subscriptions()?;
    let overview = spending_overview(subscriptions)?;

    output::section("Spending");
    if overview.by_currency.is_empty() {
        output::info("  No active subscriptions.");
    }
    for (currency, spending) in &overview.by_currency {
        output::info(format!(
            "  {currency}: {} per month, {} per year across {} active",
            formatter.format_amount(spending.monthly, currency),
            formatter.format_amount(spending.yearly, currency),
            spending.active
        ));
    }
    output::info(format!(
        "  {} paused, {} cancelled",
        overview.paused, overview.cancelled
    ));

    for sub in trials_ending(subscriptions, today, window)? {
        if let Some(end) = sub.trial_end {
            output::warning(format!("Trial for {} ends on {end}", sub.name));
        }
    }
    Ok(LoopControl::Continue)
}

fn cmd_exit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.stop()
}

fn parse_number<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, CliError> {
    raw.parse::<T>()
        .map_err(|_| CliError::Usage(format!("`{raw}` is not a valid number of {what}")))
}

fn describe_offset(days_until: i64) -> String {
    match days_until {
        0 => "today".into(),
        1 => "tomorrow".into(),
        -1 => "yesterday".into(),
        n if n > 0 => format!("in {n} days"),
        n => format!("{} days ago", -n),
    }
}
