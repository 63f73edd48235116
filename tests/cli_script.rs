use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::{tempdir, TempDir};

const SUBSCRIPTIONS: &str = r#"[
  {
    "id": "0b8a2f4e-1c3d-4e5f-8a9b-0c1d2e3f4a01",
    "name": "Netflix",
    "amount": 15.49,
    "currency": "USD",
    "billingCycle": "monthly",
    "lastBillingDate": "2024-05-02",
    "nextBillingDate": "2024-06-02",
    "status": "active"
  },
  {
    "id": "0b8a2f4e-1c3d-4e5f-8a9b-0c1d2e3f4a02",
    "name": "Gym",
    "amount": 40,
    "currency": "EUR",
    "billingCycle": "custom",
    "customIntervalDays": 45,
    "lastBillingDate": "2024-04-20",
    "status": "active",
    "trialEnd": "2024-06-10"
  },
  {
    "id": "0b8a2f4e-1c3d-4e5f-8a9b-0c1d2e3f4a03",
    "name": "Magazine",
    "amount": 4.99,
    "billingCycle": "weekly",
    "nextBillingDate": "2024-06-03",
    "status": "paused"
  }
]"#;

const PAYMENTS: &str = r#"[
  { "subscriptionId": "0b8a2f4e-1c3d-4e5f-8a9b-0c1d2e3f4a01", "subscriptionName": "Netflix", "amount": 10, "date": "2024-01-05" },
  { "subscriptionId": "0b8a2f4e-1c3d-4e5f-8a9b-0c1d2e3f4a02", "subscriptionName": "Gym", "amount": 20, "date": "2024-01-20" },
  { "subscriptionId": "0b8a2f4e-1c3d-4e5f-8a9b-0c1d2e3f4a01", "subscriptionName": "Netflix", "amount": 30, "date": "2024-02-02" }
]"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("subscriptions.json"), SUBSCRIPTIONS).unwrap();
        fs::write(dir.path().join("payments.json"), PAYMENTS).unwrap();
        Self { dir }
    }

    fn file(&self, name: &str) -> String {
        quoted(&self.dir.path().join(name))
    }

    fn command(&self, script: String) -> Command {
        let mut cmd = Command::cargo_bin("subtrack_cli").unwrap();
        cmd.env("SUBTRACK_CLI_SCRIPT", "1")
            .env("SUBTRACK_TODAY", "2024-06-01")
            .env("SUBTRACK_CONFIG_DIR", self.dir.path().join("config"))
            .write_stdin(script);
        cmd
    }
}

fn quoted(path: &Path) -> String {
    format!("\"{}\"", path.display())
}

#[test]
fn upcoming_lists_active_subscriptions_by_urgency() {
    let fixture = Fixture::new();
    let script = format!(
        "load {}\nupcoming\nexit\n",
        fixture.file("subscriptions.json")
    );

    fixture
        .command(script)
        .assert()
        .success()
        .stdout(contains("Loaded 3 subscriptions"))
        .stdout(contains("2024-06-02  Netflix"))
        .stdout(contains("$15.49"))
        .stdout(contains("Due soon (tomorrow)"))
        .stdout(contains("2024-06-04  Gym"))
        .stdout(contains("Magazine").not());
}

#[test]
fn next_applies_month_end_clamp() {
    let fixture = Fixture::new();
    fixture
        .command("next 2024-01-31 monthly\nnext 2024-03-01 custom 45\n".into())
        .assert()
        .success()
        .stdout(contains("after 2024-01-31: 2024-02-29"))
        .stdout(contains("after 2024-03-01: 2024-04-15"));
}

#[test]
fn invalid_input_reports_errors_and_keeps_running() {
    let fixture = Fixture::new();
    fixture
        .command("next 2024-03-01 montly\nupcoming\nnext 2024-01-31 weekly\n".into())
        .assert()
        .success()
        .stderr(contains("did you mean `monthly`"))
        .stderr(contains("Nothing loaded"))
        .stdout(contains("2024-02-07"));
}

#[test]
fn summary_groups_payments_by_month() {
    let fixture = Fixture::new();
    let script = format!("summary {} monthly\n", fixture.file("payments.json"));
    fixture
        .command(script)
        .assert()
        .success()
        .stdout(contains("2024-01"))
        .stdout(contains("$30.00"))
        .stdout(contains("count   2"))
        .stdout(contains("$15.00"))
        .stdout(contains("[Gym, Netflix]"));
}

#[test]
fn summary_totals_follow_subscription_currency() {
    let fixture = Fixture::new();
    let script = format!(
        "load {}\nsummary {} monthly\n",
        fixture.file("subscriptions.json"),
        fixture.file("payments.json")
    );
    fixture
        .command(script)
        .assert()
        .success()
        .stdout(contains("Payments by monthly period (EUR)"))
        .stdout(contains("Payments by monthly period (USD)"))
        .stdout(contains("€20.00"))
        .stdout(contains("$10.00"))
        .stdout(contains("$30.00"))
        .stdout(contains("[Gym, Netflix]").not());
}

#[test]
fn calendar_and_spending_use_loaded_data() {
    let fixture = Fixture::new();
    let script = format!(
        "load {}\ncalendar 2024-07\nspending\n",
        fixture.file("subscriptions.json")
    );
    fixture
        .command(script)
        .assert()
        .success()
        .stdout(contains("Charges in July 2024"))
        .stdout(contains("2024-07-02  Netflix"))
        .stdout(contains("2024-07-19  Gym"))
        .stdout(contains("1 paused, 0 cancelled"))
        .stdout(contains("Trial for Gym ends on 2024-06-10"));
}

#[test]
fn unknown_command_suggests_closest() {
    let fixture = Fixture::new();
    fixture
        .command("upcomng\n".into())
        .assert()
        .success()
        .stderr(contains("Did you mean `upcoming`?"));
}
