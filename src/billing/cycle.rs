use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strsim::levenshtein;
use tracing::warn;

use crate::errors::BillingError;

/// How often a subscription charges.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Bimonthly,
    Quarterly,
    Semiannually,
    Annually,
    Custom,
}

/// Calendar offset between two consecutive charges. Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleInterval {
    Days(u32),
    Months(u32),
}

impl CycleInterval {
    /// Average length in days, used for cost normalisation only.
    pub fn approx_days(self) -> f64 {
        match self {
            CycleInterval::Days(days) => days as f64,
            CycleInterval::Months(months) => months as f64 * 365.0 / 12.0,
        }
    }
}

impl BillingCycle {
    pub const ALL: [BillingCycle; 9] = [
        BillingCycle::Daily,
        BillingCycle::Weekly,
        BillingCycle::Biweekly,
        BillingCycle::Monthly,
        BillingCycle::Bimonthly,
        BillingCycle::Quarterly,
        BillingCycle::Semiannually,
        BillingCycle::Annually,
        BillingCycle::Custom,
    ];

    /// Resolves the cycle to its offset. `custom_days` is only consulted for
    /// [`BillingCycle::Custom`], where it must be present and non-zero.
    pub fn interval(self, custom_days: Option<u32>) -> Result<CycleInterval, BillingError> {
        let interval = match self {
            BillingCycle::Daily => CycleInterval::Days(1),
            BillingCycle::Weekly => CycleInterval::Days(7),
            BillingCycle::Biweekly => CycleInterval::Days(14),
            BillingCycle::Monthly => CycleInterval::Months(1),
            BillingCycle::Bimonthly => CycleInterval::Months(2),
            BillingCycle::Quarterly => CycleInterval::Months(3),
            BillingCycle::Semiannually => CycleInterval::Months(6),
            BillingCycle::Annually => CycleInterval::Months(12),
            BillingCycle::Custom => match custom_days {
                Some(days) if days > 0 => CycleInterval::Days(days),
                other => {
                    warn!(days = ?other, "custom billing cycle without a usable day count");
                    return Err(BillingError::InvalidCustomInterval(other));
                }
            },
        };
        Ok(interval)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BillingCycle::Daily => "daily",
            BillingCycle::Weekly => "weekly",
            BillingCycle::Biweekly => "biweekly",
            BillingCycle::Monthly => "monthly",
            BillingCycle::Bimonthly => "bimonthly",
            BillingCycle::Quarterly => "quarterly",
            BillingCycle::Semiannually => "semiannually",
            BillingCycle::Annually => "annually",
            BillingCycle::Custom => "custom",
        }
    }

    pub fn label(self, custom_days: Option<u32>) -> String {
        match (self, custom_days) {
            (BillingCycle::Custom, Some(1)) => "Every day".into(),
            (BillingCycle::Custom, Some(days)) => format!("Every {days} days"),
            (BillingCycle::Biweekly, _) => "Every 2 weeks".into(),
            (BillingCycle::Bimonthly, _) => "Every 2 months".into(),
            (BillingCycle::Semiannually, _) => "Every 6 months".into(),
            (cycle, _) => {
                let name = cycle.as_str();
                let mut chars = name.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillingCycle {
    type Err = BillingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|ch| !matches!(*ch, '-' | '_' | ' '))
            .collect();
        let cycle = match normalized.as_str() {
            "daily" | "day" => BillingCycle::Daily,
            "weekly" | "week" => BillingCycle::Weekly,
            "biweekly" | "fortnightly" => BillingCycle::Biweekly,
            "monthly" | "month" => BillingCycle::Monthly,
            "bimonthly" => BillingCycle::Bimonthly,
            "quarterly" | "quarter" => BillingCycle::Quarterly,
            "semiannually" | "semiannual" | "biannually" => BillingCycle::Semiannually,
            "annually" | "annual" | "yearly" | "year" => BillingCycle::Annually,
            "custom" => BillingCycle::Custom,
            _ => {
                return Err(BillingError::InvalidCycle {
                    value: value.to_string(),
                    suggestion: closest_cycle(&normalized),
                })
            }
        };
        Ok(cycle)
    }
}

fn closest_cycle(input: &str) -> Option<String> {
    BillingCycle::ALL
        .iter()
        .map(|cycle| (levenshtein(cycle.as_str(), input), cycle.as_str()))
        .filter(|(distance, _)| *distance <= 3)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, name)| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_cycle_resolves_to_positive_interval() {
        for cycle in BillingCycle::ALL {
            let interval = cycle.interval(Some(10)).expect("interval");
            match interval {
                CycleInterval::Days(days) => assert!(days > 0, "{cycle}"),
                CycleInterval::Months(months) => assert!(months > 0, "{cycle}"),
            }
        }
    }

    #[test]
    fn custom_cycle_requires_positive_days() {
        assert_eq!(
            BillingCycle::Custom.interval(None),
            Err(BillingError::InvalidCustomInterval(None))
        );
        assert_eq!(
            BillingCycle::Custom.interval(Some(0)),
            Err(BillingError::InvalidCustomInterval(Some(0)))
        );
        assert_eq!(
            BillingCycle::Custom.interval(Some(45)),
            Ok(CycleInterval::Days(45))
        );
    }

    #[test]
    fn custom_days_ignored_for_fixed_cycles() {
        assert_eq!(
            BillingCycle::Quarterly.interval(None),
            Ok(CycleInterval::Months(3))
        );
        assert_eq!(
            BillingCycle::Weekly.interval(Some(0)),
            Ok(CycleInterval::Days(7))
        );
    }

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("Monthly".parse::<BillingCycle>(), Ok(BillingCycle::Monthly));
        assert_eq!("semi-annually".parse::<BillingCycle>(), Ok(BillingCycle::Semiannually));
        assert_eq!("yearly".parse::<BillingCycle>(), Ok(BillingCycle::Annually));
        assert_eq!(" bi_weekly ".parse::<BillingCycle>(), Ok(BillingCycle::Biweekly));
    }

    #[test]
    fn unknown_cycle_suggests_nearest_name() {
        let err = "montly".parse::<BillingCycle>().unwrap_err();
        assert_eq!(
            err,
            BillingError::InvalidCycle {
                value: "montly".into(),
                suggestion: Some("monthly".into()),
            }
        );
        let err = "lunar-phase".parse::<BillingCycle>().unwrap_err();
        assert!(matches!(
            err,
            BillingError::InvalidCycle {
                suggestion: None,
                ..
            }
        ));
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&BillingCycle::Semiannually).unwrap();
        assert_eq!(json, "\"semiannually\"");
        let parsed: BillingCycle = serde_json::from_str("\"quarterly\"").unwrap();
        assert_eq!(parsed, BillingCycle::Quarterly);
    }

    #[test]
    fn labels_read_naturally() {
        assert_eq!(BillingCycle::Monthly.label(None), "Monthly");
        assert_eq!(BillingCycle::Biweekly.label(None), "Every 2 weeks");
        assert_eq!(BillingCycle::Custom.label(Some(45)), "Every 45 days");
    }
}
