//! Monthly incident counts for the dashboard view.

use chrono::Month;

use crate::api::types::Victim;

/// What a dashboard counts incidents for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardTarget {
  /// ISO-2 country code
  Country(String),
  /// Group name
  Group(String),
}

/// Incident counts per calendar month of one year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyCounts {
  pub title: String,
  /// Index 0 is January
  pub counts: [u64; 12],
}

impl MonthlyCounts {
  pub fn max(&self) -> u64 {
    self.counts.iter().copied().max().unwrap_or(0)
  }

  pub fn total(&self) -> u64 {
    self.counts.iter().sum()
  }

  /// (month abbreviation, count) pairs, January first.
  pub fn labeled(&self) -> Vec<(&'static str, u64)> {
    self
      .counts
      .iter()
      .enumerate()
      .map(|(i, count)| (month_abbr(i as u32 + 1), *count))
      .collect()
  }
}

/// Count, per month, the victims located in `country` (case-insensitive).
///
/// `batches` holds one month's victims each, keyed by month number (1-12).
pub fn count_by_country(year: i32, country: &str, batches: &[(u32, Vec<Victim>)]) -> MonthlyCounts {
  let country = country.to_uppercase();
  let mut counts = [0u64; 12];

  for (month, victims) in batches {
    let Some(slot) = month_index(*month) else {
      continue;
    };
    counts[slot] = victims
      .iter()
      .filter(|v| v.country().to_uppercase() == country)
      .count() as u64;
  }

  MonthlyCounts {
    title: format!("Incidents in {} during {}", country, year),
    counts,
  }
}

/// Bucket a group's victims by the month of their attack date within `year`.
pub fn count_by_group(year: i32, group: &str, victims: &[Victim]) -> MonthlyCounts {
  let prefix = format!("{}-", year);
  let mut counts = [0u64; 12];

  for victim in victims {
    let Some(rest) = victim.attack_date().strip_prefix(&prefix) else {
      continue;
    };
    let month = rest.split('-').next().and_then(|m| m.parse::<u32>().ok());
    if let Some(slot) = month.and_then(month_index) {
      counts[slot] += 1;
    }
  }

  MonthlyCounts {
    title: format!("Incidents by {} during {}", group, year),
    counts,
  }
}

fn month_index(month: u32) -> Option<usize> {
  (1..=12).contains(&month).then(|| month as usize - 1)
}

/// Three-letter English month abbreviation ("Jan").
pub fn month_abbr(month: u32) -> &'static str {
  u8::try_from(month)
    .ok()
    .and_then(|m| Month::try_from(m).ok())
    .map(|m| &m.name()[..3])
    .unwrap_or("???")
}
