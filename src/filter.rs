//! Client-side narrowing of victim lists.

use crate::api::Victim;

/// Optional restrictions the user can toggle on a victim list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvancedFilters {
  /// Only records with press coverage
  pub press: bool,
  /// Only records with infostealer data
  pub infostealer: bool,
  /// Only records with updates
  pub updates: bool,
  /// Only records in this sector (case-insensitive exact match)
  pub sector: Option<String>,
}

impl AdvancedFilters {
  pub fn is_active(&self) -> bool {
    self.press || self.infostealer || self.updates || self.sector.is_some()
  }

  pub fn matches(&self, victim: &Victim) -> bool {
    if self.press && !victim.has("press") {
      return false;
    }
    if self.infostealer && !victim.has("infostealer") {
      return false;
    }
    if self.updates && !victim.has("updates") {
      return false;
    }
    match &self.sector {
      Some(sector) => victim.sector().unwrap_or("").to_lowercase() == sector.to_lowercase(),
      None => true,
    }
  }

  /// Set or clear the sector filter. Blank input clears it.
  pub fn set_sector(&mut self, sector: &str) {
    let sector = sector.trim();
    self.sector = (!sector.is_empty()).then(|| sector.to_string());
  }

  /// Short description of the active filters for the list title.
  pub fn summary(&self) -> String {
    let mut parts = Vec::new();
    if self.press {
      parts.push("press".to_string());
    }
    if self.infostealer {
      parts.push("infostealer".to_string());
    }
    if self.updates {
      parts.push("updates".to_string());
    }
    if let Some(sector) = &self.sector {
      parts.push(format!("sector={}", sector));
    }
    parts.join(", ")
  }
}

/// Case-insensitive substring match over the columns shown in the list.
pub fn matches_text(victim: &Victim, query: &str) -> bool {
  let query = query.trim().to_lowercase();
  if query.is_empty() {
    return true;
  }
  [
    victim.name(),
    victim.group(),
    victim.sector().unwrap_or(""),
    victim.country(),
    victim.attack_date(),
  ]
  .iter()
  .any(|field| field.to_lowercase().contains(&query))
}

/// Victims passing both the advanced filters and the text query.
pub fn apply<'a>(victims: &'a [Victim], filters: &AdvancedFilters, query: &str) -> Vec<&'a Victim> {
  victims
    .iter()
    .filter(|v| filters.matches(v) && matches_text(v, query))
    .collect()
}
