//! Request paths for the ransomware.live API.

/// The API resources the client reads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
  /// Victims matching a keyword
  SearchVictims { keyword: String },
  /// Victims published in one month
  VictimsByMonth { year: i32, month: u32 },
  /// Victims located in a country (ISO-2 code)
  CountryVictims { country: String },
  /// Victims claimed by a group
  GroupVictims { group: String },
  /// All known groups
  Groups,
  /// Metadata for one group
  Group { name: String },
}

impl Endpoint {
  /// Unencoded path segments relative to the API base URL.
  ///
  /// User-supplied values are trimmed but otherwise passed through as one
  /// segment each; encoding happens when the segments are appended to the
  /// base URL.
  pub fn segments(&self) -> Vec<String> {
    match self {
      Self::SearchVictims { keyword } => vec!["searchvictims".into(), keyword.trim().into()],
      Self::VictimsByMonth { year, month } => {
        vec!["victims".into(), year.to_string(), month.to_string()]
      }
      Self::CountryVictims { country } => {
        vec!["countryvictims".into(), country.trim().to_uppercase()]
      }
      Self::GroupVictims { group } => vec!["groupvictims".into(), group.trim().into()],
      Self::Groups => vec!["groups".into()],
      Self::Group { name } => vec!["group".into(), name.trim().into()],
    }
  }

  /// Human-readable description for titles and error messages.
  pub fn description(&self) -> String {
    match self {
      Self::SearchVictims { keyword } => format!("victims matching '{}'", keyword),
      Self::VictimsByMonth { year, month } => format!("victims for {}-{:02}", year, month),
      Self::CountryVictims { country } => format!("victims in {}", country.to_uppercase()),
      Self::GroupVictims { group } => format!("victims of {}", group),
      Self::Groups => "groups".to_string(),
      Self::Group { name } => format!("group {}", name),
    }
  }
}
