//! Command-line prompt commands: the catalogue, autocomplete and argument parsing.

use crate::dashboard::DashboardTarget;

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub usage: &'static str,
  pub description: &'static str,
}

/// All available commands
pub const COMMANDS: &[Command] = &[
  Command {
    name: "search",
    aliases: &["s", "find"],
    usage: "search <keyword>",
    description: "Search victims by keyword",
  },
  Command {
    name: "date",
    aliases: &["d", "victims"],
    usage: "date <year> [month]",
    description: "Victims published in a month or year",
  },
  Command {
    name: "country",
    aliases: &["c", "cc"],
    usage: "country <cc> [year [month]]",
    description: "Victims in a country, optionally in a period",
  },
  Command {
    name: "group",
    aliases: &["gv"],
    usage: "group <name>",
    description: "Victims claimed by a group",
  },
  Command {
    name: "groups",
    aliases: &["g", "gs"],
    usage: "groups",
    description: "List known ransomware groups",
  },
  Command {
    name: "info",
    aliases: &["i", "details"],
    usage: "info <group>",
    description: "Details for a ransomware group",
  },
  Command {
    name: "dash",
    aliases: &["dashboard", "chart"],
    usage: "dash country <cc> <year> | dash group <name> <year>",
    description: "Monthly incident chart for a country or group",
  },
  Command {
    name: "home",
    aliases: &["h", "menu"],
    usage: "home",
    description: "Back to the main menu",
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    usage: "quit",
    description: "Exit rwlive",
  },
];

/// A fully parsed command, ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandAction {
  Search(String),
  Date {
    year: i32,
    month: Option<u32>,
  },
  Country {
    country: String,
    period: Option<(i32, Option<u32>)>,
  },
  GroupVictims(String),
  Groups,
  GroupInfo(String),
  Dashboard {
    target: DashboardTarget,
    year: i32,
  },
  Home,
  Quit,
}

/// Get autocomplete suggestions for a given input
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input_lower = input.trim().to_lowercase();

  if input_lower.is_empty() {
    return COMMANDS.iter().collect();
  }

  let mut matches: Vec<(&Command, u32)> = COMMANDS
    .iter()
    .filter_map(|cmd| match_priority(cmd, &input_lower).map(|p| (cmd, p)))
    .collect();

  matches.sort_by_key(|(_, priority)| *priority);
  matches.into_iter().map(|(cmd, _)| cmd).collect()
}

/// Lower is better; `None` if the command does not match at all.
fn match_priority(cmd: &Command, input: &str) -> Option<u32> {
  if cmd.name == input {
    Some(0)
  } else if cmd.aliases.contains(&input) {
    Some(1)
  } else if cmd.name.starts_with(input) {
    Some(2)
  } else if cmd.aliases.iter().any(|a| a.starts_with(input)) {
    Some(3)
  } else if cmd.name.contains(input) {
    Some(4)
  } else if cmd.aliases.iter().any(|a| a.contains(input)) {
    Some(5)
  } else {
    None
  }
}

/// Resolve a command word: exact name or alias, else a unique prefix.
pub fn resolve(word: &str) -> Option<&'static Command> {
  let word = word.to_lowercase();
  let mut ranked: Vec<(&'static Command, u32)> = COMMANDS
    .iter()
    .filter_map(|cmd| match_priority(cmd, &word).map(|p| (cmd, p)))
    .filter(|(_, p)| *p <= 3)
    .collect();
  ranked.sort_by_key(|(_, p)| *p);

  match ranked.as_slice() {
    [(cmd, p), ..] if *p <= 1 => Some(*cmd),
    [(cmd, _)] => Some(*cmd),
    _ => None,
  }
}

/// Parse a full prompt line such as `country fr 2024 3`.
pub fn parse(input: &str) -> Result<CommandAction, String> {
  let mut words = input.split_whitespace();
  let Some(first) = words.next() else {
    return Err("Empty command".to_string());
  };
  let args: Vec<&str> = words.collect();

  let cmd = resolve(first).ok_or_else(|| format!("Unknown command: {}", first))?;
  let usage = || format!("Usage: {}", cmd.usage);

  match cmd.name {
    "search" => rest(&args)
      .map(CommandAction::Search)
      .ok_or_else(usage),
    "date" => match args.as_slice() {
      [year] => Ok(CommandAction::Date {
        year: parse_year(year)?,
        month: None,
      }),
      [year, month] => Ok(CommandAction::Date {
        year: parse_year(year)?,
        month: Some(parse_month(month)?),
      }),
      _ => Err(usage()),
    },
    "country" => {
      let (country, period) = match args.as_slice() {
        [cc] => (cc, None),
        [cc, year] => (cc, Some((parse_year(year)?, None))),
        [cc, year, month] => (cc, Some((parse_year(year)?, Some(parse_month(month)?)))),
        _ => return Err(usage()),
      };
      Ok(CommandAction::Country {
        country: country.to_uppercase(),
        period,
      })
    }
    "group" => rest(&args)
      .map(CommandAction::GroupVictims)
      .ok_or_else(usage),
    "groups" => Ok(CommandAction::Groups),
    "info" => rest(&args)
      .map(CommandAction::GroupInfo)
      .ok_or_else(usage),
    "dash" => parse_dashboard(&args).ok_or_else(usage)?,
    "home" => Ok(CommandAction::Home),
    "quit" => Ok(CommandAction::Quit),
    other => Err(format!("Unknown command: {}", other)),
  }
}

/// `country <cc> <year>` or `group <name...> <year>`; `None` means bad shape.
fn parse_dashboard(args: &[&str]) -> Option<Result<CommandAction, String>> {
  let (kind, rest_args) = args.split_first()?;
  let (year, name) = rest_args.split_last()?;
  let name = rest(name)?;
  let year = match parse_year(year) {
    Ok(year) => year,
    Err(e) => return Some(Err(e)),
  };

  let target = match kind.to_lowercase().as_str() {
    "country" | "c" => DashboardTarget::Country(name.to_uppercase()),
    "group" | "g" => DashboardTarget::Group(name),
    _ => return None,
  };
  Some(Ok(CommandAction::Dashboard { target, year }))
}

/// Remaining words joined by spaces; `None` when there are none.
fn rest(args: &[&str]) -> Option<String> {
  (!args.is_empty()).then(|| args.join(" "))
}

pub fn parse_year(s: &str) -> Result<i32, String> {
  match s.parse::<i32>() {
    Ok(year) if (1000..=9999).contains(&year) => Ok(year),
    _ => Err(format!("Invalid year '{}': expected YYYY", s)),
  }
}

pub fn parse_month(s: &str) -> Result<u32, String> {
  match s.parse::<u32>() {
    Ok(month) if (1..=12).contains(&month) => Ok(month),
    _ => Err(format!("Invalid month '{}': expected 1-12", s)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_input_returns_all() {
    let suggestions = get_suggestions("");
    assert_eq!(suggestions.len(), COMMANDS.len());
  }

  #[test]
  fn test_exact_match() {
    let suggestions = get_suggestions("groups");
    assert_eq!(suggestions[0].name, "groups");
  }

  #[test]
  fn test_alias_match() {
    let suggestions = get_suggestions("g");
    assert_eq!(suggestions[0].name, "groups");
  }

  #[test]
  fn test_prefix_match() {
    let suggestions = get_suggestions("cou");
    assert_eq!(suggestions[0].name, "country");
  }

  #[test]
  fn test_fuzzy_match() {
    let suggestions = get_suggestions("ear");
    assert_eq!(suggestions[0].name, "search");
  }

  #[test]
  fn test_resolve() {
    assert_eq!(resolve("q").map(|c| c.name), Some("quit"));
    assert_eq!(resolve("SEARCH").map(|c| c.name), Some("search"));
    assert!(resolve("da").is_none());
    assert_eq!(resolve("in").map(|c| c.name), Some("info"));
    assert!(resolve("zzz").is_none());
  }

  #[test]
  fn test_parse_search_keeps_spaces() {
    assert_eq!(
      parse("search  acme   corp"),
      Ok(CommandAction::Search("acme corp".into()))
    );
    assert!(parse("search").is_err());
  }

  #[test]
  fn test_parse_date() {
    assert_eq!(
      parse("date 2024"),
      Ok(CommandAction::Date {
        year: 2024,
        month: None
      })
    );
    assert_eq!(
      parse("d 2024 3"),
      Ok(CommandAction::Date {
        year: 2024,
        month: Some(3)
      })
    );
    assert!(parse("date 2024 13").is_err());
    assert!(parse("date 24").is_err());
  }

  #[test]
  fn test_parse_country() {
    assert_eq!(
      parse("country fr"),
      Ok(CommandAction::Country {
        country: "FR".into(),
        period: None
      })
    );
    assert_eq!(
      parse("c us 2023 12"),
      Ok(CommandAction::Country {
        country: "US".into(),
        period: Some((2023, Some(12)))
      })
    );
  }

  #[test]
  fn test_parse_group_commands() {
    assert_eq!(
      parse("group black basta"),
      Ok(CommandAction::GroupVictims("black basta".into()))
    );
    assert_eq!(parse("groups"), Ok(CommandAction::Groups));
    assert_eq!(
      parse("info lockbit3"),
      Ok(CommandAction::GroupInfo("lockbit3".into()))
    );
  }

  #[test]
  fn test_parse_dashboard() {
    assert_eq!(
      parse("dash country de 2024"),
      Ok(CommandAction::Dashboard {
        target: DashboardTarget::Country("DE".into()),
        year: 2024
      })
    );
    assert_eq!(
      parse("dash group black basta 2023"),
      Ok(CommandAction::Dashboard {
        target: DashboardTarget::Group("black basta".into()),
        year: 2023
      })
    );
    assert!(parse("dash planet mars 2024").is_err());
    assert!(parse("dash group 2024").is_err());
    assert!(parse("dash group akira 20x4").is_err());
  }

  #[test]
  fn test_unknown_command() {
    assert_eq!(parse("frobnicate"), Err("Unknown command: frobnicate".into()));
    assert!(parse("   ").is_err());
  }
}
