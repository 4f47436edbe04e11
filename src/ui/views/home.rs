use crate::ui::ensure_valid_selection;
use crate::ui::view::{ShortcutInfo, View, ViewAction, ViewContext};
use crate::ui::views::GroupListView;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Row, Table, TableState};

enum MenuAction {
  /// Open the command prompt with this text
  Prompt(&'static str),
  Groups,
  Quit,
}

struct MenuItem {
  label: &'static str,
  usage: &'static str,
  action: MenuAction,
}

const MENU: &[MenuItem] = &[
  MenuItem {
    label: "Search victims",
    usage: ":search <keyword>",
    action: MenuAction::Prompt("search "),
  },
  MenuItem {
    label: "Victims by date",
    usage: ":date <year> [month]",
    action: MenuAction::Prompt("date "),
  },
  MenuItem {
    label: "Victims by country",
    usage: ":country <cc>",
    action: MenuAction::Prompt("country "),
  },
  MenuItem {
    label: "Victims by country and date",
    usage: ":country <cc> <year> [month]",
    action: MenuAction::Prompt("country "),
  },
  MenuItem {
    label: "Victims of a group",
    usage: ":group <name>",
    action: MenuAction::Prompt("group "),
  },
  MenuItem {
    label: "List groups",
    usage: ":groups",
    action: MenuAction::Groups,
  },
  MenuItem {
    label: "Group details",
    usage: ":info <group>",
    action: MenuAction::Prompt("info "),
  },
  MenuItem {
    label: "Dashboard",
    usage: ":dash country <cc> <year> | :dash group <name> <year>",
    action: MenuAction::Prompt("dash "),
  },
  MenuItem {
    label: "Quit",
    usage: ":quit",
    action: MenuAction::Quit,
  },
];

/// Root view: the main menu.
pub struct HomeView {
  ctx: ViewContext,
  table_state: TableState,
}

impl HomeView {
  pub fn new(ctx: ViewContext) -> Self {
    Self {
      ctx,
      table_state: TableState::default(),
    }
  }

  fn activate(&self, item: &MenuItem) -> ViewAction {
    match item.action {
      MenuAction::Prompt(prefill) => ViewAction::Prompt(prefill.to_string()),
      MenuAction::Groups => ViewAction::Push(Box::new(GroupListView::new(self.ctx.clone()))),
      MenuAction::Quit => ViewAction::Pop,
    }
  }
}

impl View for HomeView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.table_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.table_state.select_previous(),
      KeyCode::Char(c @ '1'..='9') => {
        let idx = c as usize - '1' as usize;
        if let Some(item) = MENU.get(idx) {
          self.table_state.select(Some(idx));
          return self.activate(item);
        }
      }
      KeyCode::Enter => {
        if let Some(item) = self.table_state.selected().and_then(|i| MENU.get(i)) {
          return self.activate(item);
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    ensure_valid_selection(&mut self.table_state, MENU.len());

    let rows = MENU.iter().enumerate().map(|(i, item)| {
      Row::new(vec![
        Line::from(format!("{}", i + 1)).style(Style::default().fg(Color::DarkGray)),
        Line::from(item.label),
        Line::from(item.usage).style(Style::default().fg(Color::DarkGray)),
      ])
    });

    let table = Table::new(
      rows,
      [
        Constraint::Length(3),
        Constraint::Length(30),
        Constraint::Min(20),
      ],
    )
    .block(
      Block::default()
        .title(" ransomware.live ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue)),
    )
    .row_highlight_style(
      Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

    frame.render_stateful_widget(table, area, &mut self.table_state);
  }

  fn breadcrumb_label(&self) -> String {
    "Home".to_string()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("1-9", "choose").with_priority(20),
      ShortcutInfo::new("Enter", "open").with_priority(30),
      ShortcutInfo::new("q", "quit").with_priority(90),
    ]
  }
}
