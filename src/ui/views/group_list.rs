use crate::api::Group;
use crate::query::{Query, QueryState};
use crate::ui::components::{KeyResult, SearchInput};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::truncate;
use crate::ui::view::{ShortcutInfo, View, ViewAction, ViewContext};
use crate::ui::views::{GroupDetailView, VictimListView};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

/// All known ransomware groups.
pub struct GroupListView {
  ctx: ViewContext,
  query: Query<Vec<Group>>,
  table_state: TableState,
  search: SearchInput,
}

impl GroupListView {
  pub fn new(ctx: ViewContext) -> Self {
    let client = ctx.client.clone();
    let mut query = Query::new(move || {
      let client = client.clone();
      async move { client.groups().await }
    });
    query.fetch();

    Self {
      ctx,
      query,
      table_state: TableState::default(),
      search: SearchInput::default(),
    }
  }

  fn visible(&self) -> Vec<&Group> {
    let needle = self.search.query().trim().to_lowercase();
    self
      .query
      .data()
      .map(|groups| {
        groups
          .iter()
          .filter(|g| {
            needle.is_empty()
              || g.name().to_lowercase().contains(&needle)
              || g.description().to_lowercase().contains(&needle)
          })
          .collect()
      })
      .unwrap_or_default()
  }

  fn selected_name(&self) -> Option<String> {
    let idx = self.table_state.selected()?;
    self.visible().get(idx).map(|g| g.name().to_string())
  }
}

impl View for GroupListView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match self.search.handle_key(key) {
      KeyResult::Event(_) => {
        self.table_state.select(Some(0));
        return ViewAction::None;
      }
      KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.table_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.table_state.select_previous(),
      KeyCode::Char('g') | KeyCode::Home => self.table_state.select_first(),
      KeyCode::Char('G') | KeyCode::End => self.table_state.select_last(),
      KeyCode::Char('r') => self.query.refetch(),
      KeyCode::Enter => {
        if let Some(name) = self.selected_name() {
          return ViewAction::Push(Box::new(GroupDetailView::new(self.ctx.clone(), name)));
        }
      }
      KeyCode::Char('v') => {
        if let Some(name) = self.selected_name() {
          return ViewAction::Push(Box::new(VictimListView::by_group(self.ctx.clone(), name)));
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let visible = self.visible();
    let len = visible.len();

    let title = match self.query.state() {
      QueryState::Loading | QueryState::Idle => " Groups (loading...) ".to_string(),
      QueryState::Error(_) => " Groups (error) ".to_string(),
      QueryState::Success(all) if self.search.query().is_empty() => {
        format!(" Groups ({}) ", all.len())
      }
      QueryState::Success(all) => {
        format!(" Groups ({}/{}) /{} ", len, all.len(), self.search.query())
      }
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if len == 0 {
      let (content, color) = match self.query.state() {
        QueryState::Loading | QueryState::Idle => ("Loading...".to_string(), Color::DarkGray),
        QueryState::Error(e) => (format!("{}\n\nPress 'r' to retry.", e), Color::Red),
        QueryState::Success(_) => ("No records found.".to_string(), Color::DarkGray),
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(color));
      frame.render_widget(paragraph, area);
      self.search.render_overlay(frame, area);
      return;
    }

    let header = Row::new(["Group Name", "Description", "Onion Link"])
      .style(Style::default().fg(Color::Blue).bold());

    let rows: Vec<Row> = visible
      .iter()
      .map(|group| {
        Row::new(vec![
          Cell::from(group.name().to_string()).style(Style::default().fg(Color::Cyan)),
          Cell::from(truncate(group.description(), 80)),
          Cell::from(group.onion().to_string()).style(Style::default().fg(Color::DarkGray)),
        ])
      })
      .collect();

    let table = Table::new(
      rows,
      [
        Constraint::Length(20),
        Constraint::Percentage(55),
        Constraint::Min(20),
      ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(
      Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

    ensure_valid_selection(&mut self.table_state, len);
    frame.render_stateful_widget(table, area, &mut self.table_state);
    self.search.render_overlay(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    "Groups".to_string()
  }

  fn captures_input(&self) -> bool {
    self.search.is_active()
  }

  fn tick(&mut self) {
    self.query.poll();
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("/", "filter").with_priority(20),
      ShortcutInfo::new("Enter", "details").with_priority(30),
      ShortcutInfo::new("v", "victims").with_priority(40),
      ShortcutInfo::new("r", "reload").with_priority(70),
      ShortcutInfo::new("q", "back").with_priority(90),
      ShortcutInfo::new("Enter", "apply").when_active(),
      ShortcutInfo::new("Esc", "cancel").when_active(),
    ]
  }
}
