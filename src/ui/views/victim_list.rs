use crate::api::{LiveClient, Victim};
use crate::export::{self, ExportFormat};
use crate::filter::{self, AdvancedFilters};
use crate::query::{Query, QueryState};
use crate::ui::components::{KeyResult, SearchEvent, SearchInput};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{truncate, victim_flags, StatusMessage};
use crate::ui::view::{ShortcutInfo, View, ViewAction, ViewContext};
use crate::ui::views::VictimDetailView;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use std::future::Future;

/// Table of victims from any victim-returning endpoint, with client-side
/// filtering, drill-down and export.
pub struct VictimListView {
  ctx: ViewContext,
  title: String,
  query: Query<Vec<Victim>>,
  table_state: TableState,
  search: SearchInput,
  sector_input: SearchInput,
  filters: AdvancedFilters,
}

impl VictimListView {
  fn new<F, Fut>(ctx: ViewContext, title: String, load: F) -> Self
  where
    F: Fn(LiveClient) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<Victim>>> + Send + 'static,
  {
    let client = ctx.client.clone();
    let mut query = Query::new(move || load(client.clone()));
    query.fetch();

    Self {
      ctx,
      title,
      query,
      table_state: TableState::default(),
      search: SearchInput::default(),
      sector_input: SearchInput::new('s', " Sector (empty clears) "),
      filters: AdvancedFilters::default(),
    }
  }

  pub fn search(ctx: ViewContext, keyword: String) -> Self {
    let title = format!("Search '{}'", keyword);
    Self::new(ctx, title, move |client| {
      let keyword = keyword.clone();
      async move { client.search_victims(&keyword).await }
    })
  }

  pub fn by_date(ctx: ViewContext, year: i32, month: Option<u32>) -> Self {
    let title = format!("Victims {}", period_label(year, month));
    Self::new(ctx, title, move |client| async move {
      client.victims_by_date(year, month).await
    })
  }

  pub fn by_country(ctx: ViewContext, country: String) -> Self {
    let title = format!("Country {}", country);
    Self::new(ctx, title, move |client| {
      let country = country.clone();
      async move { client.victims_by_country(&country).await }
    })
  }

  pub fn by_country_and_date(
    ctx: ViewContext,
    country: String,
    year: i32,
    month: Option<u32>,
  ) -> Self {
    let title = format!("Country {} {}", country, period_label(year, month));
    Self::new(ctx, title, move |client| {
      let country = country.clone();
      async move {
        client
          .victims_by_country_and_date(&country, year, month)
          .await
      }
    })
  }

  pub fn by_group(ctx: ViewContext, group: String) -> Self {
    let title = format!("Group {}", group);
    Self::new(ctx, title, move |client| {
      let group = group.clone();
      async move { client.group_victims(&group).await }
    })
  }

  fn all(&self) -> &[Victim] {
    self.query.data().map(|v| v.as_slice()).unwrap_or(&[])
  }

  fn visible(&self) -> Vec<&Victim> {
    filter::apply(self.all(), &self.filters, self.search.query())
  }

  fn selected_victim(&self) -> Option<&Victim> {
    let idx = self.table_state.selected()?;
    self.visible().get(idx).copied()
  }

  fn export(&self, format: ExportFormat) -> ViewAction {
    let visible = self.visible();
    if visible.is_empty() {
      return ViewAction::Status(StatusMessage::error("Nothing to export"));
    }
    let message = match export::export(&visible, format, &self.ctx.export_dir) {
      Ok(path) => StatusMessage::info(format!(
        "Exported {} records to {}",
        visible.len(),
        path.display()
      )),
      Err(e) => StatusMessage::error(format!("Export failed: {:#}", e)),
    };
    ViewAction::Status(message)
  }

  fn block_title(&self, shown: usize) -> String {
    let mut title = match self.query.state() {
      QueryState::Loading | QueryState::Idle => format!(" {} (loading...) ", self.title),
      QueryState::Error(_) => format!(" {} (error) ", self.title),
      QueryState::Success(all) if shown == all.len() => format!(" {} ({}) ", self.title, shown),
      QueryState::Success(all) => format!(" {} ({}/{}) ", self.title, shown, all.len()),
    };
    if self.filters.is_active() {
      title.push_str(&format!("[{}] ", self.filters.summary()));
    }
    if !self.search.query().is_empty() {
      title.push_str(&format!("/{} ", self.search.query()));
    }
    title
  }

  fn render_table(&mut self, frame: &mut Frame, area: Rect) {
    let visible = self.visible();
    let len = visible.len();

    let block = Block::default()
      .title(self.block_title(len))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if len == 0 {
      let (content, color) = match self.query.state() {
        QueryState::Loading | QueryState::Idle => ("Loading...".to_string(), Color::DarkGray),
        QueryState::Error(e) => (format!("{}\n\nPress 'r' to retry.", e), Color::Red),
        QueryState::Success(all) if all.is_empty() => {
          ("No records found.".to_string(), Color::DarkGray)
        }
        QueryState::Success(_) => (
          "No records match the current filters.".to_string(),
          Color::DarkGray,
        ),
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(color));
      frame.render_widget(paragraph, area);
      return;
    }

    let header = Row::new(["#", "Victim", "Group", "Sector", "Date", "Country", "PIU"])
      .style(Style::default().fg(Color::Magenta).bold());

    let rows: Vec<Row> = visible
      .iter()
      .enumerate()
      .map(|(i, victim)| {
        Row::new(vec![
          Cell::from(format!("{}", i + 1)).style(Style::default().fg(Color::DarkGray)),
          Cell::from(truncate(victim.name(), 48)),
          Cell::from(victim.group().to_string()).style(Style::default().fg(Color::Cyan)),
          Cell::from(truncate(victim.sector().unwrap_or("Not informed"), 24)),
          Cell::from(truncate(victim.attack_date(), 19)),
          Cell::from(victim.country().to_string()),
          Cell::from(victim_flags(victim)).style(Style::default().fg(Color::Yellow)),
        ])
      })
      .collect();

    let table = Table::new(
      rows,
      [
        Constraint::Length(5),
        Constraint::Min(20),
        Constraint::Length(16),
        Constraint::Length(24),
        Constraint::Length(19),
        Constraint::Length(7),
        Constraint::Length(3),
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
  }
}

fn period_label(year: i32, month: Option<u32>) -> String {
  match month {
    Some(month) => format!("{}-{:02}", year, month),
    None => year.to_string(),
  }
}

impl View for VictimListView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    // The sector prompt owns '/' while it is open
    if !self.sector_input.is_active() {
      match self.search.handle_key(key) {
        KeyResult::Event(_) => {
          self.table_state.select(Some(0));
          return ViewAction::None;
        }
        KeyResult::Handled => return ViewAction::None,
        KeyResult::NotHandled => {}
      }
    }

    match self.sector_input.handle_key(key) {
      KeyResult::Event(SearchEvent::Submitted(sector)) => {
        self.filters.set_sector(&sector);
        self.table_state.select(Some(0));
        return ViewAction::None;
      }
      KeyResult::Event(SearchEvent::Changed(_)) | KeyResult::Handled => {
        return ViewAction::None;
      }
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.table_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.table_state.select_previous(),
      KeyCode::Char('g') | KeyCode::Home => self.table_state.select_first(),
      KeyCode::Char('G') | KeyCode::End => self.table_state.select_last(),
      KeyCode::Char('p') => self.filters.press = !self.filters.press,
      KeyCode::Char('i') => self.filters.infostealer = !self.filters.infostealer,
      KeyCode::Char('u') => self.filters.updates = !self.filters.updates,
      KeyCode::Char('x') => {
        self.filters = AdvancedFilters::default();
        self.table_state.select(Some(0));
      }
      KeyCode::Char('e') => return self.export(ExportFormat::Json),
      KeyCode::Char('E') => return self.export(ExportFormat::Csv),
      KeyCode::Char('r') => self.query.refetch(),
      KeyCode::Enter => {
        if let Some(victim) = self.selected_victim() {
          return ViewAction::Push(Box::new(VictimDetailView::new(victim.clone())));
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    self.render_table(frame, area);
    self.search.render_overlay(frame, area);
    self.sector_input.render_overlay(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    self.title.clone()
  }

  fn captures_input(&self) -> bool {
    self.search.is_active() || self.sector_input.is_active()
  }

  fn tick(&mut self) {
    self.query.poll();
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("/", "filter").with_priority(20),
      ShortcutInfo::new("Enter", "details").with_priority(30),
      ShortcutInfo::new("p/i/u", "press/stealer/updates").with_priority(40),
      ShortcutInfo::new("s", "sector").with_priority(50),
      ShortcutInfo::new("x", "clear").with_priority(55),
      ShortcutInfo::new("e/E", "json/csv").with_priority(60),
      ShortcutInfo::new("r", "reload").with_priority(70),
      ShortcutInfo::new("q", "back").with_priority(90),
      ShortcutInfo::new("Enter", "apply").when_active(),
      ShortcutInfo::new("Esc", "cancel").when_active(),
    ]
  }
}
