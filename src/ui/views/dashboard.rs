use crate::dashboard::{DashboardTarget, MonthlyCounts};
use crate::query::{Query, QueryState};
use crate::ui::view::{ShortcutInfo, View, ViewAction, ViewContext};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{BarChart, Block, Borders, Paragraph};

/// Bar chart of monthly incident counts for a country or group.
pub struct DashboardView {
  target: DashboardTarget,
  year: i32,
  query: Query<MonthlyCounts>,
}

impl DashboardView {
  pub fn new(ctx: ViewContext, target: DashboardTarget, year: i32) -> Self {
    let client = ctx.client;
    let load_target = target.clone();
    let mut query = Query::new(move || {
      let client = client.clone();
      let target = load_target.clone();
      async move { client.dashboard(&target, year).await }
    });
    query.fetch();

    Self {
      target,
      year,
      query,
    }
  }

  fn label(&self) -> String {
    match &self.target {
      DashboardTarget::Country(cc) => format!("Dashboard {} {}", cc, self.year),
      DashboardTarget::Group(group) => format!("Dashboard {} {}", group, self.year),
    }
  }
}

/// Bar width that fits twelve bars with one-column gaps into `width`.
fn bar_width(width: u16) -> u16 {
  (width.saturating_sub(2 + 11) / 12).clamp(1, 9)
}

impl View for DashboardView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('r') => self.query.refetch(),
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let counts = match self.query.state() {
      QueryState::Success(counts) => counts,
      state => {
        let (text, color) = match state {
          QueryState::Error(e) => (format!("{}\n\nPress 'r' to retry.", e), Color::Red),
          _ => ("Loading monthly counts...".to_string(), Color::DarkGray),
        };
        let block = Block::default()
          .title(format!(" {} ", self.label()))
          .title_alignment(Alignment::Center)
          .borders(Borders::ALL)
          .border_style(Style::default().fg(Color::Blue));
        let paragraph = Paragraph::new(text)
          .block(block)
          .style(Style::default().fg(color));
        frame.render_widget(paragraph, area);
        return;
      }
    };

    let block = Block::default()
      .title(format!(" {} (total {}) ", counts.title, counts.total()))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let data = counts.labeled();
    let chart = BarChart::default()
      .block(block)
      .data(data.as_slice())
      .max(counts.max().max(1))
      .bar_width(bar_width(area.width))
      .bar_gap(1)
      .bar_style(Style::default().fg(Color::Red))
      .value_style(Style::default().fg(Color::White).bg(Color::Red).bold())
      .label_style(Style::default().fg(Color::Cyan));

    frame.render_widget(chart, area);
  }

  fn breadcrumb_label(&self) -> String {
    self.label()
  }

  fn tick(&mut self) {
    self.query.poll();
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("r", "reload").with_priority(70),
      ShortcutInfo::new("q", "back").with_priority(90),
    ]
  }
}
