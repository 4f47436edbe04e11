use crate::api::GroupDetails;
use crate::query::{Query, QueryState};
use crate::ui::view::{ShortcutInfo, View, ViewAction, ViewContext};
use crate::ui::views::victim_detail::field_lines;
use crate::ui::views::VictimListView;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Everything the API knows about one group.
pub struct GroupDetailView {
  ctx: ViewContext,
  name: String,
  query: Query<Option<GroupDetails>>,
  scroll: u16,
}

impl GroupDetailView {
  pub fn new(ctx: ViewContext, name: String) -> Self {
    let client = ctx.client.clone();
    let group = name.clone();
    let mut query = Query::new(move || {
      let client = client.clone();
      let group = group.clone();
      async move { client.group(&group).await }
    });
    query.fetch();

    Self {
      ctx,
      name,
      query,
      scroll: 0,
    }
  }
}

impl View for GroupDetailView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
      KeyCode::Char('k') | KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
      KeyCode::Char('r') => self.query.refetch(),
      KeyCode::Char('v') => {
        return ViewAction::Push(Box::new(VictimListView::by_group(
          self.ctx.clone(),
          self.name.clone(),
        )))
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let block = Block::default()
      .title(format!(" Details for group '{}' ", self.name))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let paragraph = match self.query.state() {
      QueryState::Loading | QueryState::Idle => {
        Paragraph::new("Loading group details...").style(Style::default().fg(Color::DarkGray))
      }
      QueryState::Error(e) => Paragraph::new(format!("{}\n\nPress 'r' to retry.", e))
        .style(Style::default().fg(Color::Red)),
      QueryState::Success(None) => {
        Paragraph::new("No records found.").style(Style::default().fg(Color::DarkGray))
      }
      QueryState::Success(Some(details)) => Paragraph::new(field_lines(&details.rows())),
    };

    let paragraph = paragraph
      .block(block)
      .wrap(Wrap { trim: false })
      .scroll((self.scroll, 0));
    frame.render_widget(paragraph, area);
  }

  fn breadcrumb_label(&self) -> String {
    self.name.clone()
  }

  fn tick(&mut self) {
    self.query.poll();
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("j/k", "scroll").with_priority(20),
      ShortcutInfo::new("v", "victims").with_priority(30),
      ShortcutInfo::new("r", "reload").with_priority(70),
      ShortcutInfo::new("q", "back").with_priority(90),
    ]
  }
}
