use crate::api::Victim;
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Every field of one victim record.
pub struct VictimDetailView {
  victim: Victim,
  scroll: u16,
}

impl VictimDetailView {
  pub fn new(victim: Victim) -> Self {
    Self { victim, scroll: 0 }
  }
}

/// Key/value rows as styled lines, keys padded to a common width.
pub fn field_lines(rows: &[(String, String)]) -> Vec<Line<'static>> {
  let width = rows.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
  rows
    .iter()
    .map(|(key, value)| {
      Line::from(vec![
        Span::styled(
          format!("{:<width$}  ", key, width = width),
          Style::default().fg(Color::Cyan).bold(),
        ),
        Span::raw(value.clone()),
      ])
    })
    .collect()
}

impl View for VictimDetailView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
      KeyCode::Char('k') | KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
      KeyCode::Char('g') | KeyCode::Home => self.scroll = 0,
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let block = Block::default()
      .title(format!(" {} ", self.victim.name()))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let paragraph = Paragraph::new(field_lines(&self.victim.detail_rows()))
      .block(block)
      .wrap(Wrap { trim: false })
      .scroll((self.scroll, 0));
    frame.render_widget(paragraph, area);
  }

  fn breadcrumb_label(&self) -> String {
    self.victim.name().to_string()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("j/k", "scroll").with_priority(20),
      ShortcutInfo::new("q", "back").with_priority(90),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_field_lines_pad_keys() {
    let rows = vec![
      ("victim".to_string(), "Acme".to_string()),
      ("country".to_string(), "US".to_string()),
    ];
    let lines = field_lines(&rows);
    assert_eq!(lines[0].spans[0].content, "victim   ");
    assert_eq!(lines[1].spans[0].content, "country  ");
    assert_eq!(lines[1].spans[1].content, "US");
  }

  #[test]
  fn test_scroll_does_not_underflow() {
    let victim: Victim = serde_json::from_value(serde_json::json!({"victim": "A"})).unwrap();
    let mut view = VictimDetailView::new(victim);
    view.handle_key(KeyEvent::from(KeyCode::Up));
    assert_eq!(view.scroll, 0);
    view.handle_key(KeyEvent::from(KeyCode::Char('j')));
    assert_eq!(view.scroll, 1);
  }
}
