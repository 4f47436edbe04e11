use super::input::{InputResult, TextInput};
use super::KeyResult;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// Events emitted by search input that parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
  /// Query changed (on each keystroke; empty string on cancel)
  Changed(String),
  /// Enter pressed; the overlay closes and the value persists
  Submitted(String),
}

/// Pop-up single-line prompt opened by a trigger key.
#[derive(Debug, Clone)]
pub struct SearchInput {
  input: TextInput,
  active: bool,
  trigger: char,
  title: &'static str,
}

impl Default for SearchInput {
  fn default() -> Self {
    Self::new('/', " Filter ")
  }
}

impl SearchInput {
  pub fn new(trigger: char, title: &'static str) -> Self {
    Self {
      input: TextInput::new(),
      active: false,
      trigger,
      title,
    }
  }

  /// While active, every key belongs to this input.
  pub fn is_active(&self) -> bool {
    self.active
  }

  pub fn query(&self) -> &str {
    self.input.value()
  }

  /// Open the prompt, pre-filled with `value`.
  pub fn activate_with(&mut self, value: &str) {
    self.active = true;
    self.input.set_value(value);
  }

  /// Handle a key event. Call regardless of state; this also handles activation.
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<SearchEvent> {
    if !self.active {
      if key.code == KeyCode::Char(self.trigger) {
        self.activate_with("");
        return KeyResult::Event(SearchEvent::Changed(String::new()));
      }
      return KeyResult::NotHandled;
    }

    match self.input.handle_key(key) {
      InputResult::Submitted(value) => {
        self.active = false;
        KeyResult::Event(SearchEvent::Submitted(value))
      }
      InputResult::Cancelled => {
        self.active = false;
        self.input.clear();
        KeyResult::Event(SearchEvent::Changed(String::new()))
      }
      InputResult::Consumed => {
        KeyResult::Event(SearchEvent::Changed(self.input.value().to_string()))
      }
      // Swallow anything else so it does not leak to the view
      InputResult::NotHandled => KeyResult::Handled,
    }
  }

  /// Render the prompt overlay if active
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active {
      return;
    }

    let width = (area.width * 60 / 100)
      .clamp(30, 60)
      .min(area.width.saturating_sub(2));
    let height = 3.min(area.height.saturating_sub(1));
    if width == 0 || height == 0 {
      return;
    }
    let overlay_area = Rect::new(area.x + 1, area.y + 1, width, height);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(self.title);

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let (before, after) = self.input.split_at_cursor();
    let input_line = Line::from(vec![
      Span::styled(self.trigger.to_string(), Style::default().fg(Color::Yellow)),
      Span::raw(before),
      Span::styled("_", Style::default().fg(Color::Yellow)),
      Span::raw(after),
    ]);
    frame.render_widget(Paragraph::new(input_line), inner);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  #[test]
  fn test_inactive_ignores_other_keys() {
    let mut search = SearchInput::default();
    assert_eq!(search.handle_key(key(KeyCode::Char('j'))), KeyResult::NotHandled);
    assert!(!search.is_active());
  }

  #[test]
  fn test_typing_emits_changes() {
    let mut search = SearchInput::default();
    search.handle_key(key(KeyCode::Char('/')));
    assert!(search.is_active());

    assert_eq!(
      search.handle_key(key(KeyCode::Char('a'))),
      KeyResult::Event(SearchEvent::Changed("a".into()))
    );
    assert_eq!(
      search.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(SearchEvent::Submitted("a".into()))
    );
    assert!(!search.is_active());
    assert_eq!(search.query(), "a");
  }

  #[test]
  fn test_custom_trigger_and_cancel() {
    let mut sector = SearchInput::new('s', " Sector ");
    assert_eq!(sector.handle_key(key(KeyCode::Char('/'))), KeyResult::NotHandled);

    sector.handle_key(key(KeyCode::Char('s')));
    sector.handle_key(key(KeyCode::Char('x')));
    assert_eq!(
      sector.handle_key(key(KeyCode::Esc)),
      KeyResult::Event(SearchEvent::Changed(String::new()))
    );
    assert_eq!(sector.query(), "");
  }
}
