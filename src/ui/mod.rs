pub mod components;
pub mod renderfns;
pub mod view;
pub mod views;

use crate::app::App;
use ratatui::prelude::*;
use ratatui::widgets::TableState;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Current view
      Constraint::Length(1), // Footer
    ])
    .split(frame.area());

  let breadcrumb = app.view_breadcrumb();
  let api_host = app.api_host();

  let command_open = app.command_input().is_active();

  if let Some(view) = app.current_view_mut() {
    let shortcuts = view.shortcuts();
    let prompt_open = command_open || view.captures_input();
    renderfns::draw_header(frame, chunks[0], &api_host, &shortcuts, prompt_open);
    view.render(frame, chunks[1]);
  }

  renderfns::draw_footer(frame, chunks[2], &breadcrumb, app.status());
  app.command_input().render_overlay(frame, chunks[1]);
}

/// Keep a table selection inside `0..len`, selecting the first row when
/// there is data and nothing selected.
pub fn ensure_valid_selection(state: &mut TableState, len: usize) {
  let selected = match (state.selected(), len) {
    (_, 0) => None,
    (None, _) => Some(0),
    (Some(i), len) => Some(i.min(len - 1)),
  };
  state.select(selected);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_ensure_valid_selection() {
    let mut state = TableState::default();
    ensure_valid_selection(&mut state, 3);
    assert_eq!(state.selected(), Some(0));

    state.select(Some(10));
    ensure_valid_selection(&mut state, 3);
    assert_eq!(state.selected(), Some(2));

    ensure_valid_selection(&mut state, 0);
    assert_eq!(state.selected(), None);
  }
}
