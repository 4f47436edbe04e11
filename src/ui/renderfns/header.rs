use crate::ui::view::{ShortcutInfo, ShortcutVisibility};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the header bar with logo, API host and the current view's shortcuts
pub fn draw_header(
  frame: &mut Frame,
  area: Rect,
  api_host: &str,
  shortcuts: &[ShortcutInfo],
  prompt_open: bool,
) {
  let mut spans = vec![
    Span::styled(" rwlive ", Style::default().fg(Color::Red).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", api_host), Style::default().fg(Color::White)),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::raw(" "),
  ];
  spans.extend(shortcut_spans(shortcuts, prompt_open));

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}

/// `<key> label` pairs, highest priority first. While a prompt is open only
/// its own hints are shown.
fn shortcut_spans(shortcuts: &[ShortcutInfo], prompt_open: bool) -> Vec<Span<'static>> {
  let wanted = if prompt_open {
    ShortcutVisibility::WhenActive
  } else {
    ShortcutVisibility::Always
  };
  let mut visible: Vec<&ShortcutInfo> = shortcuts
    .iter()
    .filter(|s| s.visibility == wanted)
    .collect();
  visible.sort_by_key(|s| s.priority);

  let mut spans = Vec::with_capacity(visible.len() * 3);
  for (i, shortcut) in visible.into_iter().enumerate() {
    if i > 0 {
      spans.push(Span::raw("  "));
    }
    spans.push(Span::styled(
      format!("<{}>", shortcut.key),
      Style::default().fg(Color::Cyan),
    ));
    spans.push(Span::styled(
      format!(" {}", shortcut.label),
      Style::default().fg(Color::DarkGray),
    ));
  }
  spans
}
