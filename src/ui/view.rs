use crossterm::event::KeyEvent;
use ratatui::prelude::*;
use std::path::PathBuf;

use crate::api::LiveClient;
use crate::ui::renderfns::StatusMessage;

/// When a shortcut should be shown in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShortcutVisibility {
  #[default]
  Always,
  /// Only while a prompt inside the view has focus
  WhenActive,
}

/// A keyboard shortcut hint for display in the header
#[derive(Debug, Clone)]
pub struct ShortcutInfo {
  pub key: &'static str,
  pub label: &'static str,
  pub visibility: ShortcutVisibility,
  /// Lower = shown first
  pub priority: u8,
}

impl ShortcutInfo {
  pub const fn new(key: &'static str, label: &'static str) -> Self {
    Self {
      key,
      label,
      visibility: ShortcutVisibility::Always,
      priority: 100,
    }
  }

  pub const fn with_priority(mut self, priority: u8) -> Self {
    self.priority = priority;
    self
  }

  pub const fn when_active(mut self) -> Self {
    self.visibility = ShortcutVisibility::WhenActive;
    self
  }
}

/// What every view needs to load data and write exports.
#[derive(Clone)]
pub struct ViewContext {
  pub client: LiveClient,
  pub export_dir: PathBuf,
}

/// Actions that a view can request in response to user input
pub enum ViewAction {
  None,
  /// Push a new view onto the stack
  Push(Box<dyn View>),
  /// Pop current view from stack (go back)
  Pop,
  /// Open the command prompt pre-filled with this text
  Prompt(String),
  /// Show a message in the footer
  Status(StatusMessage),
}

/// Trait for view behavior
///
/// Views handle their own prompts (filter, sector) and return actions for
/// the App to execute: App → View → Components.
///
/// Views that load data use a `Query<T>` and poll it in `tick()`.
pub trait View {
  /// Handle a key event, returning an action for App to execute
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction;

  fn render(&mut self, frame: &mut Frame, area: Rect);

  /// Label for this view in the footer breadcrumb
  fn breadcrumb_label(&self) -> String;

  /// True while a prompt inside the view owns the keyboard.
  fn captures_input(&self) -> bool {
    false
  }

  /// Called on each tick to poll background loads
  fn tick(&mut self) {}

  /// Keyboard shortcuts to display in the header
  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("q", "back").with_priority(90),
    ]
  }
}
