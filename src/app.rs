use crate::commands::{self, CommandAction};
use crate::event::{Event, EventHandler};
use crate::ui;
use crate::ui::components::{CommandEvent, CommandInput, KeyResult};
use crate::ui::renderfns::StatusMessage;
use crate::ui::view::{View, ViewAction, ViewContext};
use crate::ui::views::{DashboardView, GroupDetailView, GroupListView, HomeView, VictimListView};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tracing::{debug, info};

/// Main application state
pub struct App {
  /// Navigation stack; the home menu is always at index 0
  view_stack: Vec<Box<dyn View>>,

  /// The `:` prompt
  command: CommandInput,

  /// Latest footer message, cleared on the next key press
  status: Option<StatusMessage>,

  ctx: ViewContext,

  should_quit: bool,
}

impl App {
  pub fn new(ctx: ViewContext) -> Self {
    Self {
      view_stack: vec![Box::new(HomeView::new(ctx.clone()))],
      command: CommandInput::new(),
      status: None,
      ctx,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = self.event_loop(&mut terminal).await;

    // Restore the terminal even if the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
    let mut events = EventHandler::new(Duration::from_millis(250));
    info!("ui started");

    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(Event::Key(key)) => self.handle_key(key),
        Some(Event::Tick) => self.tick(),
        Some(Event::Resize) => {}
        None => break,
      }
    }

    info!("ui stopped");
    Ok(())
  }

  fn tick(&mut self) {
    for view in &mut self.view_stack {
      view.tick();
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    self.status = None;

    // A prompt open inside the view gets every key, ':' included
    let view_prompt_open = self
      .view_stack
      .last()
      .is_some_and(|view| view.captures_input());

    if !view_prompt_open {
      match self.command.handle_key(key) {
        KeyResult::Event(CommandEvent::Submitted(line)) => {
          self.execute(&line);
          return;
        }
        KeyResult::Event(CommandEvent::Cancelled) | KeyResult::Handled => return,
        KeyResult::NotHandled => {}
      }
    }

    let Some(view) = self.view_stack.last_mut() else {
      self.should_quit = true;
      return;
    };
    let action = view.handle_key(key);
    self.apply(action);
  }

  fn apply(&mut self, action: ViewAction) {
    match action {
      ViewAction::None => {}
      ViewAction::Push(view) => {
        debug!(view = %view.breadcrumb_label(), "push view");
        self.view_stack.push(view);
      }
      ViewAction::Pop => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        } else {
          self.should_quit = true;
        }
      }
      ViewAction::Prompt(prefill) => self.command.activate_with(&prefill),
      ViewAction::Status(message) => self.status = Some(message),
    }
  }

  /// Parse and run a `:` command line.
  fn execute(&mut self, line: &str) {
    if line.is_empty() {
      return;
    }

    let action = match commands::parse(line) {
      Ok(action) => action,
      Err(message) => {
        self.status = Some(StatusMessage::error(message));
        return;
      }
    };
    info!(command = line, "running command");

    let ctx = self.ctx.clone();
    let view: Box<dyn View> = match action {
      CommandAction::Search(keyword) => Box::new(VictimListView::search(ctx, keyword)),
      CommandAction::Date { year, month } => Box::new(VictimListView::by_date(ctx, year, month)),
      CommandAction::Country {
        country,
        period: None,
      } => Box::new(VictimListView::by_country(ctx, country)),
      CommandAction::Country {
        country,
        period: Some((year, month)),
      } => Box::new(VictimListView::by_country_and_date(ctx, country, year, month)),
      CommandAction::GroupVictims(group) => Box::new(VictimListView::by_group(ctx, group)),
      CommandAction::Groups => Box::new(GroupListView::new(ctx)),
      CommandAction::GroupInfo(name) => Box::new(GroupDetailView::new(ctx, name)),
      CommandAction::Dashboard { target, year } => Box::new(DashboardView::new(ctx, target, year)),
      CommandAction::Home => {
        self.view_stack.truncate(1);
        return;
      }
      CommandAction::Quit => {
        self.should_quit = true;
        return;
      }
    };

    // Commands start a new trail from the home menu
    self.view_stack.truncate(1);
    self.view_stack.push(view);
  }

  // Accessors for UI rendering
  pub fn current_view_mut(&mut self) -> Option<&mut Box<dyn View>> {
    self.view_stack.last_mut()
  }

  pub fn command_input(&self) -> &CommandInput {
    &self.command
  }

  pub fn status(&self) -> Option<&StatusMessage> {
    self.status.as_ref()
  }

  pub fn api_host(&self) -> String {
    self.ctx.client.api_host()
  }

  pub fn view_breadcrumb(&self) -> Vec<String> {
    self
      .view_stack
      .iter()
      .map(|v| v.breadcrumb_label())
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::LiveClient;
  use crate::cache::{CacheStore, NoopStore};
  use crate::config::Config;
  use std::sync::Arc;

  fn app() -> App {
    let mut config = Config::default();
    // Nothing listens on the discard port, so loads fail fast
    config.api.base_url = "http://127.0.0.1:9/v2".to_string();
    let store: Arc<dyn CacheStore> = Arc::new(NoopStore);
    App::new(ViewContext {
      client: LiveClient::from_config(&config, store).unwrap(),
      export_dir: std::env::temp_dir(),
    })
  }

  fn press(app: &mut App, code: KeyCode) {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
  }

  fn type_line(app: &mut App, line: &str) {
    press(app, KeyCode::Char(':'));
    for c in line.chars() {
      press(app, KeyCode::Char(c));
    }
    press(app, KeyCode::Enter);
  }

  #[tokio::test]
  async fn test_command_pushes_view() {
    let mut app = app();
    type_line(&mut app, "groups");
    assert_eq!(app.view_breadcrumb(), vec!["Home", "Groups"]);

    type_line(&mut app, "country fr 2024 2");
    assert_eq!(app.view_breadcrumb(), vec!["Home", "Country FR 2024-02"]);

    type_line(&mut app, "home");
    assert_eq!(app.view_breadcrumb(), vec!["Home"]);
  }

  #[tokio::test]
  async fn test_bad_command_sets_error() {
    let mut app = app();
    type_line(&mut app, "date 1999 13");
    assert_eq!(app.view_breadcrumb(), vec!["Home"]);
    let status = app.status().unwrap();
    assert!(status.is_error);
    assert!(status.text.contains("month"));

    press(&mut app, KeyCode::Down);
    assert!(app.status().is_none());
  }

  #[tokio::test]
  async fn test_menu_prompt_prefills_command() {
    let mut app = app();
    // "Victims by date" is the second menu entry
    press(&mut app, KeyCode::Char('2'));
    assert!(app.command_input().is_active());
    for c in "2024".chars() {
      press(&mut app, KeyCode::Char(c));
    }
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.view_breadcrumb(), vec!["Home", "Victims 2024"]);
  }

  #[tokio::test]
  async fn test_back_and_quit() {
    let mut app = app();
    type_line(&mut app, "dash group akira 2024");
    assert_eq!(app.view_breadcrumb(), vec!["Home", "Dashboard akira 2024"]);

    press(&mut app, KeyCode::Char('q'));
    assert_eq!(app.view_breadcrumb(), vec!["Home"]);
    assert!(!app.should_quit);

    press(&mut app, KeyCode::Char('q'));
    assert!(app.should_quit);
  }

  #[tokio::test]
  async fn test_colon_goes_to_open_filter() {
    let mut app = app();
    type_line(&mut app, "search acme");
    press(&mut app, KeyCode::Char('/'));
    press(&mut app, KeyCode::Char(':'));
    assert!(!app.command_input().is_active());
  }
}
