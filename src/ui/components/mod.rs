mod command_input;
mod input;
mod search_input;

pub use command_input::{CommandEvent, CommandInput};
pub use search_input::{SearchEvent, SearchInput};

/// Outcome of offering a key to a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult<T> {
  /// Consumed; nothing for the parent to do
  Handled,
  /// Consumed; the parent should act on this event
  Event(T),
  /// Not consumed; the parent should try the next handler
  NotHandled,
}
