//! Widgets: Concrete atoms built on the reactive engine.
//!
//! - [`Messages`]: a scrollable, append-only text pane with batched inserts.
//! - [`LineBuffer`]: the ordered line storage behind it.
//!
//! # Example
//!
//! ```
//! use atoms::{display::RecordingDisplay, widget::Messages, Config, Manager};
//!
//! let config = Config::default();
//! let mut manager = Manager::new(RecordingDisplay::new(), config.theme.clone());
//! let mut messages = Messages::create(&mut manager, &config)?;
//! messages.init(&mut manager)?;
//!
//! messages.add_message(&mut manager, "{bold}welcome{/bold}")?;
//! messages.bulk_add_messages(&mut manager, ["one", "two", "three"])?;
//!
//! assert_eq!(messages.lines().len(), 4);
//! assert_eq!(manager.display().repaints(), 2);
//! # Ok::<(), atoms::Error>(())
//! ```

mod line_buffer;
mod messages;

pub use line_buffer::LineBuffer;
pub use messages::{Messages, ANCHORED};
