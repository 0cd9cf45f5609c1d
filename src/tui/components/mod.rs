//! # TUI Components
//!
//! Everything the demo screen draws.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: top status line (bar height, keyboard, key hints)
//! - `Conversation`: sent messages and the delegate activity log
//! - `KeyboardPanel`: the simulated on-screen keyboard
//!
//! ### Stateful Components
//!
//! - `InputBarView`: draws the input bar and keeps `InputBarViewState`
//!   between frames for the send button slide
//!
//! None of these handle events. Input goes to `Screen`, which owns the bar;
//! components only read it.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top status bar)
//! ├── conversation.rs  (Messages + activity log)
//! ├── input_bar.rs     (Input bar renderer)
//! └── keyboard.rs      (Simulated keyboard)
//! ```

mod conversation;
mod input_bar;
mod keyboard;
mod title_bar;

pub use conversation::Conversation;
pub use input_bar::{InputBarView, InputBarViewState};
pub use keyboard::KeyboardPanel;
pub use title_bar::TitleBar;
