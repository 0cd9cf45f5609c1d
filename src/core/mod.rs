//! # Core
//!
//! The input bar model. It knows nothing about any specific UI technology:
//! geometry is plain `f64` points and every event is a return value, a
//! delegate call or a channel message.
//!
//! ```text
//!                 ┌──────────────────────────────┐
//!                 │            CORE              │
//!                 │                              │
//!   edits ───────►│  TextView ──► InputBar ──────┼──► InputBarDelegate
//!                 │                  │           │
//!                 │                  ▼ height    │
//!   host frame ──►│  KeyboardHost ► KeyboardTracker ──► mpsc<KeyboardEvent>
//!                 └──────────────────────────────┘
//!                                │
//!                                ▼
//!                         ┌────────────┐
//!                         │    TUI     │
//!                         │  Adapter   │
//!                         │ (ratatui)  │
//!                         └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`text_view`]: the auto-sizing text input and its measurement
//! - [`input_bar`]: the container, its layout and the delegate trait
//! - [`keyboard`]: the keyboard-tracking accessory and its host
//! - [`geometry`], [`style`]: value types
//! - [`config`]: settings for the demo screen

pub mod config;
pub mod geometry;
pub mod input_bar;
pub mod keyboard;
pub mod style;
pub mod text_view;
