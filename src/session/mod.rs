/// Session tracking for a single user
///
/// This module provides:
/// - Form validation for login attempts
/// - The login/logout state machine as a pure transition function
/// - A cancellable one-second tick timer
/// - A controller sequencing notifications, timer and state
/// - A view model for rendering the widget

pub mod clock;
pub mod controller;
pub mod duration;
pub mod state;
pub mod timer;
pub mod validation;
pub mod view;

pub use controller::{Delivery, SessionController};
pub use state::{Field, Session, TransitionError};
pub use view::ViewModel;
