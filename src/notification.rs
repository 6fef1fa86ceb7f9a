//! Notification module for queryview
//!
//! Transient overlay messages. Failure toasts raised by executors end up here.

mod notification_render;
mod notification_state;

pub use notification_render::render_notification;
pub use notification_state::{Notification, NotificationState, NotificationType};
