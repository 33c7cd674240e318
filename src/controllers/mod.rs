pub mod admin_panel;
pub mod subscription_form;

pub use admin_panel::AdminPanel;
pub use subscription_form::{StatusKind, StatusMessage, SubmitError, SubscriptionForm};
