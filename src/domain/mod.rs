pub mod access;
pub mod message;
pub mod user;
pub mod view;

pub use access::{Decision, DenyReason, Disclosure};
pub use message::Message;
pub use user::UserId;
pub use view::View;
