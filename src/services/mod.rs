pub mod message_service;
pub mod view_service;

pub use message_service::MessageService;
pub use view_service::ViewService;
