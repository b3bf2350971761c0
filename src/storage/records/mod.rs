pub mod message;
pub mod view;

pub(crate) use message::MessageRecord;
pub(crate) use view::ViewRecord;
