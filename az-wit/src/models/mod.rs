mod link;
mod work_item;

pub(crate) use link::{LinkRow, WorkItemRef};

pub use link::WorkItemLink;
pub use work_item::RawWorkItem;
