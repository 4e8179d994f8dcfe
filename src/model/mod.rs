mod event;
mod match_record;
mod team;
mod view;

pub use event::*;
pub use match_record::*;
pub use team::*;
pub use view::*;
