pub mod filter;
pub mod summary;

pub use filter::ParticipantFilter;
pub use summary::{flag_categories, summarize, Summary};
