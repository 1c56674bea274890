pub mod invoice;
pub mod line_item;
pub mod money;
pub mod party;

pub use invoice::{compute_total, Invoice, DEFAULT_GREETING};
pub use line_item::{ItemField, LineItem};
pub use party::{Party, PartyField};
