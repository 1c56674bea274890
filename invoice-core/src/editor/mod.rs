pub mod handle;
pub mod logo;
pub mod state;

pub use handle::EditorHandle;
pub use logo::LogoSource;
pub use state::{Command, InvoiceEditor};
