pub mod notifier;
pub mod ticket_sync;

pub use notifier::{Notifier, NotifyOutcome};
pub use ticket_sync::{SyncOutcome, TicketSync};
