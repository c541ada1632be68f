pub mod address;
pub mod block_ref;
pub mod log_entry;
pub mod network;
pub mod payload;

pub use address::Address;
pub use block_ref::{BlockReference, BLOCK_KEYWORDS};
pub use log_entry::{normalize_logs, to_hex_string, LogEntry, LogEntryJson, HASH_LENGTH};
pub use network::Network;
pub use payload::{BalancePayload, BalanceQuery, EventsPayload, LogQuery};
