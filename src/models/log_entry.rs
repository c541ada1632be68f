use serde::Serialize;

use crate::error::LogNormalizationError;

/// Byte length of block hashes, transaction hashes and topics
pub const HASH_LENGTH: usize = 32;

/// Contract event log as returned by an upstream client.
///
/// Hash fields hold raw bytes. They are optional because nodes report
/// pending logs with null hashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub address: String,
    pub topics: Vec<Vec<u8>>,
    pub data: String,
    pub block_number: Option<u64>,
    pub transaction_hash: Option<Vec<u8>>,
    pub transaction_index: Option<u64>,
    pub block_hash: Option<Vec<u8>>,
    pub log_index: Option<u64>,
    pub removed: bool,
}

/// JSON-safe log record returned by the events endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntryJson {
    pub address: String,
    pub topics: Vec<String>,
    pub data: String,
    pub block_number: Option<u64>,
    pub transaction_hash: String,
    pub transaction_index: Option<u64>,
    pub block_hash: String,
    pub log_index: Option<u64>,
    pub removed: bool,
}

/// `0x`-prefixed lowercase hex of raw bytes
pub fn to_hex_string(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

fn render_hash(index: usize, field: &str, value: Option<&[u8]>) -> Result<String, LogNormalizationError> {
    let bytes = value.ok_or_else(|| LogNormalizationError::MalformedLogEntry {
        index,
        field: field.to_string(),
        reason: "is missing".to_string(),
    })?;

    if bytes.len() != HASH_LENGTH {
        return Err(LogNormalizationError::MalformedLogEntry {
            index,
            field: field.to_string(),
            reason: format!("has {} bytes, expected {}", bytes.len(), HASH_LENGTH),
        });
    }

    Ok(to_hex_string(bytes))
}

impl LogEntry {
    /// Render the hash fields as hex strings, `index` being the entry's
    /// position for error reporting.
    pub fn to_json(&self, index: usize) -> Result<LogEntryJson, LogNormalizationError> {
        let topics = self
            .topics
            .iter()
            .enumerate()
            .map(|(t_idx, topic)| render_hash(index, &format!("topics[{}]", t_idx), Some(topic.as_slice())))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(LogEntryJson {
            address: self.address.clone(),
            topics,
            data: self.data.clone(),
            block_number: self.block_number,
            transaction_hash: render_hash(index, "transactionHash", self.transaction_hash.as_deref())?,
            transaction_index: self.transaction_index,
            block_hash: render_hash(index, "blockHash", self.block_hash.as_deref())?,
            log_index: self.log_index,
            removed: self.removed,
        })
    }
}

/// Convert upstream log entries into their JSON-safe form, preserving the
/// order of entries and of topics within each entry. Fails on the first
/// entry with an absent or wrongly sized hash.
pub fn normalize_logs(entries: &[LogEntry]) -> Result<Vec<LogEntryJson>, LogNormalizationError> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| entry.to_json(index))
        .collect()
}
