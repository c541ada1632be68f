use serde::Deserialize;
use serde_json::Value;

use crate::error::ValidationError;
use crate::models::{Address, BlockReference, Network};

/// Body of `POST /info/balance` as sent by the caller
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BalancePayload {
    pub network: Option<String>,
    pub wallet: Option<String>,
    pub block_num: Option<Value>,
}

/// Body of `POST /info/events` as sent by the caller
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventsPayload {
    pub block_num: Option<Value>,
}

/// Validated balance lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceQuery {
    pub network: Network,
    pub address: Address,
    pub block: BlockReference,
}

/// Validated event-log lookup against the configured contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    pub block: BlockReference,
    pub contract_address: Address,
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ValidationError> {
    value.ok_or_else(|| ValidationError::MissingField(field.to_string()))
}

fn required_block(value: Option<&Value>) -> Result<&Value, ValidationError> {
    match value {
        None | Some(Value::Null) => Err(ValidationError::MissingField("block_num".to_string())),
        Some(value) => Ok(value),
    }
}

impl BalancePayload {
    /// Check presence of every field, then decode each of them. Nothing here
    /// touches the network.
    pub fn validate(&self) -> Result<BalanceQuery, ValidationError> {
        let block_num = required_block(self.block_num.as_ref())?;
        let network_name = required(self.network.as_deref(), "network")?;
        let wallet = required(self.wallet.as_deref(), "wallet")?;

        let network = Network::resolve(network_name);
        if !network.is_known() {
            return Err(ValidationError::InvalidNetwork(network_name.to_string()));
        }

        Ok(BalanceQuery {
            network,
            address: Address::parse(wallet)?,
            block: BlockReference::from_json(block_num)?,
        })
    }
}

impl EventsPayload {
    pub fn validate(&self, contract_address: Address) -> Result<LogQuery, ValidationError> {
        let block_num = required_block(self.block_num.as_ref())?;
        Ok(LogQuery {
            block: BlockReference::from_json(block_num)?,
            contract_address,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const WALLET: &str = "0x416a7989a964C9ED60257B064Efc3a30FE6bF2eE";

    fn balance_payload() -> BalancePayload {
        serde_json::from_value(json!({
            "network": "avalanche",
            "wallet": WALLET,
            "block_num": "0x13371337",
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_balance_payload() {
        let query = balance_payload().validate().unwrap();
        assert_eq!(query.network, Network::Avalanche);
        assert_eq!(query.block.as_str(), "0x13371337");
        assert_eq!(query.address, Address::parse(&WALLET.to_lowercase()).unwrap());
    }

    #[test]
    fn test_missing_fields_are_named() {
        let mut payload = balance_payload();
        payload.wallet = None;
        assert_eq!(payload.validate(), Err(ValidationError::MissingField("wallet".to_string())));

        let mut payload = balance_payload();
        payload.network = None;
        assert_eq!(payload.validate(), Err(ValidationError::MissingField("network".to_string())));

        let mut payload = balance_payload();
        payload.block_num = Some(Value::Null);
        assert_eq!(payload.validate(), Err(ValidationError::MissingField("block_num".to_string())));
    }

    #[test]
    fn test_unknown_network_rejected() {
        let mut payload = balance_payload();
        payload.network = Some("Avalanche".to_string());
        assert_eq!(
            payload.validate(),
            Err(ValidationError::InvalidNetwork("Avalanche".to_string()))
        );
    }

    #[test]
    fn test_bad_wallet_and_block_rejected() {
        let mut payload = balance_payload();
        payload.wallet = Some("0xF3ea77E42F846a".to_string());
        assert!(matches!(payload.validate(), Err(ValidationError::InvalidAddress(_))));

        let mut payload = balance_payload();
        payload.block_num = Some(json!("not-a-number"));
        assert!(matches!(payload.validate(), Err(ValidationError::InvalidBlockReference(_))));
    }

    #[test]
    fn test_integer_block_num() {
        let mut payload = balance_payload();
        payload.block_num = Some(json!(16));
        assert_eq!(payload.validate().unwrap().block.as_str(), "0x10");
    }

    #[test]
    fn test_events_payload() {
        let contract = Address::parse("0x66357dcace80431aee0a7507e2e361b7e2402370").unwrap();

        let payload: EventsPayload = serde_json::from_value(json!({"block_num": "latest"})).unwrap();
        let query = payload.validate(contract).unwrap();
        assert_eq!(query.block.as_str(), "latest");
        assert_eq!(query.contract_address, contract);

        let empty: EventsPayload = serde_json::from_value(json!({})).unwrap();
        assert_eq!(
            empty.validate(contract),
            Err(ValidationError::MissingField("block_num".to_string()))
        );
    }
}
