use serde::{Deserialize, Serialize};

/// Parameters for the `get_balance` and `get_contract_data` actions
#[derive(Debug, Deserialize)]
pub struct AddressParams {
    pub address: String,
}

/// Parameters for the `generate_erc20` action
#[derive(Debug, Deserialize)]
pub struct GenerateTokenParams {
    pub name: String,
    pub symbol: String,
    pub initial_supply: u64,
}

/// Parameters for the `explain_concept` action
#[derive(Debug, Deserialize)]
pub struct ExplainConceptParams {
    pub concept: String,
}

/// Native-currency balance in display units (ether)
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub balance: f64,
}

/// ERC-20 metadata read from the contract
#[derive(Debug, Serialize)]
pub struct ContractDataResponse {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Acknowledgment for a simulated token creation; nothing touches the chain
#[derive(Debug, Serialize)]
pub struct TokenCreationResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ExplanationResponse {
    pub explanation: String,
}
