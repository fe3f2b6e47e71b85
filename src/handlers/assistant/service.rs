use alloy::primitives::Address;
use log::{debug, error, warn};

use crate::clients::{is_valid_address, wei_to_ether, CompletionApi, LedgerApi, LedgerError};
use crate::errors::ApiError;
use crate::handlers::assistant::dto::{
    BalanceResponse, ContractDataResponse, ExplanationResponse, GenerateTokenParams,
    TokenCreationResponse,
};

/// Token budget passed to the completion API for a concept explanation
const EXPLANATION_MAX_TOKENS: u32 = 150;

/// Service layer for the assistant actions
pub struct AssistantService;

impl AssistantService {
    /// Look up the native-currency balance of an address
    ///
    /// # Arguments
    /// * `ledger` - Chain client
    /// * `address` - Address string from the request
    ///
    /// # Returns
    /// * `Ok(BalanceResponse)` - Balance in ether
    /// * `Err(ApiError)` - Invalid address (checked before any chain call) or upstream failure
    pub async fn get_balance(
        ledger: &dyn LedgerApi,
        address: &str,
    ) -> Result<BalanceResponse, ApiError> {
        let address = parse_address(address).ok_or(ApiError::InvalidAddress)?;

        let wei = ledger.get_balance(address).await.map_err(|e| {
            error!("Balance lookup for {} failed: {}", address, e);
            ApiError::Upstream(e.to_string())
        })?;

        let balance = wei_to_ether(wei)?;
        Ok(BalanceResponse { balance })
    }

    /// Probe an address for the three standard ERC-20 view methods
    ///
    /// Any probe failure collapses to the one user-facing message; the
    /// classified cause (no code, reverted call, transport fault) only
    /// reaches the log.
    pub async fn get_contract_data(
        ledger: &dyn LedgerApi,
        address: &str,
    ) -> Result<ContractDataResponse, ApiError> {
        let address = parse_address(address).ok_or(ApiError::InvalidContractAddress)?;

        match ledger.token_metadata(address).await {
            Ok(metadata) => Ok(ContractDataResponse {
                name: metadata.name,
                symbol: metadata.symbol,
                decimals: metadata.decimals,
            }),
            Err(e) => {
                match &e {
                    LedgerError::Transport(_) | LedgerError::Timeout(_) => {
                        error!("Contract probe for {} hit a network fault: {}", address, e)
                    }
                    _ => warn!("Contract probe for {} rejected: {}", address, e),
                }
                Err(ApiError::ContractNotErc20)
            }
        }
    }

    /// Acknowledge a token creation request; no compilation or deployment happens
    pub fn generate_erc20(params: &GenerateTokenParams) -> TokenCreationResponse {
        TokenCreationResponse {
            message: format!(
                "ERC-20 Token {} ({}) with initial supply {} created.",
                params.name, params.symbol, params.initial_supply
            ),
        }
    }

    /// Ask the completion API to explain a blockchain concept
    pub async fn explain_concept(
        completion: &dyn CompletionApi,
        concept: &str,
    ) -> Result<ExplanationResponse, ApiError> {
        let prompt = format!(
            "Explain the concept of {} in blockchain technology.",
            concept
        );
        debug!("Requesting explanation for {:?}", concept);

        let text = completion
            .complete(&prompt, EXPLANATION_MAX_TOKENS)
            .await
            .map_err(|e| {
                error!("Completion request failed: {}", e);
                ApiError::Upstream(e.to_string())
            })?;

        Ok(ExplanationResponse {
            explanation: text.trim().to_string(),
        })
    }
}

/// Format validation happens before parsing so no chain call is ever made
/// for a malformed address.
fn parse_address(value: &str) -> Option<Address> {
    if !is_valid_address(value) {
        return None;
    }
    value.parse::<Address>().ok()
}
