use alloy::primitives::utils::format_ether;
use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::client::RpcClient;
use alloy::sol;
use alloy::transports::http::Http;
use alloy::transports::layers::FallbackLayer;
use alloy::transports::TransportError;
use anyhow::{anyhow, Result};
use log::debug;
use std::num::NonZeroUsize;
use std::time::Duration;
use tower::ServiceBuilder;
use url::Url;

use crate::config::ChainConfig;

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
    }
}

/// Metadata read from the three standard ERC-20 view methods
#[derive(Debug, Clone)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("no contract code at {0}")]
    NotAContract(Address),

    #[error("{method}() call failed: {source}")]
    MethodCall {
        method: &'static str,
        #[source]
        source: alloy::contract::Error,
    },

    #[error("rpc transport failure: {0}")]
    Transport(TransportError),

    #[error("rpc call timed out after {0:?}")]
    Timeout(Duration),
}

/// Read-only chain access consumed by the request dispatcher
#[async_trait::async_trait]
pub trait LedgerApi: Send + Sync {
    /// Balance of an address in wei
    async fn get_balance(&self, address: Address) -> Result<U256, LedgerError>;

    /// Probe `name()`, `symbol()` and `decimals()` on a contract address
    async fn token_metadata(&self, address: Address) -> Result<TokenMetadata, LedgerError>;
}

pub struct LedgerClient {
    provider: DynProvider,
    call_timeout: Duration,
}

impl LedgerClient {
    pub fn new(config: &ChainConfig) -> Result<Self> {
        let provider = create_provider(&config.rpc_urls)?;
        Ok(Self {
            provider,
            call_timeout: Duration::from_secs(config.request_timeout_secs),
        })
    }
}

#[async_trait::async_trait]
impl LedgerApi for LedgerClient {
    async fn get_balance(&self, address: Address) -> Result<U256, LedgerError> {
        let wei = tokio::time::timeout(self.call_timeout, async {
            self.provider.get_balance(address).await
        })
        .await
        .map_err(|_| LedgerError::Timeout(self.call_timeout))?
        .map_err(LedgerError::Transport)?;

        debug!("Balance of {}: {} wei", address, wei);
        Ok(wei)
    }

    async fn token_metadata(&self, address: Address) -> Result<TokenMetadata, LedgerError> {
        tokio::time::timeout(self.call_timeout, async {
            let code = self
                .provider
                .get_code_at(address)
                .await
                .map_err(LedgerError::Transport)?;
            if code.is_empty() {
                return Err(LedgerError::NotAContract(address));
            }

            let token = IERC20::new(address, &self.provider);
            let name = token
                .name()
                .call()
                .await
                .map_err(|e| classify_call_error("name", e))?;
            let symbol = token
                .symbol()
                .call()
                .await
                .map_err(|e| classify_call_error("symbol", e))?;
            let decimals = token
                .decimals()
                .call()
                .await
                .map_err(|e| classify_call_error("decimals", e))?;

            debug!(
                "Token metadata for {}: {} ({}), {} decimals",
                address, name, symbol, decimals
            );
            Ok(TokenMetadata {
                name,
                symbol,
                decimals,
            })
        })
        .await
        .map_err(|_| LedgerError::Timeout(self.call_timeout))?
    }
}

/// A node rejecting the call (revert, missing method) is a contract problem;
/// anything else on the transport is a network fault.
fn classify_call_error(method: &'static str, error: alloy::contract::Error) -> LedgerError {
    match error {
        alloy::contract::Error::TransportError(e) if !e.is_error_resp() => {
            LedgerError::Transport(e)
        }
        other => LedgerError::MethodCall {
            method,
            source: other,
        },
    }
}

pub fn create_provider(rpcs: &[String]) -> Result<DynProvider> {
    let transport_count = NonZeroUsize::new(rpcs.len())
        .ok_or_else(|| anyhow!("at least one chain RPC URL must be configured"))?;
    let fallback_layer = FallbackLayer::default().with_active_transport_count(transport_count);

    let transports = rpcs
        .iter()
        .map(|url| Ok(Http::new(url.parse::<Url>()?)))
        .collect::<Result<Vec<_>>>()?;

    // Apply the FallbackLayer to the transports
    let transport = ServiceBuilder::new()
        .layer(fallback_layer)
        .service(transports);
    let client = RpcClient::builder().transport(transport, false);
    Ok(ProviderBuilder::new().connect_client(client).erased())
}

/// Structural validity of an Ethereum address: `0x` prefix plus 40 hex characters
pub fn is_valid_address(value: &str) -> bool {
    match value.strip_prefix("0x") {
        Some(body) => body.len() == 40 && hex::decode(body).is_ok(),
        None => false,
    }
}

/// Convert a wei amount into its display-unit value (1 ether = 10^18 wei)
pub fn wei_to_ether(wei: U256) -> Result<f64> {
    let ether = format_ether(wei);
    ether
        .parse::<f64>()
        .map_err(|e| anyhow!("unparseable formatted balance {:?}: {}", ether, e))
}
