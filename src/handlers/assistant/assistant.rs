use actix_web::{web, HttpResponse};
use log::info;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::clients::{CompletionApi, LedgerApi};
use crate::errors::ApiError;
use crate::handlers::assistant::dto::{AddressParams, ExplainConceptParams, GenerateTokenParams};
use crate::handlers::assistant::service::AssistantService;

/// POST /token-gpt - Dispatches one of the four assistant actions
///
/// # Arguments
/// * `ledger` - Chain client
/// * `completion` - Completion client
/// * `body` - JSON object with a required `action` field plus action-specific fields
///
/// # Returns
/// Action-specific JSON object; failures as `{"error": message}`
pub async fn token_gpt_handler(
    ledger: web::Data<dyn LedgerApi>,
    completion: web::Data<dyn CompletionApi>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let action = body.get("action").and_then(Value::as_str).unwrap_or_default();
    info!("Handling POST /token-gpt request, action: {:?}", action);

    match action {
        "get_balance" => {
            let params: AddressParams = parse_params(&body)?;
            let response = AssistantService::get_balance(ledger.get_ref(), &params.address).await?;
            Ok(HttpResponse::Ok().json(response))
        }
        "get_contract_data" => {
            let params: AddressParams = parse_params(&body)?;
            let response =
                AssistantService::get_contract_data(ledger.get_ref(), &params.address).await?;
            Ok(HttpResponse::Ok().json(response))
        }
        "generate_erc20" => {
            let params: GenerateTokenParams = parse_params(&body)?;
            Ok(HttpResponse::Ok().json(AssistantService::generate_erc20(&params)))
        }
        "explain_concept" => {
            let params: ExplainConceptParams = parse_params(&body)?;
            let response =
                AssistantService::explain_concept(completion.get_ref(), &params.concept).await?;
            Ok(HttpResponse::Ok().json(response))
        }
        _ => Err(ApiError::UnknownAction),
    }
}

/// Missing or mistyped fields for a recognized action reject with a
/// validation error rather than an opaque 500.
fn parse_params<T: DeserializeOwned>(body: &Value) -> Result<T, ApiError> {
    serde_json::from_value(body.clone()).map_err(|e| ApiError::Validation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{CompletionError, LedgerError, TokenMetadata};
    use actix_web::{test, App};
    use alloy::primitives::{Address, U256};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    const DEAD_ADDRESS: &str = "0x000000000000000000000000000000000000dEaD";

    #[derive(Default)]
    struct MockLedger {
        balance: U256,
        metadata: Option<TokenMetadata>,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl LedgerApi for MockLedger {
        async fn get_balance(&self, _address: Address) -> Result<U256, LedgerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.balance)
        }

        async fn token_metadata(&self, address: Address) -> Result<TokenMetadata, LedgerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.metadata
                .clone()
                .ok_or(LedgerError::NotAContract(address))
        }
    }

    #[derive(Default)]
    struct MockCompletion {
        reply: String,
        seen: Mutex<Option<(String, u32)>>,
    }

    #[async_trait::async_trait]
    impl CompletionApi for MockCompletion {
        async fn complete(
            &self,
            prompt: &str,
            max_tokens: u32,
        ) -> Result<String, CompletionError> {
            *self.seen.lock().unwrap() = Some((prompt.to_string(), max_tokens));
            Ok(self.reply.clone())
        }
    }

    async fn dispatch(
        ledger: Arc<MockLedger>,
        completion: Arc<MockCompletion>,
        body: Value,
    ) -> (u16, Value) {
        let ledger_api: Arc<dyn LedgerApi> = ledger;
        let completion_api: Arc<dyn CompletionApi> = completion;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(ledger_api))
                .app_data(web::Data::from(completion_api))
                .route("/token-gpt", web::post().to(token_gpt_handler)),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/token-gpt")
            .set_json(&body)
            .to_request();
        let response = test::call_service(&app, request).await;
        let status = response.status().as_u16();
        let bytes = test::read_body(response).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn test_unknown_action() {
        let (status, body) = dispatch(
            Arc::new(MockLedger::default()),
            Arc::new(MockCompletion::default()),
            json!({"action": "bogus"}),
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(body, json!({"error": "Unknown action"}));
    }

    #[actix_web::test]
    async fn test_missing_action() {
        let (status, body) = dispatch(
            Arc::new(MockLedger::default()),
            Arc::new(MockCompletion::default()),
            json!({"address": DEAD_ADDRESS}),
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(body, json!({"error": "Unknown action"}));
    }

    #[actix_web::test]
    async fn test_get_balance_converts_wei() {
        let ledger = Arc::new(MockLedger {
            balance: U256::from(1_000_000_000_000_000_000u128),
            ..Default::default()
        });
        let (status, body) = dispatch(
            ledger.clone(),
            Arc::new(MockCompletion::default()),
            json!({"action": "get_balance", "address": DEAD_ADDRESS}),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(body, json!({"balance": 1.0}));
        assert_eq!(ledger.calls.load(Ordering::SeqCst), 1);
    }

    #[actix_web::test]
    async fn test_get_balance_invalid_address_skips_ledger() {
        let ledger = Arc::new(MockLedger::default());
        for address in ["0x1234", "000000000000000000000000000000000000dEaD", "0xZZ"] {
            let (status, body) = dispatch(
                ledger.clone(),
                Arc::new(MockCompletion::default()),
                json!({"action": "get_balance", "address": address}),
            )
            .await;
            assert_eq!(status, 400);
            assert_eq!(body, json!({"error": "Invalid Ethereum address"}));
        }
        assert_eq!(ledger.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn test_get_contract_data_success() {
        let ledger = Arc::new(MockLedger {
            metadata: Some(TokenMetadata {
                name: "Dai Stablecoin".to_string(),
                symbol: "DAI".to_string(),
                decimals: 18,
            }),
            ..Default::default()
        });
        let (status, body) = dispatch(
            ledger,
            Arc::new(MockCompletion::default()),
            json!({"action": "get_contract_data", "address": DEAD_ADDRESS}),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(
            body,
            json!({"name": "Dai Stablecoin", "symbol": "DAI", "decimals": 18})
        );
    }

    #[actix_web::test]
    async fn test_get_contract_data_probe_failure_collapses() {
        let (status, body) = dispatch(
            Arc::new(MockLedger::default()),
            Arc::new(MockCompletion::default()),
            json!({"action": "get_contract_data", "address": DEAD_ADDRESS}),
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(
            body,
            json!({"error": "Contract is not ERC-20 or doesn't follow standard conventions"})
        );
    }

    #[actix_web::test]
    async fn test_get_contract_data_invalid_address() {
        let ledger = Arc::new(MockLedger::default());
        let (status, body) = dispatch(
            ledger.clone(),
            Arc::new(MockCompletion::default()),
            json!({"action": "get_contract_data", "address": "not-an-address"}),
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(body, json!({"error": "Invalid contract address"}));
        assert_eq!(ledger.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn test_generate_erc20_verbatim_message() {
        let ledger = Arc::new(MockLedger::default());
        let (status, body) = dispatch(
            ledger.clone(),
            Arc::new(MockCompletion::default()),
            json!({"action": "generate_erc20", "name": "Foo", "symbol": "FOO", "initial_supply": 1000}),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(
            body,
            json!({"message": "ERC-20 Token Foo (FOO) with initial supply 1000 created."})
        );
        assert_eq!(ledger.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn test_generate_erc20_missing_field() {
        let (status, body) = dispatch(
            Arc::new(MockLedger::default()),
            Arc::new(MockCompletion::default()),
            json!({"action": "generate_erc20", "name": "Foo"}),
        )
        .await;
        assert_eq!(status, 400);
        let message = body["error"].as_str().unwrap();
        assert!(message.starts_with("Invalid request:"), "{}", message);
        assert!(message.contains("missing field"), "{}", message);
    }

    #[actix_web::test]
    async fn test_explain_concept_prompt_and_budget() {
        let completion = Arc::new(MockCompletion {
            reply: "  Sharding splits state across validators.  ".to_string(),
            ..Default::default()
        });
        let (status, body) = dispatch(
            Arc::new(MockLedger::default()),
            completion.clone(),
            json!({"action": "explain_concept", "concept": "sharding"}),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(
            body,
            json!({"explanation": "Sharding splits state across validators."})
        );

        let seen = completion.seen.lock().unwrap().clone();
        assert_eq!(
            seen,
            Some((
                "Explain the concept of sharding in blockchain technology.".to_string(),
                150
            ))
        );
    }
}
