use actix_web::{error::ResponseError, HttpResponse};
use derive_more::Display;
use serde_json::json;

#[derive(Debug, Display)]
pub enum ApiError {
    #[display(fmt = "Invalid Ethereum address")]
    InvalidAddress,

    #[display(fmt = "Invalid contract address")]
    InvalidContractAddress,

    #[display(fmt = "Contract is not ERC-20 or doesn't follow standard conventions")]
    ContractNotErc20,

    #[display(fmt = "Unknown action")]
    UnknownAction,

    #[display(fmt = "Invalid request: {}", _0)]
    Validation(String),

    #[display(fmt = "Upstream service failure: {}", _0)]
    Upstream(String),

    #[display(fmt = "Internal server error")]
    InternalError,
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        log::error!("Anyhow error: {}", error);
        ApiError::InternalError
    }
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::InvalidAddress => HttpResponse::BadRequest().json(json!({
                "error": "Invalid Ethereum address"
            })),
            ApiError::InvalidContractAddress => HttpResponse::BadRequest().json(json!({
                "error": "Invalid contract address"
            })),
            ApiError::ContractNotErc20 => HttpResponse::BadRequest().json(json!({
                "error": "Contract is not ERC-20 or doesn't follow standard conventions"
            })),
            ApiError::UnknownAction => HttpResponse::BadRequest().json(json!({
                "error": "Unknown action"
            })),
            ApiError::Validation(ref message) => HttpResponse::BadRequest().json(json!({
                "error": format!("Invalid request: {}", message)
            })),
            ApiError::Upstream(ref message) => HttpResponse::BadGateway().json(json!({
                "error": format!("Upstream service failure: {}", message)
            })),
            ApiError::InternalError => HttpResponse::InternalServerError().json(json!({
                "error": "Internal server error"
            })),
        }
    }
}
