use http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShopError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Password error: {0}")]
    Password(String),

    #[error("Payment gateway error: {0}")]
    Gateway(String),

    #[error("Signature error: {0}")]
    Signature(String),

    #[error("{resource_type} not found: {resource_id}")]
    ResourceNotFound {
        resource_type: String,
        resource_id: String,
    },
}

/// Helper trait for converting errors to a standard response error format
pub(crate) trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

impl<T> IntoResponseError<T> for Result<T, ShopError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            let status = match e {
                ShopError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
                ShopError::Signature(_) => StatusCode::BAD_REQUEST,
                ShopError::Gateway(_) => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_not_found_maps_to_404() {
        let result: Result<(), ShopError> = Err(ShopError::ResourceNotFound {
            resource_type: "Product".to_string(),
            resource_id: "p1".to_string(),
        });

        let response_error = result.into_response_error();

        assert!(response_error.is_err());
        if let Err((status, message)) = response_error {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(message, "Product not found: p1");
        }
    }

    #[test]
    fn test_signature_maps_to_400() {
        let result: Result<(), ShopError> =
            Err(ShopError::Signature("Webhook signature mismatch".to_string()));

        let response_error = result.into_response_error();

        assert!(response_error.is_err());
        if let Err((status, _)) = response_error {
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_gateway_maps_to_502() {
        let result: Result<(), ShopError> = Err(ShopError::Gateway("timeout".to_string()));

        let response_error = result.into_response_error();

        assert!(response_error.is_err());
        if let Err((status, _)) = response_error {
            assert_eq!(status, StatusCode::BAD_GATEWAY);
        }
    }

    #[test]
    fn test_storage_maps_to_500() {
        let result: Result<(), ShopError> = Err(ShopError::Storage("disk full".to_string()));

        let response_error = result.into_response_error();

        assert!(response_error.is_err());
        if let Err((status, _)) = response_error {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_success_case_passes_through() {
        let result: Result<String, ShopError> = Ok("Success".to_string());
        let response_error = result.into_response_error();
        assert_eq!(response_error.expect("ok"), "Success");
    }
}
