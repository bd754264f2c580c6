use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{self, Action, Claims, Role};
use crate::error::ApiError;
use crate::observer::Actor;
use crate::types::CompanyId;

/// Authenticated user context extracted from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub name: String,
    pub role: Role,
    pub company_id: CompanyId,
    pub technician_id: Option<Uuid>,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            name: claims.name,
            role: claims.role,
            company_id: claims.company_id,
            technician_id: claims.technician_id,
        }
    }
}

impl AuthUser {
    /// Fail with 403 unless the role allows `action`
    pub fn require(&self, action: Action) -> Result<(), ApiError> {
        if self.role.allows(action) {
            Ok(())
        } else {
            tracing::warn!("{} ({}) denied {:?}", self.name, self.role, action);
            Err(ApiError::forbidden(format!("Role '{}' may not perform this action", self.role)))
        }
    }

    /// Whether this user may see data of `company_id`
    pub fn can_see(&self, company_id: CompanyId) -> bool {
        self.role.is_global() || self.company_id == company_id
    }

    pub fn ensure_visible(&self, company_id: CompanyId) -> Result<(), ApiError> {
        if self.can_see(company_id) {
            Ok(())
        } else {
            Err(ApiError::forbidden(format!("Company {} is outside your tenant", company_id)))
        }
    }

    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.user_id,
            name: self.name.clone(),
            role: self.role,
            company_id: self.company_id,
        }
    }
}

/// JWT authentication middleware that validates tokens and extracts user context
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Extract JWT from Authorization header
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;

    // Validate and decode JWT
    let claims = auth::validate_jwt(&token)?;

    // Convert claims to AuthUser and inject into request
    let auth_user = AuthUser::from(claims);
    tracing::debug!("Authenticated {} as {}", auth_user.name, auth_user.role);
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_tokens_are_extracted() {
        let mut headers = HeaderMap::new();
        assert!(extract_jwt_from_headers(&headers).is_err());

        headers.insert("authorization", HeaderValue::from_static("Basic abc"));
        assert!(extract_jwt_from_headers(&headers).is_err());

        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(extract_jwt_from_headers(&headers).unwrap(), "abc.def");
    }

    #[test]
    fn tenant_users_only_see_their_company() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            name: "a".into(),
            role: Role::CompanyAdmin,
            company_id: 1,
            technician_id: None,
        };
        assert!(user.can_see(1));
        assert!(!user.can_see(2));
        assert!(user.require(Action::AssignTicket).is_ok());
        assert!(user.require(Action::ManageCompanies).is_err());
    }
}
