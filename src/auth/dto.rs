use serde::{Deserialize, Serialize};

/// Request body for user registration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Partial profile update; absent fields keep their stored value. The
/// target account is named by the `email` request header.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

/// Response returned after registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub token: String,
    pub email: String,
}

/// Response returned after login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub authtoken: String,
    pub user_name: String,
    pub user_email: String,
}

/// Response returned after a profile update.
#[derive(Debug, Serialize)]
pub struct UpdateProfileResponse {
    pub authtoken: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_accepts_camel_case_names() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"email":"a@x.com","password":"p1","firstName":"Ada","lastName":"L"}"#,
        )
        .unwrap();
        assert_eq!(req.first_name.as_deref(), Some("Ada"));
        assert_eq!(req.last_name.as_deref(), Some("L"));
    }

    #[test]
    fn login_response_uses_wire_field_names() {
        let json = serde_json::to_value(LoginResponse {
            authtoken: "t".into(),
            user_name: "Ada".into(),
            user_email: "a@x.com".into(),
        })
        .unwrap();
        assert!(json.get("authtoken").is_some());
        assert!(json.get("userName").is_some());
        assert!(json.get("userEmail").is_some());
    }

    #[test]
    fn register_response_echoes_token_and_email() {
        let json = serde_json::to_value(RegisterResponse {
            token: "t".into(),
            email: "a@x.com".into(),
        })
        .unwrap();
        assert_eq!(json["token"], "t");
        assert_eq!(json["email"], "a@x.com");
    }

    #[test]
    fn update_request_fields_are_all_optional() {
        let req: UpdateProfileRequest = serde_json::from_str("{}").unwrap();
        assert!(req.first_name.is_none());
        assert!(req.last_name.is_none());
        assert!(req.password.is_none());
    }
}
