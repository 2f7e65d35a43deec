/// Inputs to account operations
///
/// These mirror the JSON bodies sent by the client (camelCase keys). Missing
/// fields deserialize to their defaults so that absent and blank values are
/// reported as validation errors rather than parse failures.

use serde::Deserialize;
use validator::Validate;

use crate::models::account::SettingsPatch;
use crate::rules::lifecycle::ProfileUpdate;

/// Registration input
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Valid email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(length(min = 1, message = "Referral code is required"))]
    pub referral_code: String,
}

impl RegisterRequest {
    /// Trims text fields and lowercases the email
    ///
    /// The password is left exactly as typed.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: normalize_email(&self.email),
            phone: self.phone.trim().to_string(),
            password: self.password,
            referral_code: self.referral_code.trim().to_uppercase(),
        }
    }
}

/// Login input
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Task completion input
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompleteTaskRequest {
    pub task_id: String,
    pub task_title: String,
    pub reward: i64,
}

/// Premium upgrade input
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpgradeRequest {
    pub transaction_proof: Option<String>,
}

/// Withdrawal input
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WithdrawRequest {
    pub bank_name: String,
    pub account_number: String,
    pub amount: i64,
}

/// Profile update input
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub settings: Option<SettingsPatch>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            name: req.name,
            phone: req.phone,
            settings: req.settings,
        }
    }
}

/// Password change input
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
}

/// Canonical form used for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> RegisterRequest {
        RegisterRequest {
            name: "Ada Obi".to_string(),
            email: "ada@example.com".to_string(),
            phone: "08030000000".to_string(),
            password: "secret1".to_string(),
            referral_code: "EARN800".to_string(),
        }
    }

    #[test]
    fn test_register_request_valid() {
        assert!(valid().normalized().validate().is_ok());
    }

    #[test]
    fn test_register_request_normalization() {
        let req = RegisterRequest {
            name: "  Ada Obi ".to_string(),
            email: " Ada@Example.COM ".to_string(),
            password: " keep spaces ".to_string(),
            referral_code: " earn800 ".to_string(),
            ..valid()
        }
        .normalized();

        assert_eq!(req.name, "Ada Obi");
        assert_eq!(req.email, "ada@example.com");
        assert_eq!(req.password, " keep spaces ");
        assert_eq!(req.referral_code, "EARN800");
    }

    #[test]
    fn test_register_request_blank_fields() {
        let req = RegisterRequest {
            name: "   ".to_string(),
            phone: "".to_string(),
            ..valid()
        }
        .normalized();

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("phone"));
    }

    #[test]
    fn test_register_request_bad_email_and_password() {
        let req = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "12345".to_string(),
            ..valid()
        };

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_missing_json_fields_default() {
        let req: RegisterRequest = serde_json::from_str(r#"{"email":"a@b.com"}"#).unwrap();
        assert_eq!(req.email, "a@b.com");
        assert!(req.name.is_empty());
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_camel_case_bodies() {
        let req: CompleteTaskRequest =
            serde_json::from_str(r#"{"taskId":"t-1","taskTitle":"Survey","reward":120}"#).unwrap();
        assert_eq!(req.task_id, "t-1");
        assert_eq!(req.task_title, "Survey");
        assert_eq!(req.reward, 120);

        let req: WithdrawRequest = serde_json::from_str(
            r#"{"bankName":"GTBank","accountNumber":"0123456789","amount":15000}"#,
        )
        .unwrap();
        assert_eq!(req.amount, 15_000);

        let req: UpdateProfileRequest =
            serde_json::from_str(r#"{"settings":{"twoFactorAuth":true}}"#).unwrap();
        let settings = req.settings.unwrap();
        assert_eq!(settings.two_factor_auth, Some(true));
        assert!(settings.notifications.is_none());
    }
}
