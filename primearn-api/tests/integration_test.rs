/// Integration tests for the PrimeEarn API
///
/// These tests drive the full router (auth, error envelope, security
/// headers) over the in-memory account store:
/// - Registration and login
/// - Task rewards and level progression
/// - Premium upgrade and withdrawals
/// - Profile, password and dashboard endpoints
/// - Error handling (404 fallback, token failures, internal errors, panics)

mod common;

use axum::http::StatusCode;
use common::{broken_app, send, token_for, Breakage, TestContext, PASSWORD};
use primearn_shared::store::AccountStore;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_health_check() {
    let ctx = TestContext::new();
    let response = ctx.send("GET", "/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "OK");
    assert_eq!(response.body["database"], "connected");
    assert!(response.body["uptime"].is_number());
    assert!(response.body["timestamp"].is_string());
    assert_eq!(response.headers.get("x-content-type-options").unwrap(), "nosniff");
}

#[tokio::test]
async fn test_health_check_degraded() {
    let app = broken_app(Breakage::Unavailable, false);
    let response = send(&app, "GET", "/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "DEGRADED");
    assert_eq!(response.body["database"], "disconnected");
}

#[tokio::test]
async fn test_unknown_endpoint() {
    let ctx = TestContext::new();

    for uri in ["/nope", "/api/users/nope", "/api/other"] {
        let response = ctx.send("GET", uri, None, None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(response.body["success"], false);
        assert_eq!(response.body["message"], "Endpoint not found");
        assert_eq!(response.headers.get("x-frame-options").unwrap(), "DENY");
    }
}

#[tokio::test]
async fn test_register_and_use_token() {
    let ctx = TestContext::new();

    let response = ctx
        .send(
            "POST",
            "/api/users/register",
            None,
            Some(common::registration("Ada@Example.com")),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["success"], true);
    assert_eq!(
        response.body["message"],
        "Registration successful! Welcome bonus ₦800 added."
    );
    assert_eq!(response.body["user"]["balance"], 800);
    assert_eq!(response.body["user"]["totalEarned"], 800);
    assert_eq!(response.body["user"]["level"], 1);
    assert_eq!(response.body["user"]["streak"], 1);
    assert_eq!(response.body["user"]["isPremium"], false);
    assert_eq!(response.body["user"]["email"], "ada@example.com");

    let token = response.body["token"].as_str().unwrap();
    let profile = ctx.send("GET", "/api/users/profile", Some(token), None).await;

    assert_eq!(profile.status, StatusCode::OK);
    let user = &profile.body["user"];
    assert_eq!(user["balance"], 800);
    assert_eq!(user["referralCode"], "EARN800");
    assert!(user.get("passwordHash").is_none());
    assert!(user.get("transactions").is_none());
    assert!(user.get("completedTasks").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let ctx = TestContext::new();
    ctx.register("ada@example.com").await;

    let response = ctx
        .send(
            "POST",
            "/api/users/register",
            None,
            Some(common::registration("ADA@example.com")),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["message"],
        "Email already registered. Please login instead."
    );
    assert_eq!(ctx.store.len().await, 1);
}

#[tokio::test]
async fn test_register_invalid_referral_code() {
    let ctx = TestContext::new();

    let mut body = common::registration("ada@example.com");
    body["referralCode"] = json!("FREEMONEY");

    let response = ctx.send("POST", "/api/users/register", None, Some(body)).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["message"],
        "Invalid referral code. Please enter a valid code."
    );
    assert_eq!(response.body["errors"][0]["field"], "referralCode");
    assert!(ctx.store.is_empty().await);
}

#[tokio::test]
async fn test_register_validation_errors() {
    let ctx = TestContext::new();

    let response = ctx
        .send(
            "POST",
            "/api/users/register",
            None,
            Some(json!({
                "name": "",
                "email": "not-an-email",
                "phone": "0803",
                "password": "123",
                "referralCode": "EARN800"
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);

    let fields: Vec<&str> = response.body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"password"));
}

#[tokio::test]
async fn test_malformed_body() {
    let ctx = TestContext::new();

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/users/login")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let response = tower::ServiceExt::oneshot(ctx.app.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_login() {
    let ctx = TestContext::new();
    let (_, id) = ctx.register("ada@example.com").await;

    let response = ctx
        .send(
            "POST",
            "/api/users/login",
            None,
            Some(json!({ "email": "ADA@example.com", "password": PASSWORD })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Login successful");
    assert_eq!(response.body["user"]["id"], id.to_string());
    assert_eq!(response.body["user"]["tasksCompleted"], 0);

    let token = response.body["token"].as_str().unwrap();
    let dashboard = ctx.send("GET", "/api/users/dashboard", Some(token), None).await;
    assert_eq!(dashboard.status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_failures_are_uniform() {
    let ctx = TestContext::new();
    ctx.register("ada@example.com").await;

    let wrong_password = ctx
        .send(
            "POST",
            "/api/users/login",
            None,
            Some(json!({ "email": "ada@example.com", "password": "nope-nope" })),
        )
        .await;
    let unknown_email = ctx
        .send(
            "POST",
            "/api/users/login",
            None,
            Some(json!({ "email": "bob@example.com", "password": PASSWORD })),
        )
        .await;

    for response in [wrong_password, unknown_email] {
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["message"], "Invalid email or password");
        assert!(response.body.get("token").is_none());
    }
}

#[tokio::test]
async fn test_login_deactivated_account() {
    let ctx = TestContext::new();
    let (_, id) = ctx.register("ada@example.com").await;

    let mut account = ctx.account(id).await;
    account.is_active = false;
    ctx.store.save(&account).await.unwrap();

    let response = ctx
        .send(
            "POST",
            "/api/users/login",
            None,
            Some(json!({ "email": "ada@example.com", "password": PASSWORD })),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["message"], "Account is deactivated. Contact support.");
}

#[tokio::test]
async fn test_token_required() {
    let ctx = TestContext::new();

    let response = ctx.send("GET", "/api/users/profile", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Access denied. No token provided.");

    let response = ctx
        .send("GET", "/api/users/dashboard", Some("not.a.token"), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Invalid token");
}

#[tokio::test]
async fn test_token_for_missing_account() {
    let ctx = TestContext::new();
    let token = token_for(Uuid::new_v4());

    let response = ctx.send("GET", "/api/users/profile", Some(&token), None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "User not found");
}

#[tokio::test]
async fn test_complete_task() {
    let ctx = TestContext::new();
    let (token, id) = ctx.register("ada@example.com").await;

    let task = json!({ "taskId": "t-1", "taskTitle": "Watch video", "reward": 100 });
    let response = ctx
        .send("POST", "/api/users/complete-task", Some(&token), Some(task.clone()))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["message"],
        "Task completed! ₦100 added to your balance."
    );
    assert_eq!(response.body["reward"], 100);
    assert_eq!(response.body["balance"], 900);
    assert_eq!(response.body["level"], 1);
    assert_eq!(response.body["xp"], 10);

    let duplicate = ctx
        .send("POST", "/api/users/complete-task", Some(&token), Some(task))
        .await;
    assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);
    assert_eq!(duplicate.body["message"], "Task already completed");

    let account = ctx.account(id).await;
    assert_eq!(account.balance, 900);
    assert_eq!(account.total_earned, 900);
    assert_eq!(account.tasks_completed, 1);
    assert_eq!(account.completed_tasks.len(), 1);
}

#[tokio::test]
async fn test_complete_task_level_up() {
    let ctx = TestContext::new();
    let (token, _) = ctx.register("ada@example.com").await;

    let response = ctx
        .send(
            "POST",
            "/api/users/complete-task",
            Some(&token),
            Some(json!({ "taskId": "big", "taskTitle": "Survey", "reward": 1050 })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["level"], 2);
    assert_eq!(response.body["xp"], 0);
}

#[tokio::test]
async fn test_complete_task_rejects_bad_input() {
    let ctx = TestContext::new();
    let (token, _) = ctx.register("ada@example.com").await;

    let response = ctx
        .send(
            "POST",
            "/api/users/complete-task",
            Some(&token),
            Some(json!({ "taskId": "  ", "reward": 100 })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = ctx
        .send(
            "POST",
            "/api/users/complete-task",
            Some(&token),
            Some(json!({ "taskId": "t-2", "reward": -5 })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upgrade_to_premium() {
    let ctx = TestContext::new();
    let (token, id) = ctx.register("ada@example.com").await;

    let missing = ctx
        .send("POST", "/api/users/upgrade", Some(&token), Some(json!({})))
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.body["message"], "Transaction proof is required");

    let response = ctx
        .send(
            "POST",
            "/api/users/upgrade",
            Some(&token),
            Some(json!({ "transactionProof": "receipt-001" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["bonus"], 1000);
    assert_eq!(response.body["balance"], 1800);
    assert!(response.body["premiumExpires"].is_string());

    let again = ctx
        .send(
            "POST",
            "/api/users/upgrade",
            Some(&token),
            Some(json!({ "transactionProof": "receipt-002" })),
        )
        .await;
    assert_eq!(again.status, StatusCode::BAD_REQUEST);
    assert_eq!(again.body["message"], "User is already premium");

    let account = ctx.account(id).await;
    assert!(account.is_premium());
    assert_eq!(account.membership.payment_proof(), Some("receipt-001"));
    let expires = account.membership.expires().unwrap();
    let since = account.membership.since().unwrap();
    assert_eq!((expires - since).num_days(), 30);

    // The ledger records the fee, the balance received the bonus
    let fee = account
        .transactions
        .iter()
        .find(|t| t.reference.starts_with("PREMIUM_"))
        .unwrap();
    assert_eq!(fee.amount, 5000);
}

#[tokio::test]
async fn test_premium_reward_multiplier() {
    let ctx = TestContext::new();
    let (token, _) = ctx.premium_account("rich@example.com").await;

    let response = ctx
        .send(
            "POST",
            "/api/users/complete-task",
            Some(&token),
            Some(json!({ "taskId": "t-1", "taskTitle": "Survey", "reward": 100 })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["reward"], 150);
    assert_eq!(response.body["balance"], 1950);
}

#[tokio::test]
async fn test_complete_task_reward_too_large() {
    let ctx = TestContext::new();
    let (premium_token, premium_id) = ctx.premium_account("rich@example.com").await;
    let (standard_token, standard_id) = ctx.register("ada@example.com").await;

    for token in [&premium_token, &standard_token] {
        let response = ctx
            .send(
                "POST",
                "/api/users/complete-task",
                Some(token),
                Some(json!({ "taskId": "t-1", "taskTitle": "Survey", "reward": i64::MAX })),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["success"], false);
    }

    let premium = ctx.account(premium_id).await;
    assert_eq!(premium.balance, 1800);
    assert_eq!(premium.total_earned, 1800);

    let standard = ctx.account(standard_id).await;
    assert_eq!(standard.balance, 800);
    assert_eq!(standard.tasks_completed, 0);
}

#[tokio::test]
async fn test_withdraw_requires_premium() {
    let ctx = TestContext::new();
    let (token, id) = ctx.register("ada@example.com").await;

    let response = ctx
        .send(
            "POST",
            "/api/users/withdraw",
            Some(&token),
            Some(json!({ "bankName": "GTBank", "accountNumber": "0123456789", "amount": 10000 })),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(
        response.body["message"],
        "Upgrade to premium to unlock withdrawals"
    );
    assert_eq!(ctx.account(id).await.balance, 800);
}

#[tokio::test]
async fn test_withdraw_limits() {
    let ctx = TestContext::new();
    let (token, _) = ctx.premium_account("rich@example.com").await;

    let below_minimum = ctx
        .send(
            "POST",
            "/api/users/withdraw",
            Some(&token),
            Some(json!({ "bankName": "GTBank", "accountNumber": "0123456789", "amount": 9999 })),
        )
        .await;
    assert_eq!(below_minimum.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        below_minimum.body["message"],
        "Minimum withdrawal amount is ₦10,000"
    );

    let insufficient = ctx
        .send(
            "POST",
            "/api/users/withdraw",
            Some(&token),
            Some(json!({ "bankName": "GTBank", "accountNumber": "0123456789", "amount": 10000 })),
        )
        .await;
    assert_eq!(insufficient.status, StatusCode::BAD_REQUEST);
    assert_eq!(insufficient.body["message"], "Insufficient balance");
}

#[tokio::test]
async fn test_withdraw_success() {
    let ctx = TestContext::new();
    let (token, id) = ctx.premium_account("rich@example.com").await;

    // 6000 base reward, 9000 after the premium multiplier
    let response = ctx
        .send(
            "POST",
            "/api/users/complete-task",
            Some(&token),
            Some(json!({ "taskId": "jackpot", "taskTitle": "Campaign", "reward": 6000 })),
        )
        .await;
    assert_eq!(response.body["balance"], 10800);

    let response = ctx
        .send(
            "POST",
            "/api/users/withdraw",
            Some(&token),
            Some(json!({ "bankName": "GTBank", "accountNumber": "0123456789", "amount": 10000 })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["balance"], 800);
    let reference = response.body["reference"].as_str().unwrap().to_string();
    assert!(reference.starts_with("WITHDRAW_"));

    let account = ctx.account(id).await;
    assert_eq!(account.total_withdrawn, 10000);

    let entry = account
        .transactions
        .iter()
        .find(|t| t.reference == reference)
        .unwrap();
    assert_eq!(entry.amount, -10000);
    assert_eq!(entry.description, "Withdrawal to GTBank (0123456789)");
    assert_eq!(
        serde_json::to_value(entry.status).unwrap(),
        json!("pending")
    );
}

#[tokio::test]
async fn test_update_profile() {
    let ctx = TestContext::new();
    let (token, _) = ctx.register("ada@example.com").await;

    let response = ctx
        .send(
            "PUT",
            "/api/users/profile",
            Some(&token),
            Some(json!({
                "name": "",
                "phone": "08031111111",
                "settings": { "twoFactorAuth": true }
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Profile updated successfully");
    assert_eq!(response.body["user"]["name"], "Ada Obi");
    assert_eq!(response.body["user"]["phone"], "08031111111");
    assert_eq!(
        response.body["user"]["settings"],
        json!({ "notifications": true, "autoStartTasks": false, "twoFactorAuth": true })
    );
}

#[tokio::test]
async fn test_change_password() {
    let ctx = TestContext::new();
    let (token, id) = ctx.register("ada@example.com").await;
    let original_hash = ctx.account(id).await.password_hash;

    let wrong = ctx
        .send(
            "POST",
            "/api/users/change-password",
            Some(&token),
            Some(json!({ "currentPassword": "guess", "newPassword": "another1" })),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong.body["message"], "Current password is incorrect");
    assert_eq!(ctx.account(id).await.password_hash, original_hash);

    let response = ctx
        .send(
            "POST",
            "/api/users/change-password",
            Some(&token),
            Some(json!({ "currentPassword": PASSWORD, "newPassword": "another1" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Password changed successfully");

    let old = ctx
        .send(
            "POST",
            "/api/users/login",
            None,
            Some(json!({ "email": "ada@example.com", "password": PASSWORD })),
        )
        .await;
    assert_eq!(old.status, StatusCode::BAD_REQUEST);

    let new = ctx
        .send(
            "POST",
            "/api/users/login",
            None,
            Some(json!({ "email": "ada@example.com", "password": "another1" })),
        )
        .await;
    assert_eq!(new.status, StatusCode::OK);
}

#[tokio::test]
async fn test_track_whatsapp_join() {
    let ctx = TestContext::new();
    let (token, id) = ctx.register("ada@example.com").await;

    for _ in 0..2 {
        let response = ctx
            .send("POST", "/api/users/track-whatsapp-join", Some(&token), None)
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["message"], "WhatsApp join tracked successfully");
    }

    let account = ctx.account(id).await;
    assert!(account.whatsapp_group_joined);
    assert_eq!(account.group_joins, 2);
    assert!(account.last_group_join.is_some());
}

#[tokio::test]
async fn test_dashboard() {
    let ctx = TestContext::new();
    let (token, _) = ctx.register("ada@example.com").await;

    ctx.send(
        "POST",
        "/api/users/complete-task",
        Some(&token),
        Some(json!({ "taskId": "t-1", "taskTitle": "Watch video", "reward": 100 })),
    )
    .await;

    let response = ctx.send("GET", "/api/users/dashboard", Some(&token), None).await;
    assert_eq!(response.status, StatusCode::OK);

    let dashboard = &response.body["dashboard"];
    assert_eq!(dashboard["user"]["balance"], 900);
    assert_eq!(dashboard["user"]["tasksCompleted"], 1);
    assert_eq!(dashboard["user"]["referralCount"], 0);
    assert_eq!(dashboard["stats"]["successRate"], 16);
    assert_eq!(dashboard["stats"]["xp"], 10);
    assert_eq!(dashboard["stats"]["xpNeeded"], 100);
    assert_eq!(dashboard["stats"]["progressPercent"], 10);

    let transactions = dashboard["recentTransactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 2);
    assert!(transactions.iter().any(|t| t["type"] == "task"));
    assert!(transactions.iter().any(|t| t["type"] == "bonus"));
}

#[tokio::test]
async fn test_dashboard_limits_recent_transactions() {
    let ctx = TestContext::new();
    let (token, _) = ctx.register("ada@example.com").await;

    for i in 0..12 {
        let response = ctx
            .send(
                "POST",
                "/api/users/complete-task",
                Some(&token),
                Some(json!({ "taskId": format!("t-{}", i), "taskTitle": "Task", "reward": 1 })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let response = ctx.send("GET", "/api/users/dashboard", Some(&token), None).await;
    let transactions = response.body["dashboard"]["recentTransactions"]
        .as_array()
        .unwrap();
    assert_eq!(transactions.len(), 10);
}

#[tokio::test]
async fn test_internal_error_hides_detail() {
    let app = broken_app(Breakage::Unavailable, false);
    let token = token_for(Uuid::new_v4());

    let response = send(&app, "GET", "/api/users/profile", Some(&token), None).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["message"], "Something went wrong!");
    assert!(response.body.get("error").is_none());
}

#[tokio::test]
async fn test_internal_error_detail_in_debug_mode() {
    let app = broken_app(Breakage::Unavailable, true);
    let token = token_for(Uuid::new_v4());

    let response = send(&app, "GET", "/api/users/profile", Some(&token), None).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["message"], "Something went wrong!");
    assert!(response.body["error"].is_string());
}

#[tokio::test]
async fn test_panic_becomes_error_envelope() {
    let app = broken_app(Breakage::Panics, true);
    let token = token_for(Uuid::new_v4());

    let response = send(&app, "GET", "/api/users/dashboard", Some(&token), None).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["message"], "Something went wrong!");
    assert_eq!(response.body["error"], "store exploded");
}
