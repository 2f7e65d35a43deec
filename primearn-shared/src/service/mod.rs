/// Account service
///
/// Orchestrates every account operation: load the record from the
/// [`AccountStore`], apply a lifecycle transition, persist the full record.
/// Credential hashing and session tokens are delegated to [`crate::auth`].
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use chrono::Duration;
/// use primearn_shared::auth::{jwt::TokenSettings, password::HashingParams};
/// use primearn_shared::rules::RulesConfig;
/// use primearn_shared::service::{requests::RegisterRequest, AccountService};
/// use primearn_shared::store::memory::MemoryAccountStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let service = AccountService::new(
///     Arc::new(MemoryAccountStore::new()),
///     RulesConfig::default(),
///     HashingParams::default(),
///     TokenSettings::new("a-secret-of-at-least-32-characters!!", Duration::days(30)),
/// );
///
/// let session = service
///     .register(RegisterRequest {
///         name: "Ada".into(),
///         email: "ada@example.com".into(),
///         phone: "0803".into(),
///         password: "secret1".into(),
///         referral_code: "EARN800".into(),
///     })
///     .await?;
/// assert_eq!(session.account.balance, 800);
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::auth::jwt::{self, Claims, JwtError, TokenSettings};
use crate::auth::password::{self, HashingParams};
use crate::models::account::Account;
use crate::rules::config::RulesConfig;
use crate::rules::error::{RuleError, RuleResult};
use crate::rules::lifecycle::{
    Dashboard, NewAccount, TaskOutcome, UpgradeOutcome, WithdrawalOutcome,
};
use crate::store::AccountStore;

pub mod requests;

use requests::{
    normalize_email, ChangePasswordRequest, CompleteTaskRequest, LoginRequest, RegisterRequest,
    UpdateProfileRequest, UpgradeRequest, WithdrawRequest,
};

/// An authenticated session: the account plus a freshly issued token
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub account: Account,
}

/// Account operations over an injected store
///
/// Cheap to clone; all state is behind `Arc`s.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    rules: Arc<RulesConfig>,
    hashing: HashingParams,
    tokens: Arc<TokenSettings>,
}

impl AccountService {
    pub fn new(
        store: Arc<dyn AccountStore>,
        rules: RulesConfig,
        hashing: HashingParams,
        tokens: TokenSettings,
    ) -> Self {
        Self {
            store,
            rules: Arc::new(rules),
            hashing,
            tokens: Arc::new(tokens),
        }
    }

    /// Backing store
    pub fn store(&self) -> &Arc<dyn AccountStore> {
        &self.store
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// Verifies a bearer token
    pub fn verify_token(&self, token: &str) -> Result<Claims, JwtError> {
        jwt::validate_token(token, &self.tokens.secret)
    }

    fn issue_token(&self, account: &Account) -> RuleResult<String> {
        let claims = Claims::new(
            account.id,
            &account.email,
            account.is_premium(),
            self.tokens.ttl,
        );
        Ok(jwt::create_token(&claims, &self.tokens.secret)?)
    }

    async fn load(&self, account_id: Uuid) -> RuleResult<Account> {
        self.store
            .find_by_id(account_id)
            .await?
            .ok_or_else(RuleError::account_not_found)
    }

    /// Creates an account and signs the user in
    pub async fn register(&self, req: RegisterRequest) -> RuleResult<Session> {
        let req = req.normalized();
        req.validate()?;

        if self.store.find_by_email(&req.email).await?.is_some() {
            return Err(RuleError::Conflict(
                "Email already registered. Please login instead.".to_string(),
            ));
        }

        if !self.rules.is_valid_referral_code(&req.referral_code) {
            return Err(RuleError::invalid_field(
                "referralCode",
                "Invalid referral code. Please enter a valid code.",
            ));
        }

        let password_hash = password::hash_password(&req.password, &self.hashing)?;

        let account = Account::register(
            NewAccount {
                name: req.name,
                email: req.email,
                phone: req.phone,
                password_hash,
                referral_code: req.referral_code,
            },
            &self.rules,
            Utc::now(),
        );

        // The unique index still guards against a concurrent registration
        self.store.insert(&account).await?;
        let token = self.issue_token(&account)?;

        info!(
            account_id = %account.id,
            referral_code = %account.referral_code,
            "Account registered"
        );

        Ok(Session { token, account })
    }

    /// Checks credentials and signs the user in
    pub async fn login(&self, req: LoginRequest) -> RuleResult<Session> {
        let invalid = || RuleError::Auth("Invalid email or password".to_string());

        let email = normalize_email(&req.email);
        let mut account = self.store.find_by_email(&email).await?.ok_or_else(invalid)?;

        if !password::verify_password(&req.password, &account.password_hash)? {
            debug!(account_id = %account.id, "Password mismatch");
            return Err(invalid());
        }

        if let Err(err) = account.record_login(Utc::now()) {
            warn!(account_id = %account.id, "Login attempt on deactivated account");
            return Err(err);
        }
        self.store.save(&account).await?;

        let token = self.issue_token(&account)?;
        info!(account_id = %account.id, "Login successful");

        Ok(Session { token, account })
    }

    /// Loads the account for profile display
    pub async fn profile(&self, account_id: Uuid) -> RuleResult<Account> {
        self.load(account_id).await
    }

    /// Credits a task to the account
    pub async fn complete_task(
        &self,
        account_id: Uuid,
        req: CompleteTaskRequest,
    ) -> RuleResult<TaskOutcome> {
        let mut account = self.load(account_id).await?;
        let outcome = account.complete_task(&req.task_id, &req.task_title, req.reward, Utc::now())?;
        self.store.save(&account).await?;

        info!(
            account_id = %account_id,
            task_id = %req.task_id,
            reward = outcome.reward,
            balance = outcome.balance,
            "Task completed"
        );
        if outcome.leveled_up {
            info!(account_id = %account_id, level = outcome.level, "Level up");
        }

        Ok(outcome)
    }

    /// Upgrades the account to premium
    pub async fn upgrade(&self, account_id: Uuid, req: UpgradeRequest) -> RuleResult<UpgradeOutcome> {
        // Checked before the lookup so a missing proof never reports a missing account
        let proof = req
            .transaction_proof
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| {
                RuleError::invalid_field("transactionProof", "Transaction proof is required")
            })?;

        let mut account = self.load(account_id).await?;
        let outcome = account.upgrade_to_premium(&proof, &self.rules, Utc::now())?;
        self.store.save(&account).await?;

        info!(
            account_id = %account_id,
            expires = %outcome.premium_expires,
            "Premium upgrade"
        );

        Ok(outcome)
    }

    /// Requests a withdrawal
    pub async fn withdraw(
        &self,
        account_id: Uuid,
        req: WithdrawRequest,
    ) -> RuleResult<WithdrawalOutcome> {
        let mut account = self.load(account_id).await?;
        let outcome = account.withdraw(
            &req.bank_name,
            &req.account_number,
            req.amount,
            &self.rules,
            Utc::now(),
        )?;
        self.store.save(&account).await?;

        info!(
            account_id = %account_id,
            amount = req.amount,
            reference = %outcome.reference,
            "Withdrawal requested"
        );

        Ok(outcome)
    }

    /// Applies a partial profile update
    pub async fn update_profile(
        &self,
        account_id: Uuid,
        req: UpdateProfileRequest,
    ) -> RuleResult<Account> {
        let mut account = self.load(account_id).await?;
        account.update_profile(req.into(), Utc::now());
        self.store.save(&account).await?;

        debug!(account_id = %account_id, "Profile updated");
        Ok(account)
    }

    /// Replaces the password after checking the current one
    pub async fn change_password(
        &self,
        account_id: Uuid,
        req: ChangePasswordRequest,
    ) -> RuleResult<()> {
        let mut account = self.load(account_id).await?;

        if !password::verify_password(&req.current_password, &account.password_hash)? {
            return Err(RuleError::Auth("Current password is incorrect".to_string()));
        }
        req.validate()?;

        let password_hash = password::hash_password(&req.new_password, &self.hashing)?;
        account.set_password_hash(password_hash, Utc::now());
        self.store.save(&account).await?;

        info!(account_id = %account_id, "Password changed");
        Ok(())
    }

    /// Records a community group join
    pub async fn track_whatsapp_join(&self, account_id: Uuid) -> RuleResult<()> {
        let mut account = self.load(account_id).await?;
        account.track_whatsapp_join(Utc::now());
        self.store.save(&account).await?;

        debug!(account_id = %account_id, joins = account.group_joins, "WhatsApp join tracked");
        Ok(())
    }

    /// Builds the dashboard projection
    pub async fn dashboard(&self, account_id: Uuid) -> RuleResult<Dashboard> {
        Ok(self.load(account_id).await?.dashboard())
    }
}
