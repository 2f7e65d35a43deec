/// Account lifecycle rules
///
/// Named state transitions on the [`Account`] aggregate. Each transition
/// validates its preconditions, mutates the record in place and refreshes
/// `updated_at`. A failed precondition leaves the account untouched.
///
/// Transitions take the current time as an argument so they can be tested
/// with a fixed clock; persistence is the caller's job (see
/// [`crate::service::AccountService`]).
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use primearn_shared::rules::{config::RulesConfig, lifecycle::NewAccount};
/// use primearn_shared::models::account::Account;
///
/// let rules = RulesConfig::default();
/// let now = Utc::now();
/// let mut account = Account::register(
///     NewAccount {
///         name: "Ada".to_string(),
///         email: "ada@example.com".to_string(),
///         phone: "08030000000".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///         referral_code: "EARN800".to_string(),
///     },
///     &rules,
///     now,
/// );
///
/// let outcome = account.complete_task("t-1", "Watch video", 100, now).unwrap();
/// assert_eq!(outcome.balance, 900);
/// ```

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::config::RulesConfig;
use super::error::{RuleError, RuleResult};
use super::progression::{
    accrue_xp, compute_progress_percent, compute_reward, compute_success_rate,
    level_up_threshold,
};
use crate::models::account::{
    Account, CompletedTask, Membership, Settings, SettingsPatch, Transaction, TransactionKind,
    TransactionStatus,
};

/// Number of ledger entries shown on the dashboard
pub const RECENT_TRANSACTIONS: usize = 10;

/// Validated registration data
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,

    /// Already lowercased and trimmed
    pub email: String,

    pub phone: String,

    /// Argon2id hash of the chosen password
    pub password_hash: String,

    /// Submitted referral code (will be uppercased)
    pub referral_code: String,
}

/// Result of a task completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskOutcome {
    pub reward: i64,
    pub balance: i64,
    pub level: u32,
    pub xp: u64,
    #[serde(skip)]
    pub leveled_up: bool,
}

/// Result of a premium upgrade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeOutcome {
    pub premium_expires: DateTime<Utc>,
    pub bonus: i64,
    pub balance: i64,
}

/// Result of a withdrawal request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WithdrawalOutcome {
    pub balance: i64,
    pub reference: String,
}

/// Partial profile update
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub settings: Option<SettingsPatch>,
}

/// Dashboard projection
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub user: DashboardUser,
    pub stats: DashboardStats,
    pub recent_transactions: Vec<Transaction>,
}

/// Account summary shown on the dashboard
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardUser {
    pub name: String,
    pub email: String,
    pub balance: i64,
    pub total_earned: i64,
    pub is_premium: bool,
    pub level: u32,
    pub streak: u32,
    pub tasks_completed: u32,
    pub referral_count: usize,
}

/// Derived progression statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub success_rate: u32,
    pub xp: u64,
    pub xp_needed: u64,
    pub progress_percent: u32,
}

fn reference(prefix: &str, now: DateTime<Utc>) -> String {
    format!("{}_{}", prefix, now.timestamp_millis())
}

impl Account {
    /// Creates a fresh account pre-seeded with the welcome bonus
    pub fn register(new: NewAccount, rules: &RulesConfig, now: DateTime<Utc>) -> Self {
        let welcome = Transaction {
            kind: TransactionKind::Bonus,
            amount: rules.welcome_bonus,
            description: "Welcome bonus".to_string(),
            date: now,
            status: TransactionStatus::Completed,
            reference: reference("WELCOME", now),
        };

        Self {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            phone: new.phone,
            password_hash: new.password_hash,
            last_password_change: now,
            referral_code: new.referral_code.trim().to_uppercase(),
            referred_by: None,
            referrals: Vec::new(),
            referral_count: 0,
            balance: rules.welcome_bonus,
            total_earned: rules.welcome_bonus,
            total_withdrawn: 0,
            transactions: vec![welcome],
            level: 1,
            xp: 0,
            streak: 1,
            tasks_completed: 0,
            completed_tasks: Vec::new(),
            membership: Membership::Standard,
            is_active: true,
            is_verified: false,
            settings: Settings::default(),
            whatsapp_group_joined: false,
            group_joins: 0,
            last_group_join: None,
            last_login: now,
            created_at: now,
            updated_at: now,
        }
    }

    /// Fails for deactivated accounts
    pub fn ensure_active(&self) -> RuleResult<()> {
        if !self.is_active {
            return Err(RuleError::Forbidden(
                "Account is deactivated. Contact support.".to_string(),
            ));
        }
        Ok(())
    }

    /// Records a successful login
    pub fn record_login(&mut self, now: DateTime<Utc>) -> RuleResult<()> {
        self.ensure_active()?;
        self.last_login = now;
        self.touch(now);
        Ok(())
    }

    /// Credits a task, at most once per `task_id`
    pub fn complete_task(
        &mut self,
        task_id: &str,
        title: &str,
        base_reward: i64,
        now: DateTime<Utc>,
    ) -> RuleResult<TaskOutcome> {
        if task_id.trim().is_empty() {
            return Err(RuleError::invalid_field("taskId", "Task ID is required"));
        }
        if base_reward < 0 {
            return Err(RuleError::invalid_field("reward", "Reward must not be negative"));
        }
        if self.has_completed(task_id) {
            return Err(RuleError::Conflict("Task already completed".to_string()));
        }

        let too_large = || RuleError::invalid_field("reward", "Reward is too large");
        let reward = compute_reward(base_reward, self.is_premium()).ok_or_else(too_large)?;
        let balance = self.balance.checked_add(reward).ok_or_else(too_large)?;
        let total_earned = self.total_earned.checked_add(reward).ok_or_else(too_large)?;
        let progress = accrue_xp(self.xp, self.level, reward);

        self.balance = balance;
        self.total_earned = total_earned;
        self.tasks_completed += 1;
        self.xp = progress.xp;
        self.level = progress.level;

        self.completed_tasks.push(CompletedTask {
            task_id: task_id.to_string(),
            title: title.to_string(),
            reward,
            completed_at: now,
        });
        self.transactions.push(Transaction {
            kind: TransactionKind::Task,
            amount: reward,
            description: format!("Completed task: {}", title),
            date: now,
            status: TransactionStatus::Completed,
            reference: reference("TASK", now),
        });
        self.touch(now);

        Ok(TaskOutcome {
            reward,
            balance: self.balance,
            level: self.level,
            xp: self.xp,
            leveled_up: progress.leveled_up,
        })
    }

    /// Moves the account onto the premium tier
    ///
    /// The ledger records the fee paid while the balance receives the
    /// premium bonus; the two amounts differ.
    pub fn upgrade_to_premium(
        &mut self,
        payment_proof: &str,
        rules: &RulesConfig,
        now: DateTime<Utc>,
    ) -> RuleResult<UpgradeOutcome> {
        if payment_proof.trim().is_empty() {
            return Err(RuleError::invalid_field(
                "transactionProof",
                "Transaction proof is required",
            ));
        }
        if self.is_premium() {
            return Err(RuleError::Conflict("User is already premium".to_string()));
        }

        let expires = now + Duration::days(rules.premium_period_days);
        self.membership = Membership::Premium {
            since: now,
            expires,
            payment_proof: payment_proof.to_string(),
        };

        self.balance += rules.premium_bonus;
        self.total_earned += rules.premium_bonus;

        self.transactions.push(Transaction {
            kind: TransactionKind::PremiumPayment,
            amount: rules.premium_fee,
            description: "Premium membership upgrade".to_string(),
            date: now,
            status: TransactionStatus::Completed,
            reference: reference("PREMIUM", now),
        });
        self.touch(now);

        Ok(UpgradeOutcome {
            premium_expires: expires,
            bonus: rules.premium_bonus,
            balance: self.balance,
        })
    }

    /// Debits a withdrawal and records it as pending settlement
    pub fn withdraw(
        &mut self,
        bank_name: &str,
        account_number: &str,
        amount: i64,
        rules: &RulesConfig,
        now: DateTime<Utc>,
    ) -> RuleResult<WithdrawalOutcome> {
        if !self.is_premium() {
            return Err(RuleError::Forbidden(
                "Upgrade to premium to unlock withdrawals".to_string(),
            ));
        }
        if amount < rules.min_withdrawal {
            return Err(RuleError::invalid_field(
                "amount",
                format!("Minimum withdrawal amount is ₦{}", format_naira(rules.min_withdrawal)),
            ));
        }
        if bank_name.trim().is_empty() {
            return Err(RuleError::invalid_field("bankName", "Bank name is required"));
        }
        if account_number.trim().is_empty() {
            return Err(RuleError::invalid_field(
                "accountNumber",
                "Account number is required",
            ));
        }
        if self.balance < amount {
            return Err(RuleError::InsufficientFunds("Insufficient balance".to_string()));
        }

        let reference = reference("WITHDRAW", now);

        self.balance -= amount;
        self.total_withdrawn += amount;

        self.transactions.push(Transaction {
            kind: TransactionKind::Withdrawal,
            amount: -amount,
            description: format!("Withdrawal to {} ({})", bank_name, account_number),
            date: now,
            status: TransactionStatus::Pending,
            reference: reference.clone(),
        });
        self.touch(now);

        Ok(WithdrawalOutcome {
            balance: self.balance,
            reference,
        })
    }

    /// Applies a partial profile update; blank strings are ignored
    pub fn update_profile(&mut self, update: ProfileUpdate, now: DateTime<Utc>) {
        if let Some(name) = update.name.filter(|n| !n.trim().is_empty()) {
            self.name = name.trim().to_string();
        }
        if let Some(phone) = update.phone.filter(|p| !p.trim().is_empty()) {
            self.phone = phone.trim().to_string();
        }
        if let Some(patch) = update.settings {
            self.settings.merge(patch);
        }
        self.touch(now);
    }

    /// Replaces the stored credential
    pub fn set_password_hash(&mut self, password_hash: String, now: DateTime<Utc>) {
        self.password_hash = password_hash;
        self.last_password_change = now;
        self.touch(now);
    }

    /// Records a community group join; every call counts
    pub fn track_whatsapp_join(&mut self, now: DateTime<Utc>) {
        self.whatsapp_group_joined = true;
        self.group_joins += 1;
        self.last_group_join = Some(now);
        self.touch(now);
    }

    /// Read-only dashboard projection
    pub fn dashboard(&self) -> Dashboard {
        let xp_needed = level_up_threshold(self.level);

        let mut recent = self.transactions.clone();
        recent.sort_by(|a, b| b.date.cmp(&a.date));
        recent.truncate(RECENT_TRANSACTIONS);

        Dashboard {
            user: DashboardUser {
                name: self.name.clone(),
                email: self.email.clone(),
                balance: self.balance,
                total_earned: self.total_earned,
                is_premium: self.is_premium(),
                level: self.level,
                streak: self.streak,
                tasks_completed: self.tasks_completed,
                referral_count: self.referrals.len(),
            },
            stats: DashboardStats {
                success_rate: compute_success_rate(self.tasks_completed),
                xp: self.xp,
                xp_needed,
                progress_percent: compute_progress_percent(self.xp, xp_needed),
            },
            recent_transactions: recent,
        }
    }
}

/// Formats an amount with thousands separators (10000 -> "10,000")
fn format_naira(amount: i64) -> String {
    let digits = amount.abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if amount < 0 {
        out.insert(0, '-');
    }
    out
}
