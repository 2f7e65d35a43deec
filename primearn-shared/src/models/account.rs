/// Account model
///
/// The `Account` is the single aggregate root of the platform. Everything a
/// user owns (ledger, progression, membership tier, settings, community
/// stats) lives inside one record that is loaded, mutated and saved as a
/// whole. The record is serialized as a JSON document (camelCase keys) both
/// for storage and for the parts of it that are returned to clients.
///
/// # Document shape
///
/// ```json
/// {
///   "id": "uuid",
///   "name": "Ada Obi",
///   "email": "ada@example.com",
///   "balance": 800,
///   "totalEarned": 800,
///   "membership": { "tier": "standard" },
///   "transactions": [ { "type": "bonus", "amount": 800, "status": "completed", ... } ],
///   ...
/// }
/// ```
///
/// State transitions live in [`crate::rules::lifecycle`]; this module only
/// defines the data and a few read helpers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Reward for a completed task
    Task,

    /// Promotional credit (welcome bonus)
    Bonus,

    /// Payout request to a bank account
    Withdrawal,

    /// Premium membership fee
    PremiumPayment,

    /// Referral reward
    Referral,
}

/// Settlement status of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Awaiting external settlement
    Pending,

    /// Settled
    Completed,

    /// Rejected during settlement
    Failed,
}

/// Immutable ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Entry kind
    #[serde(rename = "type")]
    pub kind: TransactionKind,

    /// Signed amount (withdrawals are negative)
    pub amount: i64,

    /// Human-readable description
    pub description: String,

    /// When the entry was recorded
    pub date: DateTime<Utc>,

    /// Settlement status
    pub status: TransactionStatus,

    /// Reference string (e.g. `TASK_1702200000000`)
    pub reference: String,
}

/// Record of a task the account has completed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedTask {
    /// Task identifier, unique per account
    pub task_id: String,

    /// Task title at completion time
    pub title: String,

    /// Reward actually credited (after premium scaling)
    pub reward: i64,

    /// Completion time
    pub completed_at: DateTime<Utc>,
}

/// Someone this account referred
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralRecord {
    pub referred_user_id: Uuid,
    pub name: String,
    pub email: String,
    pub date: DateTime<Utc>,
}

/// User-facing preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Receive notifications (default on)
    pub notifications: bool,

    /// Start the next task automatically
    pub auto_start_tasks: bool,

    /// Two-factor authentication enabled
    pub two_factor_auth: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notifications: true,
            auto_start_tasks: false,
            two_factor_auth: false,
        }
    }
}

/// Partial settings update
///
/// Only `Some` fields are applied; the rest keep their previous value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub notifications: Option<bool>,
    pub auto_start_tasks: Option<bool>,
    pub two_factor_auth: Option<bool>,
}

impl Settings {
    /// Applies a patch field by field
    pub fn merge(&mut self, patch: SettingsPatch) {
        if let Some(notifications) = patch.notifications {
            self.notifications = notifications;
        }
        if let Some(auto_start_tasks) = patch.auto_start_tasks {
            self.auto_start_tasks = auto_start_tasks;
        }
        if let Some(two_factor_auth) = patch.two_factor_auth {
            self.two_factor_auth = two_factor_auth;
        }
    }
}

/// Membership tier
///
/// Premium unlocks withdrawals and the reward multiplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tier", rename_all = "snake_case")]
pub enum Membership {
    /// Free tier
    Standard,

    /// Paid tier
    Premium {
        /// When the upgrade happened
        since: DateTime<Utc>,

        /// End of the paid period
        expires: DateTime<Utc>,

        /// Reference to the payment evidence submitted by the user
        #[serde(rename = "paymentProof")]
        payment_proof: String,
    },
}

impl Membership {
    /// Whether this is the premium tier
    pub fn is_premium(&self) -> bool {
        matches!(self, Membership::Premium { .. })
    }

    pub fn since(&self) -> Option<DateTime<Utc>> {
        match self {
            Membership::Premium { since, .. } => Some(*since),
            Membership::Standard => None,
        }
    }

    pub fn expires(&self) -> Option<DateTime<Utc>> {
        match self {
            Membership::Premium { expires, .. } => Some(*expires),
            Membership::Standard => None,
        }
    }

    pub fn payment_proof(&self) -> Option<&str> {
        match self {
            Membership::Premium { payment_proof, .. } => Some(payment_proof),
            Membership::Standard => None,
        }
    }
}

/// Account aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique account ID (UUID v4)
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Lowercase, trimmed email address (globally unique)
    pub email: String,

    /// Phone number
    pub phone: String,

    /// Argon2id password hash, never plaintext
    pub password_hash: String,

    /// Last time the password was set
    pub last_password_change: DateTime<Utc>,

    /// Referral code submitted at registration, uppercased
    pub referral_code: String,

    /// Code of the referring account, if known
    pub referred_by: Option<String>,

    /// Accounts referred by this one
    pub referrals: Vec<ReferralRecord>,

    pub referral_count: u32,

    /// Spendable balance
    pub balance: i64,

    /// Lifetime credits (never decreases)
    pub total_earned: i64,

    /// Lifetime withdrawals (never decreases)
    pub total_withdrawn: i64,

    /// Ledger, in insertion order
    pub transactions: Vec<Transaction>,

    /// Current level (starts at 1)
    pub level: u32,

    /// Experience within the current level
    pub xp: u64,

    pub streak: u32,

    pub tasks_completed: u32,

    pub completed_tasks: Vec<CompletedTask>,

    /// Standard or premium tier
    pub membership: Membership,

    /// Deactivated accounts cannot log in
    pub is_active: bool,

    pub is_verified: bool,

    pub settings: Settings,

    pub whatsapp_group_joined: bool,

    pub group_joins: u32,

    pub last_group_join: Option<DateTime<Utc>>,

    pub last_login: DateTime<Utc>,

    pub created_at: DateTime<Utc>,

    /// Refreshed on every mutation
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Whether the account is on the premium tier
    pub fn is_premium(&self) -> bool {
        self.membership.is_premium()
    }

    /// Whether a task with this ID has already been credited
    pub fn has_completed(&self, task_id: &str) -> bool {
        self.completed_tasks.iter().any(|task| task.task_id == task_id)
    }

    /// Marks the record as modified
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// Profile projection returned to clients
///
/// Excludes the password hash, the ledger and the completed-task list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub referral_code: String,
    pub referred_by: Option<String>,
    pub referrals: Vec<ReferralRecord>,
    pub referral_count: u32,
    pub balance: i64,
    pub total_earned: i64,
    pub total_withdrawn: i64,
    pub is_premium: bool,
    pub premium_since: Option<DateTime<Utc>>,
    pub premium_expires: Option<DateTime<Utc>>,
    pub premium_payment_proof: Option<String>,
    pub level: u32,
    pub xp: u64,
    pub streak: u32,
    pub last_login: DateTime<Utc>,
    pub tasks_completed: u32,
    pub is_active: bool,
    pub is_verified: bool,
    pub last_password_change: DateTime<Utc>,
    pub settings: Settings,
    pub whatsapp_group_joined: bool,
    pub last_group_join: Option<DateTime<Utc>>,
    pub group_joins: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Account> for ProfileView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
            phone: account.phone.clone(),
            referral_code: account.referral_code.clone(),
            referred_by: account.referred_by.clone(),
            referrals: account.referrals.clone(),
            referral_count: account.referral_count,
            balance: account.balance,
            total_earned: account.total_earned,
            total_withdrawn: account.total_withdrawn,
            is_premium: account.is_premium(),
            premium_since: account.membership.since(),
            premium_expires: account.membership.expires(),
            premium_payment_proof: account.membership.payment_proof().map(str::to_string),
            level: account.level,
            xp: account.xp,
            streak: account.streak,
            last_login: account.last_login,
            tasks_completed: account.tasks_completed,
            is_active: account.is_active,
            is_verified: account.is_verified,
            last_password_change: account.last_password_change,
            settings: account.settings,
            whatsapp_group_joined: account.whatsapp_group_joined,
            last_group_join: account.last_group_join,
            group_joins: account.group_joins,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}
