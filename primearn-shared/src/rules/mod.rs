/// Business rules
///
/// # Modules
///
/// - [`progression`]: Reward scaling, XP accrual and level-ups, dashboard statistics
/// - [`lifecycle`]: Named state transitions on the account aggregate
/// - [`config`]: Injected rule parameters (bonuses, minimums, referral allow-list)
/// - [`error`]: Error taxonomy shared by every account operation

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod progression;

pub use config::RulesConfig;
pub use error::{FieldError, RuleError, RuleResult};
