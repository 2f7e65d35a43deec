/// Progression engine
///
/// Pure functions computing task rewards, XP accrual and the dashboard
/// statistics. Nothing here touches storage or the clock.
///
/// # Level-up rule
///
/// Each task completion grants `floor(reward / 10)` XP. When the new XP
/// reaches `level * 100` the account gains exactly one level and XP resets
/// to zero; the overflow is discarded.
///
/// # Example
///
/// ```
/// use primearn_shared::rules::progression::{accrue_xp, compute_reward};
///
/// let reward = compute_reward(100, true);
/// assert_eq!(reward, Some(150));
///
/// let progress = accrue_xp(95, 1, 100);
/// assert_eq!((progress.level, progress.xp), (2, 0));
/// ```

/// Success rate never reported above this percentage
pub const MAX_SUCCESS_RATE: u32 = 95;

/// Result of applying one reward to an account's progression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpProgress {
    /// XP after the update
    pub xp: u64,

    /// Level after the update
    pub level: u32,

    /// Whether this update crossed the level threshold
    pub leveled_up: bool,
}

/// Reward actually credited for a task
///
/// Premium accounts receive `floor(base_reward * 1.5)`. `None` when the
/// scaled reward does not fit in an `i64`.
pub fn compute_reward(base_reward: i64, is_premium: bool) -> Option<i64> {
    if is_premium {
        // Exact floor of base * 1.5 for non-negative rewards
        base_reward.checked_mul(3).map(|scaled| scaled / 2)
    } else {
        Some(base_reward)
    }
}

/// XP required to leave `level`
pub fn level_up_threshold(level: u32) -> u64 {
    u64::from(level) * 100
}

/// Applies the XP earned from one reward
///
/// Evaluates at most one level-up per call.
pub fn accrue_xp(current_xp: u64, current_level: u32, reward: i64) -> XpProgress {
    let xp_gain = u64::try_from(reward / 10).unwrap_or(0);
    let new_xp = current_xp.saturating_add(xp_gain);

    if new_xp >= level_up_threshold(current_level) {
        XpProgress {
            xp: 0,
            level: current_level + 1,
            leveled_up: true,
        }
    } else {
        XpProgress {
            xp: new_xp,
            level: current_level,
            leveled_up: false,
        }
    }
}

/// Display-only success rate, asymptotic towards [`MAX_SUCCESS_RATE`]
pub fn compute_success_rate(tasks_completed: u32) -> u32 {
    if tasks_completed == 0 {
        return 0;
    }

    let completed = u64::from(tasks_completed);
    let rate = completed * 100 / (completed + 5);
    rate.min(u64::from(MAX_SUCCESS_RATE)) as u32
}

/// Percentage of the current level completed, capped at 100
pub fn compute_progress_percent(xp: u64, xp_needed: u64) -> u32 {
    if xp_needed == 0 {
        return 100;
    }

    (xp.saturating_mul(100) / xp_needed).min(100) as u32
}
