//! Mock banking dashboard shown behind the PIN gate
//!
//! None of this touches the gate. It is the content unlocked by a correct PIN:
//! an animated balance, a navigation bar, quick actions and recent
//! transactions.

use std::time::{Duration, Instant};

/// Navigation bar entries
pub const NAV_ITEMS: [&str; 4] = ["Home", "Transfer", "Cards", "Profile"];

/// Quick action cards
pub const QUICK_ACTIONS: [&str; 4] = ["Send", "Receive", "Pay Bills", "Top Up"];

/// Balance the counter animates up to
pub const BALANCE_TARGET: u64 = 4_000_000;

/// Number of increments in the balance animation
pub const BALANCE_STEPS: u32 = 60;

/// Length of the balance animation
pub const BALANCE_DURATION: Duration = Duration::from_millis(1500);

/// How long a pressed action card stays highlighted
pub const ACTION_FEEDBACK: Duration = Duration::from_millis(150);

/// A row in the recent transactions list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transaction {
    pub name: &'static str,
    pub date: &'static str,
    /// Amount in whole dollars, negative for debits
    pub amount: i64,
}

/// Recent transactions
pub const RECENT_TRANSACTIONS: [Transaction; 5] = [
    Transaction {
        name: "Salary Deposit",
        date: "Today",
        amount: 85_000,
    },
    Transaction {
        name: "Electricity Bill",
        date: "Yesterday",
        amount: -2_340,
    },
    Transaction {
        name: "Coffee Shop",
        date: "Yesterday",
        amount: -150,
    },
    Transaction {
        name: "Transfer to Savings",
        date: "2 days ago",
        amount: -20_000,
    },
    Transaction {
        name: "Online Store",
        date: "3 days ago",
        amount: -1_290,
    },
];

/// Balance that counts up from zero in fixed steps
#[derive(Debug, Clone, Copy)]
pub struct BalanceCounter {
    target: u64,
    steps: u32,
    duration: Duration,
    started: Instant,
}

impl BalanceCounter {
    /// Start the standard animation at `now`
    pub fn start(now: Instant) -> Self {
        Self::new(BALANCE_TARGET, BALANCE_STEPS, BALANCE_DURATION, now)
    }

    pub fn new(target: u64, steps: u32, duration: Duration, started: Instant) -> Self {
        Self {
            target,
            steps: steps.max(1),
            duration,
            started,
        }
    }

    fn step_at(&self, now: Instant) -> u32 {
        let elapsed = now.saturating_duration_since(self.started);
        let interval = self.duration / self.steps;
        if interval.is_zero() {
            return self.steps;
        }
        let step = elapsed.as_nanos() / interval.as_nanos();
        step.min(self.steps as u128) as u32
    }

    /// Displayed value at `now`
    pub fn value_at(&self, now: Instant) -> u64 {
        let step = self.step_at(now);
        if step >= self.steps {
            return self.target;
        }
        let increment = self.target as f64 / self.steps as f64;
        (increment * step as f64).round() as u64
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.step_at(now) >= self.steps
    }
}

/// Insert thousands separators
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Format a balance as `NT$ 4,000,000`
pub fn format_balance(value: u64) -> String {
    format!("NT$ {}", group_thousands(value))
}

/// Format a signed transaction amount as `+NT$ 85,000` / `-NT$ 150`
pub fn format_amount(amount: i64) -> String {
    let sign = if amount < 0 { '-' } else { '+' };
    format!("{}NT$ {}", sign, group_thousands(amount.unsigned_abs()))
}

/// Selection and animation state of the dashboard
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// Active navigation item
    pub nav_index: usize,
    /// Focused quick action
    pub action_index: usize,
    /// Selected transaction
    pub transaction_index: usize,
    /// Balance animation
    pub balance: BalanceCounter,
    /// Last pressed action and when
    pressed: Option<(usize, Instant)>,
}

impl DashboardState {
    pub fn new(now: Instant) -> Self {
        Self {
            nav_index: 0,
            action_index: 0,
            transaction_index: 0,
            balance: BalanceCounter::start(now),
            pressed: None,
        }
    }

    /// Called every time the dashboard is shown
    pub fn reset(&mut self, now: Instant) {
        *self = Self::new(now);
    }

    pub fn active_nav(&self) -> &'static str {
        NAV_ITEMS[self.nav_index]
    }

    pub fn next_nav(&mut self) {
        self.nav_index = (self.nav_index + 1) % NAV_ITEMS.len();
        tracing::info!("Navigated to: {}", self.active_nav());
    }

    pub fn prev_nav(&mut self) {
        self.nav_index = (self.nav_index + NAV_ITEMS.len() - 1) % NAV_ITEMS.len();
        tracing::info!("Navigated to: {}", self.active_nav());
    }

    pub fn focus_next_action(&mut self) {
        self.action_index = (self.action_index + 1) % QUICK_ACTIONS.len();
    }

    /// Press the focused action card
    pub fn press_action(&mut self, now: Instant) {
        tracing::info!("Action selected: {}", QUICK_ACTIONS[self.action_index]);
        self.pressed = Some((self.action_index, now));
    }

    /// Whether action `index` should be drawn pressed at `now`
    pub fn is_pressed(&self, index: usize, now: Instant) -> bool {
        matches!(self.pressed, Some((i, at)) if i == index && now.saturating_duration_since(at) < ACTION_FEEDBACK)
    }

    pub fn select_next_transaction(&mut self) {
        if self.transaction_index + 1 < RECENT_TRANSACTIONS.len() {
            self.transaction_index += 1;
        }
        self.log_transaction();
    }

    pub fn select_prev_transaction(&mut self) {
        self.transaction_index = self.transaction_index.saturating_sub(1);
        self.log_transaction();
    }

    fn log_transaction(&self) {
        tracing::info!(
            "Transaction selected: {}",
            RECENT_TRANSACTIONS[self.transaction_index].name
        );
    }
}
