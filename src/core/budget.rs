//! Zeitbudget einer einzelnen Engine-Operation.

use std::time::{Duration, Instant};

/// Budget ist abgelaufen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Zeitbudget von {budget_ms} ms überschritten")]
pub struct BudgetExhausted {
    pub budget_ms: u64,
}

/// Deadline für eine Merge-/Cut-Operation. `0 ms` bedeutet unbegrenzt.
#[derive(Debug, Clone, Copy)]
pub struct OperationBudget {
    deadline: Option<Instant>,
    budget_ms: u64,
}

impl OperationBudget {
    /// Startet ein Budget ab jetzt.
    pub fn start(budget_ms: u64) -> Self {
        let deadline = (budget_ms > 0).then(|| Instant::now() + Duration::from_millis(budget_ms));
        Self {
            deadline,
            budget_ms,
        }
    }

    /// Budget ohne Deadline.
    pub fn unlimited() -> Self {
        Self {
            deadline: None,
            budget_ms: 0,
        }
    }

    /// Bereits abgelaufenes Budget.
    pub fn expired() -> Self {
        Self {
            deadline: Some(Instant::now()),
            budget_ms: 0,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Prüfpunkt zwischen zwei Kernel-Schritten.
    pub fn check(&self) -> Result<(), BudgetExhausted> {
        if self.is_exhausted() {
            Err(BudgetExhausted {
                budget_ms: self.budget_ms,
            })
        } else {
            Ok(())
        }
    }
}
