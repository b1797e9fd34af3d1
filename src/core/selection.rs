//! Auflösung von Positions-IDs einer Selektion gegen das aktuelle Feature-Set.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Positions-ID wie vom Client geliefert (Zahl oder Text).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectionId {
    Index(i64),
    Number(f64),
    Text(String),
}

impl SelectionId {
    /// Position im Feature-Set, falls die ID eine gültige, nicht-negative Ganzzahl ist.
    pub fn position(&self) -> Option<usize> {
        match self {
            SelectionId::Index(i) => usize::try_from(*i).ok(),
            SelectionId::Number(n) if n.fract() == 0.0 && *n >= 0.0 => Some(*n as usize),
            SelectionId::Number(_) => None,
            SelectionId::Text(s) => s.trim().parse::<usize>().ok(),
        }
    }
}

impl fmt::Display for SelectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionId::Index(i) => write!(f, "{i}"),
            SelectionId::Number(n) => write!(f, "{n}"),
            SelectionId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<usize> for SelectionId {
    fn from(value: usize) -> Self {
        SelectionId::Index(value as i64)
    }
}

impl From<&str> for SelectionId {
    fn from(value: &str) -> Self {
        SelectionId::Text(value.to_string())
    }
}

/// Löst eine Selektion gegen `len` Features auf.
///
/// Nicht parsebare, negative oder außerhalb liegende IDs werden verworfen,
/// Duplikate ignoriert. Ergebnis ist aufsteigend sortiert.
pub fn resolve_selection(ids: &[SelectionId], len: usize) -> IndexSet<usize> {
    let mut resolved: IndexSet<usize> = IndexSet::with_capacity(ids.len());
    for id in ids {
        match id.position() {
            Some(position) if position < len => {
                resolved.insert(position);
            }
            _ => log::debug!("Selektions-ID '{}' verworfen (ungültig oder außerhalb)", id),
        }
    }
    resolved.sort_unstable();
    resolved
}

/// Löst eine einzelne Ziel-ID auf.
pub fn resolve_target(id: &SelectionId, len: usize) -> Option<usize> {
    id.position().filter(|&position| position < len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_invalid_and_duplicate_ids() {
        let ids: Vec<SelectionId> = serde_json::from_str(r#"["3", 1, "x", -2, 1, "1", 99, 2.0, 2.5]"#)
            .expect("gültiges JSON");

        let resolved = resolve_selection(&ids, 5);

        assert_eq!(resolved.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn text_ids_are_trimmed() {
        assert_eq!(SelectionId::from(" 4 ").position(), Some(4));
    }

    #[test]
    fn target_must_be_in_range() {
        assert_eq!(resolve_target(&SelectionId::from(2usize), 3), Some(2));
        assert_eq!(resolve_target(&SelectionId::from(3usize), 3), None);
        assert_eq!(resolve_target(&SelectionId::from("abc"), 3), None);
    }
}
