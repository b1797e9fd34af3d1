//! Sperren pro Layer: Lesen-Ändern-Schreiben eines Layers läuft exklusiv.

use super::LayerId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Registry mit einem Mutex je Layer.
///
/// Bearbeitungen verschiedener Layer laufen parallel, Bearbeitungen desselben
/// Layers werden nacheinander ausgeführt.
#[derive(Debug, Default)]
pub struct LayerLocks {
    locks: Mutex<HashMap<LayerId, Arc<Mutex<()>>>>,
}

impl LayerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Liefert den (ggf. neu angelegten) Mutex eines Layers.
    pub fn handle(&self, id: &LayerId) -> Arc<Mutex<()>> {
        // Ein vergiftetes Registry-Lock enthält nur Arcs und bleibt benutzbar
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(id.clone()).or_default())
    }

    /// Führt `f` unter dem Lock des Layers aus.
    ///
    /// Wartet danach niemand mehr auf den Layer, wird sein Eintrag entfernt.
    pub fn with_layer<T>(&self, id: &LayerId, f: impl FnOnce() -> T) -> T {
        let handle = self.handle(id);
        let result = {
            let _guard = handle.lock().unwrap_or_else(PoisonError::into_inner);
            f()
        };
        self.release(id, handle);
        result
    }

    /// Gibt einen Handle zurück; hält nur noch die Registry den Mutex, fliegt er raus.
    fn release(&self, id: &LayerId, handle: Arc<Mutex<()>>) {
        // Neue Handles entstehen nur unter dem Registry-Lock, der Zähler ist hier stabil
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        drop(handle);
        if locks
            .get(id)
            .is_some_and(|entry| Arc::strong_count(entry) == 1)
        {
            locks.remove(id);
        }
    }

    /// Anzahl bekannter Layer.
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn same_layer_shares_one_mutex() {
        let locks = LayerLocks::new();
        let a = locks.handle(&LayerId::from("a"));
        let again = locks.handle(&LayerId::from("a"));
        let b = locks.handle(&LayerId::from("b"));
        assert!(Arc::ptr_eq(&a, &again));
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(locks.len(), 2);
    }

    #[test]
    fn sections_on_one_layer_do_not_interleave() {
        let locks = LayerLocks::new();
        let inside = AtomicUsize::new(0);
        let max_inside = AtomicUsize::new(0);
        let id = LayerId::from("felder");

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    locks.with_layer(&id, || {
                        let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                        max_inside.fetch_max(now, Ordering::SeqCst);
                        std::thread::sleep(std::time::Duration::from_millis(2));
                        inside.fetch_sub(1, Ordering::SeqCst);
                    });
                });
            }
        });

        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
        assert!(locks.is_empty());
    }

    #[test]
    fn idle_layer_entry_is_evicted() {
        let locks = LayerLocks::new();
        let id = LayerId::from("felder");

        let value = locks.with_layer(&id, || {
            assert_eq!(locks.len(), 1);
            7
        });

        assert_eq!(value, 7);
        assert!(locks.is_empty());
    }

    #[test]
    fn held_handle_keeps_entry() {
        let locks = LayerLocks::new();
        let id = LayerId::from("felder");
        let held = locks.handle(&id);

        locks.with_layer(&id, || ());

        assert_eq!(locks.len(), 1);
        assert!(Arc::ptr_eq(&held, &locks.handle(&id)));
    }
}
