use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Admits one operation at a time; a second caller is turned away rather than
/// queued.
#[derive(Debug, Default)]
pub struct InFlightGate {
    busy: AtomicBool,
}

impl InFlightGate {
    /// Enters the gate, or returns `None` while another holder is inside.
    pub fn try_enter(self: &Arc<Self>) -> Option<InFlight> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight {
                gate: Arc::clone(self),
            })
    }

    #[cfg(test)]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Held for the duration of an operation; reopens the gate on drop.
#[derive(Debug)]
pub struct InFlight {
    gate: Arc<InFlightGate>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_entry_rejected_until_release() {
        let gate = Arc::new(InFlightGate::default());
        let first = gate.try_enter().expect("gate starts open");
        assert!(gate.is_busy());
        assert!(gate.try_enter().is_none());
        drop(first);
        assert!(!gate.is_busy());
        assert!(gate.try_enter().is_some());
    }

    #[tokio::test]
    async fn test_released_when_task_fails() {
        let gate = Arc::new(InFlightGate::default());
        let g = Arc::clone(&gate);
        let result = tokio::spawn(async move {
            let _held = g.try_enter().unwrap();
            Err::<(), &str>("boom")
        })
        .await
        .unwrap();
        assert!(result.is_err());
        assert!(!gate.is_busy());
    }
}
