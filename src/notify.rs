//! # Notification Channel Module
//!
//! ## Purpose
//! Fire-and-forget user notifications. A single mutable slot holds the
//! latest toast; each `show` replaces the slot and schedules an auto-clear
//! after a fixed delay measured from that call.
//!
//! ## Input/Output Specification
//! - **Input**: Toast messages (success/error/info)
//! - **Output**: Current toast broadcast to subscribers, auto-cleared
//! - **Timing**: one scheduled clear per show; must run inside a tokio
//!   runtime
//!
//! ## Timer Discipline
//! Each show stamps the slot with a fresh generation and the scheduled
//! clear fires only while that generation is still live, so an older
//! toast's timer can never dismiss a newer toast.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::time::{sleep, Duration};

/// Toast severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Info => "info",
        }
    }
}

/// Transient, auto-dismissing user notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub text: String,
}

/// Listener invoked with the slot content on every change (`None` = cleared).
pub type ToastListener = Arc<dyn Fn(Option<&Toast>) + Send + Sync>;

/// Single-slot notification channel with timed auto-clear.
pub struct NotificationChannel {
    slot: Mutex<SlotState>,
    generation: AtomicU64,
    dismiss_after: Duration,
}

struct SlotState {
    current: Option<(u64, Toast)>,
    listeners: Vec<ToastListener>,
}

impl NotificationChannel {
    pub fn new(dismiss_after_ms: u64) -> Arc<Self> {
        Arc::new(Self {
            slot: Mutex::new(SlotState {
                current: None,
                listeners: Vec::new(),
            }),
            generation: AtomicU64::new(0),
            dismiss_after: Duration::from_millis(dismiss_after_ms),
        })
    }

    /// Replace the slot with `toast` and schedule its auto-clear.
    pub fn show(self: &Arc<Self>, toast: Toast) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let listeners = {
            let mut slot = self.slot.lock();
            slot.current = Some((generation, toast.clone()));
            slot.listeners.clone()
        };
        for listener in &listeners {
            listener(Some(&toast));
        }

        let channel = Arc::clone(self);
        tokio::spawn(async move {
            sleep(channel.dismiss_after).await;
            channel.clear_generation(generation);
        });
    }

    pub fn success(self: &Arc<Self>, text: impl Into<String>) {
        self.show(Toast {
            kind: ToastKind::Success,
            text: text.into(),
        });
    }

    pub fn error(self: &Arc<Self>, text: impl Into<String>) {
        self.show(Toast {
            kind: ToastKind::Error,
            text: text.into(),
        });
    }

    pub fn info(self: &Arc<Self>, text: impl Into<String>) {
        self.show(Toast {
            kind: ToastKind::Info,
            text: text.into(),
        });
    }

    /// Empty the slot immediately.
    pub fn clear(&self) {
        let listeners = {
            let mut slot = self.slot.lock();
            if slot.current.take().is_none() {
                return;
            }
            slot.listeners.clone()
        };
        for listener in &listeners {
            listener(None);
        }
    }

    /// The toast currently occupying the slot, if any.
    pub fn current(&self) -> Option<Toast> {
        self.slot.lock().current.as_ref().map(|(_, t)| t.clone())
    }

    /// Register a listener; it is invoked synchronously with the current
    /// slot content, then again on every change.
    pub fn subscribe(&self, listener: ToastListener) {
        let current = {
            let mut slot = self.slot.lock();
            slot.listeners.push(listener.clone());
            slot.current.as_ref().map(|(_, t)| t.clone())
        };
        listener(current.as_ref());
    }

    /// Clear the slot only if it still holds the given generation.
    fn clear_generation(&self, generation: u64) {
        let listeners = {
            let mut slot = self.slot.lock();
            match &slot.current {
                Some((live, _)) if *live == generation => {
                    slot.current = None;
                    slot.listeners.clone()
                }
                // A newer toast replaced this one; its own timer owns it.
                _ => return,
            }
        };
        for listener in &listeners {
            listener(None);
        }
    }
}
