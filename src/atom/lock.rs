//! Render lock: A per-atom counter that defers repaints while positive.

/// What an `unlock` call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unlock {
    /// The counter is still positive.
    StillLocked,
    /// The counter reached zero.
    Released {
        /// A render was requested while locked and should run now.
        pending: bool,
    },
    /// The counter was already zero; the call was ignored.
    Imbalanced,
}

/// Nesting counter plus a "render requested while locked" flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LockState {
    depth: u32,
    pending: bool,
}

impl LockState {
    /// An unlocked state.
    pub const fn new() -> Self {
        Self {
            depth: 0,
            pending: false,
        }
    }

    /// Current nesting depth.
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Whether renders are currently suppressed.
    pub const fn is_locked(&self) -> bool {
        self.depth > 0
    }

    /// Whether a render is waiting for the lock to be released.
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// Increment the counter.
    pub const fn lock(&mut self) {
        self.depth = self.depth.saturating_add(1);
    }

    /// Remember that a render was suppressed.
    pub const fn defer(&mut self) {
        self.pending = true;
    }

    /// Decrement the counter, never going below zero.
    pub const fn unlock(&mut self) -> Unlock {
        match self.depth {
            0 => Unlock::Imbalanced,
            1 => {
                self.depth = 0;
                let pending = self.pending;
                self.pending = false;
                Unlock::Released { pending }
            }
            _ => {
                self.depth -= 1;
                Unlock::StillLocked
            }
        }
    }
}
