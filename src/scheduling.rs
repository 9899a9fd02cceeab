//! Scheduling utilities – the cancelable timer primitive the portal and the
//! focus manager use for their only two suspension points: the one-tick
//! delay before the "after-open" classes land and the close timeout.
//!
//! * [`ManualScheduler`] keeps a virtual clock that the host (or a test)
//!   advances explicitly.
//! * `GlooScheduler` (wasm32 only) is backed by `gloo_timers` and therefore
//!   by `setTimeout` / `clearTimeout`.

use std::cell::{Cell, RefCell};

/// Handle returned by [`Scheduler::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

pub type Task = Box<dyn FnOnce()>;

pub trait Scheduler {
    /// Run `task` after `delay_ms` milliseconds.  A delay of zero means
    /// "next tick", never synchronously.
    fn schedule(&self, delay_ms: u32, task: Task) -> TimerId;

    /// Cancel a pending task.  Unknown or already-fired ids are ignored.
    fn cancel(&self, id: TimerId);
}

struct Pending {
    id: TimerId,
    due: u64,
    task: Task,
}

/// Deterministic scheduler with a virtual millisecond clock.
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<u64>,
    next_id: Cell<u64>,
    queue: RefCell<Vec<Pending>>,
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("now", &self.now.get())
            .field("pending", &self.pending())
            .finish()
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now.get()
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run everything that is due right now (the "next tick").
    pub fn tick(&self) -> usize {
        self.advance(0)
    }

    /// Move the clock forward by `ms`, running due tasks in (due, creation)
    /// order.  Tasks scheduled by running tasks also run if they fall inside
    /// the window.  Returns how many tasks ran.
    pub fn advance(&self, ms: u64) -> usize {
        let target = self.now.get() + ms;
        let mut ran = 0;
        while let Some(pending) = self.pop_due(target) {
            self.now.set(pending.due.max(self.now.get()));
            (pending.task)();
            ran += 1;
        }
        self.now.set(target);
        ran
    }

    fn pop_due(&self, target: u64) -> Option<Pending> {
        let mut queue = self.queue.borrow_mut();
        // Ids grow monotonically, so (due, id) is (due, creation order).
        let index = queue
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= target)
            .min_by_key(|(_, p)| (p.due, p.id))
            .map(|(i, _)| i)?;
        Some(queue.remove(index))
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay_ms: u32, task: Task) -> TimerId {
        let id = TimerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.queue.borrow_mut().push(Pending {
            id,
            due: self.now.get() + u64::from(delay_ms),
            task,
        });
        id
    }

    fn cancel(&self, id: TimerId) {
        self.queue.borrow_mut().retain(|p| p.id != id);
    }
}

#[cfg(target_arch = "wasm32")]
pub use gloo::GlooScheduler;

#[cfg(target_arch = "wasm32")]
mod gloo {
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::Rc;

    use gloo_timers::callback::Timeout;

    use super::{Scheduler, Task, TimerId};

    #[derive(Default)]
    struct Timers {
        live: HashMap<TimerId, Timeout>,
        // A Timeout must not be dropped from inside its own callback, so
        // fired handles park here until no callback is on the stack.
        fired: Vec<Timeout>,
        running: usize,
    }

    /// `setTimeout`-backed scheduler.
    #[derive(Default)]
    pub struct GlooScheduler {
        next_id: Cell<u64>,
        timers: Rc<RefCell<Timers>>,
    }

    impl GlooScheduler {
        pub fn new() -> Self {
            Self::default()
        }

        fn sweep(&self) {
            let mut timers = self.timers.borrow_mut();
            if timers.running == 0 {
                timers.fired.clear();
            }
        }
    }

    impl Scheduler for GlooScheduler {
        fn schedule(&self, delay_ms: u32, task: Task) -> TimerId {
            self.sweep();
            let id = TimerId(self.next_id.get());
            self.next_id.set(id.0 + 1);

            let timers = Rc::downgrade(&self.timers);
            let timeout = Timeout::new(delay_ms, move || {
                let timers = timers.upgrade();
                if let Some(timers) = &timers {
                    let mut timers = timers.borrow_mut();
                    timers.running += 1;
                    if let Some(done) = timers.live.remove(&id) {
                        timers.fired.push(done);
                    }
                }
                task();
                if let Some(timers) = &timers {
                    timers.borrow_mut().running -= 1;
                }
            });
            self.timers.borrow_mut().live.insert(id, timeout);
            id
        }

        fn cancel(&self, id: TimerId) {
            self.sweep();
            if let Some(timeout) = self.timers.borrow_mut().live.remove(&id) {
                let _ = timeout.cancel();
            }
        }
    }
}
