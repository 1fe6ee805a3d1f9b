#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

/// Shared counters for the lifetime events of `Tracked` values
#[derive(Default, Clone)]
pub struct Counters {
    created: Rc<Cell<usize>>,
    clones: Rc<Cell<usize>>,
    drops: Rc<Cell<usize>>,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn make(&self, value: i32) -> Tracked {
        self.created.set(self.created.get() + 1);
        Tracked {
            value,
            counters: self.clone(),
        }
    }

    pub fn clones(&self) -> usize {
        self.clones.get()
    }

    pub fn drops(&self) -> usize {
        self.drops.get()
    }

    /// Values constructed (directly or by cloning) and not dropped yet
    pub fn live(&self) -> usize {
        self.created.get() + self.clones.get() - self.drops.get()
    }
}

/// Element type that records every clone and drop
#[derive(Debug)]
pub struct Tracked {
    pub value: i32,
    counters: Counters,
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        self.counters.clones.set(self.counters.clones.get() + 1);
        Tracked {
            value: self.value,
            counters: self.counters.clone(),
        }
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.counters.drops.set(self.counters.drops.get() + 1);
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl std::fmt::Debug for Counters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Counters")
            .field("created", &self.created.get())
            .field("clones", &self.clones.get())
            .field("drops", &self.drops.get())
            .finish()
    }
}

/// Element type whose `clone` panics once a shared budget of clones is spent
#[derive(Debug)]
pub struct FragileClone {
    pub value: i32,
    budget: Rc<Cell<usize>>,
    counters: Counters,
}

impl FragileClone {
    /// Creates a value; `budget` clones succeed across all values sharing it,
    /// the next one panics.
    pub fn new(value: i32, budget: &Rc<Cell<usize>>, counters: &Counters) -> Self {
        counters.created.set(counters.created.get() + 1);
        Self {
            value,
            budget: Rc::clone(budget),
            counters: counters.clone(),
        }
    }
}

impl Clone for FragileClone {
    fn clone(&self) -> Self {
        let remaining = self.budget.get();
        if remaining == 0 {
            panic!("clone budget exhausted");
        }
        self.budget.set(remaining - 1);
        self.counters.clones.set(self.counters.clones.get() + 1);
        Self {
            value: self.value,
            budget: Rc::clone(&self.budget),
            counters: self.counters.clone(),
        }
    }
}

impl Drop for FragileClone {
    fn drop(&mut self) {
        self.counters.drops.set(self.counters.drops.get() + 1);
    }
}

thread_local! {
    static DEFAULT_BUDGET: Cell<Option<usize>> = const { Cell::new(None) };
    static DEFAULT_LIVE: Cell<isize> = const { Cell::new(0) };
}

/// Element type whose `Default` panics once the per-thread budget is spent
#[derive(Debug, PartialEq)]
pub struct FragileDefault(pub i32);

impl FragileDefault {
    /// Allows `budget` more default constructions on this thread; `None` removes the limit.
    pub fn set_budget(budget: Option<usize>) {
        DEFAULT_BUDGET.with(|b| b.set(budget));
    }

    /// Values built by `Default` minus values dropped, on this thread
    pub fn live() -> isize {
        DEFAULT_LIVE.with(Cell::get)
    }
}

impl Default for FragileDefault {
    fn default() -> Self {
        DEFAULT_BUDGET.with(|b| match b.get() {
            Some(0) => panic!("default budget exhausted"),
            Some(n) => b.set(Some(n - 1)),
            None => {}
        });
        DEFAULT_LIVE.with(|l| l.set(l.get() + 1));
        FragileDefault(7)
    }
}

impl Drop for FragileDefault {
    fn drop(&mut self) {
        DEFAULT_LIVE.with(|l| l.set(l.get() - 1));
    }
}
