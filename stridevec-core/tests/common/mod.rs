#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::ptr::NonNull;
use std::rc::Rc;
use stridevec_core::{Allocator, Global, Result, StrideError};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Allocate(usize),
    Construct,
    Destroy,
    Deallocate(usize),
}

#[derive(Debug, Default)]
struct Ledger {
    events: RefCell<Vec<Event>>,
    refuse: Cell<bool>,
}

/// Heap allocator that records every call made through it. Clones share the ledger.
#[derive(Debug, Clone, Default)]
pub struct CountingAllocator {
    ledger: Rc<Ledger>,
}

impl CountingAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `allocate` call fail.
    pub fn refuse_allocations(&self, refuse: bool) {
        self.ledger.refuse.set(refuse);
    }

    pub fn events(&self) -> Vec<Event> {
        self.ledger.events.borrow().clone()
    }

    pub fn count(&self, matches: impl Fn(&Event) -> bool) -> usize {
        self.ledger.events.borrow().iter().filter(|e| matches(e)).count()
    }

    pub fn allocations(&self) -> usize {
        self.count(|e| matches!(e, Event::Allocate(_)))
    }

    pub fn deallocations(&self) -> usize {
        self.count(|e| matches!(e, Event::Deallocate(_)))
    }

    pub fn constructs(&self) -> usize {
        self.count(|e| *e == Event::Construct)
    }

    pub fn destroys(&self) -> usize {
        self.count(|e| *e == Event::Destroy)
    }

    fn record(&self, event: Event) {
        self.ledger.events.borrow_mut().push(event);
    }
}

impl Allocator for CountingAllocator {
    fn allocate<T>(&self, count: usize) -> Result<NonNull<T>> {
        self.record(Event::Allocate(count));
        if self.ledger.refuse.get() {
            return Err(StrideError::AllocationFailure {
                count,
                elem_size: std::mem::size_of::<T>(),
            });
        }
        Global.allocate(count)
    }

    unsafe fn deallocate<T>(&self, ptr: NonNull<T>, count: usize) {
        self.record(Event::Deallocate(count));
        Global.deallocate(ptr, count);
    }

    unsafe fn construct<T>(&self, ptr: NonNull<T>, value: T) {
        self.record(Event::Construct);
        ptr.as_ptr().write(value);
    }

    unsafe fn destroy<T>(&self, ptr: NonNull<T>) {
        self.record(Event::Destroy);
        ptr.as_ptr().drop_in_place();
    }
}

/// Element that logs its id when dropped.
#[derive(Debug, Clone)]
pub struct Tracked {
    pub id: usize,
    drops: Rc<RefCell<Vec<usize>>>,
}

impl Tracked {
    pub fn batch(count: usize) -> (Vec<Tracked>, Rc<RefCell<Vec<usize>>>) {
        let drops = Rc::new(RefCell::new(Vec::new()));
        let items = (0..count)
            .map(|id| Tracked {
                id,
                drops: drops.clone(),
            })
            .collect();
        (items, drops)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.drops.borrow_mut().push(self.id);
    }
}

/// Element whose `clone` panics once its shared fuse has burnt down.
#[derive(Debug)]
pub struct Fused {
    fuse: Rc<Cell<usize>>,
    pub drops: Rc<Cell<usize>>,
}

impl Fused {
    pub fn batch(count: usize, clones_allowed: usize) -> Vec<Fused> {
        let fuse = Rc::new(Cell::new(clones_allowed));
        let drops = Rc::new(Cell::new(0));
        (0..count)
            .map(|_| Fused {
                fuse: fuse.clone(),
                drops: drops.clone(),
            })
            .collect()
    }
}

impl Clone for Fused {
    fn clone(&self) -> Self {
        let left = self.fuse.get();
        if left == 0 {
            panic!("clone fuse exhausted");
        }
        self.fuse.set(left - 1);
        Fused {
            fuse: self.fuse.clone(),
            drops: self.drops.clone(),
        }
    }
}

impl Drop for Fused {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}
