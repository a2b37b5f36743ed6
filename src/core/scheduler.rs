//=========================================================================
// Scheduler
//=========================================================================
//
// Deferred timers keyed on engine time.
//
// Architecture:
//   schedule_at / schedule_in → BinaryHeap<Reverse<(fire_at, seq)>>
//   poll(now) → due events, earliest first, FIFO among equal times
//
// Nothing fires on its own: the owner polls once per tick and handles
// whatever comes back. Each scheduled event fires at most once.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

//=== Entry ===============================================================

#[derive(Debug)]
struct Entry<E> {
    fire_at: Duration,
    seq: u64,
    event: E,
}

// Ordering ignores the payload so `E` needs no bounds.
impl<E> PartialEq for Entry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at && self.seq == other.seq
    }
}

impl<E> Eq for Entry<E> {}

impl<E> PartialOrd for Entry<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Entry<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.fire_at
            .cmp(&other.fire_at)
            .then(self.seq.cmp(&other.seq))
    }
}

//=== Scheduler ===========================================================

/// Min-heap of `(fire_time, event)` pairs.
#[derive(Debug)]
pub struct Scheduler<E> {
    heap: BinaryHeap<Reverse<Entry<E>>>,
    next_seq: u64,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    //--- Scheduling -------------------------------------------------------

    pub fn schedule_at(&mut self, fire_at: Duration, event: E) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry { fire_at, seq, event }));
    }

    /// Schedules `event` for `now + delay`.
    pub fn schedule_in(&mut self, now: Duration, delay: Duration, event: E) {
        self.schedule_at(now + delay, event);
    }

    //--- Polling ----------------------------------------------------------

    /// Removes and returns every event due at or before `now`.
    pub fn poll(&mut self, now: Duration) -> Vec<E> {
        let mut due = Vec::new();
        while let Some(Reverse(head)) = self.heap.peek() {
            if head.fire_at > now {
                break;
            }
            if let Some(Reverse(entry)) = self.heap.pop() {
                due.push(entry.event);
            }
        }
        due
    }

    /// Drops every pending event matching `predicate`.
    pub fn cancel_where<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&E) -> bool,
    {
        self.heap.retain(|Reverse(entry)| !predicate(&entry.event));
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    //--- Queries ----------------------------------------------------------

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn next_fire_time(&self) -> Option<Duration> {
        self.heap.peek().map(|Reverse(entry)| entry.fire_at)
    }

    pub fn any<F>(&self, mut predicate: F) -> bool
    where
        F: FnMut(&E) -> bool,
    {
        self.heap.iter().any(|Reverse(entry)| predicate(&entry.event))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[derive(Debug, PartialEq)]
    enum Timer {
        Respawn(usize),
        Spawn,
        Expire(u32),
    }

    #[test]
    fn nothing_fires_early() {
        let mut sched = Scheduler::new();
        sched.schedule_at(ms(100), Timer::Spawn);

        assert!(sched.poll(ms(99)).is_empty());
        assert_eq!(sched.poll(ms(100)), vec![Timer::Spawn]);
        assert!(sched.is_empty());
    }

    #[test]
    fn due_events_come_back_in_time_order() {
        let mut sched = Scheduler::new();
        sched.schedule_at(ms(300), Timer::Respawn(2));
        sched.schedule_at(ms(100), Timer::Respawn(0));
        sched.schedule_at(ms(200), Timer::Respawn(1));

        assert_eq!(
            sched.poll(ms(1000)),
            vec![Timer::Respawn(0), Timer::Respawn(1), Timer::Respawn(2)]
        );
    }

    #[test]
    fn ties_fire_in_insertion_order() {
        let mut sched = Scheduler::new();
        sched.schedule_at(ms(50), Timer::Expire(1));
        sched.schedule_at(ms(50), Timer::Expire(2));
        sched.schedule_at(ms(50), Timer::Expire(3));

        assert_eq!(sched.poll(ms(50)), vec![Timer::Expire(1), Timer::Expire(2), Timer::Expire(3)]);
    }

    #[test]
    fn each_event_fires_once() {
        let mut sched = Scheduler::new();
        sched.schedule_in(ms(1000), ms(500), Timer::Spawn);

        assert_eq!(sched.next_fire_time(), Some(ms(1500)));
        assert_eq!(sched.poll(ms(2000)).len(), 1);
        assert!(sched.poll(ms(3000)).is_empty());
    }

    #[test]
    fn cancel_where_drops_matching_only() {
        let mut sched = Scheduler::new();
        sched.schedule_at(ms(10), Timer::Expire(7));
        sched.schedule_at(ms(20), Timer::Expire(8));
        sched.schedule_at(ms(30), Timer::Spawn);

        sched.cancel_where(|t| *t == Timer::Expire(7));

        assert_eq!(sched.len(), 2);
        assert!(!sched.any(|t| *t == Timer::Expire(7)));
        assert_eq!(sched.poll(ms(100)), vec![Timer::Expire(8), Timer::Spawn]);
    }

    #[test]
    fn clear_empties_queue() {
        let mut sched = Scheduler::new();
        sched.schedule_at(ms(10), Timer::Spawn);
        sched.clear();
        assert!(sched.is_empty());
        assert_eq!(sched.next_fire_time(), None);
    }
}
