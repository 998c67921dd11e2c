//! Adaptive constraint ordering: a round-robin over [`IntList`]s that
//! promotes constraints that recently produced useful contraction work and
//! demotes ones that went stale (spec §4.2).

use super::int_list::IntList;

const MAX_LOOP: u32 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpResult {
    NoJump,
    Jump,
    MainJump,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Reserve,
    Active,
}

/// Partition of `{0..m-1}` into an active list and a reserve list. All
/// constraints start in `reserve`.
#[derive(Debug, Clone)]
pub struct WakingList {
    active: IntList,
    reserve: IntList,
    tag: Vec<u64>,
    main_jump_num: u64,
    cursor: Cursor,
    current: Option<usize>,
    /// Where this pass over `reserve` began; a full lap back here with no
    /// activation means the reserve is exhausted.
    reserve_pass_start: Option<usize>,
    last_activated: Option<usize>,
    loop_streak: u32,
    streak_id: Option<usize>,
}

impl WakingList {
    pub fn new(m: usize) -> Self {
        let mut reserve = IntList::new(m, true);
        for c in 0..m {
            reserve.add_tail(c).expect("fresh reserve list accepts every id");
        }
        Self {
            active: IntList::new(m, true),
            reserve,
            tag: vec![0; m],
            main_jump_num: 0,
            cursor: Cursor::Reserve,
            current: None,
            reserve_pass_start: None,
            last_activated: None,
            loop_streak: 0,
            streak_id: None,
        }
    }

    pub fn main_jump_num(&self) -> u64 {
        self.main_jump_num
    }

    pub fn is_active(&self, c: usize) -> bool {
        self.active.contains(c)
    }

    pub fn active_ids(&self) -> Vec<usize> {
        self.active.iter().collect()
    }

    /// Resets the round-robin pointer and returns the head of the reserve
    /// list, falling back to the active list if every constraint is already
    /// active. `None` only when there are no constraints at all.
    pub fn first_candidate(&mut self) -> Option<usize> {
        self.loop_streak = 0;
        self.streak_id = None;
        self.cursor = Cursor::Reserve;
        self.current = self.reserve.first().ok();
        self.reserve_pass_start = self.current;
        if self.current.is_none() {
            self.cursor = Cursor::Active;
            self.current = self.active.first().ok();
        }
        self.current
    }

    /// Advances past the constraint last returned, applying the waking
    /// rules for `result`. Returns the next candidate id, or `None` when
    /// both lists are exhausted.
    pub fn next_candidate(&mut self, result: JumpResult) -> Option<usize> {
        let c = match self.current {
            Some(c) => c,
            None => return None,
        };

        if result == JumpResult::MainJump {
            self.main_jump_num += 1;
            self.loop_streak = 0;
            self.streak_id = None;
        }

        match self.cursor {
            Cursor::Reserve => self.step_reserve(c, result),
            Cursor::Active => self.step_active(c, result),
        }

        if self.current.is_none() && self.cursor == Cursor::Reserve && !self.active.is_empty() {
            self.switch_to_active();
        }

        self.current
    }

    fn step_reserve(&mut self, c: usize, result: JumpResult) {
        match result {
            JumpResult::NoJump => {
                let n = self.reserve.next(c).ok();
                self.current = if n == self.reserve_pass_start { None } else { n };
            }
            JumpResult::Jump | JumpResult::MainJump => {
                let n = self.reserve.next(c).ok().filter(|&n| n != c);
                self.activate(c);
                if self.reserve_pass_start == Some(c) {
                    self.reserve_pass_start = n;
                }
                self.current = n;
            }
        }
    }

    fn switch_to_active(&mut self) {
        self.cursor = Cursor::Active;
        self.loop_streak = 0;
        self.streak_id = None;
        self.current = self.active.first().ok();
    }

    fn activate(&mut self, c: usize) {
        self.reserve.remove(c).ok();
        match self.last_activated {
            Some(after) if self.active.contains(after) => {
                self.active.insert_after(after, c).ok();
            }
            _ => {
                self.active.add_head(c).ok();
            }
        }
        self.last_activated = Some(c);
        self.tag[c] = self.main_jump_num + 1;
    }

    fn step_active(&mut self, c: usize, result: JumpResult) {
        match result {
            JumpResult::NoJump => {
                self.loop_streak = 0;
                self.streak_id = None;
                if self.tag[c] <= self.main_jump_num {
                    let succ = self.active.remove(c).ok();
                    self.reserve.add_tail(c).ok();
                    self.current = if self.active.is_empty() { None } else { succ };
                } else {
                    self.current = self.active.next(c).ok();
                }
            }
            JumpResult::Jump | JumpResult::MainJump => {
                if self.streak_id == Some(c) {
                    self.loop_streak += 1;
                } else {
                    self.streak_id = Some(c);
                    self.loop_streak = 1;
                }
                if self.loop_streak >= MAX_LOOP {
                    // One constraint has re-triggered a jump MAX_LOOP times
                    // in a row: end this pass over the active list instead
                    // of letting the circular list spin on it forever.
                    self.loop_streak = 0;
                    self.streak_id = None;
                    self.current = None;
                } else {
                    self.current = self.active.next(c).ok();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_fully_in_reserve() {
        let mut wl = WakingList::new(4);
        assert!(!wl.is_active(0));
        let head = wl.first_candidate();
        assert_eq!(head, Some(0));
    }

    #[test]
    fn jump_promotes_into_active() {
        let mut wl = WakingList::new(3);
        wl.first_candidate();
        wl.next_candidate(JumpResult::Jump);
        assert!(wl.is_active(0));
        assert!(!wl.reserve.contains(0));
    }

    #[test]
    fn main_jump_increments_counter_exactly_once() {
        let mut wl = WakingList::new(3);
        wl.first_candidate();
        assert_eq!(wl.main_jump_num(), 0);
        wl.next_candidate(JumpResult::MainJump);
        assert_eq!(wl.main_jump_num(), 1);
    }

    #[test]
    fn no_id_is_ever_in_both_lists() {
        let mut wl = WakingList::new(5);
        wl.first_candidate();
        for _ in 0..10 {
            if wl.next_candidate(JumpResult::Jump).is_none() {
                wl.first_candidate();
            }
        }
        for c in 0..5 {
            assert!(!(wl.active.contains(c) && wl.reserve.contains(c)));
        }
        assert_eq!(wl.active.size() + wl.reserve.size(), 5);
    }

    #[test]
    fn exhausting_reserve_with_no_activation_returns_none() {
        let mut wl = WakingList::new(3);
        wl.first_candidate();
        let mut last = Some(0);
        for _ in 0..5 {
            last = wl.next_candidate(JumpResult::NoJump);
            if last.is_none() {
                break;
            }
        }
        assert_eq!(last, None);
    }
}
