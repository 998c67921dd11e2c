
//! Terminators for controlling and interrupting long-running processes.
//!
//! This module provides several implementations of the [`Terminator`] trait, including:
//! - [`InterruptTerminator`]: Responds to Ctrl-C (SIGINT) or programmatic interrupts.
//! - [`TimeOutTerminator`]: Terminates after a specified time limit.
//! - [`MultipleTerminators`]: Combines multiple terminators.
//!
//! # Note
//! [`InterruptTerminator`] installs a global signal handler and **can only be constructed once** per process. Attempting to create multiple instances will result in a panic.

use std::sync::{Arc, atomic::AtomicBool};

use crate::Status;


pub trait Terminator {
  fn initialize(&mut self) {}

  fn terminate(&mut self) -> Option<Status>;
}


/// Terminator that responds to Ctrl-C (SIGINT) or programmatic interrupts.
///
/// # Note
/// Only one instance of `InterruptTerminator` can be constructed per process, as it installs a global signal handler.
/// Creating more than one will panic.
pub struct InterruptTerminator {
  interrupted: Arc<AtomicBool>,
}

impl InterruptTerminator {
  pub fn new() -> Self {
    let interrupted = Arc::new(AtomicBool::new(false));
    ctrlc::set_handler({
      let interrupted_clone = interrupted.clone();
      move || {
        interrupted_clone.store(true, std::sync::atomic::Ordering::SeqCst);
      }
    }).expect("Error setting Ctrl-C handler");
    Self { interrupted }
  }

  pub fn interrupt(&mut self) {
    self.interrupted.store(true, std::sync::atomic::Ordering::SeqCst);
  }
}

impl Terminator for InterruptTerminator {
  fn terminate(&mut self) -> Option<Status> {
    if self.interrupted.load(std::sync::atomic::Ordering::SeqCst) {
      Some(Status::Interrupted)
    } else {
      None
    }
  }
}


/// Terminator that triggers after a specified number of seconds.
pub struct TimeOutTerminator {
  max_time_secs: u64,
  start_time: std::time::Instant,
}

impl TimeOutTerminator {
  pub fn new(max_time_secs: u64) -> Self {
    Self {
      max_time_secs,
      start_time: std::time::Instant::now(),
    }
  }
}

impl Terminator for TimeOutTerminator {
  fn initialize(&mut self) {
    self.start_time = std::time::Instant::now();
  }

  fn terminate(&mut self) -> Option<Status> {
    if self.start_time.elapsed().as_secs() >= self.max_time_secs {
      Some(Status::TimeOut)
      } else {
        None
      }
  }
}


/// Terminator that triggers once a caller-tracked iteration count is reached.
pub struct MaxIterTerminator {
  max_iter: usize,
  count: usize,
}

impl MaxIterTerminator {
  pub fn new(max_iter: usize) -> Self {
    Self { max_iter, count: 0 }
  }

  pub fn tick(&mut self) {
    self.count += 1;
  }
}

impl Terminator for MaxIterTerminator {
  fn initialize(&mut self) {
    self.count = 0;
  }

  fn terminate(&mut self) -> Option<Status> {
    if self.count >= self.max_iter {
      Some(Status::MaxIter)
    } else {
      None
    }
  }
}


/// Terminator that combines multiple terminators and triggers if any of them do.
pub struct MultipleTerminators {
  terminators: Vec<Box<dyn Terminator>>,
}

impl MultipleTerminators {
  pub fn new(terminators: Vec<Box<dyn Terminator>>) -> Self {
    Self { terminators }
  }
}

impl Terminator for MultipleTerminators {
  fn initialize(&mut self) {
    for terminator in &mut self.terminators {
      terminator.initialize();
    }
  }

  fn terminate(&mut self) -> Option<Status> {
    for terminator in &mut self.terminators {
      if let Some(status) = terminator.as_mut().terminate() {
        return Some(status);
      }
    }
    None
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn interrupt_terminator_fires_once_flagged_programmatically() {
    let mut terminator = InterruptTerminator::new();
    assert_eq!(terminator.terminate(), None);
    terminator.interrupt();
    assert_eq!(terminator.terminate(), Some(Status::Interrupted));
  }

  #[test]
  fn time_out_terminator_fires_after_zero_seconds() {
    let mut terminator = TimeOutTerminator::new(0);
    terminator.initialize();
    std::thread::sleep(std::time::Duration::from_millis(5));
    assert_eq!(terminator.terminate(), Some(Status::TimeOut));
  }

  #[test]
  fn max_iter_terminator_fires_once_tick_count_is_reached() {
    let mut terminator = MaxIterTerminator::new(2);
    assert_eq!(terminator.terminate(), None);
    terminator.tick();
    assert_eq!(terminator.terminate(), None);
    terminator.tick();
    assert_eq!(terminator.terminate(), Some(Status::MaxIter));
  }

  #[test]
  fn multiple_terminators_fires_as_soon_as_any_member_does() {
    let mut multi = MultipleTerminators::new(vec![
      Box::new(MaxIterTerminator::new(0)),
      Box::new(TimeOutTerminator::new(3600)),
    ]);
    multi.initialize();
    assert_eq!(multi.terminate(), Some(Status::MaxIter));
  }
}