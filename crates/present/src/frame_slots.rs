//! Frames-in-flight bookkeeping.
//!
//! [`FrameSlots`] holds one set of per-frame resources per frame in flight
//! and cycles through them. While the GPU works on the submission of slot N,
//! the CPU can fill slot N+1; a slot is only reused after its fence says the
//! previous submission finished.

use tracing::{debug, info};

use crate::error::{PresentError, PresentResult};
use crate::sync::{Fence, FrameSlot};

/// Maximum number of frames that can be in flight simultaneously.
pub const MAX_FRAMES_IN_FLIGHT: usize = 2;

/// Ring of per-frame resources.
///
/// Not thread-safe; owned by the presenter on the frame driver's thread.
pub struct FrameSlots<S> {
    slots: Vec<S>,
    current: usize,
}

impl<S: FrameSlot> FrameSlots<S> {
    /// Create [`MAX_FRAMES_IN_FLIGHT`] slots with `create`.
    pub fn new(create: impl FnMut(usize) -> PresentResult<S>) -> PresentResult<Self> {
        Self::with_count(MAX_FRAMES_IN_FLIGHT, create)
    }

    /// Create `count` slots with `create`, which receives the slot index.
    ///
    /// # Errors
    ///
    /// Returns an error if `count` is zero or any slot creation fails.
    pub fn with_count(
        count: usize,
        mut create: impl FnMut(usize) -> PresentResult<S>,
    ) -> PresentResult<Self> {
        if count == 0 {
            return Err(PresentError::SwapchainError(
                "at least one frame slot is required".to_string(),
            ));
        }

        let mut slots = Vec::with_capacity(count);
        for i in 0..count {
            slots.push(create(i)?);
            debug!("Created frame slot {}", i);
        }

        info!("Frame slots created with {} frames in flight", count);

        Ok(Self { slots, current: 0 })
    }

    /// The slot the next frame will use.
    #[inline]
    pub fn current(&self) -> &S {
        &self.slots[self.current]
    }

    /// Mutable access to the slot the next frame will use.
    #[inline]
    pub fn current_mut(&mut self) -> &mut S {
        &mut self.slots[self.current]
    }

    /// Index of the current slot (0 to `len() - 1`).
    #[inline]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Number of frames in flight.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always false; a ring has at least one slot.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Wait for the previous submission that used the current slot.
    pub fn wait_for_slot(&self) -> PresentResult<()> {
        wait_if_pending(self.current().in_flight_fence())
    }

    /// Swap in a fresh slot for the current one, e.g. after a failed submit
    /// left its fence unsignaled with nothing in flight to signal it.
    pub fn replace_current(&mut self, slot: S) {
        self.slots[self.current] = slot;
        debug!("Replaced frame slot {}", self.current);
    }

    /// Reset the current slot's fence ahead of a submission.
    pub fn reset_slot(&self) -> PresentResult<()> {
        self.current().in_flight_fence().reset()
    }

    /// Advance to the next slot.
    pub fn next_slot(&mut self) {
        self.current = (self.current + 1) % self.slots.len();
    }

    /// Wait for every slot's last submission, e.g. before a rebuild.
    pub fn wait_for_all(&self) -> PresentResult<()> {
        for slot in &self.slots {
            wait_if_pending(slot.in_flight_fence())?;
        }
        Ok(())
    }
}

/// Block on `fence` only if its submission has not completed yet.
fn wait_if_pending<F: Fence>(fence: &F) -> PresentResult<()> {
    if fence.is_signaled()? {
        return Ok(());
    }
    fence.wait(u64::MAX)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    struct TestFence {
        signaled: Cell<bool>,
        waits: Cell<usize>,
    }

    impl Fence for TestFence {
        fn wait(&self, _timeout: u64) -> PresentResult<()> {
            self.waits.set(self.waits.get() + 1);
            if self.signaled.get() {
                Ok(())
            } else {
                Err(PresentError::FenceTimeout)
            }
        }

        fn reset(&self) -> PresentResult<()> {
            self.signaled.set(false);
            Ok(())
        }

        fn is_signaled(&self) -> PresentResult<bool> {
            Ok(self.signaled.get())
        }
    }

    struct TestSlot {
        index: usize,
        fence: TestFence,
    }

    impl FrameSlot for TestSlot {
        type Fence = TestFence;

        fn in_flight_fence(&self) -> &TestFence {
            &self.fence
        }
    }

    fn slots(count: usize) -> FrameSlots<TestSlot> {
        FrameSlots::with_count(count, |index| {
            Ok(TestSlot {
                index,
                fence: TestFence {
                    signaled: Cell::new(true),
                    waits: Cell::new(0),
                },
            })
        })
        .unwrap()
    }

    #[test]
    fn test_max_frames_in_flight_constant() {
        assert!(MAX_FRAMES_IN_FLIGHT >= 2);
        assert!(MAX_FRAMES_IN_FLIGHT <= 4);
    }

    #[test]
    fn test_next_slot_wraps() {
        let mut ring = slots(3);
        let visited: Vec<usize> = (0..5)
            .map(|_| {
                let index = ring.current().index;
                ring.next_slot();
                index
            })
            .collect();
        assert_eq!(visited, vec![0, 1, 2, 0, 1]);
    }

    #[test]
    fn test_reset_slot_blocks_reuse_until_signaled() {
        let mut ring = slots(2);
        ring.wait_for_slot().unwrap();
        ring.reset_slot().unwrap();
        ring.next_slot();
        ring.next_slot();

        assert!(matches!(ring.wait_for_slot(), Err(PresentError::FenceTimeout)));

        ring.current().fence.signaled.set(true);
        ring.wait_for_slot().unwrap();
        // Only the pending fence was actually waited on.
        assert_eq!(ring.current().fence.waits.get(), 1);
    }

    #[test]
    fn test_wait_for_all_only_waits_on_pending_fences() {
        let ring = slots(2);
        ring.slots[1].fence.signaled.set(false);

        assert!(matches!(ring.wait_for_all(), Err(PresentError::FenceTimeout)));
        assert_eq!(ring.slots[0].fence.waits.get(), 0);
        assert_eq!(ring.slots[1].fence.waits.get(), 1);
    }

    #[test]
    fn test_replace_current_restores_reuse() {
        let mut ring = slots(2);
        ring.next_slot();
        ring.reset_slot().unwrap();
        assert!(ring.wait_for_slot().is_err());

        ring.replace_current(TestSlot {
            index: 1,
            fence: TestFence {
                signaled: Cell::new(true),
                waits: Cell::new(0),
            },
        });

        assert_eq!(ring.current_index(), 1);
        ring.wait_for_slot().unwrap();
    }

    #[test]
    fn test_zero_slots_rejected() {
        let result = FrameSlots::<TestSlot>::with_count(0, |_| unreachable!());
        assert!(result.is_err());
    }
}
