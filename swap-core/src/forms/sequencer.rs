use tracing::debug;

/// A form split into a fixed number of steps, each with its own validity
/// predicate. Steps are numbered from 1.
pub trait StepForm {
    const STEP_COUNT: usize;

    /// Whether `step` has every field it requires.
    fn is_step_valid(
        &self,
        step: usize,
    ) -> bool;
}

/// What happened on a call to [`StepSequencer::next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved forward to the contained step.
    Moved(usize),
    /// The current step is not valid; nothing changed.
    Blocked,
    /// Already on the last step; nothing changed.
    AtLastStep,
}

/// Position among `total` steps, always within `1..=total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSequencer {
    current: usize,
    total: usize,
}

impl StepSequencer {
    pub fn new(total: usize) -> Self {
        Self {
            current: 1,
            total: total.max(1),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_last(&self) -> bool {
        self.current == self.total
    }

    /// Whether `step` lies behind the current step.
    pub fn is_completed(
        &self,
        step: usize,
    ) -> bool {
        step < self.current
    }

    /// Moves forward when the current step is valid.
    pub fn next<F: StepForm + ?Sized>(
        &mut self,
        form: &F,
    ) -> Advance {
        if self.is_last() {
            return Advance::AtLastStep;
        }
        if !form.is_step_valid(self.current) {
            debug!(step = self.current, "step invalid, staying put");
            return Advance::Blocked;
        }
        self.current += 1;
        debug!(step = self.current, "advanced");
        Advance::Moved(self.current)
    }

    /// Moves back one step, never below step 1.
    pub fn previous(&mut self) -> usize {
        if self.current > 1 {
            self.current -= 1;
            debug!(step = self.current, "went back");
        }
        self.current
    }

    /// Whether `step` may be selected directly: any step up to the current
    /// one, or the step right after it when the current step is valid.
    pub fn is_accessible<F: StepForm + ?Sized>(
        &self,
        step: usize,
        form: &F,
    ) -> bool {
        if step == 0 || step > self.total {
            return false;
        }
        step <= self.current || (step == self.current + 1 && form.is_step_valid(self.current))
    }

    /// Jumps to `step` when it is accessible. Returns whether it moved.
    pub fn go_to<F: StepForm + ?Sized>(
        &mut self,
        step: usize,
        form: &F,
    ) -> bool {
        if !self.is_accessible(step, form) {
            debug!(step, current = self.current, "step not accessible");
            return false;
        }
        self.current = step;
        true
    }
}
