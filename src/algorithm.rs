//! Both solvers are implemented in terms of the [`IterativeAlgorithm`] trait.
//!
//! The idea is that an algorithm does a bounded chunk of work per step (say a
//! few milliseconds) and then returns control to the caller. This keeps the
//! solvers interruptible: a driver can impose a wall-clock budget without the
//! algorithms themselves knowing about deadlines.

use std::time::{Duration, Instant};

/// [`IterativeAlgorithm`] provides a consistent interface to execute our
/// solvers. It does not prescribe a constructor; each algorithm has specific
/// parameters (graph, rng, bounds) and construction should be cheap.
///
/// Implementors provide [`IterativeAlgorithm::execute_step`],
/// [`IterativeAlgorithm::is_completed`] and
/// [`IterativeAlgorithm::best_known_solution`]. Algorithms that are known to
/// eventually terminate should also implement the marker trait
/// [`TerminatingIterativeAlgorithm`] to gain
/// [`TerminatingIterativeAlgorithm::run_to_completion`].
pub trait IterativeAlgorithm<Result> {
    /// Advances the computation. A step should take on the order of
    /// milliseconds and not significantly exceed a second for expected inputs.
    fn execute_step(&mut self);

    /// Returns true iff the algorithm is completed and
    /// [`IterativeAlgorithm::execute_step`] may not be called again.
    fn is_completed(&self) -> bool;

    /// Returns the currently best known solution or None if no solution is
    /// known yet.
    fn best_known_solution(&mut self) -> Option<Result>;

    /// Keeps calling [`IterativeAlgorithm::execute_step`] until `predicate`
    /// becomes false or [`IterativeAlgorithm::is_completed`] becomes true. The
    /// predicate is evaluated after each step, i.e. one step is carried out
    /// even if the predicate always returns false.
    fn run_while<F: FnMut(&mut Self) -> bool>(&mut self, mut predicate: F) {
        while !self.is_completed() {
            self.execute_step();

            if !predicate(self) {
                break;
            }
        }
    }

    /// Keeps calling [`IterativeAlgorithm::execute_step`] until a timeout
    /// occurred or [`IterativeAlgorithm::is_completed`] is true. The timeout
    /// is only guaranteed in the sense that `execute_step` is not called again
    /// after it elapsed; a single overlong step will overshoot the deadline.
    fn run_until_timeout(&mut self, timeout: Duration) {
        let start = Instant::now();
        self.run_while(|_| start.elapsed() < timeout);
    }
}

/// Marker trait for algorithms that terminate on their own.
pub trait TerminatingIterativeAlgorithm<Result>: IterativeAlgorithm<Result> {
    /// Runs the algorithm until [`IterativeAlgorithm::is_completed`] and
    /// returns the best solution found.
    fn run_to_completion(&mut self) -> Option<Result> {
        self.run_while(|_| true);
        self.best_known_solution()
    }
}
