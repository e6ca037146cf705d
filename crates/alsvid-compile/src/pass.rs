//! Pass trait and per-pass counters.

use alsvid_ir::CircuitDag;

use crate::error::CompileResult;

/// Net gate-count effect of one pass run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassCounters {
    /// Gates removed from the DAG by this pass.
    pub gates_removed: usize,
    /// Gates added to the DAG by this pass.
    pub gates_added: usize,
}

impl PassCounters {
    /// Reset both counters to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Net change in gate count; negative means reduction.
    pub fn net_change(&self) -> isize {
        self.gates_added as isize - self.gates_removed as isize
    }
}

/// An optimization pass over a circuit DAG.
///
/// Passes are the unit of work in the pipeline. Each `run` must reset its
/// counters first, leave the DAG satisfying all of its invariants, and
/// report the net node changes it caused through [`Pass::counters`].
pub trait Pass: Send + Sync {
    /// Stable name used in statistics.
    fn name(&self) -> &str;

    /// Run the pass, transforming the DAG in place.
    fn run(&mut self, dag: &mut CircuitDag) -> CompileResult<()>;

    /// Counters from the most recent run.
    fn counters(&self) -> PassCounters;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullPass {
        counters: PassCounters,
    }

    impl Pass for NullPass {
        fn name(&self) -> &str {
            "NullPass"
        }

        fn run(&mut self, _dag: &mut CircuitDag) -> CompileResult<()> {
            self.counters.reset();
            Ok(())
        }

        fn counters(&self) -> PassCounters {
            self.counters
        }
    }

    #[test]
    fn test_counters_net_change() {
        let counters = PassCounters {
            gates_removed: 3,
            gates_added: 1,
        };
        assert_eq!(counters.net_change(), -2);
    }

    #[test]
    fn test_pass_object_safety() {
        let mut pass: Box<dyn Pass> = Box::new(NullPass {
            counters: PassCounters::default(),
        });
        let mut dag = CircuitDag::new(1).unwrap();
        pass.run(&mut dag).unwrap();
        assert_eq!(pass.name(), "NullPass");
        assert_eq!(pass.counters(), PassCounters::default());
    }
}
