/// The reversible unit of mutation tracked by the history.
use anyhow::Result;

/// A recorded command as stored by the history.
pub type BoxedCommand<T> = Box<dyn Command<T> + Send>;

/// A mutation of some target state `T` that knows how to reverse itself.
///
/// The caller runs `apply` before (or after) handing the command to the
/// `HistoryManager`; the manager itself only ever calls `invert` on undo
/// and `reapply` on redo. Any value needed to invert must be captured at
/// construction or on the first `apply`.
pub trait Command<T> {
    /// Performs the forward mutation.
    fn apply(&mut self, target: &mut T) -> Result<()>;

    /// Reverses the most recent `apply` or `reapply`.
    fn invert(&mut self, target: &mut T) -> Result<()>;

    /// Re-runs the mutation after an undo.
    ///
    /// Defaults to `apply`. Override when redo has to recompute state
    /// instead of replaying the original mutation.
    fn reapply(&mut self, target: &mut T) -> Result<()> {
        self.apply(target)
    }

    /// Label used in log output.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Add(i64);

    impl Command<i64> for Add {
        fn apply(&mut self, target: &mut i64) -> Result<()> {
            *target += self.0;
            Ok(())
        }

        fn invert(&mut self, target: &mut i64) -> Result<()> {
            *target -= self.0;
            Ok(())
        }
    }

    struct Stamp {
        applied: u32,
        reapplied: u32,
    }

    impl Command<i64> for Stamp {
        fn apply(&mut self, _target: &mut i64) -> Result<()> {
            self.applied += 1;
            Ok(())
        }

        fn invert(&mut self, _target: &mut i64) -> Result<()> {
            Ok(())
        }

        fn reapply(&mut self, _target: &mut i64) -> Result<()> {
            self.reapplied += 1;
            Ok(())
        }

        fn name(&self) -> &str {
            "stamp"
        }
    }

    #[test]
    fn test_default_reapply_calls_apply() {
        let mut value = 1;
        let mut cmd = Add(4);
        cmd.apply(&mut value).unwrap();
        cmd.invert(&mut value).unwrap();
        assert_eq!(value, 1);

        cmd.reapply(&mut value).unwrap();
        assert_eq!(value, 5);
    }

    #[test]
    fn test_overridden_reapply_is_used() {
        let mut value = 0;
        let mut cmd = Stamp {
            applied: 0,
            reapplied: 0,
        };
        cmd.apply(&mut value).unwrap();
        cmd.reapply(&mut value).unwrap();
        assert_eq!(cmd.applied, 1);
        assert_eq!(cmd.reapplied, 1);
    }

    #[test]
    fn test_default_name_is_type_name() {
        let cmd = Add(1);
        assert!(cmd.name().ends_with("Add"));

        let boxed: Box<dyn Command<i64>> = Box::new(Stamp {
            applied: 0,
            reapplied: 0,
        });
        assert_eq!(boxed.name(), "stamp");
    }
}
