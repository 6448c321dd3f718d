//! Argument extraction

use crate::descriptor::ArgType;
use oprec_strategy::Payload;

/// Picks the argument a strategy operates on
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgumentExtractor;

impl ArgumentExtractor {
    /// First non-null argument matching `args_type`
    #[must_use]
    pub fn extract<'a>(args: &'a [Option<Payload>], args_type: &ArgType) -> Option<&'a Payload> {
        args.iter().flatten().find(|arg| args_type.matches(arg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Patch;

    #[test]
    fn empty_list_is_absent() {
        assert!(ArgumentExtractor::extract(&[], &ArgType::Any).is_none());
    }

    #[test]
    fn any_skips_nulls() {
        let args = vec![None, Some(Payload::new(7_i64)), Some(Payload::new(Patch))];
        let found = ArgumentExtractor::extract(&args, &ArgType::Any).unwrap();
        assert_eq!(found.downcast_ref::<i64>(), Some(&7));
    }

    #[test]
    fn typed_picks_first_match() {
        let first = Payload::new(Patch);
        let args = vec![
            Some(Payload::new(7_i64)),
            Some(first.clone()),
            Some(Payload::new(Patch)),
        ];
        let found = ArgumentExtractor::extract(&args, &ArgType::of::<Patch>()).unwrap();
        assert!(found.ptr_eq(&first));
    }

    #[test]
    fn no_match_is_absent() {
        let args = vec![Some(Payload::new(7_i64)), None];
        assert!(ArgumentExtractor::extract(&args, &ArgType::of::<Patch>()).is_none());
        assert!(ArgumentExtractor::extract(&[None, None], &ArgType::Any).is_none());
    }

    #[test]
    fn named_matches_bare_type_name() {
        let args = vec![Some(Payload::new(7_i64)), Some(Payload::new(Patch))];
        let found = ArgumentExtractor::extract(&args, &ArgType::named("Patch")).unwrap();
        assert!(found.is::<Patch>());
    }
}
