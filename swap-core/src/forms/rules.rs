/// A single validation rule: a predicate and the message reported when it
/// fails.
///
/// Rules for one field are kept in an ordered slice; [`first_failure`]
/// walks them in order and reports the first one that does not hold.
pub struct Rule<T: ?Sized> {
    pub check: fn(&T) -> bool,
    pub message: &'static str,
}

impl<T: ?Sized> Rule<T> {
    pub const fn new(
        check: fn(&T) -> bool,
        message: &'static str,
    ) -> Self {
        Self { check, message }
    }
}

/// Message of the first rule `value` violates, if any.
pub fn first_failure<T: ?Sized>(
    value: &T,
    rules: &[Rule<T>],
) -> Option<&'static str> {
    rules.iter().find(|rule| !(rule.check)(value)).map(|rule| rule.message)
}
