/// The position of one pool slot in the chain of its list.
///
/// `None` is the sentinel for "no slot" and terminates the chain in both directions.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Link {
    pub(crate) next: Option<usize>,
    pub(crate) previous: Option<usize>,
}

impl Link {
    #[must_use]
    pub(crate) fn between(previous: Option<usize>, next: Option<usize>) -> Self {
        Self { next, previous }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_detached() {
        let link = Link::default();

        assert_eq!(link.next, None);
        assert_eq!(link.previous, None);
    }

    #[test]
    fn between_assigns_both_sides() {
        let link = Link::between(Some(3), Some(7));

        assert_eq!(link.previous, Some(3));
        assert_eq!(link.next, Some(7));
    }
}
