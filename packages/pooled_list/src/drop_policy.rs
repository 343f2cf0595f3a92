/// Determines item dropping behavior when a list is dropped.
///
/// By default, the list will drop its items when it is dropped.
///
/// # Examples
///
/// ```
/// use pooled_list::{DropPolicy, ValueList};
///
/// // The drop policy is set at list creation time.
/// let list = ValueList::<u32, 8>::builder()
///     .drop_policy(DropPolicy::MustNotDropItems)
///     .build();
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum DropPolicy {
    /// The list will drop its items when the list is dropped. This is the default.
    #[default]
    MayDropItems,

    /// The list will panic if it still contains items when it is dropped.
    ///
    /// This may be valuable if every item must be explicitly erased before the list goes away,
    /// for example because erasing an item is what releases some resource tracked elsewhere.
    MustNotDropItems,
}
