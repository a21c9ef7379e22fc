//! Macros for declaring state identifiers.

/// Declare [`StateId`](crate::core::StateId) constants named after their
/// identifiers.
///
/// Each constant holds its own name as ASCII bytes, so logs show `FUNDING`
/// rather than a hex blob. Names longer than 32 bytes fail to compile.
///
/// # Example
///
/// ```
/// use waypoint::state_ids;
///
/// state_ids! {
///     pub SETUP,
///     pub FUNDING,
///     /// Sale finished, refunds or payouts only.
///     pub CLOSED,
/// }
///
/// assert_eq!(FUNDING.to_string(), "FUNDING");
/// assert_ne!(SETUP, CLOSED);
/// ```
#[macro_export]
macro_rules! state_ids {
    (
        $(
            $(#[$meta:meta])*
            $vis:vis $name:ident
        ),+ $(,)?
    ) => {
        $(
            $(#[$meta])*
            $vis const $name: $crate::core::StateId =
                $crate::core::StateId::from_name(stringify!($name));
        )+
    };
}
