#[macro_export]
/// Helper macro to compose `From` implementations.
macro_rules! compose_from {
    ($to:tt, $mid:tt, $($from:ty),*) => {
        $(
            impl From<$from> for $to {
                fn from(f: $from) -> Self { Self::from($mid::from(f)) }
            }
        )*
    };
}

#[macro_export]
/// Helper macro to make implementing `From` easier.
macro_rules! from_fn {
    ($to:ty, $from:ty, $fn:expr) => {
        impl From<$from> for $to {
            fn from(f: $from) -> $to { $fn(f) }
        }
    };
}

/// Product of matrix extents, or `None` on overflow.
///
/// # Example
///
/// ```
/// use beve::util::checked_product;
///
/// assert_eq!(checked_product(&[3, 3]), Some(9));
/// assert_eq!(checked_product(&[]), Some(1));
/// assert_eq!(checked_product(&[u64::max_value(), 2]), None);
/// ```
pub fn checked_product(extents: &[u64]) -> Option<u64> {
    extents.iter().try_fold(1u64, |acc, e| acc.checked_mul(*e))
}
