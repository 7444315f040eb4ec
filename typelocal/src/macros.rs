
/// Declares process-wide [`TypeLocal`](crate::TypeLocal) caches, built on first access.
///
/// ```
/// use typelocal::{type_local, TypeKey};
///
/// type_local! {
///     static TYPE_NAMES: TypeLocal<String> = |key: TypeKey| key.name().to_uppercase();
/// }
///
/// assert_eq!(*TYPE_NAMES.get_of::<u8>().unwrap(), "U8");
/// ```
#[macro_export]
macro_rules! type_local {
    ($($(#[$attr:meta])* $vis:vis static $name:ident : TypeLocal<$v:ty> = $init:expr;)+) => {
        $(
            $(#[$attr])*
            $vis static $name: $crate::once_cell::sync::Lazy<$crate::TypeLocal<$v>> =
                $crate::once_cell::sync::Lazy::new(|| $crate::TypeLocal::with_initial($init));
        )+
    };
}
