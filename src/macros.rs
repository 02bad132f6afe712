/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// Dictionary keys must be string literals. Leaf expressions go through
/// `Value::from`, so anything with a `From` impl works; wrap multi-token
/// expressions such as negative numbers in parentheses.
///
/// # Examples
///
/// ```rust
/// use serde_bplist::{plist, Uid, Value};
///
/// let value = plist!({
///     "name": "Alice",
///     "scores": [1, (-2), 3.5],
///     "owner": (Uid::from(4u64)),
///     "extra": null
/// });
/// assert_eq!(value.as_dictionary().map(|d| d.len()), Some(4));
/// ```
#[macro_export]
macro_rules! plist {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::plist!($elem)),*])
    };

    ({}) => {
        $crate::Value::Dictionary($crate::Dictionary::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut dict = $crate::Dictionary::new();
        $(
            dict.insert($key.to_string(), $crate::plist!($value));
        )*
        $crate::Value::Dictionary(dict)
    }};

    ($other:expr) => {
        $crate::Value::from($other)
    };
}
