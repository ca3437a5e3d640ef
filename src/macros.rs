/// Construct a [`Value`][crate::Value] using a JSON-like syntax.
///
/// Map keys are identifiers, written as is, or literals. Values are `None`,
/// nested lists and maps, or any expression that converts into a value.
///
/// # Examples
///
/// ```
/// let value = sigils::value!({
///     ENV: { HOST: "localhost", PORTS: [80, 443] },
///     "db-name": "prod",
///     OPT: None,
/// });
/// ```
#[macro_export]
macro_rules! value {
    (None) => {
        $crate::Value::None
    };

    ([ $($elems:tt)* ]) => {{
        #[allow(unused_mut)]
        let mut list = $crate::List::new();
        $crate::_value_list!(list $($elems)*);
        $crate::Value::List(list)
    }};

    ({ $($entries:tt)* }) => {{
        #[allow(unused_mut)]
        let mut map = $crate::Map::new();
        $crate::_value_map!(map $($entries)*);
        $crate::Value::Map(map)
    }};

    ($other:expr) => {
        $crate::Value::from($other)
    };
}

/// Pushes each comma separated element onto `$list`.
#[macro_export]
#[doc(hidden)]
macro_rules! _value_list {
    ($list:ident) => {};

    ($list:ident None $(, $($rest:tt)*)?) => {
        $list.push($crate::Value::None);
        $crate::_value_list!($list $($($rest)*)?);
    };

    ($list:ident [ $($inner:tt)* ] $(, $($rest:tt)*)?) => {
        $list.push($crate::value!([ $($inner)* ]));
        $crate::_value_list!($list $($($rest)*)?);
    };

    ($list:ident { $($inner:tt)* } $(, $($rest:tt)*)?) => {
        $list.push($crate::value!({ $($inner)* }));
        $crate::_value_list!($list $($($rest)*)?);
    };

    ($list:ident $elem:expr $(, $($rest:tt)*)?) => {
        $list.push($crate::Value::from($elem));
        $crate::_value_list!($list $($($rest)*)?);
    };
}

/// Inserts each `key: value` entry into `$map`.
#[macro_export]
#[doc(hidden)]
macro_rules! _value_map {
    ($map:ident) => {};

    ($map:ident $key:tt : None $(, $($rest:tt)*)?) => {
        let _ = $map.insert($crate::_value_key!($key), $crate::Value::None);
        $crate::_value_map!($map $($($rest)*)?);
    };

    ($map:ident $key:tt : [ $($inner:tt)* ] $(, $($rest:tt)*)?) => {
        let _ = $map.insert($crate::_value_key!($key), $crate::value!([ $($inner)* ]));
        $crate::_value_map!($map $($($rest)*)?);
    };

    ($map:ident $key:tt : { $($inner:tt)* } $(, $($rest:tt)*)?) => {
        let _ = $map.insert($crate::_value_key!($key), $crate::value!({ $($inner)* }));
        $crate::_value_map!($map $($($rest)*)?);
    };

    ($map:ident $key:tt : $value:expr $(, $($rest:tt)*)?) => {
        let _ = $map.insert($crate::_value_key!($key), $crate::Value::from($value));
        $crate::_value_map!($map $($($rest)*)?);
    };
}

/// Identifiers are stringified, literals go through `ToString` so numeric
/// keys work too.
#[macro_export]
#[doc(hidden)]
macro_rules! _value_key {
    ($key:ident) => {
        ::std::string::String::from(::std::stringify!($key))
    };
    ($key:expr) => {
        ::std::string::ToString::to_string(&$key)
    };
}

#[cfg(test)]
mod tests {
    use crate::{List, Map, Value};

    #[test]
    fn value_none() {
        assert_eq!(value!(None), Value::None);
    }

    #[test]
    fn value_list() {
        let v = value!(["testing...", None, {}, [], -7, 1.5,]);
        assert_eq!(
            v,
            Value::from([
                Value::from("testing..."),
                Value::None,
                Value::Map(Map::new()),
                Value::List(List::new()),
                Value::Integer(-7),
                Value::Float(1.5),
            ])
        )
    }

    #[test]
    fn value_map_ident_and_literal_keys() {
        let v = value!({ HOST: "localhost", "db-name": "prod", 8080: true });
        let exp = Value::from([
            ("HOST", Value::from("localhost")),
            ("db-name", Value::from("prod")),
            ("8080", Value::Bool(true)),
        ]);
        assert_eq!(v, exp);
    }

    #[test]
    fn value_map_nested() {
        let port = 8080;
        let v = value!({
            ENV: {
                HOST: "local".to_owned() + "host",
                PORT: port,
                TAGS: ["a", None],
                OPT: None,
            },
        });
        let exp = Value::from([(
            "ENV",
            Value::from([
                ("HOST", Value::from("localhost")),
                ("PORT", Value::from(8080)),
                ("TAGS", Value::from([Value::from("a"), Value::None])),
                ("OPT", Value::None),
            ]),
        )]);
        assert_eq!(v, exp);
    }
}
