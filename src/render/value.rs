use crate::value::List;
use crate::Value;

/// Item access, i.e. `value[key]`.
///
/// Maps are indexed by the key's text, lists by an integer key or a string
/// that parses as one and objects by the lowercased key as a field name.
pub fn get_item(value: &Value, key: &Value) -> Option<Value> {
    match value {
        Value::Map(map) => map.get(&*key_text(key)?).cloned(),
        Value::List(list) => {
            let i = match key {
                Value::Integer(i) => *i,
                Value::String(s) => s.parse().ok()?,
                _ => return None,
            };
            index(list, i).cloned()
        }
        Value::Object(obj) => obj.get_field(&key_text(key)?.to_lowercase()),
        _ => None,
    }
}

/// Field access by an already lowercased name.
pub fn get_field(value: &Value, name: &str) -> Option<Value> {
    match value {
        Value::Object(obj) => obj.get_field(name),
        Value::Map(map) => map.get(name).cloned(),
        _ => None,
    }
}

/// Index into a list, negative indices count from the end.
pub fn index(list: &List<Value>, i: i64) -> Option<&Value> {
    let len = i64::try_from(list.len()).ok()?;
    let i = if i < 0 { len + i } else { i };
    if (0..len).contains(&i) {
        list.get(usize::try_from(i).ok()?)
    } else {
        None
    }
}

/// The text used to look up a map key.
pub fn key_text(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Bytes(b) => Some(String::from_utf8_lossy(b).into_owned()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value;

    #[test]
    fn index_negative() {
        let list = vec![Value::from(1), Value::from(2), Value::from(3)];
        assert_eq!(index(&list, 0), Some(&Value::from(1)));
        assert_eq!(index(&list, -1), Some(&Value::from(3)));
        assert_eq!(index(&list, -3), Some(&Value::from(1)));
        assert_eq!(index(&list, -4), None);
        assert_eq!(index(&list, 3), None);
    }

    #[test]
    fn get_item_map_and_list() {
        let v = value!({ A: "x", "1": "y" });
        assert_eq!(get_item(&v, &Value::from("A")), Some(Value::from("x")));
        assert_eq!(get_item(&v, &Value::from(1)), Some(Value::from("y")));
        let l = value!({ L: ["a", "b"] });
        let l = get_item(&l, &Value::from("L")).unwrap();
        assert_eq!(get_item(&l, &Value::from("1")), Some(Value::from("b")));
        assert_eq!(get_item(&l, &Value::from("x")), None);
    }
}
