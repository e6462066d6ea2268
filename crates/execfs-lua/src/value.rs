//! Host-side values passed to and returned from the handler.

use std::collections::HashMap;

use mlua::{FromLua, IntoLua, Lua, Table, Value as LuaValue};
use serde::{Deserialize, Serialize};

/// Nesting depth past which Lua tables are no longer converted.
const MAX_DEPTH: usize = 64;

/// A dynamic value that can cross between the host and the interpreter.
///
/// Lua has one table type, so an empty table converts back as an empty
/// `Array`; an empty `Object` does not survive a round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Nil.
    #[default]
    Null,

    /// Boolean value.
    Bool(bool),

    /// Integer value.
    Integer(i64),

    /// Floating point value.
    Float(f64),

    /// UTF-8 string value.
    String(String),

    /// Sequence table.
    Array(Vec<Value>),

    /// Table with non-sequence keys.
    Object(HashMap<String, Value>),

    /// String that is not valid UTF-8.
    Bytes(Vec<u8>),
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

impl IntoLua for Value {
    fn into_lua(self, lua: &Lua) -> mlua::Result<LuaValue> {
        Ok(match self {
            Value::Null => LuaValue::Nil,
            Value::Bool(b) => LuaValue::Boolean(b),
            Value::Integer(i) => LuaValue::Integer(i),
            Value::Float(f) => LuaValue::Number(f),
            Value::String(s) => LuaValue::String(lua.create_string(&s)?),
            Value::Bytes(b) => LuaValue::String(lua.create_string(&b)?),
            Value::Array(items) => LuaValue::Table(lua.create_sequence_from(items)?),
            Value::Object(map) => LuaValue::Table(lua.create_table_from(map)?),
        })
    }
}

impl FromLua for Value {
    fn from_lua(value: LuaValue, _lua: &Lua) -> mlua::Result<Self> {
        from_lua_value(value, 0)
    }
}

fn from_lua_value(value: LuaValue, depth: usize) -> mlua::Result<Value> {
    Ok(match value {
        LuaValue::Nil => Value::Null,
        LuaValue::Boolean(b) => Value::Bool(b),
        LuaValue::Integer(i) => Value::Integer(i),
        LuaValue::Number(n) => Value::Float(n),
        LuaValue::String(s) => match s.to_str() {
            Ok(text) => Value::String(text.to_string()),
            Err(_) => Value::Bytes(s.as_bytes().to_vec()),
        },
        LuaValue::Table(t) => from_lua_table(t, depth + 1)?,
        // Functions, threads and userdata have no host-side representation.
        _ => Value::Null,
    })
}

fn from_lua_table(table: Table, depth: usize) -> mlua::Result<Value> {
    if depth > MAX_DEPTH {
        return Err(mlua::Error::external("table nested too deeply"));
    }

    let len = table.raw_len();
    let mut pairs = 0usize;
    for pair in table.clone().pairs::<LuaValue, LuaValue>() {
        pair?;
        pairs += 1;
    }

    if pairs == len {
        let mut items = Vec::with_capacity(len);
        for item in table.clone().sequence_values::<LuaValue>() {
            items.push(from_lua_value(item?, depth)?);
        }
        return Ok(Value::Array(items));
    }

    let mut map = HashMap::new();
    for pair in table.pairs::<LuaValue, LuaValue>() {
        let (key, value) = pair?;
        let key = match key {
            LuaValue::String(s) => s.to_string_lossy(),
            LuaValue::Integer(i) => i.to_string(),
            LuaValue::Number(n) => n.to_string(),
            LuaValue::Boolean(b) => b.to_string(),
            _ => continue,
        };
        map.insert(key, from_lua_value(value, depth)?);
    }
    Ok(Value::Object(map))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars_cross_the_boundary() {
        let lua = Lua::new();
        let check: mlua::Function = lua
            .load("return function(...) return ... end")
            .eval()
            .unwrap();

        let args = vec![
            Value::Null,
            Value::Bool(true),
            Value::Integer(42),
            Value::Float(1.5),
            Value::from("hi"),
        ];
        let out: mlua::Variadic<Value> = check.call(mlua::Variadic::from_iter(args.clone())).unwrap();
        assert_eq!(out.to_vec(), args);
    }

    #[test]
    fn test_table_shapes() {
        let lua = Lua::new();

        let seq: Value = lua.load("return {1, 2, 3}").eval().unwrap();
        assert_eq!(seq, Value::from(vec![1i64, 2, 3]));

        let obj: Value = lua.load("return {name = 'x', [1] = true}").eval().unwrap();
        let Value::Object(map) = obj else {
            panic!("expected object");
        };
        assert_eq!(map.get("name"), Some(&Value::from("x")));
        assert_eq!(map.get("1"), Some(&Value::Bool(true)));

        let empty: Value = lua.load("return {}").eval().unwrap();
        assert_eq!(empty, Value::Array(Vec::new()));
    }

    #[test]
    fn test_empty_array_round_trip() {
        let lua = Lua::new();
        let identity: mlua::Function = lua.load("return function(t) return t end").eval().unwrap();

        let out: Value = identity.call(Value::Array(Vec::new())).unwrap();
        assert_eq!(out, Value::Array(Vec::new()));

        let nested: Value = identity
            .call(Value::from(vec![Value::Array(Vec::new())]))
            .unwrap();
        assert_eq!(nested, Value::from(vec![Value::Array(Vec::new())]));
    }

    #[test]
    fn test_binary_string_becomes_bytes() {
        let lua = Lua::new();
        let value: Value = lua.load(r#"return "\255\0\254""#).eval().unwrap();
        assert_eq!(value, Value::Bytes(vec![0xff, 0x00, 0xfe]));
    }

    #[test]
    fn test_cyclic_table_is_rejected() {
        let lua = Lua::new();
        let result: mlua::Result<Value> = lua
            .load("local t = {}; t.self = t; return t")
            .eval();
        assert!(result.is_err());
    }
}
