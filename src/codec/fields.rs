//! Typed access to the fields of a JSON object fragment.
//!
//! Every accessor reports failures as [`CodecError::Schema`] carrying the
//! dotted path of the offending field, so errors point at the exact spot in
//! the document (`GameOptions.Name`, `Objects[12].UID`, ...).

use serde_json::{Map, Value};

use super::CodecError;

/// A JSON object as handed over by the document parser.
pub type Fragment = Map<String, Value>;

/// A borrowed object fragment together with its path inside the document.
#[derive(Debug, Clone)]
pub struct Fields<'a> {
    map: &'a Fragment,
    path: String,
}

impl<'a> Fields<'a> {
    pub fn new(map: &'a Fragment, path: impl Into<String>) -> Self {
        Self {
            map,
            path: path.into(),
        }
    }

    /// View `value` as an object fragment, failing if it is anything else.
    pub fn of(value: &'a Value, path: impl Into<String>) -> Result<Self, CodecError> {
        let path = path.into();
        match value.as_object() {
            Some(map) => Ok(Self { map, path }),
            None => Err(CodecError::schema(path, "expected an object")),
        }
    }

    pub fn map(&self) -> &'a Fragment {
        self.map
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Dotted path of `key` relative to the document root.
    pub fn path_to(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key)
    }

    pub fn require(&self, key: &str) -> Result<&'a Value, CodecError> {
        self.map
            .get(key)
            .ok_or_else(|| CodecError::missing(self.path_to(key)))
    }

    /// A nested object that must be present.
    pub fn section(&self, key: &str) -> Result<Fields<'a>, CodecError> {
        Fields::of(self.require(key)?, self.path_to(key))
    }

    pub fn int(&self, key: &str) -> Result<i64, CodecError> {
        let value = self.require(key)?;
        value
            .as_i64()
            .ok_or_else(|| CodecError::schema(self.path_to(key), format!("expected an integer, got {value}")))
    }

    /// An integer that must also fit the target type (e.g. `u32` dimensions).
    pub fn int_as<T: TryFrom<i64>>(&self, key: &str) -> Result<T, CodecError> {
        let raw = self.int(key)?;
        T::try_from(raw).map_err(|_| {
            CodecError::schema(
                self.path_to(key),
                format!("integer {raw} is out of range"),
            )
        })
    }

    /// An integer field that may be absent or `null`.
    pub fn opt_int(&self, key: &str) -> Result<Option<i64>, CodecError> {
        match self.map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.int(key).map(Some),
        }
    }

    pub fn string(&self, key: &str) -> Result<&'a str, CodecError> {
        let value = self.require(key)?;
        value
            .as_str()
            .ok_or_else(|| CodecError::schema(self.path_to(key), format!("expected a string, got {value}")))
    }

    /// A string field that may be absent or `null`.
    pub fn opt_string(&self, key: &str) -> Result<Option<&'a str>, CodecError> {
        match self.map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.string(key).map(Some),
        }
    }

    /// A strict JSON boolean.
    pub fn boolean(&self, key: &str) -> Result<bool, CodecError> {
        let value = self.require(key)?;
        value
            .as_bool()
            .ok_or_else(|| CodecError::schema(self.path_to(key), format!("expected a boolean, got {value}")))
    }

    /// A flag written either as a boolean or as the integers 0 and 1.
    pub fn flag(&self, key: &str) -> Result<bool, CodecError> {
        match self.require(key)? {
            Value::Bool(b) => Ok(*b),
            value => match value.as_i64() {
                Some(0) => Ok(false),
                Some(1) => Ok(true),
                _ => Err(CodecError::schema(
                    self.path_to(key),
                    format!("expected 0, 1 or a boolean, got {value}"),
                )),
            },
        }
    }

    pub fn array(&self, key: &str) -> Result<&'a [Value], CodecError> {
        let value = self.require(key)?;
        value
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| CodecError::schema(self.path_to(key), "expected an array"))
    }
}

/// Convert a 0/1 flag into its wire integer.
pub fn flag_value(flag: bool) -> Value {
    Value::from(u8::from(flag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "Name": "Home",
            "Wide": 42,
            "Negative": -3,
            "Float": 1.5,
            "On": true,
            "F": 1,
            "Nothing": null,
            "Inner": { "Deep": "yes" },
            "List": [1, 2, 3]
        })
    }

    #[test]
    fn reads_typed_fields() {
        let doc = sample();
        let fields = Fields::of(&doc, "").unwrap();
        assert_eq!(fields.string("Name").unwrap(), "Home");
        assert_eq!(fields.int("Wide").unwrap(), 42);
        assert_eq!(fields.int_as::<u32>("Wide").unwrap(), 42);
        assert!(fields.boolean("On").unwrap());
        assert!(fields.flag("F").unwrap());
        assert!(fields.flag("On").unwrap());
        assert_eq!(fields.array("List").unwrap().len(), 3);
        assert_eq!(fields.section("Inner").unwrap().string("Deep").unwrap(), "yes");
    }

    #[test]
    fn missing_field_reports_full_path() {
        let doc = sample();
        let inner = Fields::of(&doc, "").unwrap().section("Inner").unwrap();
        let err = inner.int("Missing").unwrap_err();
        assert_eq!(err, CodecError::missing("Inner.Missing"));
    }

    #[test]
    fn wrong_types_rejected() {
        let doc = sample();
        let fields = Fields::of(&doc, "root").unwrap();
        assert!(fields.int("Name").is_err());
        assert!(fields.int("Float").is_err());
        assert!(fields.string("Wide").is_err());
        assert!(fields.boolean("F").is_err());
        assert!(fields.section("List").is_err());
        assert!(fields.int_as::<u32>("Negative").is_err());
    }

    #[test]
    fn optional_fields_treat_null_as_absent() {
        let doc = sample();
        let fields = Fields::of(&doc, "").unwrap();
        assert_eq!(fields.opt_int("Nothing").unwrap(), None);
        assert_eq!(fields.opt_int("Absent").unwrap(), None);
        assert_eq!(fields.opt_int("Wide").unwrap(), Some(42));
        assert_eq!(fields.opt_string("Nothing").unwrap(), None);
        assert!(fields.opt_string("Wide").is_err());
    }

    #[test]
    fn flag_rejects_other_integers() {
        let doc = json!({ "F": 2 });
        let fields = Fields::of(&doc, "").unwrap();
        assert!(fields.flag("F").is_err());
    }

    #[test]
    fn non_object_root_rejected() {
        let doc = json!([1, 2]);
        assert!(Fields::of(&doc, "Objects[0]").is_err());
    }
}
