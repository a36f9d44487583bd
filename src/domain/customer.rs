use async_trait::async_trait;
use derive_more::{Display, Error};
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::domain::DataAccessError;

const SURNAME: &str = "apellido_cliente";
const FIRST_NAME: &str = "nombre_cliente";
const STORE: &str = "tienda";
const PURCHASES: &str = "compras";
const BRAND: &str = "marca";

/// 顧客リポジトリ
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// 全顧客をデータソースから読み込む
    async fn find_all(&self) -> Result<Vec<Customer>, DataAccessError>;
}

/// 顧客
///
/// 元のレコードをキー順ごと保持し、シリアライズ時はそのまま書き戻す。
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Customer {
    surname: String,
    first_name: String,
    store: String,
    purchases: Vec<Purchase>,
    // `compras` の位置は残し、値は `purchases` に移す
    record: Map<String, Value>,
}

impl Customer {
    pub fn new(
        surname: String,
        first_name: String,
        store: String,
        purchases: Vec<Purchase>,
    ) -> Self {
        let mut record = Map::new();
        record.insert(SURNAME.to_owned(), Value::from(surname.as_str()));
        record.insert(FIRST_NAME.to_owned(), Value::from(first_name.as_str()));
        record.insert(STORE.to_owned(), Value::from(store.as_str()));
        record.insert(PURCHASES.to_owned(), Value::Null);
        Self {
            surname,
            first_name,
            store,
            purchases,
            record,
        }
    }

    pub fn surname(&self) -> &str {
        &self.surname
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn store(&self) -> &str {
        &self.store
    }

    pub fn purchases(&self) -> &[Purchase] {
        &self.purchases
    }

    /// 元のレコードの属性（`compras` を除く）
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        match key {
            PURCHASES => None,
            _ => self.record.get(key),
        }
    }

    pub fn into_purchases(self) -> Vec<Purchase> {
        self.purchases
    }

    /// 店舗名が一致するか（大文字小文字を区別しない）
    pub fn shops_at(&self, store: &str) -> bool {
        eq_ignore_case(&self.store, store)
    }

    /// 姓と名が完全に一致するか（大文字小文字を区別しない）
    pub fn is_named(&self, surname: &str, first_name: &str) -> bool {
        eq_ignore_case(&self.surname, surname) && eq_ignore_case(&self.first_name, first_name)
    }

    /// 姓が一致し、名が前方一致するか（大文字小文字を区別しない）
    pub fn is_named_like(&self, surname: &str, prefix: &str) -> bool {
        eq_ignore_case(&self.surname, surname)
            && self.first_name.to_lowercase().starts_with(&prefix.to_lowercase())
    }
}

impl TryFrom<Map<String, Value>> for Customer {
    type Error = RecordError;

    fn try_from(mut record: Map<String, Value>) -> Result<Self, Self::Error> {
        let surname = string_field(&record, SURNAME)?;
        let first_name = string_field(&record, FIRST_NAME)?;
        let store = string_field(&record, STORE)?;
        let purchases = match record.get_mut(PURCHASES).map(Value::take) {
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(map) => Purchase::try_from(map),
                    _ => Err(RecordError::InvalidField(PURCHASES)),
                })
                .collect::<Result<Vec<_>, _>>()?,
            _ => return Err(RecordError::InvalidField(PURCHASES)),
        };
        Ok(Self {
            surname,
            first_name,
            store,
            purchases,
            record,
        })
    }
}

impl Serialize for Customer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.record.len()))?;
        for (key, value) in &self.record {
            if key == PURCHASES {
                map.serialize_entry(key, &self.purchases)?;
            } else {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

/// 購入品
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Purchase {
    brand: String,
    record: Map<String, Value>,
}

impl Purchase {
    pub fn new(brand: String) -> Self {
        let mut record = Map::new();
        record.insert(BRAND.to_owned(), Value::from(brand.as_str()));
        Self { brand, record }
    }

    pub fn with_attribute(mut self, key: &str, value: Value) -> Self {
        if key != BRAND {
            self.record.insert(key.to_owned(), value);
        }
        self
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.record.get(key)
    }

    pub fn is_brand(&self, brand: &str) -> bool {
        eq_ignore_case(&self.brand, brand)
    }
}

impl TryFrom<Map<String, Value>> for Purchase {
    type Error = RecordError;

    fn try_from(record: Map<String, Value>) -> Result<Self, Self::Error> {
        let brand = string_field(&record, BRAND)?;
        Ok(Self { brand, record })
    }
}

impl Serialize for Purchase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.record.serialize(serializer)
    }
}

/// レコード形式エラー
#[derive(Error, Display, Debug, PartialEq, Eq)]
pub enum RecordError {
    /// 必須項目がない、または型が違う
    #[display(fmt = "missing or invalid field `{}`", _0)]
    InvalidField(#[error(not(source))] &'static str),
}

fn string_field(record: &Map<String, Value>, key: &'static str) -> Result<String, RecordError> {
    record
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or(RecordError::InvalidField(key))
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const RECORD: &str = r#"{"id":7,"apellido_cliente":"Muñoz","nombre_cliente":"Ángela","email":"angela@example.com","tienda":"Barcelona","compras":[{"producto":"Zapatillas","marca":"Nike","precio":89.9},{"producto":"Camiseta","marca":"Adidas","precio":25}],"alta":"2023-04-01"}"#;

    fn customer() -> Customer {
        serde_json::from_str(RECORD).unwrap()
    }

    #[test]
    fn test_customer_deserialize() {
        let customer = customer();
        assert_eq!(customer.surname(), "Muñoz");
        assert_eq!(customer.first_name(), "Ángela");
        assert_eq!(customer.store(), "Barcelona");
        assert_eq!(customer.purchases().len(), 2);
        assert_eq!(customer.purchases()[1].brand(), "Adidas");
        assert_eq!(customer.attribute("id"), Some(&json!(7)));
        assert_eq!(customer.attribute("compras"), None);
        assert_eq!(
            customer.purchases()[0].attribute("producto"),
            Some(&json!("Zapatillas"))
        );
    }

    #[test]
    fn test_customer_serialize_keeps_key_order() {
        assert_eq!(serde_json::to_string(&customer()).unwrap(), RECORD);
    }

    #[test]
    fn test_purchase_serialize_keeps_key_order() {
        let source = r#"{"producto":"Chaqueta","marca":"Nike","precio":120}"#;
        let purchase = serde_json::from_str::<Purchase>(source).unwrap();
        assert_eq!(serde_json::to_string(&purchase).unwrap(), source);
    }

    #[test]
    fn test_customer_new() {
        let customer = Customer::new(
            "Smith".to_owned(),
            "Ana".to_owned(),
            "Madrid".to_owned(),
            vec![Purchase::new("Nike".to_owned()).with_attribute("precio", json!(10))],
        );
        assert_eq!(
            serde_json::to_string(&customer).unwrap(),
            r#"{"apellido_cliente":"Smith","nombre_cliente":"Ana","tienda":"Madrid","compras":[{"marca":"Nike","precio":10}]}"#
        );
    }

    #[test]
    fn test_customer_requires_fields() {
        let cases = [
            (json!({ "apellido_cliente": "Muñoz", "tienda": "Barcelona", "compras": [] }), FIRST_NAME),
            (
                json!({ "apellido_cliente": "Muñoz", "nombre_cliente": 3, "tienda": "Barcelona", "compras": [] }),
                FIRST_NAME,
            ),
            (
                json!({ "apellido_cliente": "Muñoz", "nombre_cliente": "Ángela", "tienda": "Barcelona" }),
                PURCHASES,
            ),
            (
                json!({ "apellido_cliente": "Muñoz", "nombre_cliente": "Ángela", "tienda": "Barcelona", "compras": ["Nike"] }),
                PURCHASES,
            ),
            (
                json!({ "apellido_cliente": "Muñoz", "nombre_cliente": "Ángela", "tienda": "Barcelona", "compras": [{ "producto": "Gorra" }] }),
                BRAND,
            ),
        ];
        for (value, field) in cases {
            let Value::Object(record) = value else {
                unreachable!()
            };
            assert_eq!(
                Customer::try_from(record),
                Err(RecordError::InvalidField(field))
            );
        }
        assert!(serde_json::from_str::<Customer>(r#"["Muñoz"]"#).is_err());
    }

    #[test]
    fn test_shops_at() {
        let customer = customer();
        assert!(customer.shops_at("barcelona"));
        assert!(customer.shops_at("BARCELONA"));
        assert!(!customer.shops_at("Barcelon"));
        assert!(!customer.shops_at("Madrid"));
    }

    #[test]
    fn test_is_named() {
        let customer = customer();
        assert!(customer.is_named("MUÑOZ", "ángela"));
        assert!(!customer.is_named("Muñoz", "Ángel"));
        assert!(!customer.is_named("Munoz", "Ángela"));
    }

    #[test]
    fn test_is_named_like() {
        let customer = customer();
        assert!(customer.is_named_like("muñoz", "án"));
        assert!(customer.is_named_like("Muñoz", "ÁNGELA"));
        assert!(!customer.is_named_like("Muñoz", "an"));
        assert!(!customer.is_named_like("Muño", "Án"));
    }

    #[test]
    fn test_is_brand() {
        let purchase = Purchase::new("Nike".to_owned());
        assert!(purchase.is_brand("nike"));
        assert!(!purchase.is_brand("adidas"));
    }
}
