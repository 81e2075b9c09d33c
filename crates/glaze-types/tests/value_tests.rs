use glaze_types::formatting::{is_blank, mask, percent};
use glaze_types::*;
use std::sync::Arc;

#[derive(Debug)]
struct Pending(Vec<Value>);

impl Relation for Pending {
    fn to_ordered_sequence(&self) -> Vec<Value> {
        self.0.clone()
    }
}

#[test]
fn test_relation_serializes_as_sequence() {
    let relation = Value::relation(Pending(vec![Value::from(1), Value::from("two")]));

    let json = serde_json::to_value(&relation).expect("serializable");

    assert_eq!(json, serde_json::json!([1, "two"]));
    assert!(!is_blank(&relation));
    assert!(is_blank(&Value::relation(Pending(Vec::new()))));
}

#[test]
fn test_presented_serializes_as_its_fields() {
    let mut fields = Fields::new();
    fields.insert("id".to_string(), Value::from(2));
    fields.insert("name".to_string(), Value::from("nick"));
    fields.insert("manager".to_string(), Value::Null);
    let presented = Value::from(Presented::new(Arc::from("EmployeePresenter"), fields));

    insta::assert_json_snapshot!(presented, @r#"
    {
      "id": 2,
      "name": "nick",
      "manager": null
    }
    "#);
    assert_eq!(presented.member("name"), Some(Value::from("nick")));
}

#[test]
fn test_formatting_helpers_accept_numeric_strings() {
    assert_eq!(percent(&Value::from("12.5")), "12.50 %");
    assert_eq!(mask(&Value::from(98765), 4, "#"), "#8765");
}
