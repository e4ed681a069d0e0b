//! Conversion between [`Node`]s and their JSON form.
//!
//! Every node is an object with a `type` tag:
//!
//! | `type`        | Fields                      |
//! | ------------- | --------------------------- |
//! | `integer`     | `value`                     |
//! | `variable`    | `name`                      |
//! | `power`       | `base`, `exponent`          |
//! | `product`     | `factors` (non-empty array) |
//! | `fraction`    | `numerator`, `denominator`  |
//! | `sqrt`        | `radicand`                  |
//! | `binary_op`   | `op`, `left`, `right`       |
//! | `range_query` | `left`, `right`             |
//!
//! Conversion is done by hand rather than through a derived `Deserialize` so that an unknown tag
//! is reported as [`UnsupportedNode`] and a missing field as [`MalformedTree`], each pointing at the
//! offending part of the document.

use crate::error::{MalformedTree, UnsupportedNode};
use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};
use super::{BinOp, Node};
use tutor_error::Error;

/// Creates a [`MalformedTree`] error about the given JSON value.
fn malformed(value: &Value, reason: impl Into<String>) -> Error {
    Error::whole(value.to_string(), MalformedTree { reason: reason.into() })
}

/// Returns the object field with the given name, converted to a [`Node`].
fn child(object: &Map<String, Value>, value: &Value, field: &str) -> Result<Box<Node>, Error> {
    let child = object
        .get(field)
        .ok_or_else(|| malformed(value, format!("missing field `{}`", field)))?;
    Node::from_json(child).map(Box::new)
}

impl Node {
    /// Reads a node from its JSON form.
    pub fn from_json(value: &Value) -> Result<Node, Error> {
        let object = value
            .as_object()
            .ok_or_else(|| malformed(value, "expected an object with a `type` field"))?;
        let tag = object
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed(value, "missing string field `type`"))?;

        match tag {
            "integer" => {
                let raw = object
                    .get("value")
                    .ok_or_else(|| malformed(value, "missing field `value`"))?;
                let int = raw.as_i64()
                    .or_else(|| raw.as_f64().filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15).map(|f| f as i64))
                    .ok_or_else(|| malformed(value, "`value` of an integer must be a whole number"))?;
                Ok(Node::Integer(int))
            },
            "variable" => {
                let name = object
                    .get("name")
                    .and_then(Value::as_str)
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| malformed(value, "`name` of a variable must be a non-empty string"))?;
                Ok(Node::Variable(name.to_string()))
            },
            "power" => Ok(Node::Power(
                child(object, value, "base")?,
                child(object, value, "exponent")?,
            )),
            "product" => {
                let factors = object
                    .get("factors")
                    .and_then(Value::as_array)
                    .ok_or_else(|| malformed(value, "`factors` of a product must be an array"))?;
                if factors.is_empty() {
                    return Err(malformed(value, "a product must have at least one factor"));
                }
                let factors = factors
                    .iter()
                    .map(Node::from_json)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Node::Product(factors))
            },
            "fraction" => Ok(Node::Fraction(
                child(object, value, "numerator")?,
                child(object, value, "denominator")?,
            )),
            "sqrt" => Ok(Node::Sqrt(child(object, value, "radicand")?)),
            "binary_op" => {
                let op = object
                    .get("op")
                    .and_then(Value::as_str)
                    .and_then(BinOp::from_symbol)
                    .ok_or_else(|| malformed(value, "`op` must be one of `+`, `-`, `·`, `:`"))?;
                Ok(Node::BinaryOp(
                    op,
                    child(object, value, "left")?,
                    child(object, value, "right")?,
                ))
            },
            "range_query" => Ok(Node::RangeQuery(
                child(object, value, "left")?,
                child(object, value, "right")?,
            )),
            other => Err(Error::whole(other, UnsupportedNode { tag: other.to_string() })),
        }
    }

    /// Writes the node in its JSON form.
    pub fn to_json(&self) -> Value {
        let tag = self.tag();
        match self {
            Node::Integer(value) => json!({ "type": tag, "value": value }),
            Node::Variable(name) => json!({ "type": tag, "name": name }),
            Node::Power(base, exponent) => json!({
                "type": tag,
                "base": base.to_json(),
                "exponent": exponent.to_json(),
            }),
            Node::Product(factors) => json!({
                "type": tag,
                "factors": factors.iter().map(Node::to_json).collect::<Vec<_>>(),
            }),
            Node::Fraction(numerator, denominator) => json!({
                "type": tag,
                "numerator": numerator.to_json(),
                "denominator": denominator.to_json(),
            }),
            Node::Sqrt(radicand) => json!({ "type": tag, "radicand": radicand.to_json() }),
            Node::BinaryOp(op, left, right) => json!({
                "type": tag,
                "op": op.symbol(),
                "left": left.to_json(),
                "right": right.to_json(),
            }),
            Node::RangeQuery(left, right) => json!({
                "type": tag,
                "left": left.to_json(),
                "right": right.to_json(),
            }),
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{MalformedTree, UnsupportedNode};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use super::*;

    #[test]
    fn read_power_fraction() {
        let value = json!({
            "type": "fraction",
            "numerator": {
                "type": "product",
                "factors": [
                    {
                        "type": "power",
                        "base": {
                            "type": "power",
                            "base": { "type": "variable", "name": "a" },
                            "exponent": { "type": "integer", "value": 2 },
                        },
                        "exponent": { "type": "integer", "value": 3 },
                    },
                    {
                        "type": "power",
                        "base": { "type": "variable", "name": "a" },
                        "exponent": { "type": "integer", "value": 5 },
                    },
                ],
            },
            "denominator": {
                "type": "power",
                "base": { "type": "variable", "name": "a" },
                "exponent": { "type": "integer", "value": 4 },
            },
        });

        let a = || Node::var("a");
        assert_eq!(Node::from_json(&value).unwrap(), Node::frac(
            Node::product(vec![
                Node::pow(Node::pow(a(), Node::int(2)), Node::int(3)),
                Node::pow(a(), Node::int(5)),
            ]),
            Node::pow(a(), Node::int(4)),
        ));
    }

    #[test]
    fn write_then_read() {
        let node = Node::range(
            Node::binary(BinOp::Div, Node::sqrt(Node::int(50)), Node::int(-2)),
            Node::product(vec![Node::int(3), Node::var("x")]),
        );
        assert_eq!(Node::from_json(&node.to_json()).unwrap(), node);
    }

    #[test]
    fn unknown_tag() {
        let err = Node::from_json(&json!({ "type": "logarithm", "base": 2 })).unwrap_err();
        assert_eq!(
            err.downcast_ref::<UnsupportedNode>(),
            Some(&UnsupportedNode { tag: "logarithm".to_string() }),
        );
    }

    #[test]
    fn unknown_tag_deep_in_tree() {
        let value = json!({
            "type": "sqrt",
            "radicand": { "type": "product", "factors": [{ "type": "cbrt" }] },
        });
        assert!(Node::from_json(&value).unwrap_err().is::<UnsupportedNode>());
    }

    #[test]
    fn empty_product() {
        let err = Node::from_json(&json!({ "type": "product", "factors": [] })).unwrap_err();
        assert!(err.is::<MalformedTree>());
    }

    #[test]
    fn missing_field() {
        let err = Node::from_json(&json!({ "type": "power", "base": { "type": "variable", "name": "a" } }))
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<MalformedTree>().map(|kind| kind.reason.as_str()),
            Some("missing field `exponent`"),
        );
    }

    #[test]
    fn whole_float_is_integer() {
        assert_eq!(
            Node::from_json(&json!({ "type": "integer", "value": 4.0 })).unwrap(),
            Node::int(4),
        );
        assert!(Node::from_json(&json!({ "type": "integer", "value": 4.5 })).is_err());
    }
}
