//! CloudFormation intrinsic function helpers.
//!
//! Values are plain `serde_json::Value`s so they can be embedded anywhere in
//! resource properties.

use std::collections::BTreeSet;

use serde_json::{Value, json};

/// `{"Ref": id}`
#[must_use]
pub fn reference(logical_id: &str) -> Value {
    json!({ "Ref": logical_id })
}

/// `{"Fn::GetAtt": [id, attribute]}`
#[must_use]
pub fn get_att(logical_id: &str, attribute: &str) -> Value {
    json!({ "Fn::GetAtt": [logical_id, attribute] })
}

/// `{"Fn::Join": [delimiter, parts]}`
#[must_use]
pub fn join(delimiter: &str, parts: Vec<Value>) -> Value {
    json!({ "Fn::Join": [delimiter, parts] })
}

/// `{"Fn::Base64": value}`
#[must_use]
pub fn base64(value: Value) -> Value {
    json!({ "Fn::Base64": value })
}

/// Availability zone `index` of the deployment region.
#[must_use]
pub fn availability_zone(index: usize) -> Value {
    json!({ "Fn::Select": [index, { "Fn::GetAZs": "" }] })
}

/// ARN of an AWS-managed IAM policy, partition-aware.
#[must_use]
pub fn managed_policy_arn(name: &str) -> Value {
    join(
        "",
        vec![
            json!("arn:"),
            reference("AWS::Partition"),
            json!(format!(":iam::aws:policy/{name}")),
        ],
    )
}

/// Logical ids referenced by `value` through `Ref` or `Fn::GetAtt`.
///
/// Pseudo parameters (`AWS::Region`, `AWS::Partition`, ...) are skipped.
/// The result may include template parameters; callers filter against the
/// resource set.
#[must_use]
pub fn referenced_ids(value: &Value) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    collect_refs(value, &mut out);
    out
}

fn collect_refs(value: &Value, out: &mut BTreeSet<String>) {
    match value {
        Value::Object(map) => {
            if map.len() == 1 {
                if let Some(Value::String(id)) = map.get("Ref") {
                    if !id.starts_with("AWS::") {
                        out.insert(id.clone());
                    }
                    return;
                }
                if let Some(Value::Array(args)) = map.get("Fn::GetAtt") {
                    if let Some(Value::String(id)) = args.first() {
                        out.insert(id.clone());
                    }
                    return;
                }
            }
            for v in map.values() {
                collect_refs(v, out);
            }
        }
        Value::Array(items) => {
            for v in items {
                collect_refs(v, out);
            }
        }
        _ => {}
    }
}
