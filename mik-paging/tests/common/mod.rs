//! In-memory `find` emulation shared by the integration tests.
//!
//! Mirrors the engine rules the builder relies on: `min` is inclusive,
//! `max` is exclusive, then sort, `skip` and `limit` apply in that order.

#![allow(dead_code)]

use std::cmp::Ordering;
use std::sync::Mutex;

use bson::{Bson, Document, doc};
use mik_paging::{Executor, async_trait};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("command failed: {0}")]
pub struct CommandError(pub String);

/// One collection held in memory.
#[derive(Debug, Default)]
pub struct MemoryCollection {
    name: String,
    docs: Vec<Document>,
    commands: Mutex<Vec<Document>>,
}

impl MemoryCollection {
    pub fn new(name: &str, docs: Vec<Document>) -> Self {
        Self {
            name: name.to_string(),
            docs,
            commands: Mutex::new(Vec::new()),
        }
    }

    /// Documents `{ _id: n, created_at: n }` for each `n`.
    pub fn with_created_at(name: &str, values: &[i64]) -> Self {
        let docs = values
            .iter()
            .map(|&n| doc! { "_id": n, "created_at": n, "email": format!("user{n}@example.com") })
            .collect();
        Self::new(name, docs)
    }

    /// Commands received so far.
    pub fn commands(&self) -> Vec<Document> {
        self.commands.lock().unwrap().clone()
    }

    fn find(&self, cmd: &Document) -> Result<Vec<Document>, CommandError> {
        let collection = cmd
            .get_str("find")
            .map_err(|_| CommandError("missing find".into()))?;
        if collection != self.name {
            return Ok(Vec::new());
        }

        let sort = cmd
            .get_document("sort")
            .map_err(|_| CommandError("missing sort".into()))?;
        let (field, dir) = sort
            .iter()
            .next()
            .map(|(k, v)| (k.clone(), v.as_i32().unwrap_or(1)))
            .ok_or_else(|| CommandError("empty sort".into()))?;

        let filter = cmd.get_document("filter").ok();
        let min = bound_value(cmd, "min", &field)?;
        let max = bound_value(cmd, "max", &field)?;

        let mut rows: Vec<&Document> = self
            .docs
            .iter()
            .filter(|d| filter.is_none_or(|f| matches_filter(d, f)))
            .filter(|d| {
                let v = d.get(&field).unwrap_or(&Bson::Null);
                min.as_ref().is_none_or(|m| compare(v, m).is_ge())
                    && max.as_ref().is_none_or(|m| compare(v, m).is_lt())
            })
            .collect();

        rows.sort_by(|a, b| {
            let ord = compare(
                a.get(&field).unwrap_or(&Bson::Null),
                b.get(&field).unwrap_or(&Bson::Null),
            );
            if dir < 0 { ord.reverse() } else { ord }
        });

        let skip = usize::try_from(cmd.get_i64("skip").unwrap_or(0)).unwrap_or(0);
        let limit = usize::try_from(cmd.get_i64("limit").unwrap_or(0)).unwrap_or(0);
        let projection = cmd.get_document("projection").ok();

        Ok(rows
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|d| project(d, projection))
            .collect())
    }
}

#[async_trait]
impl Executor for MemoryCollection {
    type Error = CommandError;

    async fn run_command(&self, command: Document) -> Result<Document, Self::Error> {
        self.commands.lock().unwrap().push(command.clone());
        let batch: Vec<Bson> = self.find(&command)?.into_iter().map(Bson::Document).collect();
        Ok(doc! {
            "cursor": { "id": 0_i64, "ns": format!("test.{}", self.name), "firstBatch": batch },
            "ok": 1.0,
        })
    }
}

fn bound_value(cmd: &Document, key: &str, field: &str) -> Result<Option<Bson>, CommandError> {
    let Ok(bound) = cmd.get_document(key) else {
        return Ok(None);
    };
    bound
        .get(field)
        .cloned()
        .map(Some)
        .ok_or_else(|| CommandError(format!("{key} does not match sort field {field}")))
}

fn matches_filter(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, cond)| {
        let value = doc.get(key).unwrap_or(&Bson::Null);
        match cond {
            Bson::Document(ops) if ops.keys().all(|k| k.starts_with('$')) => {
                ops.iter().all(|(op, arg)| match op.as_str() {
                    "$ne" => compare(value, arg).is_ne(),
                    "$gt" => compare(value, arg).is_gt(),
                    "$gte" => compare(value, arg).is_ge(),
                    "$lt" => compare(value, arg).is_lt(),
                    "$lte" => compare(value, arg).is_le(),
                    _ => compare(value, arg).is_eq(),
                })
            },
            other => compare(value, other).is_eq(),
        }
    })
}

fn project(doc: &Document, projection: Option<&Document>) -> Document {
    let Some(projection) = projection else {
        return doc.clone();
    };
    let mut out = Document::new();
    if let Some(id) = doc.get("_id") {
        out.insert("_id", id.clone());
    }
    for (key, flag) in projection {
        let included = matches!(flag, Bson::Int32(1) | Bson::Int64(1) | Bson::Boolean(true));
        if included && let Some(v) = doc.get(key) {
            out.insert(key.clone(), v.clone());
        }
    }
    out
}

fn compare(a: &Bson, b: &Bson) -> Ordering {
    match (number(a), number(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => match (a, b) {
            (Bson::String(x), Bson::String(y)) => x.cmp(y),
            (Bson::DateTime(x), Bson::DateTime(y)) => x.cmp(y),
            (Bson::ObjectId(x), Bson::ObjectId(y)) => x.bytes().cmp(&y.bytes()),
            (Bson::Null, Bson::Null) => Ordering::Equal,
            (Bson::Null, _) => Ordering::Less,
            (_, Bson::Null) => Ordering::Greater,
            _ => Ordering::Equal,
        },
    }
}

#[allow(clippy::cast_precision_loss)]
fn number(v: &Bson) -> Option<f64> {
    match v {
        Bson::Int32(n) => Some(f64::from(*n)),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(n) => Some(*n),
        _ => None,
    }
}

/// Values of `field` in a batch, as `i64`.
pub fn ints(docs: &[Document], field: &str) -> Vec<i64> {
    docs.iter()
        .map(|d| match d.get(field) {
            Some(Bson::Int32(n)) => i64::from(*n),
            Some(Bson::Int64(n)) => *n,
            other => panic!("{field} is not an integer: {other:?}"),
        })
        .collect()
}
