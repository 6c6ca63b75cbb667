//! Snapshot tests for the explain rendering.

use bson::{Bson, doc};
use mik_paging::{BsonCursorCodec, CursorCodec, CursorValue, QueryBuilder};

fn token(field: &str, value: impl Into<Bson>) -> String {
    BsonCursorCodec::default()
        .encode(&CursorValue::new(field, value))
        .unwrap()
}

#[test]
fn explain_first_page() {
    let query = QueryBuilder::new("users")
        .find(doc! { "email": { "$ne": "" } })
        .sort("-created_at")
        .limit(3);

    insta::assert_snapshot!(query.explain(), @r#"
    {
      "find": "users",
      "limit": 3,
      "batchSize": 3,
      "singleBatch": true,
      "filter": {
        "email": {
          "$ne": ""
        }
      },
      "sort": {
        "created_at": -1
      }
    }
    "#);
}

#[test]
fn explain_descending_continuation() {
    let query = QueryBuilder::new("users")
        .sort("-created_at")
        .limit(2)
        .cursor(token("created_at", 4_i64));

    insta::assert_snapshot!(query.explain(), @r#"
    {
      "find": "users",
      "limit": 2,
      "batchSize": 2,
      "singleBatch": true,
      "sort": {
        "created_at": -1
      },
      "max": {
        "created_at": 4
      }
    }
    "#);
}

#[test]
fn explain_ascending_continuation() {
    let query = QueryBuilder::new("users")
        .select(doc! { "email": 1, "created_at": 1 })
        .sort("+created_at")
        .limit(2)
        .cursor(token("created_at", 2_i64));

    insta::assert_snapshot!(query.explain(), @r#"
    {
      "find": "users",
      "limit": 2,
      "batchSize": 2,
      "singleBatch": true,
      "sort": {
        "created_at": 1
      },
      "projection": {
        "email": 1,
        "created_at": 1
      },
      "skip": 1,
      "min": {
        "created_at": 2
      }
    }
    "#);
}

#[test]
fn explain_invalid_cursor() {
    let query = QueryBuilder::new("users")
        .sort("-created_at")
        .cursor(token("updated_at", 1_i64));

    insta::assert_snapshot!(
        query.explain(),
        @r#"invalid paging query: cursor is for field "updated_at", query sorts on "created_at""#
    );
}
