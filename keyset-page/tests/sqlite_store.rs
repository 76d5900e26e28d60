//! Paginating a real `SQLite` database through the SQL lowering.
//!
//! Every page read through [`SqliteStore`] must match the page the in-memory
//! store produces for the same data and request.

use std::sync::Mutex;

use async_trait::async_trait;
use keyset_page::sql::{self, Sqlite, SqlError};
use keyset_page::{
    CompareOp, Fetched, IndexHint, IndexHintKind, MemoryStore, Page, PaginateRequest, Paginator,
    Query, QuerySource, Row, Value, compare, is_in,
};
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{Connection, params_from_iter};

#[derive(Debug, thiserror::Error)]
enum StoreError {
    #[error(transparent)]
    Sql(#[from] SqlError),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("connection mutex poisoned")]
    Poisoned,
}

struct SqliteStore {
    conn: Mutex<Connection>,
    table: &'static str,
}

impl SqliteStore {
    fn run(&self, query: &Query) -> Result<Fetched<Row>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;

        let rendered = sql::select(Sqlite, self.table, query)?;
        let mut stmt = conn.prepare(&rendered.sql)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let rows = stmt
            .query_map(params_from_iter(rendered.params.iter().map(to_sql)), |row| {
                let mut out = Row::new();
                for (i, name) in names.iter().enumerate() {
                    out.insert(name.clone(), from_sql(row.get_ref(i)?));
                }
                Ok(out)
            })?
            .collect::<Result<Vec<_>, _>>()?;

        if !query.count {
            return Ok(Fetched::rows(rows));
        }
        let counted = sql::count(Sqlite, self.table, query)?;
        let count: i64 = conn.query_row(
            &counted.sql,
            params_from_iter(counted.params.iter().map(to_sql)),
            |r| r.get(0),
        )?;
        Ok(Fetched::counted(rows, count as u64))
    }
}

#[async_trait]
impl QuerySource for SqliteStore {
    type Record = Row;
    type Error = StoreError;

    async fn fetch(&self, query: Query) -> Result<Fetched<Row>, StoreError> {
        self.run(&query)
    }
}

fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Int(i) => SqlValue::Integer(*i),
        Value::Float(f) => SqlValue::Real(*f),
        Value::String(s) => SqlValue::Text(s.clone()),
    }
}

fn from_sql(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Integer(i) => Value::Int(i),
        ValueRef::Real(f) => Value::Float(f),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Null | ValueRef::Blob(_) => Value::Null,
    }
}

const ROWS: i64 = 23;

/// `(id, score, name, rank)`; every fifth rank is NULL.
fn item(id: i64) -> (i64, i64, String, Option<i64>) {
    let rank = (id % 5 != 0).then_some(id % 3);
    (id, id % 4, format!("item-{:02}", (id * 7) % ROWS), rank)
}

fn fixtures() -> anyhow::Result<(Paginator<SqliteStore>, Paginator<MemoryStore>)> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch(
        "CREATE TABLE items (
             id INTEGER PRIMARY KEY,
             score INTEGER NOT NULL,
             name TEXT NOT NULL,
             rank INTEGER
         );
         CREATE INDEX idx_items_score ON items (score, id);",
    )?;

    let mut memory = MemoryStore::new();
    for id in 1..=ROWS {
        let (id, score, name, rank) = item(id);
        conn.execute(
            "INSERT INTO items (id, score, name, rank) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![id, score, name, rank],
        )?;
        memory.insert(Row::from([
            ("id".to_string(), Value::Int(id)),
            ("score".to_string(), Value::Int(score)),
            ("name".to_string(), Value::String(name)),
            ("rank".to_string(), Value::from(rank)),
        ]));
    }

    let sqlite = SqliteStore {
        conn: Mutex::new(conn),
        table: "items",
    };
    Ok((Paginator::new(sqlite), Paginator::new(memory)))
}

/// Walk forward through both stores, asserting each pair of pages is identical.
async fn assert_same_walk(
    sqlite: &Paginator<SqliteStore>,
    memory: &Paginator<MemoryStore>,
    base: PaginateRequest,
) -> anyhow::Result<Vec<Page<Row>>> {
    let mut pages = Vec::new();
    let mut after: Option<String> = None;
    loop {
        let request = base.clone().after(after.as_deref());
        let from_sqlite = sqlite.paginate(&request).await?;
        let from_memory = memory.paginate(&request).await?;
        assert_eq!(from_sqlite, from_memory);

        let more = from_sqlite.has_next();
        after = from_sqlite.after().map(str::to_string);
        pages.push(from_sqlite);
        if !more {
            return Ok(pages);
        }
        assert!(pages.len() <= ROWS as usize + 1);
    }
}

#[tokio::test]
async fn test_walk_by_primary_key() -> anyhow::Result<()> {
    let (sqlite, memory) = fixtures()?;

    let pages = assert_same_walk(&sqlite, &memory, PaginateRequest::new(5)).await?;
    assert_eq!(pages.len(), 5);
    assert_eq!(pages.iter().map(|p| p.results.len()).sum::<usize>(), ROWS as usize);
    Ok(())
}

#[tokio::test]
async fn test_walk_by_duplicate_scores() -> anyhow::Result<()> {
    let (sqlite, memory) = fixtures()?;

    for desc in [false, true] {
        for limit in [1, 4, 7, 30] {
            let base = PaginateRequest::new(limit).paginate_by("score").desc(desc);
            let pages = assert_same_walk(&sqlite, &memory, base).await?;
            let total: usize = pages.iter().map(|p| p.results.len()).sum();
            assert_eq!(total, ROWS as usize, "limit {limit}, desc {desc}");
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_walk_by_text_field() -> anyhow::Result<()> {
    let (sqlite, memory) = fixtures()?;
    let base = PaginateRequest::new(6).paginate_by("name").desc(true);
    assert_same_walk(&sqlite, &memory, base).await?;
    Ok(())
}

#[tokio::test]
async fn test_walk_over_null_ranks() -> anyhow::Result<()> {
    let (sqlite, memory) = fixtures()?;

    for desc in [false, true] {
        for limit in [1, 3, 8] {
            let base = PaginateRequest::new(limit).paginate_by("rank").desc(desc);
            let pages = assert_same_walk(&sqlite, &memory, base.clone()).await?;
            let total: usize = pages.iter().map(|p| p.results.len()).sum();
            assert_eq!(total, ROWS as usize, "limit {limit}, desc {desc}");

            for page in &pages {
                let request = base.clone().before(page.before());
                assert_eq!(sqlite.paginate(&request).await?, memory.paginate(&request).await?);
            }
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_before_pages_match() -> anyhow::Result<()> {
    let (sqlite, memory) = fixtures()?;
    let base = PaginateRequest::new(4).paginate_by("score");
    let pages = assert_same_walk(&sqlite, &memory, base.clone()).await?;

    for page in &pages {
        let request = base.clone().before(page.before());
        let from_sqlite = sqlite.paginate(&request).await?;
        let from_memory = memory.paginate(&request).await?;
        assert_eq!(from_sqlite, from_memory);
    }
    Ok(())
}

#[tokio::test]
async fn test_filter_count_and_projection() -> anyhow::Result<()> {
    let (sqlite, memory) = fixtures()?;
    let base = PaginateRequest::new(3)
        .paginate_by("score")
        .filter(is_in("score", [1i64, 3]))
        .attributes(&["name"])
        .row_count(true);

    let pages = assert_same_walk(&sqlite, &memory, base).await?;
    let first = pages.first().expect("first page");

    let matching = (1..=ROWS).filter(|id| id % 4 == 1 || id % 4 == 3).count() as u64;
    assert_eq!(first.count, Some(matching));

    let keys: Vec<&str> = first.results[0].keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["id", "name", "score"]);
    Ok(())
}

#[tokio::test]
async fn test_index_hints_accepted() -> anyhow::Result<()> {
    let (sqlite, memory) = fixtures()?;

    for kind in [IndexHintKind::Use, IndexHintKind::Ignore] {
        let base = PaginateRequest::new(5)
            .paginate_by("score")
            .filter(compare("score", CompareOp::Gte, 1i64))
            .index_hint(IndexHint::new(kind, ["idx_items_score"]));
        assert_same_walk(&sqlite, &memory, base).await?;
    }
    Ok(())
}

#[tokio::test]
async fn test_sql_error_passes_through() -> anyhow::Result<()> {
    let (sqlite, _) = fixtures()?;
    let err = sqlite
        .paginate(&PaginateRequest::new(2).paginate_by("no such column"))
        .await
        .unwrap_err();

    assert!(!err.is_client_error());
    assert!(matches!(
        err.into_query_error(),
        Some(StoreError::Sql(SqlError::InvalidIdentifier { .. }))
    ));
    Ok(())
}
