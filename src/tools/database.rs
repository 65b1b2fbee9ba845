//! Database 工具：结构化查询，委托给 QueryBackend
//!
//! 后端失败统一包装为「数据库查询错误: ...」；SqliteBackend 基于 rusqlite（同步），在 spawn_blocking 中执行。

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection};
use serde_json::{json, Map, Value};

use crate::tools::Tool;

/// 查询后端：SQL + 位置参数 → 行（每行为 JSON 对象）
#[async_trait]
pub trait QueryBackend: Send + Sync {
    async fn run_query(&self, query: &str, params: &[Value]) -> Result<Vec<Value>, String>;
}

/// SQLite 后端：单连接，互斥访问
#[derive(Clone)]
pub struct SqliteBackend {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteBackend {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, String> {
        let conn = Connection::open(path).map_err(|e| e.to_string())?;
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> Result<Self, String> {
        let conn = Connection::open_in_memory().map_err(|e| e.to_string())?;
        Ok(Self::from_connection(conn))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// 执行不返回行的批量 SQL（建表、写入种子数据等）
    pub fn execute_batch(&self, sql: &str) -> Result<(), String> {
        let conn = self.conn.lock().map_err(|e| e.to_string())?;
        conn.execute_batch(sql).map_err(|e| e.to_string())
    }
}

fn to_sql_value(v: &Value) -> SqlValue {
    match v {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

fn to_json_value(v: ValueRef<'_>) -> Value {
    match v {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => json!(i),
        ValueRef::Real(f) => json!(f),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => json!(b),
    }
}

fn query_rows(conn: &Connection, query: &str, params: &[Value]) -> rusqlite::Result<Vec<Value>> {
    let mut stmt = conn.prepare(query)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let mut rows = stmt.query(params_from_iter(params.iter().map(to_sql_value)))?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut obj = Map::new();
        for (i, name) in columns.iter().enumerate() {
            obj.insert(name.clone(), to_json_value(row.get_ref(i)?));
        }
        out.push(Value::Object(obj));
    }
    Ok(out)
}

#[async_trait]
impl QueryBackend for SqliteBackend {
    async fn run_query(&self, query: &str, params: &[Value]) -> Result<Vec<Value>, String> {
        let conn = self.conn.clone();
        let query = query.to_string();
        let params = params.to_vec();
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|e| e.to_string())?;
            query_rows(&conn, &query, &params).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| e.to_string())?
    }
}

/// Database 工具：input `{"query": "...", "params": [...]}`，output `{"rows": [...], "count": n}`
pub struct DatabaseTool {
    backend: Arc<dyn QueryBackend>,
}

impl DatabaseTool {
    pub fn new(backend: Arc<dyn QueryBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Tool for DatabaseTool {
    fn name(&self) -> &str {
        "database"
    }

    fn description(&self) -> &str {
        "Query database for structured information"
    }

    async fn execute(&self, input: Value) -> Result<Value, String> {
        let query = input.get("query").and_then(|v| v.as_str()).unwrap_or("");
        let params: Vec<Value> = input
            .get("params")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();
        let rows = self
            .backend
            .run_query(query, &params)
            .await
            .map_err(|e| format!("数据库查询错误: {}", e))?;
        let count = rows.len();
        Ok(json!({
            "rows": rows,
            "count": count,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> SqliteBackend {
        let db = SqliteBackend::open_in_memory().unwrap();
        db.execute_batch(
            "CREATE TABLE items (id INTEGER PRIMARY KEY, name TEXT, value INTEGER);
             INSERT INTO items VALUES (1, 'Item 1', 100), (2, 'Item 2', 200);",
        )
        .unwrap();
        db
    }

    #[tokio::test]
    async fn test_rows_and_count() {
        let tool = DatabaseTool::new(Arc::new(seeded()));
        let out = tool
            .execute(json!({"query": "SELECT id, name, value FROM items ORDER BY id"}))
            .await
            .unwrap();
        assert_eq!(out["count"], json!(2));
        assert_eq!(out["rows"][1], json!({"id": 2, "name": "Item 2", "value": 200}));
    }

    #[tokio::test]
    async fn test_params_bound() {
        let tool = DatabaseTool::new(Arc::new(seeded()));
        let out = tool
            .execute(json!({"query": "SELECT name FROM items WHERE value > ?1", "params": [150]}))
            .await
            .unwrap();
        assert_eq!(out["rows"], json!([{"name": "Item 2"}]));
    }

    #[tokio::test]
    async fn test_backend_error_prefixed() {
        let tool = DatabaseTool::new(Arc::new(seeded()));
        let err = tool
            .execute(json!({"query": "SELECT * FROM missing"}))
            .await
            .unwrap_err();
        assert!(err.starts_with("数据库查询错误: "), "{err}");
        assert!(err.contains("missing"));
    }
}
