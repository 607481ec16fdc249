//! Postgres-backed product store.
//!
//! Each product is one JSONB document in the `products` table. Filters and
//! sort keys are compiled to SQL over JSON paths, so the document shape served
//! by the API is exactly the shape stored.
//!
//! ## Error Mapping
//!
//! | PostgreSQL Error Code | StoreError | Scenario |
//! |----------------------|------------|----------|
//! | `22P02` invalid text representation | `TypeMismatch` | A stored value cannot be cast for a numeric/timestamp comparison |
//! | `42804` datatype mismatch | `TypeMismatch` | Comparison between incompatible types |
//! | `22023` invalid parameter value | `TypeMismatch` | Rejected parameter value |
//! | `2201B` invalid regular expression | `TypeMismatch` | Pattern rejected by the regex engine |
//! | `23505` unique violation | `DuplicateCode` | Two documents share a `code` |
//! | Any other / pool / IO | `Backend` | Everything else |

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::{Span, instrument};

use catalog_products::{Product, ProductField};

use super::{ProductStore, StoreError, ensure_unique_codes};
use crate::query::{ProductFilter, ProductQuery, SortKey};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id UUID PRIMARY KEY,
        code TEXT NOT NULL UNIQUE,
        position BIGSERIAL NOT NULL,
        doc JSONB NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS products_name_idx ON products ((doc->>'name'))",
    "CREATE INDEX IF NOT EXISTS products_capacity_idx ON products (((doc->>'capacity')::float8))",
    "CREATE INDEX IF NOT EXISTS products_energy_class_idx ON products ((doc->>'energyClass'))",
    "CREATE INDEX IF NOT EXISTS products_features_idx ON products USING GIN ((doc->'features'))",
];

/// Postgres-backed product collection.
///
/// `position` records insertion order and is the final tiebreak of every sort.
#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: Arc<PgPool>,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::backend(format!("failed to connect to postgres: {e}")))?;
        Ok(Self::new(pool))
    }

    /// Create the `products` table and its indexes if missing.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("ensure_schema", e, &[]))?;
        }
        Ok(())
    }
}

/// Escape a literal for a Postgres ARE pattern: every non-alphanumeric char
/// is backslash-escaped, which the engine reads as the literal char.
pub fn escape_pattern(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len() * 2);
    for c in literal.chars() {
        if !c.is_alphanumeric() && !c.is_whitespace() {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// SQL expression reading a scalar field from `doc`, cast to its stored type.
fn field_expr(field: ProductField) -> String {
    let path = field.segments().join(",");
    if field.is_numeric() {
        format!("((doc #>> '{{{path}}}')::float8)")
    } else if field.is_timestamp() {
        format!("((doc #>> '{{{path}}}')::timestamptz)")
    } else {
        format!("((doc #>> '{{{path}}}') COLLATE \"C\")")
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    qb.push(" WHERE TRUE");

    if let Some(code) = &filter.code {
        qb.push(" AND doc->>'code' ~* ");
        qb.push_bind(escape_pattern(code));
    }
    if let Some(classes) = &filter.energy_classes {
        qb.push(" AND doc->>'energyClass' = ANY(");
        qb.push_bind(classes.clone());
        qb.push(")");
    }
    if let Some(capacities) = &filter.capacities {
        qb.push(" AND ");
        qb.push(field_expr(ProductField::Capacity));
        qb.push(" = ANY(");
        qb.push_bind(capacities.clone());
        qb.push(")");
    }
    for feature in &filter.features {
        qb.push(
            " AND EXISTS (SELECT 1 FROM jsonb_array_elements_text(doc->'features') AS f(v) WHERE f.v ~* ",
        );
        qb.push_bind(format!(r"^{}\W*$", escape_pattern(feature)));
        qb.push(")");
    }
}

fn push_order(qb: &mut QueryBuilder<'_, Postgres>, sort: &[SortKey]) {
    qb.push(" ORDER BY ");
    for key in sort {
        qb.push(field_expr(key.field));
        qb.push(" ");
        qb.push(key.direction.as_sql());
        qb.push(", ");
    }
    qb.push("position ASC");
}

fn to_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[async_trait::async_trait]
impl ProductStore for PostgresProductStore {
    #[instrument(skip_all, fields(predicates = filter.len()), err)]
    async fn count(&self, filter: &ProductFilter) -> Result<u64, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) AS total FROM products");
        push_filter(&mut qb, filter);

        let row = qb
            .build()
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("count", e, &filter_typed_paths(filter)))?;
        let total: i64 = row
            .try_get("total")
            .map_err(|e| StoreError::backend(format!("failed to read count: {e}")))?;
        Ok(u64::try_from(total).unwrap_or_default())
    }

    #[instrument(skip_all, fields(page = query.page, limit = query.limit, rows), err)]
    async fn find(&self, query: &ProductQuery) -> Result<Vec<Product>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT doc FROM products");
        push_filter(&mut qb, &query.filter);
        push_order(&mut qb, &query.sort);
        qb.push(" OFFSET ");
        qb.push_bind(to_i64(query.skip()));
        qb.push(" LIMIT ");
        qb.push_bind(to_i64(query.limit));

        let rows = qb
            .build()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find", e, &query.typed_paths()))?;

        let mut products = Vec::with_capacity(rows.len());
        for row in rows {
            let doc: serde_json::Value = row
                .try_get("doc")
                .map_err(|e| StoreError::backend(format!("failed to read product row: {e}")))?;
            let product: Product = serde_json::from_value(doc)
                .map_err(|e| StoreError::backend(format!("malformed product document: {e}")))?;
            products.push(product);
        }

        Span::current().record("rows", products.len());
        Ok(products)
    }

    #[instrument(skip_all, fields(count = products.len()), err)]
    async fn replace_all(&self, products: Vec<Product>) -> Result<usize, StoreError> {
        ensure_unique_codes(&products)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("replace_all", e, &[]))?;

        sqlx::query("DELETE FROM products")
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("replace_all", e, &[]))?;

        for product in &products {
            let doc = serde_json::to_value(product)
                .map_err(|e| StoreError::backend(format!("failed to encode product: {e}")))?;
            sqlx::query("INSERT INTO products (id, code, doc) VALUES ($1, $2, $3)")
                .bind(*product.id.as_uuid())
                .bind(&product.code)
                .bind(doc)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("replace_all", e, &[]))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("replace_all", e, &[]))?;
        Ok(products.len())
    }
}

fn filter_typed_paths(filter: &ProductFilter) -> Vec<&'static str> {
    filter
        .capacities
        .as_ref()
        .map(|_| vec![ProductField::Capacity.path()])
        .unwrap_or_default()
}

/// Map SQLx errors to `StoreError`, attributing type errors to the first
/// typed path the statement compared against.
fn map_sqlx_error(operation: &str, err: sqlx::Error, typed_paths: &[&str]) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {operation}: {}", db_err.message());
            match db_err.code().as_deref() {
                Some("22P02" | "42804" | "22023") => StoreError::type_mismatch(
                    typed_paths.first().copied().unwrap_or("unknown"),
                    msg,
                ),
                Some("2201B") => StoreError::type_mismatch("code", msg),
                Some("23505") => StoreError::DuplicateCode(
                    db_err.constraint().unwrap_or("products_code_key").to_string(),
                ),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::backend(format!("connection pool closed in {operation}"))
        }
        other => StoreError::backend(format!("sqlx error in {operation}: {other}")),
    }
}
