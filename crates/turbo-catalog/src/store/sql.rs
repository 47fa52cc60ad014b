//! SQL-backed catalog store.
//!
//! Plans are compiled to parameterized SQL against a `products` table and
//! run through a [`SqlExecutor`], so any SQLite/Postgres client can back
//! the listing engine.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::catalog::{CatalogEntry, ProductStatus, ProductType};
use crate::error::StoreError;
use crate::ids::{CategoryId, ProductId, SubcategoryId};
use crate::money::{Price, PriceRange};
use crate::search::{PageResult, Predicate, QueryPlan, SortDirection, SortField, SortTerm};
use crate::store::{CatalogStore, GroupCounts, GroupField};

const COLUMNS: &str = "id, name, slug, description, status, product_type, category_id, \
     category_slug, subcategory_id, subcategory_slug, price_cents, stock, featured, rating, \
     view_count, created_at";

/// A value bound to a statement parameter or read from a result column.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Try to get the value as an i64.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            SqlValue::Integer(i) => Some(*i),
            SqlValue::Real(f) => Some(*f as i64),
            _ => None,
        }
    }

    /// Try to get the value as a string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            SqlValue::Null => serde_json::Value::Null,
            SqlValue::Integer(i) => serde_json::Value::Number((*i).into()),
            SqlValue::Real(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            SqlValue::Text(s) => serde_json::Value::String(s.clone()),
            SqlValue::Blob(b) => serde_json::Value::String(String::from_utf8_lossy(b).into_owned()),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Integer(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

/// A row returned by a [`SqlExecutor`].
#[derive(Debug, Clone, PartialEq)]
pub struct SqlRow {
    columns: Vec<String>,
    values: Vec<SqlValue>,
}

impl SqlRow {
    pub fn new(columns: Vec<String>, values: Vec<SqlValue>) -> Self {
        Self { columns, values }
    }

    /// Get a value by column name.
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
    }

    /// Deserialize the row into a type, column names as field names.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        let map: serde_json::Map<String, serde_json::Value> = self
            .columns
            .iter()
            .zip(self.values.iter())
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        Ok(serde_json::from_value(serde_json::Value::Object(map))?)
    }

    fn integer(&self, column: &str) -> Result<Option<i64>, StoreError> {
        match self.get(column) {
            None => Err(StoreError::Decode(format!("missing column {column}"))),
            Some(SqlValue::Null) => Ok(None),
            Some(value) => value
                .as_integer()
                .map(Some)
                .ok_or_else(|| StoreError::Decode(format!("column {column} is not an integer"))),
        }
    }
}

/// A compiled statement with positional `?` parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

/// Runs compiled statements against a database.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    async fn query(&self, statement: &SqlStatement) -> Result<Vec<SqlRow>, StoreError>;
}

/// [`CatalogStore`] that compiles plans to SQL.
pub struct SqlCatalogStore<E> {
    executor: E,
    table: String,
}

impl<E: SqlExecutor> SqlCatalogStore<E> {
    /// Create a store reading from the `products` table.
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            table: "products".to_string(),
        }
    }

    /// Read from a different table.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// `SELECT` for one page of a plan.
    pub fn page_statement(&self, plan: &QueryPlan) -> SqlStatement {
        let (where_clause, mut params) = where_clause(&plan.predicates);
        params.push(SqlValue::Integer(i64::from(plan.limit)));
        params.push(SqlValue::Integer(
            i64::try_from(plan.offset).unwrap_or(i64::MAX),
        ));
        SqlStatement {
            sql: format!(
                "SELECT {} FROM {} WHERE {} ORDER BY {} LIMIT ? OFFSET ?",
                COLUMNS,
                self.table,
                where_clause,
                order_by(&plan.sort)
            ),
            params,
        }
    }

    /// `COUNT(*)` of all matches.
    pub fn count_statement(&self, predicates: &[Predicate]) -> SqlStatement {
        let (where_clause, params) = where_clause(predicates);
        SqlStatement {
            sql: format!(
                "SELECT COUNT(*) AS total FROM {} WHERE {}",
                self.table, where_clause
            ),
            params,
        }
    }

    /// `MIN`/`MAX` price of all matches.
    pub fn price_bounds_statement(&self, predicates: &[Predicate]) -> SqlStatement {
        let (where_clause, params) = where_clause(predicates);
        SqlStatement {
            sql: format!(
                "SELECT MIN(price_cents) AS min_price, MAX(price_cents) AS max_price FROM {} WHERE {}",
                self.table, where_clause
            ),
            params,
        }
    }

    /// Grouped `COUNT(*)` by a discriminator column.
    pub fn count_by_statement(&self, predicates: &[Predicate], field: GroupField) -> SqlStatement {
        let (where_clause, params) = where_clause(predicates);
        let column = field.as_str();
        SqlStatement {
            sql: format!(
                "SELECT {column} AS value, COUNT(*) AS count FROM {} WHERE {} AND {column} IS NOT NULL \
                 GROUP BY {column} ORDER BY {column}",
                self.table, where_clause
            ),
            params,
        }
    }
}

#[async_trait]
impl<E: SqlExecutor> CatalogStore for SqlCatalogStore<E> {
    async fn fetch_page(&self, plan: &QueryPlan) -> Result<PageResult<CatalogEntry>, StoreError> {
        // One statement at a time: the engine budgets one query per store call.
        let rows = self.executor.query(&self.page_statement(plan)).await?;
        let totals = self
            .executor
            .query(&self.count_statement(&plan.predicates))
            .await?;

        let items = rows
            .iter()
            .map(|row| row.deserialize::<ProductRow>().and_then(CatalogEntry::try_from))
            .collect::<Result<Vec<_>, _>>()?;
        let total = totals
            .first()
            .ok_or_else(|| StoreError::Decode("count query returned no rows".to_string()))?
            .integer("total")?
            .unwrap_or(0);

        Ok(PageResult::new(items, u64::try_from(total).unwrap_or(0)))
    }

    async fn price_bounds(&self, predicates: &[Predicate]) -> Result<Option<PriceRange>, StoreError> {
        let rows = self
            .executor
            .query(&self.price_bounds_statement(predicates))
            .await?;
        let Some(row) = rows.first() else {
            return Ok(None);
        };
        match (row.integer("min_price")?, row.integer("max_price")?) {
            (Some(min), Some(max)) => Ok(Some(PriceRange::new(
                Price::from_cents(min),
                Price::from_cents(max),
            ))),
            _ => Ok(None),
        }
    }

    async fn count_by(
        &self,
        predicates: &[Predicate],
        field: GroupField,
    ) -> Result<GroupCounts, StoreError> {
        let rows = self
            .executor
            .query(&self.count_by_statement(predicates, field))
            .await?;

        let mut counts = GroupCounts::new();
        for row in rows {
            let value = row
                .get("value")
                .and_then(SqlValue::as_text)
                .ok_or_else(|| StoreError::Decode("group value is not text".to_string()))?;
            let count = row.integer("count")?.unwrap_or(0);
            counts.insert(value.to_string(), u64::try_from(count).unwrap_or(0));
        }
        Ok(counts)
    }
}

/// Row shape of the `products` table.
#[derive(Debug, Deserialize)]
struct ProductRow {
    id: String,
    name: String,
    slug: String,
    description: Option<String>,
    status: String,
    product_type: String,
    category_id: String,
    category_slug: String,
    subcategory_id: Option<String>,
    subcategory_slug: Option<String>,
    price_cents: i64,
    stock: i64,
    featured: i64,
    rating: Option<f64>,
    view_count: i64,
    created_at: i64,
}

impl TryFrom<ProductRow> for CatalogEntry {
    type Error = StoreError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let status = ProductStatus::from_str(&row.status)
            .ok_or_else(|| StoreError::Decode(format!("unknown status {}", row.status)))?;
        let product_type = ProductType::from_str(&row.product_type)
            .ok_or_else(|| StoreError::Decode(format!("unknown product type {}", row.product_type)))?;

        Ok(CatalogEntry {
            id: ProductId::new(row.id),
            name: row.name,
            slug: row.slug,
            description: row.description,
            status,
            product_type,
            category_id: CategoryId::new(row.category_id),
            category_slug: row.category_slug,
            subcategory_id: row.subcategory_id.map(SubcategoryId::new),
            subcategory_slug: row.subcategory_slug,
            price: Price::from_cents(row.price_cents),
            stock: row.stock,
            featured: row.featured != 0,
            rating: row.rating.unwrap_or(0.0),
            view_count: row.view_count,
            created_at: row.created_at,
        })
    }
}

/// Build a SQL condition and its parameters for one predicate.
fn predicate_sql(predicate: &Predicate) -> (String, Vec<SqlValue>) {
    match predicate {
        Predicate::Status(status) => ("status = ?".to_string(), vec![status.as_str().into()]),
        Predicate::InCategory(id) => ("category_id = ?".to_string(), vec![id.as_str().into()]),
        Predicate::InSubcategory(id) => {
            ("subcategory_id = ?".to_string(), vec![id.as_str().into()])
        }
        Predicate::TextMatch(text) => {
            let pattern = format!("%{}%", escape_like(&text.to_lowercase()));
            (
                "(LOWER(name) LIKE ? ESCAPE '\\' OR LOWER(description) LIKE ? ESCAPE '\\')"
                    .to_string(),
                vec![pattern.clone().into(), pattern.into()],
            )
        }
        Predicate::CategorySlugIn(slugs) => in_list("category_slug", slugs.iter().map(|s| s.as_str().into())),
        Predicate::SubcategorySlug(slug) => {
            ("subcategory_slug = ?".to_string(), vec![slug.as_str().into()])
        }
        Predicate::ProductTypeIn(types) => {
            in_list("product_type", types.iter().map(|t| t.as_str().into()))
        }
        Predicate::PriceAtLeast(min) => ("price_cents >= ?".to_string(), vec![min.cents().into()]),
        Predicate::PriceAtMost(max) => ("price_cents <= ?".to_string(), vec![max.cents().into()]),
        Predicate::InStock => ("stock > 0".to_string(), vec![]),
        Predicate::Featured => ("featured = 1".to_string(), vec![]),
    }
}

fn in_list(column: &str, values: impl Iterator<Item = SqlValue>) -> (String, Vec<SqlValue>) {
    let values: Vec<SqlValue> = values.collect();
    if values.is_empty() {
        return ("0 = 1".to_string(), vec![]);
    }
    let placeholders = values.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
    (format!("{} IN ({})", column, placeholders), values)
}

fn escape_like(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Build the WHERE clause for a predicate list.
fn where_clause(predicates: &[Predicate]) -> (String, Vec<SqlValue>) {
    if predicates.is_empty() {
        return ("1=1".to_string(), vec![]);
    }

    let mut clauses = Vec::with_capacity(predicates.len());
    let mut all_values = Vec::new();
    for predicate in predicates {
        let (clause, values) = predicate_sql(predicate);
        clauses.push(format!("({})", clause));
        all_values.extend(values);
    }

    (clauses.join(" AND "), all_values)
}

fn order_by(terms: &[SortTerm]) -> String {
    terms
        .iter()
        .map(|term| {
            let column = match term.field {
                SortField::ViewCount => "view_count",
                SortField::Price => "price_cents",
                SortField::Rating => "rating",
                SortField::CreatedAt => "created_at",
                SortField::Id => "id",
            };
            let direction = match term.direction {
                SortDirection::Asc => "ASC",
                SortDirection::Desc => "DESC",
            };
            format!("{} {}", column, direction)
        })
        .collect::<Vec<_>>()
        .join(", ")
}
