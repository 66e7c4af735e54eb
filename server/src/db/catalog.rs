// storefront/server/src/db/catalog.rs

use super::rows::ProductRow;
use super::{store_err, PgStore};
use async_trait::async_trait;
use storefront::model::{Product, ProductFilter, ProductSort};
use storefront::{CatalogStore, StockDecrement, StoreError, StoreResult};
use tracing::{debug, instrument};
use uuid::Uuid;

const PRODUCT_COLUMNS: &str =
  "id, name, description, price, stock, category, image_url, status, created_at, updated_at";

fn to_quantity(quantity: u32) -> StoreResult<i32> {
  i32::try_from(quantity).map_err(|_| StoreError::Conflict(format!("quantity {} exceeds the stock column range", quantity)))
}

#[async_trait]
impl CatalogStore for PgStore {
  #[instrument(name = "pg::find_product", skip(self))]
  async fn find_product(&self, id: Uuid) -> StoreResult<Option<Product>> {
    let row: Option<ProductRow> = sqlx::query_as(&format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS))
      .bind(id)
      .fetch_optional(self.pool())
      .await
      .map_err(store_err)?;
    row.map(Product::try_from).transpose()
  }

  #[instrument(name = "pg::list_products", skip(self))]
  async fn list_products(&self, filter: &ProductFilter) -> StoreResult<Vec<Product>> {
    let order_by = match filter.sort {
      ProductSort::NameAsc => "name ASC",
      ProductSort::PriceAsc => "price ASC, name ASC",
      ProductSort::PriceDesc => "price DESC, name ASC",
    };
    let sql = format!(
      "SELECT {} FROM products \
       WHERE ($1::TEXT IS NULL OR lower(category) = lower($1)) \
         AND ($2::TEXT IS NULL OR strpos(lower(name), lower($2)) > 0 OR strpos(lower(description), lower($2)) > 0) \
       ORDER BY {}",
      PRODUCT_COLUMNS, order_by
    );

    let rows: Vec<ProductRow> = sqlx::query_as(&sql)
      .bind(filter.category.as_deref())
      .bind(filter.query.as_deref())
      .fetch_all(self.pool())
      .await
      .map_err(store_err)?;
    debug!(count = rows.len(), "Products listed.");
    rows.into_iter().map(Product::try_from).collect()
  }

  #[instrument(name = "pg::categories", skip(self))]
  async fn categories(&self) -> StoreResult<Vec<String>> {
    sqlx::query_scalar::<_, String>(
      "SELECT DISTINCT trim(category) AS category FROM products \
       WHERE status = 'active' AND category IS NOT NULL AND trim(category) <> '' \
       ORDER BY 1",
    )
    .fetch_all(self.pool())
    .await
    .map_err(store_err)
  }

  /// One conditional UPDATE; the row lock makes check and decrement atomic.
  #[instrument(name = "pg::decrement_if_at_least", skip(self))]
  async fn decrement_if_at_least(&self, id: Uuid, quantity: u32) -> StoreResult<StockDecrement> {
    let quantity = to_quantity(quantity)?;
    let remaining: Option<i32> = sqlx::query_scalar(
      "UPDATE products SET stock = stock - $2, updated_at = now() WHERE id = $1 AND stock >= $2 RETURNING stock",
    )
    .bind(id)
    .bind(quantity)
    .fetch_optional(self.pool())
    .await
    .map_err(store_err)?;

    if let Some(remaining) = remaining {
      return Ok(StockDecrement::Applied {
        remaining: u32::try_from(remaining).unwrap_or(0),
      });
    }

    // Nothing updated: either the product is gone or stock was short.
    let available: Option<i32> = sqlx::query_scalar("SELECT stock FROM products WHERE id = $1")
      .bind(id)
      .fetch_optional(self.pool())
      .await
      .map_err(store_err)?;
    Ok(match available {
      Some(stock) => StockDecrement::Insufficient {
        available: u32::try_from(stock).unwrap_or(0),
      },
      None => StockDecrement::NotFound,
    })
  }

  #[instrument(name = "pg::restock", skip(self))]
  async fn restock(&self, id: Uuid, quantity: u32) -> StoreResult<()> {
    let quantity = to_quantity(quantity)?;
    let result = sqlx::query("UPDATE products SET stock = stock + $2, updated_at = now() WHERE id = $1")
      .bind(id)
      .bind(quantity)
      .execute(self.pool())
      .await
      .map_err(store_err)?;
    if result.rows_affected() == 0 {
      return Err(StoreError::Conflict(format!("product {} no longer exists", id)));
    }
    Ok(())
  }
}
