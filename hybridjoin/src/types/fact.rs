/// A fully resolved sales fact, keyed by dimension surrogate keys.
#[derive(Debug, Clone, PartialEq)]
pub struct FactRow {
    pub order_id: i64,
    pub customer_key: i64,
    pub product_key: i64,
    pub store_key: i64,
    pub supplier_key: i64,
    pub date_key: i64,
    pub quantity: i64,
    pub unit_price: f64,
    pub total_amount: f64,
}
