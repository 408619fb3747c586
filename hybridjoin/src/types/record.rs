/// Identifier correlating a stream record with a reference record (a product id).
pub type JoinKey = String;

/// Identifier used for post-join enrichment (a customer id).
pub type SecondaryKey = i64;

/// One incoming transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamRecord {
    pub order_id: i64,
    /// Secondary key, resolved against the secondary index after the join.
    pub customer_id: SecondaryKey,
    /// Join key, resolved against the reference index.
    pub product_id: JoinKey,
    pub quantity: i64,
    /// Transaction date; opaque to the engine and only used to resolve the date dimension key.
    pub date: String,
}

impl StreamRecord {
    pub fn new(
        order_id: i64,
        customer_id: SecondaryKey,
        product_id: impl Into<JoinKey>,
        quantity: i64,
        date: impl Into<String>,
    ) -> Self {
        Self {
            order_id,
            customer_id,
            product_id: product_id.into(),
            quantity,
            date: date.into(),
        }
    }

    pub fn join_key(&self) -> &str {
        &self.product_id
    }

    pub fn secondary_key(&self) -> SecondaryKey {
        self.customer_id
    }
}

/// Product attributes keyed by the join key.
///
/// Reference records are owned by the reference index and never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReferenceRecord {
    pub product_id: JoinKey,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub store_id: Option<i64>,
    pub supplier_id: Option<i64>,
    pub store_name: Option<String>,
    pub supplier_name: Option<String>,
}

impl ReferenceRecord {
    /// Creates a reference record with no attributes besides its key.
    pub fn new(product_id: impl Into<JoinKey>) -> Self {
        Self {
            product_id: product_id.into(),
            ..Default::default()
        }
    }

    pub fn join_key(&self) -> &str {
        &self.product_id
    }
}

/// Customer attributes keyed by the secondary key.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SecondaryRecord {
    pub customer_id: SecondaryKey,
    pub gender: Option<String>,
    pub age: Option<String>,
    pub occupation: Option<i64>,
    pub city_category: Option<String>,
    pub stay_in_current_city_years: Option<i64>,
    pub marital_status: Option<i64>,
}

impl SecondaryRecord {
    pub fn new(customer_id: SecondaryKey) -> Self {
        Self {
            customer_id,
            ..Default::default()
        }
    }
}
