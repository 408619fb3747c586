use std::collections::HashMap;
use std::hash::Hash;

use crate::dimensions::date::DateDimension;
use crate::error::{ErrorKind, JoinResult};
use crate::join_error;
use crate::types::{EnrichedRecord, FactRow, ReferenceRecord, SecondaryRecord};

/// Surrogate keys for one dimension, handed out sequentially from 1 in first-seen order.
#[derive(Debug, Clone)]
pub struct KeyMap<K> {
    keys: HashMap<K, i64>,
    next_key: i64,
}

impl<K> Default for KeyMap<K> {
    fn default() -> Self {
        Self {
            keys: HashMap::new(),
            next_key: 1,
        }
    }
}

impl<K> KeyMap<K>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the surrogate key of `natural_key`, assigning the next one if it is new.
    pub fn assign(&mut self, natural_key: K) -> i64 {
        let next_key = &mut self.next_key;

        *self.keys.entry(natural_key).or_insert_with(|| {
            let key = *next_key;
            *next_key += 1;
            key
        })
    }

    /// Registers an externally assigned surrogate key.
    pub fn insert(&mut self, natural_key: K, surrogate_key: i64) {
        self.keys.insert(natural_key, surrogate_key);
        self.next_key = self.next_key.max(surrogate_key + 1);
    }

    pub fn get<Q>(&self, natural_key: &Q) -> Option<i64>
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.keys.get(natural_key).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Surrogate keys of every dimension a fact row references.
#[derive(Debug, Clone, Default)]
pub struct DimensionKeys {
    pub customers: KeyMap<i64>,
    pub products: KeyMap<String>,
    pub stores: KeyMap<i64>,
    pub suppliers: KeyMap<i64>,
    pub dates: KeyMap<String>,
}

impl DimensionKeys {
    /// Assigns keys the way populating the dimension tables would.
    ///
    /// Stores and suppliers come from the product master data and are deduplicated. Dates take
    /// the keys of the generated date dimension.
    pub fn assign<'a>(
        products: impl IntoIterator<Item = &'a ReferenceRecord>,
        customers: impl IntoIterator<Item = &'a SecondaryRecord>,
        dates: &DateDimension,
    ) -> Self {
        let mut keys = Self::default();

        for customer in customers {
            keys.customers.assign(customer.customer_id);
        }

        for product in products {
            keys.products.assign(product.product_id.clone());
            if let Some(store_id) = product.store_id {
                keys.stores.assign(store_id);
            }
            if let Some(supplier_id) = product.supplier_id {
                keys.suppliers.assign(supplier_id);
            }
        }

        for (date, date_key) in dates.date_keys() {
            keys.dates.insert(date, date_key);
        }

        keys
    }

    /// Resolves the natural keys of `record` into a fact row.
    ///
    /// Fails with [`ErrorKind::MalformedRecord`] when a value the fact needs is absent or not a
    /// finite number, and with [`ErrorKind::MissingDimensionKey`] when a natural key has no
    /// surrogate key.
    pub fn resolve(&self, record: &EnrichedRecord) -> JoinResult<FactRow> {
        let Some(store_id) = record.store_id else {
            return Err(malformed(record, "store id"));
        };
        let Some(supplier_id) = record.supplier_id else {
            return Err(malformed(record, "supplier id"));
        };
        let unit_price = match record.unit_price {
            Some(price) if price.is_finite() => price,
            _ => return Err(malformed(record, "unit price")),
        };

        let total_amount = record.quantity as f64 * unit_price;
        if !total_amount.is_finite() {
            return Err(malformed(record, "total amount"));
        }

        let customer_key = lookup(self.customers.get(&record.customer_id), record, "customer")?;
        let product_key = lookup(self.products.get(record.product_id.as_str()), record, "product")?;
        let store_key = lookup(self.stores.get(&store_id), record, "store")?;
        let supplier_key = lookup(self.suppliers.get(&supplier_id), record, "supplier")?;
        let date_key = lookup(self.dates.get(record.date.as_str()), record, "date")?;

        Ok(FactRow {
            order_id: record.order_id,
            customer_key,
            product_key,
            store_key,
            supplier_key,
            date_key,
            quantity: record.quantity,
            unit_price,
            total_amount,
        })
    }
}

fn malformed(record: &EnrichedRecord, field: &str) -> crate::error::JoinError {
    join_error!(
        ErrorKind::MalformedRecord,
        "Record is missing a value required by the fact table",
        format!("order {}: invalid {field}", record.order_id)
    )
}

fn lookup(key: Option<i64>, record: &EnrichedRecord, dimension: &str) -> JoinResult<i64> {
    key.ok_or_else(|| {
        join_error!(
            ErrorKind::MissingDimensionKey,
            "Natural key has no surrogate key",
            format!("order {}: no {dimension} key", record.order_id)
        )
    })
}
