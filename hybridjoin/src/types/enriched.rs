use crate::types::{JoinKey, ReferenceRecord, SecondaryKey, SecondaryRecord, StreamRecord};

/// A stream record merged with its reference attributes and, after post-join enrichment, with its
/// secondary attributes.
///
/// Merging is field by field: a merged-in attribute that is present replaces the current value,
/// an absent one leaves it untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnrichedRecord {
    // Stream fields.
    pub order_id: i64,
    pub customer_id: SecondaryKey,
    pub product_id: JoinKey,
    pub quantity: i64,
    pub date: String,

    // Reference fields.
    pub product_category: Option<String>,
    pub unit_price: Option<f64>,
    pub store_id: Option<i64>,
    pub supplier_id: Option<i64>,
    pub store_name: Option<String>,
    pub supplier_name: Option<String>,

    // Secondary fields.
    pub gender: Option<String>,
    pub age: Option<String>,
    pub occupation: Option<i64>,
    pub city_category: Option<String>,
    pub stay_in_current_city_years: Option<i64>,
    pub marital_status: Option<i64>,
}

impl EnrichedRecord {
    /// Builds the record emitted for one match between a resident and a reference record.
    pub fn joined(stream: &StreamRecord, reference: &ReferenceRecord) -> Self {
        let mut enriched = Self::from(stream.clone());
        enriched.merge_reference(reference);

        enriched
    }

    /// Merges reference attributes; the reference wins on the shared join key.
    pub fn merge_reference(&mut self, reference: &ReferenceRecord) {
        self.product_id.clone_from(&reference.product_id);
        overwrite(&mut self.product_category, &reference.category);
        overwrite(&mut self.unit_price, &reference.price);
        overwrite(&mut self.store_id, &reference.store_id);
        overwrite(&mut self.supplier_id, &reference.supplier_id);
        overwrite(&mut self.store_name, &reference.store_name);
        overwrite(&mut self.supplier_name, &reference.supplier_name);
    }

    /// Merges secondary attributes; the secondary record wins on the shared secondary key.
    pub fn merge_secondary(&mut self, secondary: &SecondaryRecord) {
        self.customer_id = secondary.customer_id;
        overwrite(&mut self.gender, &secondary.gender);
        overwrite(&mut self.age, &secondary.age);
        overwrite(&mut self.occupation, &secondary.occupation);
        overwrite(&mut self.city_category, &secondary.city_category);
        overwrite(
            &mut self.stay_in_current_city_years,
            &secondary.stay_in_current_city_years,
        );
        overwrite(&mut self.marital_status, &secondary.marital_status);
    }

    pub fn join_key(&self) -> &str {
        &self.product_id
    }

    pub fn secondary_key(&self) -> SecondaryKey {
        self.customer_id
    }
}

impl From<StreamRecord> for EnrichedRecord {
    fn from(record: StreamRecord) -> Self {
        Self {
            order_id: record.order_id,
            customer_id: record.customer_id,
            product_id: record.product_id,
            quantity: record.quantity,
            date: record.date,
            ..Default::default()
        }
    }
}

fn overwrite<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
    if value.is_some() {
        target.clone_from(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_attributes_do_not_erase_present_ones() {
        let stream = StreamRecord::new(1, 10, "P1", 2, "2019-01-01");
        let reference = ReferenceRecord {
            price: Some(9.5),
            store_id: Some(3),
            ..ReferenceRecord::new("P1")
        };
        let mut enriched = EnrichedRecord::joined(&stream, &reference);
        assert_eq!(enriched.unit_price, Some(9.5));

        enriched.merge_reference(&ReferenceRecord::new("P1"));
        assert_eq!(enriched.unit_price, Some(9.5));
        assert_eq!(enriched.store_id, Some(3));

        enriched.merge_secondary(&SecondaryRecord {
            gender: Some("F".to_string()),
            ..SecondaryRecord::new(10)
        });
        assert_eq!(enriched.gender.as_deref(), Some("F"));
        assert_eq!(enriched.age, None);
        assert_eq!(enriched.quantity, 2);
        assert_eq!(enriched.date, "2019-01-01");
    }
}
