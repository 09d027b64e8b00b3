//! In-memory view of one input feature and of the dataset it came from

use geo_types::Geometry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::types::AttributeValue;

/// One geometric record read from the input dataset
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFeature {
    /// Position of the feature in the dataset
    pub index: usize,
    /// Geometry, `None` for null shapes or shapes that could not be converted
    pub geometry: Option<Geometry<f64>>,
    /// Attribute table row keyed by field name
    pub fields: BTreeMap<String, AttributeValue>,
}

impl SourceFeature {
    /// Create a feature from its parts
    pub fn new(
        index: usize,
        geometry: Option<Geometry<f64>>,
        fields: BTreeMap<String, AttributeValue>,
    ) -> Self {
        Self { index, geometry, fields }
    }

    /// Look up a field that is present and not null
    pub fn field(&self, name: &str) -> Option<&AttributeValue> {
        self.fields.get(name).filter(|value| !value.is_null())
    }
}

/// Descriptive facts about a loaded dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetSummary {
    /// Number of records read
    pub record_count: usize,
    /// Coordinate reference system as found in the `.prj` sidecar, if any
    pub crs: Option<String>,
    /// Every attribute column seen, sorted
    pub columns: BTreeSet<String>,
    /// Number of features per geometry type name
    pub geometry_types: BTreeMap<String, usize>,
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} features, CRS: {}, {} columns",
            self.record_count,
            self.crs.as_deref().unwrap_or("unknown"),
            self.columns.len()
        )
    }
}

/// Features plus their summary
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Features in source order
    pub features: Vec<SourceFeature>,
    /// Summary of the dataset
    pub summary: DatasetSummary,
}

impl Dataset {
    /// Build a dataset from features, deriving the summary
    pub fn from_features(features: Vec<SourceFeature>, crs: Option<String>) -> Self {
        let mut summary = DatasetSummary { record_count: features.len(), crs, ..Default::default() };

        for feature in &features {
            summary.columns.extend(feature.fields.keys().cloned());
            let type_name = feature
                .geometry
                .as_ref()
                .map(crate::normalize::geometry_type_name)
                .unwrap_or("Null");
            *summary.geometry_types.entry(type_name.to_string()).or_insert(0) += 1;
        }

        Self { features, summary }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{point, polygon};

    #[test]
    fn test_summary_from_features() {
        let square: Geometry<f64> =
            polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)].into();
        let mut fields = BTreeMap::new();
        fields.insert("ROOM_NUM".to_string(), AttributeValue::from("101"));

        let mut other_fields = BTreeMap::new();
        other_fields.insert("NAME".to_string(), AttributeValue::Null);

        let dataset = Dataset::from_features(
            vec![
                SourceFeature::new(0, Some(square), fields),
                SourceFeature::new(1, Some(point!(x: 1.0, y: 2.0).into()), other_fields),
                SourceFeature::new(2, None, BTreeMap::new()),
            ],
            None,
        );

        assert_eq!(dataset.summary.record_count, 3);
        assert_eq!(
            dataset.summary.columns.iter().cloned().collect::<Vec<_>>(),
            vec!["NAME".to_string(), "ROOM_NUM".to_string()]
        );
        assert_eq!(dataset.summary.geometry_types.get("Polygon"), Some(&1));
        assert_eq!(dataset.summary.geometry_types.get("Point"), Some(&1));
        assert_eq!(dataset.summary.geometry_types.get("Null"), Some(&1));
        assert_eq!(dataset.summary.to_string(), "3 features, CRS: unknown, 2 columns");
    }

    #[test]
    fn test_field_skips_nulls() {
        let mut fields = BTreeMap::new();
        fields.insert("NAME".to_string(), AttributeValue::Null);
        fields.insert("ROOM_NUM".to_string(), AttributeValue::from("12"));
        let feature = SourceFeature::new(0, None, fields);

        assert!(feature.field("NAME").is_none());
        assert_eq!(feature.field("ROOM_NUM"), Some(&AttributeValue::from("12")));
        assert!(feature.field("MISSING").is_none());
    }
}
