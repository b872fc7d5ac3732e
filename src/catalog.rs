//! Entity catalog: the selectable population and its identity mapping
//!
//! Built from the Entities table. Only rows tagged `ModelGroup = "Primary"` are
//! selectable. Names are the external identity; integer identifiers are a
//! secondary join key that may be missing for some names.

use crate::error::ContrastError;
use crate::table::row::{parse_identifier, ReservedColumns, Row, ID_CANDIDATES};
use crate::table::{group_by, KeyMatch};
use indexmap::IndexMap;
use serde::Serialize;
use std::cmp::Ordering;
use tracing::{debug, error, warn};

/// Classification column used as the inclusion filter
pub const MODEL_GROUP: &str = "ModelGroup";

/// The only selectable `ModelGroup` value
pub const PRIMARY_GROUP: &str = "Primary";

/// Category column used to group the selection list
pub const ENTITY_TYPE: &str = "Entity Type";

/// A selectable entity and its descriptive fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityRecord {
    pub name: String,
    pub id: Option<i64>,
    pub entity_type: Option<String>,
    /// Remaining columns as text, in table order
    pub details: IndexMap<String, String>,
}

impl EntityRecord {
    fn from_row(name: String, row: &Row) -> Self {
        let details = row
            .iter()
            .filter(|(key, _)| {
                !ReservedColumns::ENTITY.contains(key, KeyMatch::Exact)
                    && !ID_CANDIDATES.contains(key)
                    && *key != MODEL_GROUP
                    && *key != ENTITY_TYPE
            })
            .filter_map(|(key, value)| {
                crate::table::row::value_text(value).map(|text| (key.to_string(), text))
            })
            .collect();

        Self {
            name,
            id: row.identifier(),
            entity_type: row.text(ENTITY_TYPE).filter(|t| !t.is_empty()),
            details,
        }
    }
}

/// Entities of one `Entity Type`, for categorised option lists
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityGroup {
    pub entity_type: String,
    pub entities: Vec<String>,
}

/// Data-quality findings recorded while building the catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogIssue {
    /// A Primary row without a usable `Entity Name`
    MissingName { row: usize },
    /// A Primary row with none of the identifier columns
    MissingIdentifier { name: String },
    /// The identifier column is present but holds no integer
    UnparseableIdentifier { name: String, column: String },
    /// A name repeated across Primary rows; the first row wins
    DuplicateName { name: String },
    /// Non-empty input produced no name -> identifier mappings at all
    NoIdentityMappings { rows: usize },
}

/// The selectable entity population
#[derive(Debug, Clone, Default)]
pub struct EntityCatalog {
    names: Vec<String>,
    identities: IndexMap<String, i64>,
    records: IndexMap<String, EntityRecord>,
    groups: Vec<EntityGroup>,
    issues: Vec<CatalogIssue>,
}

impl EntityCatalog {
    /// Build the catalog from all Entities rows
    pub fn build(rows: &[Row]) -> Self {
        let mut catalog = Self::default();

        let primary: Vec<(usize, &Row)> = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.text(MODEL_GROUP).as_deref() == Some(PRIMARY_GROUP))
            .collect();
        debug!("{} of {} entity rows are {}", primary.len(), rows.len(), PRIMARY_GROUP);

        let mut named: Vec<&Row> = Vec::with_capacity(primary.len());
        for (pos, row) in primary {
            let Some(name) = row.entity_name() else {
                warn!("Primary entity row {} has no Entity Name", pos);
                catalog.issues.push(CatalogIssue::MissingName { row: pos });
                continue;
            };

            if catalog.records.contains_key(&name) {
                warn!(
                    "Duplicate entity name '{}' (row {}); keeping the first record, identifier from the last",
                    name, pos
                );
                catalog.issues.push(CatalogIssue::DuplicateName { name: name.clone() });
            } else {
                catalog
                    .records
                    .insert(name.clone(), EntityRecord::from_row(name.clone(), row));
            }

            catalog.resolve_identity(&name, row);
            named.push(row);
        }

        catalog.names = catalog.records.keys().cloned().collect();
        catalog.names.sort_by(|a, b| collate(a, b));

        for (entity_type, members) in group_by(named, |row| {
            row.text(ENTITY_TYPE).filter(|t| !t.is_empty())
        }) {
            let mut entities: Vec<String> = Vec::with_capacity(members.len());
            for name in members.iter().filter_map(|row| row.entity_name()) {
                if !entities.contains(&name) {
                    entities.push(name);
                }
            }
            catalog.groups.push(EntityGroup { entity_type, entities });
        }

        if !rows.is_empty() && catalog.identities.is_empty() {
            error!(
                "No valid {} to entity name mappings found for ModelGroup = {}",
                ID_CANDIDATES.join("/"),
                PRIMARY_GROUP
            );
            catalog
                .issues
                .push(CatalogIssue::NoIdentityMappings { rows: rows.len() });
        }

        debug!(
            "Catalog built: {} names, {} identity mappings, {} groups",
            catalog.names.len(),
            catalog.identities.len(),
            catalog.groups.len()
        );
        catalog
    }

    /// Map `name` to this row's identifier. A later row for the same name
    /// replaces the earlier mapping; an unparseable identifier clears it.
    fn resolve_identity(&mut self, name: &str, row: &Row) {
        let Some(column) = row.identifier_key() else {
            debug!("Entity '{}' has no identifier column", name);
            self.issues.push(CatalogIssue::MissingIdentifier { name: name.to_string() });
            return;
        };
        match row.get(column).and_then(parse_identifier) {
            Some(id) => {
                if let Some(previous) = self.identities.insert(name.to_string(), id) {
                    if previous != id {
                        warn!("Entity '{}' remapped from {} to {}", name, previous, id);
                    }
                }
            }
            None => {
                warn!("Entity '{}' has an unparseable {} value", name, column);
                self.identities.shift_remove(name);
                self.issues.push(CatalogIssue::UnparseableIdentifier {
                    name: name.to_string(),
                    column: column.to_string(),
                });
            }
        }
    }

    /// Unique selectable names, sorted
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Identifier mapped to a selectable name, if any
    pub fn identity(&self, name: &str) -> Option<i64> {
        self.identities.get(name).copied()
    }

    /// All name -> identifier mappings, in table order
    pub fn identities(&self) -> &IndexMap<String, i64> {
        &self.identities
    }

    pub fn record(&self, name: &str) -> Option<&EntityRecord> {
        self.records.get(name)
    }

    /// Entities grouped by `Entity Type`, first-seen group order
    pub fn groups(&self) -> &[EntityGroup] {
        &self.groups
    }

    pub fn issues(&self) -> &[CatalogIssue] {
        &self.issues
    }

    /// Configuration error when the Entities table yielded no identity mapping.
    ///
    /// Selection by name keeps working; identifier joins fall back to names.
    pub fn identity_error(&self) -> Option<ContrastError> {
        self.issues.iter().find_map(|issue| match issue {
            CatalogIssue::NoIdentityMappings { rows } => Some(ContrastError::Config(format!(
                "no valid identifier mappings found among {} entity rows",
                rows
            ))),
            _ => None,
        })
    }
}

/// Locale-style ordering: case-insensitive first, lower case before upper case
/// on ties.
pub fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(name: &str, group: &str, id: i64) -> Row {
        Row::new()
            .with("EntID", id)
            .with("Entity Name", name)
            .with("ModelGroup", group)
    }

    #[test]
    fn test_dedupe_and_sort() {
        let rows = vec![
            entity("Bravo", "Primary", 2),
            entity("Alpha", "Primary", 1),
            entity("Alpha", "Primary", 3),
        ];
        let catalog = EntityCatalog::build(&rows);
        assert_eq!(catalog.names(), &["Alpha".to_string(), "Bravo".to_string()]);
        assert_eq!(catalog.identity("Alpha"), Some(3));
        assert!(catalog
            .issues()
            .contains(&CatalogIssue::DuplicateName { name: "Alpha".to_string() }));
    }

    #[test]
    fn test_duplicate_name_takes_last_identifier() {
        let rows = vec![
            entity("X", "Primary", 1),
            entity("Y", "Primary", 2),
            entity("X", "Primary", 3),
        ];
        let catalog = EntityCatalog::build(&rows);
        assert_eq!(catalog.identity("X"), Some(3));
        assert_eq!(catalog.identity("Y"), Some(2));
        // Descriptive record stays with the first row
        assert_eq!(catalog.record("X").and_then(|r| r.id), Some(1));

        let rows = vec![
            entity("X", "Primary", 1),
            Row::new()
                .with("EntID", "n/a")
                .with("Entity Name", "X")
                .with("ModelGroup", "Primary"),
            entity("Y", "Primary", 2),
        ];
        let catalog = EntityCatalog::build(&rows);
        assert_eq!(catalog.identity("X"), None);
        assert!(catalog.contains("X"));
    }

    #[test]
    fn test_primary_filter_is_exact() {
        let rows = vec![
            entity("A", "Primary", 1),
            entity("B", "primary", 2),
            entity("C", " Primary ", 3),
            entity("D", "Secondary", 4),
            Row::new().with("EntID", 5).with("Entity Name", "E"),
        ];
        let catalog = EntityCatalog::build(&rows);
        assert_eq!(catalog.names(), &["A".to_string(), "C".to_string()]);
        assert!(!catalog.contains("B"));
        assert_eq!(catalog.identity("D"), None);
    }

    #[test]
    fn test_name_without_identifier_stays_selectable() {
        let rows = vec![
            entity("A", "Primary", 1),
            Row::new().with("Entity Name", "B").with("ModelGroup", "Primary"),
            Row::new()
                .with("ID", "none")
                .with("Entity Name", "C")
                .with("ModelGroup", "Primary"),
        ];
        let catalog = EntityCatalog::build(&rows);
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.identity("B"), None);
        assert_eq!(catalog.identity("C"), None);
        assert!(catalog
            .issues()
            .contains(&CatalogIssue::MissingIdentifier { name: "B".to_string() }));
        assert!(catalog.issues().contains(&CatalogIssue::UnparseableIdentifier {
            name: "C".to_string(),
            column: "ID".to_string()
        }));
        assert!(catalog.identity_error().is_none());
    }

    #[test]
    fn test_empty_mapping_is_configuration_error() {
        let rows = vec![entity("A", "Secondary", 1)];
        let catalog = EntityCatalog::build(&rows);
        assert!(catalog.is_empty());
        assert!(matches!(
            catalog.identity_error(),
            Some(ContrastError::Config(_))
        ));

        // Empty input is not an error
        assert!(EntityCatalog::build(&[]).identity_error().is_none());
    }

    #[test]
    fn test_groups_by_entity_type() {
        let rows = vec![
            entity("Zed", "Primary", 1).with("Entity Type", "Assistant"),
            entity("Amy", "Primary", 2),
            entity("Bob", "Primary", 3).with("Entity Type", "Assistant"),
            entity("Cat", "Primary", 4).with("Entity Type", "Search"),
        ];
        let catalog = EntityCatalog::build(&rows);
        let groups: Vec<(&str, Vec<&str>)> = catalog
            .groups()
            .iter()
            .map(|g| {
                (
                    g.entity_type.as_str(),
                    g.entities.iter().map(String::as_str).collect(),
                )
            })
            .collect();
        assert_eq!(
            groups,
            vec![
                ("Assistant", vec!["Zed", "Bob"]),
                ("Other", vec!["Amy"]),
                ("Search", vec!["Cat"]),
            ]
        );
    }

    #[test]
    fn test_record_details() {
        let rows = vec![entity("A", "Primary", 7)
            .with("Entity Type", "Tool")
            .with("Description", " A thing ")
            .with("Vendor", "Acme")];
        let catalog = EntityCatalog::build(&rows);
        let record = catalog.record("A").unwrap();
        assert_eq!(record.id, Some(7));
        assert_eq!(record.entity_type.as_deref(), Some("Tool"));
        let details: Vec<(&str, &str)> = record
            .details
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(details, vec![("Description", "A thing"), ("Vendor", "Acme")]);
    }

    #[test]
    fn test_collate_case_insensitive() {
        let mut names = vec!["beta", "Alpha", "alpha", "Gamma"];
        names.sort_by(|a, b| collate(a, b));
        assert_eq!(names, vec!["alpha", "Alpha", "beta", "Gamma"]);
    }
}
