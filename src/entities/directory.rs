use crate::entities::domain::{domain_from_origin_or_url, root_domain};
use crate::entities::relevant::is_relevant_entity;
use crate::error::{json_kind, EntityLoadError};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

/// Entity list compiled into the binary
const PACKAGED_ENTITIES: &str = include_str!("../../entities-default.json");

/// One organization and the domains it owns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityEntry {
    pub name: String,
    pub domains: BTreeSet<String>,
}

impl EntityEntry {
    pub fn new<I, S>(name: impl Into<String>, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            domains: domains.into_iter().map(Into::into).collect(),
        }
    }

    /// Lenient conversion from one JSON record
    ///
    /// Records without a string `name` or an array `domains` are rejected;
    /// non-string domain elements are skipped.
    fn from_value(record: &Value) -> Option<Self> {
        let name = record.get("name")?.as_str()?;
        let domains = record
            .get("domains")?
            .as_array()?
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
        Some(Self {
            name: name.to_string(),
            domains,
        })
    }
}

/// Which entities a load keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntityFilter {
    Relevant,
    All,
}

/// Domain → entity lookup tables
///
/// # Example
/// ```
/// use savings_predictor::entities::EntityDirectory;
///
/// let mut directory = EntityDirectory::new();
/// directory.load_entities(r#"[{"name": "Facebook", "domains": ["facebook.net"]}]"#)?;
/// assert_eq!(directory.resolve("https://connect.facebook.net/sdk.js"), Some("Facebook"));
/// assert_eq!(directory.resolve("https://example.org/"), None);
/// # Ok::<(), savings_predictor::error::EntityLoadError>(())
/// ```
#[derive(Debug)]
pub struct EntityDirectory {
    filter: EntityFilter,
    initialized: bool,
    entity_by_domain: HashMap<String, String>,
    entity_by_root_domain: HashMap<String, String>,
}

impl Default for EntityDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityDirectory {
    /// Empty directory that indexes only relevant entities
    pub fn new() -> Self {
        Self::with_filter(EntityFilter::Relevant)
    }

    /// Empty directory that indexes every entity it is given
    pub fn unfiltered() -> Self {
        Self::with_filter(EntityFilter::All)
    }

    fn with_filter(filter: EntityFilter) -> Self {
        Self {
            filter,
            initialized: false,
            entity_by_domain: HashMap::new(),
            entity_by_root_domain: HashMap::new(),
        }
    }

    /// Build a relevant-only directory from `source`
    ///
    /// Never fails: a bad source is logged and yields an empty directory that
    /// is marked initialized, so the load is not retried.
    pub fn from_source(source: &EntitySource) -> Self {
        let mut directory = Self::new();
        let loaded = match source {
            EntitySource::Packaged => directory.load_entities(PACKAGED_ENTITIES),
            EntitySource::Inline(json) => directory.load_entities(json),
            EntitySource::File(path) => match fs::read_to_string(path) {
                Ok(json) => directory.load_entities(&json),
                Err(source) => {
                    directory.clear();
                    directory.initialized = true;
                    Err(EntityLoadError::Io {
                        path: path.clone(),
                        source,
                    })
                }
            },
        };

        match loaded {
            Ok(count) => tracing::debug!("Loaded {} third-party entities", count),
            Err(e) => tracing::warn!(
                "Third-party entity initialization failed, will not retry: {}",
                e
            ),
        }
        directory
    }

    /// Replace both indexes with the contents of a JSON entity list
    ///
    /// Returns the number of entities indexed. On error the indexes are left
    /// empty. The directory is marked initialized either way.
    pub fn load_entities(&mut self, json: &str) -> Result<usize, EntityLoadError> {
        self.clear();
        self.initialized = true;

        let document: Value = serde_json::from_str(json)?;
        let Value::Array(records) = &document else {
            return Err(EntityLoadError::NotAList(json_kind(&document)));
        };

        Ok(self.index_entries(records.iter().filter_map(EntityEntry::from_value)))
    }

    /// Replace both indexes with already-parsed entries
    pub fn load_entries<I>(&mut self, entries: I) -> usize
    where
        I: IntoIterator<Item = EntityEntry>,
    {
        self.clear();
        self.initialized = true;
        self.index_entries(entries.into_iter())
    }

    fn index_entries(&mut self, entries: impl Iterator<Item = EntityEntry>) -> usize {
        let mut ambiguous_roots: HashSet<String> = HashSet::new();
        let mut indexed = 0;

        for entry in entries {
            if self.filter == EntityFilter::Relevant && !is_relevant_entity(&entry.name) {
                tracing::trace!("Irrelevant entity {}", entry.name);
                continue;
            }
            indexed += 1;

            for domain in &entry.domains {
                match self.entity_by_domain.get(domain) {
                    Some(existing) => {
                        tracing::debug!(
                            "Malformed data: duplicate domain {} ({} kept, {} ignored)",
                            domain,
                            existing,
                            entry.name
                        );
                    }
                    None => {
                        self.entity_by_domain
                            .insert(domain.clone(), entry.name.clone());
                    }
                }

                let root = root_domain(domain);
                if ambiguous_roots.contains(root) {
                    continue;
                }
                match self.entity_by_root_domain.get(root) {
                    Some(existing) if *existing != entry.name => {
                        // A root shared by two entities belongs to neither
                        tracing::debug!(
                            "Root domain {} claimed by {} and {}, dropping",
                            root,
                            existing,
                            entry.name
                        );
                        self.entity_by_root_domain.remove(root);
                        ambiguous_roots.insert(root.to_string());
                    }
                    Some(_) => {}
                    None => {
                        self.entity_by_root_domain
                            .insert(root.to_string(), entry.name.clone());
                    }
                }
            }
        }

        self.entity_by_domain.shrink_to_fit();
        self.entity_by_root_domain.shrink_to_fit();
        indexed
    }

    fn clear(&mut self) {
        self.entity_by_domain.clear();
        self.entity_by_root_domain.clear();
    }

    /// Entity owning `origin_or_url`, by exact domain then root domain
    pub fn resolve(&self, origin_or_url: &str) -> Option<&str> {
        let domain = domain_from_origin_or_url(origin_or_url)?;
        if let Some(entity) = self.entity_by_domain.get(&domain) {
            return Some(entity.as_str());
        }
        self.entity_by_root_domain
            .get(root_domain(&domain))
            .map(String::as_str)
    }

    /// Entity indexed under exactly `domain`
    pub fn exact_entity(&self, domain: &str) -> Option<&str> {
        self.entity_by_domain.get(domain).map(String::as_str)
    }

    /// Entity indexed under root domain `root`
    pub fn root_entity(&self, root: &str) -> Option<&str> {
        self.entity_by_root_domain.get(root).map(String::as_str)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn domain_count(&self) -> usize {
        self.entity_by_domain.len()
    }

    pub fn root_domain_count(&self) -> usize {
        self.entity_by_root_domain.len()
    }
}

/// Where the entity list comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntitySource {
    /// The list compiled into the crate
    Packaged,
    /// A JSON file on disk
    File(PathBuf),
    /// A JSON document held in memory
    Inline(String),
}

/// Lazily loaded directory shared by every consumer of one process
///
/// The first call to [`SharedEntityDirectory::get`] loads the source; later
/// calls, including concurrent ones, observe that result. A failed load is
/// not retried.
#[derive(Debug)]
pub struct SharedEntityDirectory {
    source: EntitySource,
    cell: OnceLock<Arc<EntityDirectory>>,
}

impl SharedEntityDirectory {
    pub fn new(source: EntitySource) -> Self {
        Self {
            source,
            cell: OnceLock::new(),
        }
    }

    pub fn packaged() -> Self {
        Self::new(EntitySource::Packaged)
    }

    /// Directory for this process, loading it on first access
    pub fn get(&self) -> Arc<EntityDirectory> {
        Arc::clone(
            self.cell
                .get_or_init(|| Arc::new(EntityDirectory::from_source(&self.source))),
        )
    }

    /// Whether the first access has happened
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}
