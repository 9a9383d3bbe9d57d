// Third-party entity resolution
//
// Maps an origin or URL to the organization that owns it, using a list of
// `{name, domains[]}` records. Two indexes are built per load: exact domain and
// heuristic root domain. Root domains claimed by more than one entity are
// dropped from the root index; exact entries are never dropped.
//
// Only entities on the relevant allow-list are indexed. Each of them has a
// matching `thirdParties.<Entity>.blocked` feature in the predictor vocabulary.

mod directory;
mod domain;
mod relevant;

pub use directory::{EntityDirectory, EntityEntry, EntitySource, SharedEntityDirectory};
pub use domain::{domain_from_origin_or_url, root_domain};
pub use relevant::{is_relevant_entity, RELEVANT_ENTITIES};
