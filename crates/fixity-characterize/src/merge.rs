//! Merging characterization terms into descriptive metadata.

use tracing::debug;

use fixity_contracts::metadata::{DescMetadata, FieldMapping, TermMap};

/// Append mapped term values to `desc`, returning how many values were added.
///
/// Only terms present in `terms` contribute. Values already present in the
/// target field are skipped, so the merge is idempotent and the order in
/// which concurrent merges land does not change the resulting set.
pub fn append_metadata(desc: &mut DescMetadata, terms: &TermMap, mapping: &FieldMapping) -> usize {
    let mut added = 0;
    for entry in mapping.entries() {
        let Some(value) = terms.get(&entry.term) else {
            continue;
        };
        for v in value.iter() {
            if desc.append(entry.target, v.as_str()) {
                added += 1;
            }
        }
    }
    debug!(added, mapped_terms = mapping.entries().len(), "characterization terms merged");
    added
}
