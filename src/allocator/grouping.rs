use crate::model::WorkRecord;
use std::collections::HashMap;

/// Visites partageant le même NVT, dans l'ordre d'entrée.
#[derive(Debug)]
pub(super) struct LocationGroup<'a> {
    pub location_id: &'a str,
    pub records: Vec<&'a WorkRecord>,
}

/// Regroupe par NVT ; groupes triés par taille décroissante,
/// à taille égale dans l'ordre de première apparition.
pub(super) fn group_by_location(records: &[WorkRecord]) -> Vec<LocationGroup<'_>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<LocationGroup<'_>> = Vec::new();

    for record in records {
        let key = record.location_id.as_str();
        let pos = *index.entry(key).or_insert_with(|| {
            groups.push(LocationGroup {
                location_id: key,
                records: Vec::new(),
            });
            groups.len() - 1
        });
        groups[pos].records.push(record);
    }

    // tri stable : conserve l'ordre de première apparition
    groups.sort_by(|a, b| b.records.len().cmp(&a.records.len()));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn largest_group_first_ties_by_first_seen() {
        let records = vec![
            WorkRecord::new("a", "L2"),
            WorkRecord::new("b", "L1"),
            WorkRecord::new("c", "L3"),
            WorkRecord::new("d", "L1"),
            WorkRecord::new("e", "L3"),
            WorkRecord::new("f", "L4"),
        ];
        let groups = group_by_location(&records);
        let order: Vec<_> = groups.iter().map(|g| g.location_id).collect();
        assert_eq!(order, vec!["L1", "L3", "L2", "L4"]);
        let l1: Vec<_> = groups[0].records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(l1, vec!["b", "d"]);
    }

    #[test]
    fn odd_identifiers_form_their_own_group() {
        let records = vec![WorkRecord::new("a", ""), WorkRecord::new("b", " L1 ")];
        let groups = group_by_location(&records);
        assert_eq!(groups.len(), 2);
    }
}
