use molmatch_common::{OverlapScope, SearchMode};

use crate::mapping::Mapping;

/// The de-duplicated mappings found by one session, in discovery order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SolutionSet {
    mappings: Vec<Mapping>,
    /// Index of the first discovered mapping among the best.
    first: Option<usize>,
}

impl SolutionSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Collect search output. Largest-overlap searches keep only the
    /// mappings with the most bonds, then the most atoms.
    pub(crate) fn collect(mappings: Vec<Mapping>, mode: SearchMode, scope: OverlapScope) -> Self {
        let mappings = match (mode, scope) {
            (SearchMode::Overlap, OverlapScope::Largest) => {
                let best = mappings.iter().map(size).max();
                mappings
                    .into_iter()
                    .filter(|m| Some(size(m)) == best)
                    .collect()
            }
            _ => mappings,
        };

        let best = mappings.iter().map(size).max();
        let first = mappings.iter().position(|m| Some(size(m)) == best);
        Self { mappings, first }
    }

    /// The first mapping found among the best.
    pub fn first_mapping(&self) -> Option<&Mapping> {
        self.first.and_then(|i| self.mappings.get(i))
    }

    pub fn all_mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    /// Mappings of the largest size present, in discovery order.
    pub fn largest(&self) -> impl Iterator<Item = &Mapping> {
        let best = self.mappings.iter().map(size).max();
        self.mappings.iter().filter(move |m| Some(size(m)) == best)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn into_mappings(self) -> Vec<Mapping> {
        self.mappings
    }
}

fn size(mapping: &Mapping) -> (usize, usize) {
    (mapping.bond_count(), mapping.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(atoms: usize, bonds: usize, offset: usize) -> Mapping {
        let mut m = Mapping::new();
        for i in 0..atoms {
            m.insert(i, i + offset);
        }
        for b in 0..bonds {
            m.insert_bond(b, b + offset);
        }
        m
    }

    #[test]
    fn largest_overlap_filters_smaller_mappings() {
        let set = SolutionSet::collect(
            vec![mapping(2, 1, 0), mapping(3, 2, 0), mapping(3, 2, 5)],
            SearchMode::Overlap,
            OverlapScope::Largest,
        );
        assert_eq!(set.len(), 2);
        assert_eq!(set.first_mapping(), Some(&mapping(3, 2, 0)));
    }

    #[test]
    fn all_maximal_keeps_everything_but_first_is_best() {
        let set = SolutionSet::collect(
            vec![mapping(2, 1, 0), mapping(3, 2, 0)],
            SearchMode::Overlap,
            OverlapScope::AllMaximal,
        );
        assert_eq!(set.len(), 2);
        assert_eq!(set.first_mapping(), Some(&mapping(3, 2, 0)));
        assert_eq!(set.largest().count(), 1);
    }

    #[test]
    fn empty_set_has_no_first() {
        let set = SolutionSet::collect(Vec::new(), SearchMode::Exact, OverlapScope::Largest);
        assert!(set.is_empty());
        assert_eq!(set.first_mapping(), None);
        assert_eq!(set, SolutionSet::empty());
    }
}
