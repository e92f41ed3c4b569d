use molmatch_common::Parity;

/// Everything the deferred chirality check needs for one mapped atom.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChiralityContext {
    /// Parity recorded on the target atom.
    pub target_parity: Option<Parity>,
    /// Parity of the permutation taking the query atom's neighbour order to
    /// the target atom's neighbour order.
    pub permutation: Option<Parity>,
}

impl ChiralityContext {
    pub const fn new(target_parity: Option<Parity>, permutation: Option<Parity>) -> Self {
        Self {
            target_parity,
            permutation,
        }
    }

    /// Whether a query parity survives the neighbour permutation unchanged
    /// relative to the target. Unknown parities never match.
    pub fn matches(&self, query: Parity) -> bool {
        match (self.target_parity, self.permutation) {
            (Some(target), Some(permutation)) => query.compose(permutation) == target,
            _ => false,
        }
    }
}

/// Parity of the permutation placing the mapped query neighbours within the
/// target neighbour list.
///
/// `query_neighbors` are in query bond order, `target_neighbors` in target
/// bond order. Target neighbours not hit by the mapping follow the mapped
/// ones in their own order. Returns `None` when a query neighbour is
/// unmapped or not adjacent in the target.
pub fn permutation_parity(
    query_neighbors: &[usize],
    map: impl Fn(usize) -> Option<usize>,
    target_neighbors: &[usize],
) -> Option<Parity> {
    let mut positions = Vec::with_capacity(target_neighbors.len());
    for &q in query_neighbors {
        let t = map(q)?;
        let pos = target_neighbors.iter().position(|&n| n == t)?;
        positions.push(pos);
    }
    for pos in 0..target_neighbors.len() {
        if !positions.contains(&pos) {
            positions.push(pos);
        }
    }

    let inversions = positions
        .iter()
        .enumerate()
        .map(|(i, a)| positions[i + 1..].iter().filter(|b| a > b).count())
        .sum();
    Some(Parity::from_inversions(inversions))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_even() {
        let parity = permutation_parity(&[1, 2, 3], |q| Some(q + 10), &[11, 12, 13]);
        assert_eq!(parity, Some(Parity::Even));
    }

    #[test]
    fn single_swap_is_odd() {
        let parity = permutation_parity(&[1, 2, 3], |q| Some(q + 10), &[12, 11, 13]);
        assert_eq!(parity, Some(Parity::Odd));
    }

    #[test]
    fn unmapped_target_neighbours_trail() {
        // target has an extra neighbour first; mapped ones are 1,2 in order
        let parity = permutation_parity(&[0, 1], |q| Some(q + 1), &[9, 1, 2]);
        // positions [1, 2, 0] -> two inversions
        assert_eq!(parity, Some(Parity::Even));
    }

    #[test]
    fn missing_neighbour_is_unknown() {
        assert_eq!(permutation_parity(&[0, 1], |_| None, &[4, 5]), None);
        assert_eq!(permutation_parity(&[0], |_| Some(7), &[4, 5]), None);
    }

    #[test]
    fn context_requires_both_parities() {
        assert!(ChiralityContext::new(Some(Parity::Even), Some(Parity::Even)).matches(Parity::Even));
        assert!(ChiralityContext::new(Some(Parity::Odd), Some(Parity::Odd)).matches(Parity::Even));
        assert!(!ChiralityContext::new(None, Some(Parity::Even)).matches(Parity::Even));
        assert!(!ChiralityContext::new(Some(Parity::Even), None).matches(Parity::Even));
    }
}
