// Copyright 2025 Cowboy AI, LLC.

//! Specifications and the filter provider contract
//!
//! A [`Specification`] is a pure, typed predicate over one record type. The
//! same predicate serves as the store-level filter and the in-memory filter
//! through [`RecordQuery::where_satisfies`], so the two forms cannot
//! disagree.
//!
//! A [`FilterProvider`] maps named [`FilterDefinition`]s onto
//! specifications. An unknown name within a provider resolves to `None` and
//! the definition is skipped; a request carrying filters for a record type
//! with no provider wired at all is a pipeline configuration error, raised
//! eagerly by the handlers.

use crate::query::RecordQuery;
use crate::requests::FilterDefinition;
use tracing::debug;

/// A typed predicate over one record type
///
/// Specifications are pure: evaluating one has no side effects, and the
/// result depends only on the candidate record.
///
/// # Examples
///
/// ```rust
/// use cim_records::Specification;
///
/// struct LongerThan(usize);
///
/// impl Specification<String> for LongerThan {
///     fn is_satisfied_by(&self, candidate: &String) -> bool {
///         candidate.len() > self.0
///     }
/// }
///
/// let spec = LongerThan(3);
/// assert!(spec.is_satisfied_by(&"weather".to_string()));
/// assert!(!spec.is_satisfied_by(&"ok".to_string()));
/// ```
pub trait Specification<T>: Send + Sync {
    /// Evaluate the predicate against a candidate record
    fn is_satisfied_by(&self, candidate: &T) -> bool;
}

/// Maps named filter definitions to specifications for one record type
pub trait FilterProvider<T>: Send + Sync {
    /// Resolve a definition to a specification
    ///
    /// Returns `None` when the name is unrecognized or the payload does not
    /// parse; the pipeline treats both as "no filter", not as errors.
    fn specification(&self, definition: &FilterDefinition) -> Option<Box<dyn Specification<T>>>;

    /// Fold a list of definitions into the query
    ///
    /// Each resolved specification is AND-composed by successively narrowing
    /// the query, in list order. Definitions that resolve to `None` are
    /// skipped silently.
    fn apply(&self, query: RecordQuery<T>, definitions: &[FilterDefinition]) -> RecordQuery<T> {
        definitions.iter().fold(query, |query, definition| {
            match self.specification(definition) {
                Some(specification) => query.where_satisfies(specification.as_ref()),
                None => {
                    debug!(
                        filter = %definition.filter_name,
                        "no specification for filter definition, skipping"
                    );
                    query
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DivisibleBy(i32);

    impl Specification<i32> for DivisibleBy {
        fn is_satisfied_by(&self, candidate: &i32) -> bool {
            candidate % self.0 == 0
        }
    }

    struct NumberFilters;

    impl FilterProvider<i32> for NumberFilters {
        fn specification(&self, definition: &FilterDefinition) -> Option<Box<dyn Specification<i32>>> {
            match definition.filter_name.as_str() {
                "DivisibleBy" => {
                    let divisor: i32 = definition.filter_data.parse().ok()?;
                    Some(Box::new(DivisibleBy(divisor)))
                }
                _ => None,
            }
        }
    }

    /// Test AND composition of filters in list order
    ///
    /// ```mermaid
    /// graph LR
    ///     A[Query] -->|DivisibleBy 2| B[Evens]
    ///     B -->|DivisibleBy 3| C[Multiples of 6]
    /// ```
    #[test]
    fn test_filters_are_conjunctive() {
        let provider = NumberFilters;
        let definitions = vec![
            FilterDefinition::new("DivisibleBy", "2"),
            FilterDefinition::new("DivisibleBy", "3"),
        ];

        let query = RecordQuery::new((1..=24).collect());
        let items = provider.apply(query, &definitions).into_items();

        assert_eq!(items, vec![6, 12, 18, 24]);
    }

    /// Test conjunction commutes: [A, B] selects the same set as [B, A]
    #[test]
    fn test_filter_conjunction_commutes() {
        let provider = NumberFilters;
        let forward = vec![
            FilterDefinition::new("DivisibleBy", "2"),
            FilterDefinition::new("DivisibleBy", "3"),
        ];
        let reversed: Vec<_> = forward.iter().rev().cloned().collect();

        let a = provider
            .apply(RecordQuery::new((1..=100).collect()), &forward)
            .into_items();
        let b = provider
            .apply(RecordQuery::new((1..=100).collect()), &reversed)
            .into_items();

        assert_eq!(a, b);
    }

    /// Test unknown filter names are skipped, not errors
    #[test]
    fn test_unknown_name_is_noop() {
        let provider = NumberFilters;
        let definitions = vec![
            FilterDefinition::new("NoSuchFilter", "whatever"),
            FilterDefinition::new("DivisibleBy", "5"),
        ];

        let items = provider
            .apply(RecordQuery::new((1..=20).collect()), &definitions)
            .into_items();

        assert_eq!(items, vec![5, 10, 15, 20]);
    }

    /// Test unparsable payloads degrade to a no-op as well
    #[test]
    fn test_bad_payload_is_noop() {
        let provider = NumberFilters;
        let definitions = vec![FilterDefinition::new("DivisibleBy", "not-a-number")];

        let items = provider
            .apply(RecordQuery::new(vec![1, 2, 3]), &definitions)
            .into_items();

        assert_eq!(items, vec![1, 2, 3]);
    }
}
