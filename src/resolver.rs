//! Turns what the user typed into exactly one stored label.
//!
//! A reference is a list of tokens. A single token that parses as an integer
//! is a 1-based index into the store's enumeration. Otherwise the tokens
//! joined by spaces are tried as a literal label, and failing that as a query
//! where every token must appear (case-sensitive) in the label. Queries pick
//! the first match in enumeration order.
//!
//! Because the exact label is tried first, a reference that names a stored
//! label returns that label even when an earlier label also contains it as a
//! substring: with `github work` enumerated before `github`, the reference
//! `github` resolves to `github`, not to the first label containing it. Pure
//! first-containing-label selection is [`resolve_query`]. An empty reference
//! never resolves; only [`matching`] treats an empty query as match-all.

use log::debug;

use crate::store::{SecretStore, StoreError};

/// How a reference ended up being resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Index(i64),
    Exact,
    Query,
}

/// Resolves `tokens` to a stored label, trying index, exact and query mode
/// in that order.
pub fn resolve<S: SecretStore + ?Sized>(
    store: &S,
    tokens: &[String],
) -> Result<String, StoreError> {
    resolve_with_mode(store, tokens).map(|(label, _)| label)
}

/// Same as [`resolve`] but also reports which mode matched.
pub fn resolve_with_mode<S: SecretStore + ?Sized>(
    store: &S,
    tokens: &[String],
) -> Result<(String, Resolution), StoreError> {
    if tokens.is_empty() {
        return Err(StoreError::NotFound(String::new()));
    }

    if let Some(index) = as_index(tokens) {
        let label = resolve_index(store, index)?;
        debug!("resolved index {index} to {label}");
        return Ok((label, Resolution::Index(index)));
    }

    let joined = tokens.join(" ");
    match resolve_exact(store, &joined) {
        Ok(label) => {
            debug!("resolved {label} by exact key");
            return Ok((label, Resolution::Exact));
        }
        Err(StoreError::NotFound(_)) => {}
        Err(e) => return Err(e),
    }

    let label = resolve_query(store, tokens)?;
    debug!("resolved query {tokens:?} to {label}");
    Ok((label, Resolution::Query))
}

/// The reference is an index only when it is one token that is entirely an
/// integer.
fn as_index(tokens: &[String]) -> Option<i64> {
    match tokens {
        [single] => single.parse::<i64>().ok(),
        _ => None,
    }
}

/// Looks `label` up literally.
pub fn resolve_exact<S: SecretStore + ?Sized>(
    store: &S,
    label: &str,
) -> Result<String, StoreError> {
    store.get(label).map(|_| label.to_string())
}

/// Picks the `index`-th label, counting from 1.
pub fn resolve_index<S: SecretStore + ?Sized>(
    store: &S,
    index: i64,
) -> Result<String, StoreError> {
    let position = usize::try_from(index)
        .ok()
        .and_then(|i| i.checked_sub(1))
        .ok_or_else(|| StoreError::NotFound(index.to_string()))?;

    store
        .labels()?
        .into_iter()
        .nth(position)
        .ok_or_else(|| StoreError::NotFound(index.to_string()))
}

/// First label, in enumeration order, containing every token.
pub fn resolve_query<S: SecretStore + ?Sized>(
    store: &S,
    tokens: &[String],
) -> Result<String, StoreError> {
    store
        .labels()?
        .into_iter()
        .find(|label| is_match(label, tokens))
        .ok_or_else(|| StoreError::NotFound(tokens.join(" ")))
}

/// Every label containing every token, in enumeration order. An empty query
/// matches everything.
pub fn matching<S: SecretStore + ?Sized>(
    store: &S,
    tokens: &[String],
) -> Result<Vec<String>, StoreError> {
    Ok(store
        .labels()?
        .into_iter()
        .filter(|label| is_match(label, tokens))
        .collect())
}

fn is_match(label: &str, tokens: &[String]) -> bool {
    tokens.iter().all(|token| label.contains(token.as_str()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    use super::*;

    /// Keeps insertion order so tests control the enumeration.
    #[derive(Default)]
    struct OrderedStore {
        records: Vec<(String, String)>,
    }

    impl OrderedStore {
        fn with_labels(labels: &[&str]) -> Self {
            Self {
                records: labels
                    .iter()
                    .map(|l| (l.to_string(), "JBSWY3DPEHPK3PXP".to_string()))
                    .collect(),
            }
        }
    }

    impl SecretStore for OrderedStore {
        fn put(&mut self, label: &str, secret: &str) -> Result<(), StoreError> {
            match self.records.iter_mut().find(|(l, _)| l == label) {
                Some(record) => record.1 = secret.to_string(),
                None => self.records.push((label.to_string(), secret.to_string())),
            }
            Ok(())
        }

        fn get(&self, label: &str) -> Result<String, StoreError> {
            self.records
                .iter()
                .find(|(l, _)| l == label)
                .map(|(_, s)| s.clone())
                .ok_or_else(|| StoreError::NotFound(label.to_string()))
        }

        fn delete(&mut self, label: &str) -> Result<(), StoreError> {
            let before = self.records.len();
            self.records.retain(|(l, _)| l != label);
            if self.records.len() == before {
                return Err(StoreError::NotFound(label.to_string()));
            }
            Ok(())
        }

        fn labels(&self) -> Result<Vec<String>, StoreError> {
            Ok(self.records.iter().map(|(l, _)| l.clone()).collect())
        }
    }

    fn tokens(input: &[&str]) -> Vec<String> {
        input.iter().map(|t| t.to_string()).collect()
    }

    #[fixture]
    fn numbered() -> OrderedStore {
        OrderedStore::with_labels(&["alpha", "2fa-beta", "3"])
    }

    #[fixture]
    fn gits() -> OrderedStore {
        OrderedStore::with_labels(&["github work", "github personal", "gitlab"])
    }

    #[rstest]
    #[case(&["1"], "alpha")]
    #[case(&["2"], "2fa-beta")]
    #[case(&["3"], "3")]
    #[case(&["alpha"], "alpha")]
    #[case(&["beta"], "2fa-beta")]
    fn index_wins_over_substring(
        numbered: OrderedStore,
        #[case] reference: &[&str],
        #[case] expected: &str,
    ) {
        assert_eq!(expected, resolve(&numbered, &tokens(reference)).unwrap());
    }

    #[rstest]
    #[case(&["0"])]
    #[case(&["4"])]
    #[case(&["-1"])]
    #[case(&["99999999999"])]
    fn index_out_of_range(numbered: OrderedStore, #[case] reference: &[&str]) {
        assert!(matches!(
            resolve(&numbered, &tokens(reference)),
            Err(StoreError::NotFound(_))
        ));
    }

    #[rstest]
    fn empty_reference_is_not_found(gits: OrderedStore) {
        assert!(matches!(
            resolve(&gits, &[]),
            Err(StoreError::NotFound(_))
        ));
        assert_eq!(3, matching(&gits, &[]).unwrap().len());
    }

    #[test]
    fn index_on_empty_store() {
        let store = OrderedStore::default();

        assert!(matches!(
            resolve_index(&store, 1),
            Err(StoreError::NotFound(_))
        ));
    }

    #[rstest]
    #[case(&["git", "work"], "github work")]
    #[case(&["work", "git"], "github work")]
    #[case(&["git"], "github work")]
    #[case(&["personal"], "github personal")]
    #[case(&["lab"], "gitlab")]
    #[case(&["hub", "son"], "github personal")]
    fn query_and_matching(gits: OrderedStore, #[case] query: &[&str], #[case] expected: &str) {
        assert_eq!(expected, resolve(&gits, &tokens(query)).unwrap());
    }

    #[rstest]
    #[case(&["GitHub"])]
    #[case(&["git", "nothing"])]
    #[case(&["bitbucket"])]
    fn query_without_match(gits: OrderedStore, #[case] query: &[&str]) {
        assert!(matches!(
            resolve(&gits, &tokens(query)),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn exact_label_beats_earlier_query_match() {
        let store = OrderedStore::with_labels(&["github work", "github"]);

        assert_eq!(
            ("github".to_string(), Resolution::Exact),
            resolve_with_mode(&store, &tokens(&["github"])).unwrap()
        );
    }

    #[test]
    fn exact_label_with_spaces_from_tokens() {
        let store = OrderedStore::with_labels(&["github personal", "github work"]);

        assert_eq!(
            ("github work".to_string(), Resolution::Exact),
            resolve_with_mode(&store, &tokens(&["github", "work"])).unwrap()
        );
    }

    #[test]
    fn numeric_label_is_reachable_by_query_when_not_alone() {
        let store = OrderedStore::with_labels(&["alpha", "bank 42"]);

        assert_eq!(
            ("bank 42".to_string(), Resolution::Exact),
            resolve_with_mode(&store, &tokens(&["bank", "42"])).unwrap()
        );
        assert_eq!(
            ("bank 42".to_string(), Resolution::Query),
            resolve_with_mode(&store, &tokens(&["42", "ba"])).unwrap()
        );
    }

    #[rstest]
    fn index_reports_mode(numbered: OrderedStore) {
        assert_eq!(
            ("2fa-beta".to_string(), Resolution::Index(2)),
            resolve_with_mode(&numbered, &tokens(&["2"])).unwrap()
        );
    }

    #[rstest]
    #[case(&["git"], &["github work", "github personal", "gitlab"])]
    #[case(&["hub"], &["github work", "github personal"])]
    #[case(&[], &["github work", "github personal", "gitlab"])]
    #[case(&["svn"], &[])]
    fn matching_returns_all(
        gits: OrderedStore,
        #[case] query: &[&str],
        #[case] expected: &[&str],
    ) {
        assert_eq!(expected.to_vec(), matching(&gits, &tokens(query)).unwrap());
    }

    #[rstest]
    fn resolve_then_delete(mut gits: OrderedStore) {
        let label = resolve(&gits, &tokens(&["lab"])).unwrap();
        gits.delete(&label).unwrap();

        assert_eq!(
            vec!["github work", "github personal"],
            gits.labels().unwrap()
        );
        assert!(matches!(
            resolve(&gits, &tokens(&["3"])),
            Err(StoreError::NotFound(_))
        ));
    }
}
