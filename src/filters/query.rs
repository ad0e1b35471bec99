//! Query-string encoding of the active filters.

use super::FilterStore;

/// Encode the filters as `key=value` pairs joined by `&`.
///
/// Keys and values are percent-encoded (spaces become `%20`, non-ASCII is
/// UTF-8 encoded). An empty store yields an empty string.
pub fn encode(filters: &FilterStore) -> String {
    filters
        .entries()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Append the encoded filters to `url`, adding `?` only when there are any.
pub fn with_query(url: &str, filters: &FilterStore) -> String {
    let qs = encode(filters);
    if qs.is_empty() {
        url.to_string()
    } else {
        format!("{url}?{qs}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_pairs(qs: &str) -> Vec<(String, String)> {
        qs.split('&')
            .filter_map(|pair| pair.split_once('='))
            .map(|(k, v)| {
                (
                    urlencoding::decode(k).unwrap().into_owned(),
                    urlencoding::decode(v).unwrap().into_owned(),
                )
            })
            .collect()
    }

    #[test]
    fn empty_store_encodes_to_empty_string() {
        assert_eq!(encode(&FilterStore::new()), "");
        assert_eq!(with_query("/api/statistiche", &FilterStore::new()), "/api/statistiche");
    }

    #[test]
    fn pairs_are_encoded_and_joined() {
        let mut store = FilterStore::new();
        store.toggle("A", "1");
        store.toggle("B", "x y");
        let qs = encode(&store);
        assert_eq!(qs, "A=1&B=x%20y");
        assert_eq!(
            decode_pairs(&qs),
            vec![("A".to_string(), "1".to_string()), ("B".to_string(), "x y".to_string())]
        );
    }

    #[test]
    fn reserved_and_non_ascii_characters_round_trip() {
        let mut store = FilterStore::new();
        store.toggle("InformazioniImmobile", "ProprietàMutuoEstinto");
        store.toggle("a&b", "c=d");
        let qs = encode(&store);
        assert!(!qs.contains('à'));
        assert_eq!(qs.matches('&').count(), 1);
        assert_eq!(qs.matches('=').count(), 2);
        assert_eq!(
            decode_pairs(&qs),
            vec![
                ("InformazioniImmobile".to_string(), "ProprietàMutuoEstinto".to_string()),
                ("a&b".to_string(), "c=d".to_string()),
            ]
        );
    }

    #[test]
    fn with_query_appends_question_mark() {
        let mut store = FilterStore::new();
        store.toggle("TitoloStudio", "Laureato");
        assert_eq!(
            with_query("/api/statistiche", &store),
            "/api/statistiche?TitoloStudio=Laureato"
        );
    }
}
