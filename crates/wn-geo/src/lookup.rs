//! External geo collaborators: geocoding and batched elevation lookup.
//!
//! Both are network-backed services outside the core; they appear here as
//! trait seams so the core stays deterministic and testable. The batch
//! helper recovers per-chunk failures into a partial result instead of
//! failing the whole lookup; retry policy belongs to the caller.

use std::collections::HashMap;

use crate::error::GeoResult;

/// A geocoding hit for a free-text place name.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    pub lon: f64,
    pub lat: f64,
    pub display_name: String,
}

/// Free-text place name -> coordinate.
pub trait Geocoder {
    fn geocode(&self, name: &str) -> GeoResult<GeocodedPlace>;
}

/// One point to look up an elevation for, keyed by the caller's id.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationQuery {
    pub id: String,
    pub lon: f64,
    pub lat: f64,
}

/// Elevation service. One call per chunk; a chunk either resolves to a
/// (possibly incomplete) id -> elevation mapping or fails as a whole.
pub trait ElevationProvider {
    fn fetch_chunk(&self, queries: &[ElevationQuery]) -> GeoResult<HashMap<String, f64>>;
}

/// Outcome of a batched elevation lookup.
///
/// `elevations` holds every id that resolved; `failed_ids` holds ids from
/// failed chunks and ids the provider left out of a successful response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElevationBatch {
    pub elevations: HashMap<String, f64>,
    pub failed_ids: Vec<String>,
}

impl ElevationBatch {
    pub fn succeeded(&self) -> usize {
        self.elevations.len()
    }

    pub fn failed(&self) -> usize {
        self.failed_ids.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed_ids.is_empty()
    }
}

/// Split `queries` into chunks of `chunk_size` and issue each chunk
/// independently. A failed chunk marks only its own ids as failed;
/// sibling chunks still run. No retries happen here.
pub fn fetch_elevations(
    provider: &dyn ElevationProvider,
    queries: &[ElevationQuery],
    chunk_size: usize,
) -> ElevationBatch {
    let mut batch = ElevationBatch::default();

    for chunk in queries.chunks(chunk_size.max(1)) {
        match provider.fetch_chunk(chunk) {
            Ok(resolved) => {
                for query in chunk {
                    match resolved.get(&query.id) {
                        Some(&elevation) => {
                            batch.elevations.insert(query.id.clone(), elevation);
                        }
                        None => batch.failed_ids.push(query.id.clone()),
                    }
                }
            }
            Err(err) => {
                tracing::warn!(len = chunk.len(), %err, "elevation chunk failed");
                batch
                    .failed_ids
                    .extend(chunk.iter().map(|q| q.id.clone()));
            }
        }
    }

    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeoError;

    fn queries(n: usize) -> Vec<ElevationQuery> {
        (0..n)
            .map(|i| ElevationQuery {
                id: format!("N{i}"),
                lon: 10.0 + i as f64 * 0.01,
                lat: 60.0,
            })
            .collect()
    }

    /// Fails every second chunk it sees.
    struct FlakyProvider {
        calls: std::cell::Cell<usize>,
    }

    impl ElevationProvider for FlakyProvider {
        fn fetch_chunk(&self, chunk: &[ElevationQuery]) -> GeoResult<HashMap<String, f64>> {
            let call = self.calls.get();
            self.calls.set(call + 1);
            if call % 2 == 1 {
                return Err(GeoError::NetworkUnavailable {
                    message: "timeout".to_string(),
                });
            }
            Ok(chunk.iter().map(|q| (q.id.clone(), 12.5)).collect())
        }
    }

    struct CompleteProvider;

    impl ElevationProvider for CompleteProvider {
        fn fetch_chunk(&self, chunk: &[ElevationQuery]) -> GeoResult<HashMap<String, f64>> {
            Ok(chunk.iter().map(|q| (q.id.clone(), q.lat)).collect())
        }
    }

    struct GappyProvider;

    impl ElevationProvider for GappyProvider {
        fn fetch_chunk(&self, chunk: &[ElevationQuery]) -> GeoResult<HashMap<String, f64>> {
            // Leaves the first id of every chunk unresolved
            Ok(chunk
                .iter()
                .skip(1)
                .map(|q| (q.id.clone(), 3.0))
                .collect())
        }
    }

    #[test]
    fn complete_lookup_has_no_failures() {
        let batch = fetch_elevations(&CompleteProvider, &queries(10), 4);
        assert_eq!(batch.succeeded(), 10);
        assert_eq!(batch.failed(), 0);
        assert!(batch.is_complete());
    }

    #[test]
    fn failed_chunk_does_not_abort_siblings() {
        // 10 queries, chunks of 4 -> 3 chunks; the middle one fails
        let provider = FlakyProvider {
            calls: std::cell::Cell::new(0),
        };
        let batch = fetch_elevations(&provider, &queries(10), 4);
        assert_eq!(batch.succeeded(), 6);
        assert_eq!(batch.failed(), 4);
        assert!(batch.failed_ids.contains(&"N4".to_string()));
        assert!(batch.elevations.contains_key("N0"));
        assert!(batch.elevations.contains_key("N9"));
    }

    #[test]
    fn per_id_gaps_count_as_failed() {
        let batch = fetch_elevations(&GappyProvider, &queries(6), 3);
        assert_eq!(batch.succeeded(), 4);
        assert_eq!(batch.failed_ids, vec!["N0".to_string(), "N3".to_string()]);
    }

    #[test]
    fn zero_chunk_size_is_clamped() {
        let batch = fetch_elevations(&CompleteProvider, &queries(3), 0);
        assert_eq!(batch.succeeded(), 3);
    }
}
