//! Cursor pagination shared by the list endpoints.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::{
    envelope::{ServiceResult, SuccessEnvelope},
    error::ApiFault,
};

/// Anything with a stable backend identifier.
pub trait Identified {
    fn id(&self) -> &str;
}

/// One page of a list endpoint. A missing (or blank) cursor marks the last page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new", alias = "comments", alias = "skills")]
    pub items: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

impl<T> Page<T> {
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        self.cursor.as_deref().filter(|cursor| !cursor.trim().is_empty())
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.next_cursor().is_none()
    }
}

/// Walks a list endpoint from the first page to the last.
///
/// `fetch` receives the cursor to request (`None` for the first page). Items
/// whose id was already seen are dropped, and a cursor the server already
/// handed out ends the walk. The first failure envelope is returned as is.
///
/// # Errors
/// Any fault raised by `fetch`.
pub async fn collect_pages<T, F, Fut>(mut fetch: F) -> Result<ServiceResult<Vec<T>>, ApiFault>
where
    T: Identified,
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<ServiceResult<Page<T>>, ApiFault>>,
{
    let mut items = Vec::new();
    let mut seen_ids = HashSet::new();
    let mut seen_cursors = HashSet::new();
    let mut cursor = None;

    loop {
        let envelope = match fetch(cursor.take()).await? {
            ServiceResult::Success(envelope) => envelope,
            ServiceResult::Failure(error) => return Ok(ServiceResult::Failure(error)),
        };
        let SuccessEnvelope {
            status_code,
            method,
            message,
            data: page,
        } = envelope;
        let next = page.next_cursor().map(str::to_owned);

        for item in page.items {
            if seen_ids.insert(item.id().to_owned()) {
                items.push(item);
            }
        }

        match next {
            Some(next) if seen_cursors.insert(next.clone()) => cursor = Some(next),
            repeated => {
                if let Some(repeated) = repeated {
                    warn!(cursor = %repeated, "list endpoint repeated a cursor, stopping");
                }
                return Ok(ServiceResult::Success(SuccessEnvelope {
                    status_code,
                    method,
                    message,
                    data: items,
                }));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::envelope::ErrorEnvelope;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    struct Row(&'static str);

    impl Identified for Row {
        fn id(&self) -> &str {
            self.0
        }
    }

    fn page(items: &[&'static str], cursor: Option<&str>) -> ServiceResult<Page<Row>> {
        ServiceResult::Success(SuccessEnvelope {
            status_code: 200,
            method: "GET".to_string(),
            message: "OK".to_string(),
            data: Page {
                items: items.iter().copied().map(Row).collect(),
                cursor: cursor.map(str::to_owned),
            },
        })
    }

    #[test]
    fn page_accepts_resource_named_item_lists() {
        let page: Page<String> =
            serde_json::from_value(json!({"comments": ["a"], "cursor": "c1"})).unwrap();
        assert_eq!(page.items, vec!["a".to_string()]);
        assert_eq!(page.next_cursor(), Some("c1"));

        let last: Page<String> = serde_json::from_value(json!({"items": [], "cursor": ""})).unwrap();
        assert!(last.is_last());
    }

    #[tokio::test]
    async fn follows_cursors_until_the_last_page() {
        let requested = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requested);
        let result = collect_pages(move |cursor| {
            log.lock().unwrap().push(cursor.clone());
            async move {
                Ok(match cursor.as_deref() {
                    None => page(&["1", "2"], Some("c1")),
                    Some("c1") => page(&["2", "3"], Some("c2")),
                    _ => page(&["4"], None),
                })
            }
        })
        .await
        .unwrap();

        let ids: Vec<_> = result.into_data().unwrap().into_iter().map(|r| r.0).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
        assert_eq!(
            *requested.lock().unwrap(),
            vec![None, Some("c1".to_string()), Some("c2".to_string())]
        );
    }

    #[tokio::test]
    async fn repeated_cursor_stops_the_walk() {
        let result = collect_pages(|cursor| async move {
            Ok(match cursor {
                None => page(&["1"], Some("loop")),
                Some(_) => page(&["2"], Some("loop")),
            })
        })
        .await
        .unwrap();

        assert_eq!(result.into_data().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn failure_envelope_short_circuits() {
        let result = collect_pages(|cursor| async move {
            Ok(match cursor {
                None => page(&["1"], Some("c1")),
                Some(_) => ServiceResult::Failure(ErrorEnvelope {
                    status_code: 500,
                    method: "GET".to_string(),
                    message: "boom".to_string(),
                    error: None,
                }),
            })
        })
        .await
        .unwrap();

        assert_eq!(result.error().map(|e| e.status_code), Some(500));
    }

    #[tokio::test]
    async fn faults_propagate() {
        let err = collect_pages::<Row, _, _>(|_| async { Err(ApiFault::NoSession) })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiFault::NoSession));
    }
}
