//! Backoff for gateway calls.
//!
//! A call is repeated only when the request never produced a response:
//! the connection could not be made, or the per-request timeout fired.
//! Everything else comes back on the first attempt. That includes requests
//! that could not be built (a body that fails to serialize), redirect
//! errors, and any HTTP response at all; status handling belongs to
//! [`crate::read_json`].
//!
//! The gateway only issues `GET` list calls and full-record `PUT`s, both of
//! which may be repeated without changing the outcome.

use std::future::Future;
use std::time::Duration;

use reqwest::Response;

/// How many times, and how far apart, a transient failure is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Backoff {
    retries: u32,
    base_delay: Duration,
}

impl Backoff {
    /// Three retries, 200 ms apart and doubling: 200, 400, 800 ms.
    pub(crate) const GATEWAY: Backoff = Backoff {
        retries: 3,
        base_delay: Duration::from_millis(200),
    };

    fn delay_before(&self, retry: u32) -> Duration {
        self.base_delay * 2u32.pow(retry)
    }

    /// Run `send` until it yields a response or a failure that is not
    /// transient, or the retries run out.
    pub(crate) async fn send<F, Fut>(
        &self,
        endpoint: &str,
        send: F,
    ) -> Result<Response, reqwest::Error>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<Response, reqwest::Error>>,
    {
        let mut retry = 0;
        loop {
            match send().await {
                Err(e) if is_transient(&e) && retry < self.retries => {
                    let delay = self.delay_before(retry);
                    retry += 1;
                    tracing::warn!(
                        endpoint,
                        retry,
                        of = self.retries,
                        ?delay,
                        error = %e,
                        "gateway unreachable, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                outcome => return outcome,
            }
        }
    }
}

fn is_transient(e: &reqwest::Error) -> bool {
    e.is_connect() || e.is_timeout()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FAST: Backoff = Backoff {
        retries: 2,
        base_delay: Duration::from_millis(1),
    };

    fn client(timeout: Duration) -> reqwest::Client {
        reqwest::Client::builder().timeout(timeout).build().unwrap()
    }

    #[test]
    fn gateway_delays_double() {
        let b = Backoff::GATEWAY;
        let delays: Vec<u64> = (0..3).map(|r| b.delay_before(r).as_millis() as u64).collect();
        assert_eq!(delays, vec![200, 400, 800]);
    }

    #[tokio::test]
    async fn timeouts_are_retried_until_exhausted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let http = client(Duration::from_millis(50));
        let calls = AtomicU32::new(0);
        let err = FAST
            .send("GET /slow", || {
                calls.fetch_add(1, Ordering::SeqCst);
                http.get(server.uri()).send()
            })
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn unbuildable_request_is_not_retried() {
        let server = MockServer::start().await;
        // Non-string map keys cannot be encoded as a JSON body.
        let body: HashMap<Vec<u8>, u8> = HashMap::from([(vec![1], 1)]);

        let http = client(Duration::from_secs(5));
        let calls = AtomicU32::new(0);
        let err = FAST
            .send("PUT /taxes/1", || {
                calls.fetch_add(1, Ordering::SeqCst);
                http.put(server.uri()).json(&body).send()
            })
            .await
            .unwrap_err();

        assert!(err.is_builder());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn error_statuses_come_back_on_first_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let http = client(Duration::from_secs(5));
        let resp = FAST
            .send("GET /taxes", || http.get(server.uri()).send())
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 503);
    }
}
