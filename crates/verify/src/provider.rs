use crate::types::VerificationRequest;
use alloy_primitives::Address;
use async_trait::async_trait;
use eyre::{Result, WrapErr};
use reef_common::{ReefContract, errors::display_chain};
use reqwest::header::ACCESS_CONTROL_ALLOW_ORIGIN;
use std::time::Duration;

/// Path of the submission endpoint, relative to the explorer base URL.
pub const CONTRACT_VERIFICATION_PATH: &str = "/api/verificator/submit-verification";

/// Grace period for the explorer to index a freshly deployed contract.
pub const DEFAULT_VERIFICATION_DELAY: Duration = Duration::from_secs(5);

/// Submits a deployed contract's source for verification.
#[async_trait]
pub trait ContractVerifier: Send + Sync {
    /// Submits `contract`, deployed at `address` with constructor `args`, to the verification
    /// service at `url`.
    ///
    /// Verification is optional: this never fails, it reports whether the submission went
    /// through. Without `url`, or with an empty one, nothing is sent and `false` is returned.
    async fn verify_contract(
        &self,
        address: Address,
        contract: &ReefContract,
        args: &[String],
        url: Option<&str>,
    ) -> bool;
}

/// HTTP [`ContractVerifier`] for the explorer's verification API.
///
/// One POST per call, no retries.
#[derive(Clone, Debug)]
pub struct VerificationClient {
    client: reqwest::Client,
    delay: Duration,
}

impl Default for VerificationClient {
    fn default() -> Self {
        Self::new()
    }
}

impl VerificationClient {
    pub fn new() -> Self {
        Self { client: reqwest::Client::new(), delay: DEFAULT_VERIFICATION_DELAY }
    }

    /// Sets the delay applied before each submission.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Uses `client` for submissions, e.g. one with a timeout or custom headers.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Sends `body` to `{url}/api/verificator/submit-verification`.
    ///
    /// Any non-2xx status is an error, the response body is ignored.
    pub async fn submit(&self, url: &str, body: &VerificationRequest) -> Result<()> {
        let endpoint = submission_url(url);
        trace!(%endpoint, ?body, "submitting verification request");
        let response = self
            .client
            .post(&endpoint)
            .header(ACCESS_CONTROL_ALLOW_ORIGIN, "*")
            .json(body)
            .send()
            .await
            .wrap_err_with(|| format!("failed to reach verification service at {endpoint}"))?;
        let status = response.status();
        response
            .error_for_status()
            .wrap_err_with(|| format!("verification service rejected submission ({status})"))?;
        debug!(%status, name = %body.name, "verification submitted");
        Ok(())
    }
}

#[async_trait]
impl ContractVerifier for VerificationClient {
    async fn verify_contract(
        &self,
        address: Address,
        contract: &ReefContract,
        args: &[String],
        url: Option<&str>,
    ) -> bool {
        let Some(url) = url.filter(|url| !url.is_empty()) else {
            debug!(name = %contract.contract_name, "no verification endpoint, skipping");
            return false;
        };

        tokio::time::sleep(self.delay).await;

        let result = match VerificationRequest::new(address, contract, args) {
            Ok(body) => self.submit(url, &body).await,
            Err(err) => Err(err.into()),
        };
        match result {
            Ok(()) => true,
            Err(err) => {
                error!(%address, err = %display_chain(err.as_ref()), "contract verification failed");
                false
            }
        }
    }
}

fn submission_url(base: &str) -> String {
    format!("{}{CONTRACT_VERIFICATION_PATH}", base.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use mockito::{Matcher, Server};
    use reef_common::CompiledContract;
    use serde_json::json;
    use std::time::Instant;

    const ADDRESS: Address = address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");

    fn flipper() -> ReefContract {
        ReefContract {
            filename: "flipper.sol".to_string(),
            contract_name: "Flipper".to_string(),
            payload: CompiledContract::default(),
            source: "contract Flipper {}".to_string(),
            target: "flipper.sol".to_string(),
            license: "MIT".to_string(),
            optimization: false,
            compiler_version: "v0.8.4+commit.c7e474f2".to_string(),
            runs: 200,
        }
    }

    fn client() -> VerificationClient {
        VerificationClient::new().with_delay(Duration::ZERO)
    }

    #[test]
    fn joins_submission_url() {
        assert_eq!(
            submission_url("https://reefscan.com/"),
            "https://reefscan.com/api/verificator/submit-verification"
        );
        assert_eq!(
            submission_url("http://localhost:3000"),
            "http://localhost:3000/api/verificator/submit-verification"
        );
    }

    #[tokio::test]
    async fn no_url_sends_nothing() {
        let mut server = Server::new_async().await;
        let mock = server.mock("POST", Matcher::Any).expect(0).create_async().await;

        // the default delay must not apply either
        let start = Instant::now();
        let verified = VerificationClient::new()
            .verify_contract(ADDRESS, &flipper(), &["1".to_string()], None)
            .await;
        assert!(!verified);
        assert!(start.elapsed() < DEFAULT_VERIFICATION_DELAY);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_url_sends_nothing() {
        let start = Instant::now();
        let verified = VerificationClient::new()
            .verify_contract(ADDRESS, &flipper(), &[], Some(""))
            .await;
        assert!(!verified);
        assert!(start.elapsed() < DEFAULT_VERIFICATION_DELAY);
    }

    #[tokio::test]
    async fn uses_custom_client() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", CONTRACT_VERIFICATION_PATH)
            .match_header("user-agent", "reef-deploy-test")
            .with_status(200)
            .expect(1)
            .create_async()
            .await;

        let http = reqwest::Client::builder()
            .user_agent("reef-deploy-test")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        let verified = client()
            .with_client(http)
            .verify_contract(ADDRESS, &flipper(), &[], Some(&server.url()))
            .await;
        assert!(verified);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn submits_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", CONTRACT_VERIFICATION_PATH)
            .match_header("access-control-allow-origin", "*")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "address": "0x5FbDB2315678afecb367f032d93F642f64180aa3",
                "arguments": "[\"true\",\"0xABC\"]",
                "name": "Flipper",
                "filename": "flipper.sol",
                "target": "flipper.sol",
                "source": "contract Flipper {}",
                "optimization": false,
                "compilerVersion": "v0.8.4+commit.c7e474f2",
                "license": "MIT",
                "runs": 200
            })))
            .with_status(200)
            .with_body("ok")
            .expect(1)
            .create_async()
            .await;

        let args = vec!["true".to_string(), "0xABC".to_string()];
        let verified =
            client().verify_contract(ADDRESS, &flipper(), &args, Some(&server.url())).await;
        assert!(verified);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_submission_is_false() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", CONTRACT_VERIFICATION_PATH)
            .with_status(500)
            .expect(1)
            .create_async()
            .await;

        let verified = client().verify_contract(ADDRESS, &flipper(), &[], Some(&server.url())).await;
        assert!(!verified);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_false() {
        let verified =
            client().verify_contract(ADDRESS, &flipper(), &[], Some("http://127.0.0.1:1")).await;
        assert!(!verified);
    }

    #[tokio::test]
    async fn waits_before_submitting() {
        let mut server = Server::new_async().await;
        let mock = server.mock("POST", CONTRACT_VERIFICATION_PATH).with_status(200).create_async().await;

        let delay = Duration::from_millis(200);
        let client = VerificationClient::new().with_delay(delay);
        assert_eq!(client.delay(), delay);

        let start = Instant::now();
        assert!(client.verify_contract(ADDRESS, &flipper(), &[], Some(&server.url())).await);
        assert!(start.elapsed() >= delay);
        mock.assert_async().await;
    }
}
