//! Compute control-plane client: describe-by-id and start-by-id for
//! the one configured instance.

use async_trait::async_trait;
use craftbell_core::error::{BotError, Result};
use craftbell_core::instance::{InstanceObservation, InstanceState};
use craftbell_core::startup::ComputeController;
use serde::Deserialize;
use tracing::debug;

pub struct InstanceApi {
    client: reqwest::Client,
    base: String,
    token: String,
    instance_id: String,
}

/// Wire shape of a describe response.
#[derive(Debug, Deserialize)]
struct DescribeBody {
    state: String,
    #[serde(default)]
    public_ip: Option<String>,
}

impl InstanceApi {
    pub fn new(
        client: reqwest::Client,
        base: impl Into<String>,
        token: impl Into<String>,
        instance_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base: base.into(),
            token: token.into(),
            instance_id: instance_id.into(),
        }
    }

    fn instance_url(&self) -> String {
        format!(
            "{}/instances/{}",
            self.base.trim_end_matches('/'),
            self.instance_id
        )
    }
}

#[async_trait]
impl ComputeController for InstanceApi {
    async fn describe(&self) -> Result<InstanceObservation> {
        let response = self
            .client
            .get(self.instance_url())
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| BotError::ComputeQuery(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::ComputeQuery(format!(
                "http {}",
                response.status()
            )));
        }

        let body: DescribeBody = response
            .json()
            .await
            .map_err(|e| BotError::ComputeQuery(e.to_string()))?;
        debug!(state = %body.state, address = ?body.public_ip, "instance described");

        Ok(InstanceObservation::new(
            InstanceState::from_name(&body.state),
            body.public_ip,
        ))
    }

    /// Fire-and-forget start request.
    async fn start(&self) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/start", self.instance_url()))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| BotError::ComputeStart(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::ComputeStart(format!(
                "http {}",
                response.status()
            )));
        }
        Ok(())
    }
}
