//! Scripted tracking server for tests.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Mutex;
use std::time::Duration;

use crate::client::{endpoints, DashboardSource, FetchError};
use crate::model::{GroupMovement, Movement, RoomsSnapshot, Visit};

/// One scripted response
#[derive(Debug, Clone)]
pub(crate) struct Reply {
    body: Option<String>,
    delay: Duration,
}

impl Reply {
    pub fn json(body: &str) -> Self {
        Self {
            body: Some(body.to_string()),
            delay: Duration::ZERO,
        }
    }

    /// Network failure
    pub fn failure() -> Self {
        Self {
            body: None,
            delay: Duration::ZERO,
        }
    }

    /// Body that is not JSON
    pub fn malformed() -> Self {
        Self::json("<html>502 Bad Gateway</html>")
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Replies for one endpoint. Call `n` gets reply `n`; the last reply
/// repeats once the script runs out.
#[derive(Default)]
struct Script {
    replies: Vec<Reply>,
    calls: usize,
}

impl Script {
    fn next(&mut self) -> Reply {
        let reply = match self.replies.len() {
            0 => Reply::failure(),
            len => self.replies[self.calls.min(len - 1)].clone(),
        };
        self.calls += 1;
        reply
    }
}

/// [`DashboardSource`] answering from per-endpoint scripts
#[derive(Default)]
pub(crate) struct FakeSource {
    rooms: Mutex<Script>,
    visits: Mutex<Script>,
    movements: Mutex<Script>,
    group_movements: Mutex<Script>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rooms(self, reply: Reply) -> Self {
        push(&self.rooms, reply);
        self
    }

    pub fn visits(self, reply: Reply) -> Self {
        push(&self.visits, reply);
        self
    }

    pub fn movements(self, reply: Reply) -> Self {
        push(&self.movements, reply);
        self
    }

    pub fn group_movements(self, reply: Reply) -> Self {
        push(&self.group_movements, reply);
        self
    }

    /// Number of movement requests served so far
    pub fn movement_calls(&self) -> usize {
        self.movements.lock().unwrap().calls
    }

    async fn respond<T: DeserializeOwned>(
        script: &Mutex<Script>,
        endpoint: &str,
    ) -> Result<T, FetchError> {
        let reply = script.lock().unwrap().next();
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }

        match reply.body {
            Some(body) => serde_json::from_str(&body).map_err(|source| FetchError::Decode {
                endpoint: endpoint.to_string(),
                source,
            }),
            None => Err(FetchError::Unavailable("connection refused".to_string())),
        }
    }
}

fn push(script: &Mutex<Script>, reply: Reply) {
    script.lock().unwrap().replies.push(reply);
}

#[async_trait]
impl DashboardSource for FakeSource {
    async fn fetch_rooms(&self) -> Result<RoomsSnapshot, FetchError> {
        Self::respond(&self.rooms, endpoints::ROOMS).await
    }

    async fn fetch_active_visits(&self) -> Result<Vec<Visit>, FetchError> {
        let visits: Option<Vec<Visit>> = Self::respond(&self.visits, endpoints::ACTIVE_VISITS).await?;
        Ok(visits.unwrap_or_default())
    }

    async fn fetch_movements(&self) -> Result<Vec<Movement>, FetchError> {
        let movements: Option<Vec<Movement>> =
            Self::respond(&self.movements, endpoints::MOVEMENTS).await?;
        Ok(movements.unwrap_or_default())
    }

    async fn fetch_group_movements(&self) -> Result<Vec<GroupMovement>, FetchError> {
        let movements: Option<Vec<GroupMovement>> =
            Self::respond(&self.group_movements, endpoints::GROUP_MOVEMENTS).await?;
        Ok(movements.unwrap_or_default())
    }
}
