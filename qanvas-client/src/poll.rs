//! Wait-for-processed poll loop
//!
//! Probes a ticket, sleeps one poll interval, and repeats until the job is
//! Ready or the poll ceiling has elapsed since the loop started. The ceiling
//! is read from the client's [`TimeoutPolicy`](qanvas_core::domain::timeout::TimeoutPolicy)
//! and never consumed, so consecutive waits on one client are independent.

use qanvas_core::domain::job::JobTicket;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::error::{ClientError, Result};
use crate::jobs::JobQueue;

impl JobQueue<'_> {
    /// Block until the job behind `ticket` is processed
    ///
    /// Returns on the first Ready probe without probing again. Probe errors
    /// (unexpected status, transport failures) end the wait immediately.
    /// When the ceiling is reached the wait fails with
    /// [`ClientError::PollTimeout`]; the job may still finish server-side and
    /// the caller may simply wait again.
    pub async fn wait_for_processed(&self, ticket: &JobTicket) -> Result<()> {
        let policy = self.client.timeout_policy();
        let start = Instant::now();
        let mut probes: u32 = 0;

        loop {
            probes += 1;
            if self.check_status(ticket).await?.is_ready() {
                info!(
                    kind = %self.kind(),
                    %ticket,
                    probes,
                    waited_ms = start.elapsed().as_millis() as u64,
                    "Job processed"
                );
                return Ok(());
            }

            sleep(policy.poll_interval()).await;

            let waited = start.elapsed();
            if waited >= policy.poll_ceiling() {
                warn!(
                    kind = %self.kind(),
                    %ticket,
                    probes,
                    "Job still pending after {:?}, giving up",
                    waited
                );
                return Err(ClientError::PollTimeout {
                    url: ticket.to_string(),
                    waited,
                    ceiling: policy.poll_ceiling(),
                });
            }

            debug!(kind = %self.kind(), %ticket, probes, "Job still pending");
        }
    }
}
