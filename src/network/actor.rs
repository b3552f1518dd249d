//! Network actor - runs API calls in the Tokio async runtime

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::messages::{Mutation, MutationOutcome, NetworkCommand, NetworkResponse};
use crate::network::client::ApiClient;
use crate::network::error::ApiError;
use crate::query::fetch_with_retry;

/// Network actor that processes fetch and mutation commands
pub struct NetworkActor {
    client: ApiClient,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(client: ApiClient, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            client,
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                // Handle incoming commands
                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Fetch { id, resource, cancel }) => {
                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();

                            self.active_requests.spawn(async move {
                                tracing::info!(id, key = resource.key(), "Fetching");
                                let response = match fetch_with_retry(&client, resource, &cancel).await {
                                    Ok(data) => NetworkResponse::Fetched { id, data },
                                    Err(ApiError::Cancelled) => NetworkResponse::Cancelled { id },
                                    Err(e) => NetworkResponse::FetchFailed {
                                        id,
                                        resource,
                                        message: e.to_string(),
                                    },
                                };
                                let _ = response_tx.send(response);
                            });
                        }

                        Some(NetworkCommand::Mutate { id, mutation, cancel }) => {
                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();

                            self.active_requests.spawn(async move {
                                let kind = mutation.kind();
                                tracing::info!(id, kind = ?kind, "Running mutation");
                                let response = match run_mutation(&client, mutation, &cancel).await {
                                    Ok(outcome) => NetworkResponse::Mutated { id, outcome },
                                    Err(ApiError::Cancelled) => NetworkResponse::Cancelled { id },
                                    Err(e) => NetworkResponse::MutationFailed {
                                        id,
                                        kind,
                                        message: e.to_string(),
                                    },
                                };
                                let _ = response_tx.send(response);
                            });
                        }

                        Some(NetworkCommand::Shutdown) => {
                            self.active_requests.abort_all();
                            break;
                        }

                        None => break,
                    }
                }

                // Clean up completed tasks
                Some(result) = self.active_requests.join_next() => {
                    if let Err(e) = result {
                        if e.is_panic() {
                            tracing::error!(error = %e, "Network task panicked");
                        }
                    }
                }
            }
        }
    }
}

/// Execute one state-changing call; mutations are never retried
pub async fn run_mutation(
    client: &ApiClient,
    mutation: Mutation,
    cancel: &CancellationToken,
) -> Result<MutationOutcome, ApiError> {
    match mutation {
        Mutation::InitPayment(provider) => client
            .init_payment(provider, cancel)
            .await
            .map(MutationOutcome::PaymentStarted),
        Mutation::UpdateProgress(update) => {
            client.update_progress(&update, cancel).await?;
            Ok(MutationOutcome::ProgressSaved {
                module_id: update.module_id,
            })
        }
        Mutation::UploadMedia(path) => {
            let upload = client.upload_media(&path, cancel).await?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            Ok(MutationOutcome::MediaUploaded { upload, file_name })
        }
        Mutation::SendBroadcast(request) => client
            .send_broadcast(&request, cancel)
            .await
            .map(MutationOutcome::BroadcastAccepted),
    }
}
