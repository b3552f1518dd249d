//! Network messages - communication between App and Network layers

use std::path::PathBuf;

use tokio_util::sync::CancellationToken;

use crate::models::{
    BroadcastAccepted, BroadcastRequest, MediaUpload, PaymentInit, PaymentProvider,
    ProgressUpdate,
};
use crate::query::{Resource, ResourceData};

/// A state-changing call issued by a screen
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    InitPayment(PaymentProvider),
    UpdateProgress(ProgressUpdate),
    UploadMedia(PathBuf),
    SendBroadcast(BroadcastRequest),
}

/// Which flow a mutation belongs to, for routing results back to the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Payment,
    Progress,
    Upload,
    Broadcast,
}

impl Mutation {
    pub fn kind(&self) -> MutationKind {
        match self {
            Mutation::InitPayment(_) => MutationKind::Payment,
            Mutation::UpdateProgress(_) => MutationKind::Progress,
            Mutation::UploadMedia(_) => MutationKind::Upload,
            Mutation::SendBroadcast(_) => MutationKind::Broadcast,
        }
    }
}

/// Successful mutation results
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    PaymentStarted(PaymentInit),
    ProgressSaved { module_id: i64 },
    MediaUploaded { upload: MediaUpload, file_name: String },
    BroadcastAccepted(BroadcastAccepted),
}

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Load a resource (with the single automatic retry)
    Fetch {
        id: u64,
        resource: Resource,
        cancel: CancellationToken,
    },
    /// Run a mutation; never retried
    Mutate {
        id: u64,
        mutation: Mutation,
        cancel: CancellationToken,
    },
    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    Fetched {
        id: u64,
        data: ResourceData,
    },
    FetchFailed {
        id: u64,
        resource: Resource,
        message: String,
    },
    Mutated {
        id: u64,
        outcome: MutationOutcome,
    },
    MutationFailed {
        id: u64,
        kind: MutationKind,
        message: String,
    },
    /// The owning screen was unmounted before the call finished
    Cancelled {
        id: u64,
    },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::Fetched { id, .. } => *id,
            NetworkResponse::FetchFailed { id, .. } => *id,
            NetworkResponse::Mutated { id, .. } => *id,
            NetworkResponse::MutationFailed { id, .. } => *id,
            NetworkResponse::Cancelled { id } => *id,
        }
    }
}
