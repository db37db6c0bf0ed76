use std::collections::BTreeSet;
use std::sync::Arc;

use crate::{
    db::TrustEdgeStore,
    error::{StoreError, StoreResult, TrustError},
    models::{MutualStatus, TrustEdge, UserId},
};

/// Directed trust relationships between users
///
/// Stateless over an injected [`TrustEdgeStore`]. The store owns the
/// one-edge-per-pair invariant; this service only translates its duplicate
/// error into [`TrustError::AlreadyConnected`].
#[derive(Clone)]
pub struct TrustGraphService {
    store: Arc<dyn TrustEdgeStore>,
}

impl TrustGraphService {
    pub fn new(store: Arc<dyn TrustEdgeStore>) -> Self {
        Self { store }
    }

    /// Records that `source` trusts `target`
    pub async fn connect(&self, source: UserId, target: UserId) -> Result<TrustEdge, TrustError> {
        if source == target {
            return Err(TrustError::SelfConnect);
        }

        let edge = TrustEdge::new(source, target);

        // No existence pre-check: two concurrent connects would both pass it.
        match self.store.insert_edge(&edge).await {
            Ok(()) => {
                tracing::info!(source = %source, target = %target, "Trust edge created");
                Ok(edge)
            }
            Err(StoreError::Duplicate) => {
                tracing::debug!(source = %source, target = %target, "Trust edge already exists");
                Err(TrustError::AlreadyConnected)
            }
            Err(e) => {
                tracing::error!(source = %source, target = %target, error = %e, "Failed to create trust edge");
                Err(TrustError::Store(e))
            }
        }
    }

    /// Removes the edge `source -> target` if present
    pub async fn disconnect(&self, source: UserId, target: UserId) -> Result<(), TrustError> {
        self.store.delete_edge(source, target).await?;
        tracing::info!(source = %source, target = %target, "Trust edge removed");
        Ok(())
    }

    pub async fn is_connected(&self, source: UserId, target: UserId) -> StoreResult<bool> {
        self.store.edge_exists(source, target).await
    }

    pub async fn mutual_status(&self, source: UserId, target: UserId) -> StoreResult<MutualStatus> {
        let (outgoing, incoming) = tokio::try_join!(
            self.store.edge_exists(source, target),
            self.store.edge_exists(target, source),
        )?;

        Ok(MutualStatus::new(outgoing, incoming))
    }

    /// Users one edge away from `user`, in either direction
    ///
    /// Only direct neighbors are considered; trust is not transitive here.
    pub async fn trusted_neighbors(&self, user: UserId) -> StoreResult<BTreeSet<UserId>> {
        let (outgoing, incoming) =
            tokio::try_join!(self.store.edges_from(user), self.store.edges_to(user))?;

        let neighbors: BTreeSet<UserId> = outgoing
            .into_iter()
            .map(|edge| edge.target)
            .chain(incoming.into_iter().map(|edge| edge.source))
            .collect();

        tracing::debug!(user = %user, neighbor_count = neighbors.len(), "Resolved trusted neighbors");

        Ok(neighbors)
    }
}
